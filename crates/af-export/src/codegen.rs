//! Génération de composants React (TSX) à partir d'art ASCII.
//!
//! Sortie déterministe, aucune I/O : même entrée, même texte.

/// Classes du conteneur `<pre>` : largeur fixe, interligne fixe, espaces préservés.
pub const PRE_CLASSES: &str = "font-mono text-xs leading-none whitespace-pre";

/// Nom par défaut quand aucun fichier source n'est connu.
pub const DEFAULT_COMPONENT_NAME: &str = "AsciiArt";

/// Échappe un texte pour un template literal JS : `\`, `` ` `` et `${`.
///
/// # Example
/// ```
/// use af_export::codegen::escape_template_literal;
/// assert_eq!(escape_template_literal("a`b"), "a\\`b");
/// assert_eq!(escape_template_literal("${x}"), "\\${x}");
/// assert_eq!(escape_template_literal("\\"), "\\\\");
/// ```
#[must_use]
pub fn escape_template_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            _ => out.push(c),
        }
    }
    out
}

/// Période du timer d'animation en ms : `round(1000 / fps)`, au moins 1.
///
/// Un fps non fini ou ≤ 0 est traité comme 1 fps.
///
/// # Example
/// ```
/// use af_export::codegen::frame_interval_ms;
/// assert_eq!(frame_interval_ms(10.0), 100);
/// assert_eq!(frame_interval_ms(30.0), 33);
/// ```
#[must_use]
pub fn frame_interval_ms(fps: f64) -> u64 {
    if !fps.is_finite() || fps <= 0.0 {
        log::warn!("fps invalide ({fps}) pour l'animation, 1 fps utilisé");
        return 1000;
    }
    (1000.0 / fps).round().max(1.0) as u64
}

/// Réduit `name` à un identifiant TSX : alphanumériques ASCII seulement,
/// préfixe `Art` devant un chiffre initial, [`DEFAULT_COMPONENT_NAME`] si vide.
///
/// # Example
/// ```
/// use af_export::codegen::sanitize_component_name;
/// assert_eq!(sanitize_component_name("my art"), "myart");
/// assert_eq!(sanitize_component_name("Hero"), "Hero");
/// ```
#[must_use]
pub fn sanitize_component_name(name: &str) -> String {
    let cleaned: String = name.chars().filter(char::is_ascii_alphanumeric).collect();
    if cleaned.is_empty() {
        DEFAULT_COMPONENT_NAME.to_string()
    } else if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Art{cleaned}")
    } else {
        cleaned
    }
}

/// Dérive un nom de composant depuis un nom de fichier.
///
/// Retire la dernière extension, garde les alphanumériques ASCII, suffixe `Ascii`.
///
/// # Example
/// ```
/// use af_export::codegen::component_name_from_file;
/// assert_eq!(component_name_from_file(Some("my-cat.photo.png")), "mycatphotoAscii");
/// assert_eq!(component_name_from_file(None), "AsciiArt");
/// ```
#[must_use]
pub fn component_name_from_file(file_name: Option<&str>) -> String {
    let Some(file_name) = file_name.filter(|f| !f.is_empty()) else {
        return DEFAULT_COMPONENT_NAME.to_string();
    };
    let stem = match file_name.rfind('.') {
        Some(dot) if dot > 0 && !file_name[dot + 1..].is_empty() => &file_name[..dot],
        _ => file_name,
    };
    sanitize_component_name(&format!("{stem}Ascii"))
}

/// Composant statique : l'art dans une constante, rendu dans un `<pre>`.
///
/// # Example
/// ```
/// use af_export::codegen::generate_react_component;
/// let src = generate_react_component("@ @", "Cat");
/// assert!(src.contains("export function Cat()"));
/// assert!(src.contains("const art = `@ @`;"));
/// ```
#[must_use]
pub fn generate_react_component(art: &str, name: &str) -> String {
    format!(
        "export function {name}() {{
  const art = `{art}`;

  return (
    <pre className=\"{PRE_CLASSES}\">
      {{art}}
    </pre>
  );
}}
",
        art = escape_template_literal(art),
    )
}

/// Composant animé : frames en tableau, index d'état à 0, timer `setInterval`
/// avançant modulo le nombre de frames, nettoyé au démontage.
///
/// # Example
/// ```
/// use af_export::codegen::generate_animated_react_component;
/// let frames = vec!["@".to_string(), " ".to_string()];
/// let src = generate_animated_react_component(&frames, 10.0, "Blink");
/// assert!(src.contains("import { useState, useEffect } from \"react\";"));
/// assert!(src.contains("}, 100);"));
/// ```
#[must_use]
pub fn generate_animated_react_component(frames: &[String], fps: f64, name: &str) -> String {
    let interval = frame_interval_ms(fps);
    let literals: String = frames
        .iter()
        .map(|f| format!("  `{}`,\n", escape_template_literal(f)))
        .collect();

    format!(
        "\"use client\";

import {{ useState, useEffect }} from \"react\";

const frames = [
{literals}];

export function {name}() {{
  const [frame, setFrame] = useState(0);

  useEffect(() => {{
    if (frames.length === 0) return;
    const id = setInterval(() => {{
      setFrame((f) => (f + 1) % frames.length);
    }}, {interval});
    return () => clearInterval(id);
  }}, []);

  return (
    <pre className=\"{PRE_CLASSES}\">
      {{frames[frame]}}
    </pre>
  );
}}
"
    )
}
