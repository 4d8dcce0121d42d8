use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Écrit `source` dans `<dir>/<name>.tsx`, en créant `dir` si besoin.
///
/// # Errors
/// Retourne une erreur si le dossier ne peut être créé ou le fichier écrit.
pub fn write_component(dir: &Path, name: &str, source: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Impossible de créer le dossier {}", dir.display()))?;
    let path = dir.join(format!("{name}.tsx"));
    fs::write(&path, source)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("Composant exporté : {} ({} octets)", path.display(), source.len());
    Ok(path)
}
