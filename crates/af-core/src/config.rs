use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::ASCII_CHARS;

/// Presets de qualité exposés par le sélecteur : S, M, L.
///
/// # Example
/// ```
/// use af_core::config::Quality;
/// assert_eq!(Quality::Medium.width(), 100);
/// assert_eq!(Quality::parse("l"), Some(Quality::Large));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Quality {
    /// ~50 colonnes.
    Small,
    /// ~100 colonnes.
    #[default]
    Medium,
    /// ~150 colonnes.
    Large,
}

impl Quality {
    /// Largeur de grille associée au preset.
    #[must_use]
    pub fn width(self) -> u32 {
        match self {
            Self::Small => 50,
            Self::Medium => 100,
            Self::Large => 150,
        }
    }

    /// Parse "s" / "m" / "l" (insensible à la casse).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "small" => Some(Self::Small),
            "m" | "medium" => Some(Self::Medium),
            "l" | "large" => Some(Self::Large),
            _ => None,
        }
    }
}

/// Configuration complète d'une conversion.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use af_core::config::ConvertConfig;
/// let config = ConvertConfig::default();
/// assert_eq!(config.width, 100);
/// assert_eq!(config.charset, "@%#*+=-:. ");
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ConvertConfig {
    // === Conversion ===
    /// Largeur de la grille en caractères.
    pub width: u32,
    /// Rampe de glyphes, du plus dense au plus clair.
    pub charset: String,

    // === Vidéo ===
    /// Fréquence d'échantillonnage des frames (images/s).
    pub fps: f64,
    /// Timestamp (s) de la frame unique pour la conversion statique d'une vidéo.
    pub frame_at: f64,
    /// Borne d'attente par seek, en millisecondes. 0 = pas de borne.
    pub seek_timeout_ms: u64,

    // === Export ===
    /// Nom du composant généré. None = dérivé du nom de fichier.
    pub component_name: Option<String>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            width: Quality::Medium.width(),
            charset: ASCII_CHARS.to_string(),
            fps: 2.0,
            frame_at: 0.0,
            seek_timeout_ms: 5000,
            component_name: None,
        }
    }
}

/// Largeur maximale de la grille, en colonnes.
pub const MAX_WIDTH: u32 = 1000;

/// Cadence d'extraction maximale.
pub const MAX_FPS: f64 = 120.0;

impl ConvertConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    /// Every value changed here except a negative `frame_at` is logged.
    pub fn clamp_all(&mut self) {
        if self.width > MAX_WIDTH {
            log::warn!("largeur {} plafonnée à {MAX_WIDTH} colonnes", self.width);
        }
        self.width = self.width.clamp(1, MAX_WIDTH);
        if !self.fps.is_finite() || self.fps <= 0.0 {
            log::warn!("fps invalide ({}), retour à 2.0", self.fps);
            self.fps = 2.0;
        }
        if self.fps > MAX_FPS {
            log::warn!("fps {} plafonné à {MAX_FPS}", self.fps);
            self.fps = MAX_FPS;
        }
        if !self.frame_at.is_finite() {
            self.frame_at = 0.0;
        }
        self.frame_at = self.frame_at.max(0.0);
        if self.charset.is_empty() {
            log::warn!("charset vide, retour à la rampe par défaut");
            self.charset = ASCII_CHARS.to_string();
        }
    }

    /// Borne par seek, `None` si désactivée (0 ms).
    ///
    /// # Example
    /// ```
    /// use af_core::config::ConvertConfig;
    /// let mut config = ConvertConfig::default();
    /// assert!(config.seek_timeout().is_some());
    /// config.seek_timeout_ms = 0;
    /// assert!(config.seek_timeout().is_none());
    /// ```
    #[must_use]
    pub fn seek_timeout(&self) -> Option<Duration> {
        (self.seek_timeout_ms > 0).then(|| Duration::from_millis(self.seek_timeout_ms))
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    convert: Option<ConvertSection>,
    video: Option<VideoSection>,
    export: Option<ExportSection>,
}

/// Convert section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct ConvertSection {
    width: Option<u32>,
    quality: Option<Quality>,
    charset: Option<String>,
}

#[derive(Deserialize)]
struct VideoSection {
    fps: Option<f64>,
    frame_at: Option<f64>,
    seek_timeout_ms: Option<u64>,
}

#[derive(Deserialize)]
struct ExportSection {
    component_name: Option<String>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// `width` l'emporte sur `quality` si les deux sont présents.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use af_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ConvertConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))
}

/// Parse un contenu TOML déjà chargé.
///
/// # Errors
/// Returns an error if the content is not valid TOML for this schema.
pub fn parse_config(content: &str) -> Result<ConvertConfig> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = ConvertConfig::default();

    if let Some(c) = file.convert {
        if let Some(q) = c.quality {
            config.width = q.width();
        }
        if let Some(v) = c.width {
            config.width = v;
        }
        if let Some(v) = c.charset {
            config.charset = v;
        }
    }

    if let Some(v) = file.video {
        if let Some(fps) = v.fps {
            config.fps = fps;
        }
        if let Some(at) = v.frame_at {
            config.frame_at = at;
        }
        if let Some(ms) = v.seek_timeout_ms {
            config.seek_timeout_ms = ms;
        }
    }

    if let Some(e) = file.export {
        config.component_name = e.component_name;
    }

    config.clamp_all();
    Ok(config)
}
