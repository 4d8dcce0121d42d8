use std::path::PathBuf;

use af_core::charset::named_ramp;
use af_core::config::{ConvertConfig, Quality};
use clap::{Parser, ValueEnum};

/// Format de sortie.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// Art brut sur stdout.
    #[default]
    Text,
    /// Composant React (TSX).
    Component,
}

/// ascii-forge : convertisseur image/vidéo vers art ASCII et composants React.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source visuelle : chemin vers une image (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Source visuelle : chemin vers une vidéo (ffmpeg/ffprobe requis dans PATH).
    #[arg(long)]
    pub video: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Preset de largeur : s (50), m (100), l (150).
    #[arg(long)]
    pub quality: Option<String>,

    /// Largeur explicite en colonnes, 1 à 1000 (prioritaire sur --quality).
    #[arg(long)]
    pub width: Option<u32>,

    /// Rampe de glyphes : default, full, blocks, ou une rampe littérale (dense → clair).
    #[arg(long)]
    pub charset: Option<String>,

    /// Images par seconde extraites en mode --animate (120 au plus).
    #[arg(long)]
    pub fps: Option<f64>,

    /// Timestamp (s) de la frame convertie en mode statique vidéo.
    #[arg(long)]
    pub at: Option<f64>,

    /// Convertit toute la vidéo en séquence animée.
    #[arg(long, default_value_t = false)]
    pub animate: bool,

    /// Sortie : text ou component.
    #[arg(long, value_enum, default_value_t = Emit::Text)]
    pub emit: Emit,

    /// Nom du composant généré.
    #[arg(long)]
    pub name: Option<String>,

    /// Dossier de sortie du fichier .tsx (sinon stdout).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Joue la séquence dans le terminal (implique --animate).
    #[arg(long, default_value_t = false)]
    pub play: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Validate that exactly one visual source is provided.
    ///
    /// # Errors
    /// Returns an error if zero or more than one source is specified,
    /// or if animation is requested for an image.
    pub fn validate_source(&self) -> anyhow::Result<()> {
        let count = usize::from(self.image.is_some()) + usize::from(self.video.is_some());

        if count == 0 {
            anyhow::bail!("Aucune source visuelle spécifiée. Utilisez --image ou --video.");
        }
        if count > 1 {
            anyhow::bail!("Une seule source visuelle à la fois. Spécifiez --image OU --video.");
        }
        if self.image.is_some() && self.wants_animation() {
            anyhow::bail!("--animate et --play ne s'appliquent qu'à une vidéo.");
        }
        Ok(())
    }

    /// `--animate` ou `--play`.
    #[must_use]
    pub fn wants_animation(&self) -> bool {
        self.animate || self.play
    }

    /// Applique les overrides CLI sur la config chargée.
    ///
    /// # Errors
    /// Returns an error for an unknown `--quality` value.
    pub fn apply_overrides(&self, config: &mut ConvertConfig) -> anyhow::Result<()> {
        if let Some(ref q) = self.quality {
            let Some(quality) = Quality::parse(q) else {
                anyhow::bail!("Qualité inconnue '{q}'. Valeurs : s, m, l.");
            };
            config.width = quality.width();
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(ref ramp) = self.charset {
            config.charset = named_ramp(ramp).map_or_else(|| ramp.clone(), str::to_string);
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(at) = self.at {
            config.frame_at = at;
        }
        if let Some(ref name) = self.name {
            config.component_name = Some(name.clone());
        }
        config.clamp_all();
        Ok(())
    }
}
