use std::io::Write;
use std::path::Path;

use af_ascii::batch::frames_to_ascii;
use af_ascii::convert::{image_to_ascii, video_frame_to_ascii};
use af_core::cancel::CancelToken;
use af_core::charset::LuminanceLut;
use af_core::config::ConvertConfig;
use af_core::frame::FrameSequence;
use af_export::codegen::{
    component_name_from_file, generate_animated_react_component, generate_react_component,
    sanitize_component_name,
};
use af_export::emit::write_component;
use af_source::extract::{ExtractOptions, extract_video_frames};
use af_source::image::load_image;
use af_source::resize::Resizer;
use af_source::video::FfmpegVideo;
use anyhow::{Context, Result};

use crate::cli::{Cli, Emit};
use crate::player;

/// Résultat d'une conversion : une grille ou une séquence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Still(String),
    Animation(FrameSequence),
}

/// Exécute la conversion décrite par la CLI, puis émet le résultat.
///
/// # Errors
/// Returns an error if decoding, seeking, conversion or output fails.
pub fn run(cli: &Cli, config: &ConvertConfig, cancel: &CancelToken) -> Result<()> {
    let lut = LuminanceLut::new(&config.charset).context("Rampe de glyphes invalide")?;

    let (path, rendered) = if let Some(ref path) = cli.image {
        (path, Rendered::Still(convert_image(path, config, &lut)?))
    } else if let Some(ref path) = cli.video {
        let rendered = if cli.wants_animation() {
            Rendered::Animation(animate_video(path, config, &lut, cancel)?)
        } else {
            Rendered::Still(convert_video_still(path, config, &lut, cancel)?)
        };
        (path, rendered)
    } else {
        anyhow::bail!("Aucune source visuelle spécifiée.");
    };
    // Ctrl-C pendant la dernière conversion : rien n'est émis.
    cancel.check()?;

    if cli.play
        && let Rendered::Animation(ref frames) = rendered
    {
        player::play(frames, config.fps, cancel)?;
        if cli.emit == Emit::Text || cancel.is_cancelled() {
            return Ok(());
        }
    }

    let name = component_name(config, path);
    match (cli.emit, cli.out.as_deref()) {
        (Emit::Component, Some(dir)) => {
            let source = component_source(&rendered, config.fps, &name);
            let written = write_component(dir, &name, &source)?;
            log::info!("Composant {name} écrit dans {}", written.display());
        }
        (Emit::Component, None) => {
            let source = component_source(&rendered, config.fps, &name);
            write_stdout(&source)?;
        }
        (Emit::Text, _) => write_stdout(&render_text(&rendered))?,
    }
    Ok(())
}

/// Charge une image et la convertit à `config.width` colonnes.
///
/// # Errors
/// Returns an error if the image cannot be decoded or converted.
pub fn convert_image(path: &Path, config: &ConvertConfig, lut: &LuminanceLut) -> Result<String> {
    let image = load_image(path)?;
    log::info!(
        "Image {}x{} → {} colonnes",
        image.width,
        image.height,
        config.width
    );
    let art = image_to_ascii(&image, config.width, lut, &mut Resizer::new())
        .with_context(|| format!("Conversion impossible : {}", path.display()))?;
    Ok(art)
}

/// Convertit la frame visible à `config.frame_at`.
///
/// # Errors
/// Returns an error if the video cannot be opened, the seek fails, or the
/// run is cancelled while waiting for the frame.
pub fn convert_video_still(
    path: &Path,
    config: &ConvertConfig,
    lut: &LuminanceLut,
    cancel: &CancelToken,
) -> Result<String> {
    let mut video = FfmpegVideo::open(path)?;
    let art = video_frame_to_ascii(
        &mut video,
        config.width,
        config.frame_at,
        config.seek_timeout(),
        Some(cancel),
        lut,
        &mut Resizer::new(),
    )
    .with_context(|| format!("Conversion impossible : {}", path.display()))?;
    Ok(art)
}

/// Extrait les frames à `config.fps` puis les convertit une à une.
///
/// # Errors
/// Returns an error if extraction exceeds the frame ceiling, a seek fails,
/// or the run is cancelled.
pub fn animate_video(
    path: &Path,
    config: &ConvertConfig,
    lut: &LuminanceLut,
    cancel: &CancelToken,
) -> Result<FrameSequence> {
    let mut video = FfmpegVideo::open(path)?;
    let options = ExtractOptions {
        seek_timeout: config.seek_timeout(),
        cancel: Some(cancel.clone()),
    };
    let frames = extract_video_frames(&mut video, config.fps, &options)
        .with_context(|| format!("Extraction impossible : {}", path.display()))?;
    drop(video);

    let mut progress = |done: usize, total: usize| {
        log::info!("Conversion ASCII : frame {done}/{total}");
    };
    let sequence =
        frames_to_ascii(frames, config.width, lut, Some(&mut progress), Some(cancel))?;
    Ok(sequence)
}

/// Nom explicite (config/CLI) ou dérivé du fichier source, toujours un
/// identifiant TSX valide.
#[must_use]
pub fn component_name(config: &ConvertConfig, path: &Path) -> String {
    match config.component_name.as_deref() {
        Some(requested) => {
            let name = sanitize_component_name(requested);
            if name != requested {
                log::warn!("Nom de composant '{requested}' invalide, utilisation de '{name}'");
            }
            name
        }
        None => component_name_from_file(path.file_name().and_then(|n| n.to_str())),
    }
}

/// Source TSX pour un rendu donné.
#[must_use]
pub fn component_source(rendered: &Rendered, fps: f64, name: &str) -> String {
    match rendered {
        Rendered::Still(art) => generate_react_component(art, name),
        Rendered::Animation(frames) => generate_animated_react_component(frames, fps, name),
    }
}

/// Texte brut : les frames d'une animation sont séparées par une ligne vide.
#[must_use]
pub fn render_text(rendered: &Rendered) -> String {
    match rendered {
        Rendered::Still(art) => art.clone(),
        Rendered::Animation(frames) => frames.join("\n\n"),
    }
}

fn write_stdout(text: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{text}").context("Écriture stdout impossible")?;
    out.flush()?;
    Ok(())
}
