// Ce module utilise ffmpeg via subprocess (std::process::Command), sans
// binding C. Prérequis runtime : `ffmpeg` et `ffprobe` accessibles dans PATH.
//
// Architecture :
//   - `probe_video`      : interroge ffprobe pour width/height/rotation/durée
//   - `spawn_ffmpeg_seek`: lance ffmpeg → une frame RGBA brute sur stdout
//   - `FfmpegVideo`      : thread dédié `af-video`, un seek à la fois,
//                          réponse sur canal one-shot (PendingFrame)

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;

use af_core::error::CoreError;
use af_core::frame::FrameBuffer;
use af_core::traits::{PendingFrame, VideoSource};
use flume::{Receiver, Sender};

type SeekReply = Sender<Result<FrameBuffer, CoreError>>;

/// Commandes pour le thread vidéo.
#[derive(Debug)]
pub enum VideoCommand {
    /// Capturer la frame visible à `at` secondes et répondre sur `reply`.
    Seek {
        /// Timestamp cible en secondes.
        at: f64,
        /// Canal one-shot de réponse.
        reply: SeekReply,
    },
    /// Arrêter le thread proprement.
    Quit,
}

/// Métadonnées extraites via ffprobe.
///
/// `width`/`height` sont les dimensions d'affichage : rotation de 90° ou 270°
/// déjà appliquée, comme les frames produites par ffmpeg (autorotate).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Durée du flux vidéo en secondes (durée du conteneur à défaut).
    pub duration: f64,
}

/// Interroge `ffprobe` pour obtenir les métadonnées du flux vidéo principal.
///
/// # Errors
/// Retourne [`CoreError::Decode`] si `ffprobe` est introuvable ou si le fichier
/// ne contient aucun flux vidéo décodable.
pub fn probe_video(path: &Path) -> Result<VideoInfo, CoreError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,duration:stream_side_data=rotation:stream_tags=rotate:format=duration",
            "-of",
            "default",
            "-i",
        ])
        .arg(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| {
            CoreError::Decode(format!(
                "impossible de lancer ffprobe ({e}). Vérifiez que ffprobe est installé et dans le PATH."
            ))
        })?;

    let text = String::from_utf8_lossy(&output.stdout);
    let info = parse_probe_output(&text)
        .map_err(|e| CoreError::Decode(format!("{} : {e}", path.display())))?;

    log::info!(
        "probe_video: {}x{}, {:.2}s ({})",
        info.width,
        info.height,
        info.duration,
        path.display()
    );
    Ok(info)
}

/// Parse la sortie sectionnée (`[STREAM]` … `[FORMAT]`) de ffprobe.
///
/// La durée du flux est préférée à celle du conteneur, qui peut inclure une
/// piste audio plus longue. Une rotation de ±90° échange largeur et hauteur.
///
/// # Errors
/// Returns a description of the first missing or invalid field.
///
/// # Example
/// ```
/// use af_source::video::parse_probe_output;
/// let text = "[STREAM]\nwidth=640\nheight=360\nduration=2.5\n[/STREAM]\n\
///             [FORMAT]\nduration=3.0\n[/FORMAT]\n";
/// let info = parse_probe_output(text).unwrap();
/// assert_eq!((info.width, info.height), (640, 360));
/// assert!((info.duration - 2.5).abs() < f64::EPSILON);
/// ```
pub fn parse_probe_output(text: &str) -> Result<VideoInfo, String> {
    let mut width: Option<u32> = None;
    let mut height: Option<u32> = None;
    let mut rotation: i64 = 0;
    let mut stream_duration: Option<f64> = None;
    let mut format_duration: Option<f64> = None;
    let mut in_format = false;

    for line in text.lines().map(str::trim) {
        match line {
            "[FORMAT]" => in_format = true,
            "[/FORMAT]" => in_format = false,
            _ => {}
        }
        let Some((key, val)) = line.split_once('=') else {
            continue;
        };
        match key {
            "width" if !in_format => width = val.parse().ok(),
            "height" if !in_format => height = val.parse().ok(),
            "duration" if in_format => format_duration = parse_duration(val),
            "duration" => stream_duration = parse_duration(val),
            // Side data (display matrix) prioritaire sur le vieux tag `rotate`.
            "rotation" => rotation = parse_rotation(val).unwrap_or(rotation),
            "TAG:rotate" if rotation == 0 => rotation = parse_rotation(val).unwrap_or(0),
            _ => {}
        }
    }

    let (Some(mut width), Some(mut height)) = (width, height) else {
        return Err("aucun flux vidéo trouvé".into());
    };
    if width == 0 || height == 0 {
        return Err(format!("dimensions invalides {width}×{height}"));
    }
    if rotation.rem_euclid(180) == 90 {
        std::mem::swap(&mut width, &mut height);
    }
    let duration = stream_duration
        .or(format_duration)
        .ok_or("durée inconnue")?;

    Ok(VideoInfo {
        width,
        height,
        duration,
    })
}

/// Durée finie et positive, `N/A` sinon.
fn parse_duration(val: &str) -> Option<f64> {
    val.trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

/// Rotation en degrés entiers (`-90`, `90.00`, `270`).
fn parse_rotation(val: &str) -> Option<i64> {
    let degrees = val.trim().parse::<f64>().ok().filter(|d| d.is_finite())?;
    Some(degrees.round() as i64)
}

/// Lance un processus `ffmpeg` qui écrit une seule frame RGBA brute sur stdout.
///
/// `-ss` avant `-i` = seek rapide, puis décodage jusqu'à la position exacte.
///
/// # Errors
/// Retourne [`CoreError::Seek`] si le spawn échoue.
pub fn spawn_ffmpeg_seek(path: &Path, at: f64) -> Result<Child, CoreError> {
    let pos_str = format!("{at:.3}");
    Command::new("ffmpeg")
        .args(["-ss", &pos_str, "-i"])
        .arg(path)
        .args([
            "-frames:v",
            "1",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-an",
            "-hide_banner",
            "-loglevel",
            "error",
            "pipe:1",
        ])
        .stdout(Stdio::piped())
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| CoreError::seek(at, format!("impossible de lancer ffmpeg : {e}")))
}

/// Lit exactement `buf.len()` bytes depuis `reader`.
///
/// # Errors
/// Retourne `Ok(true)` si lu avec succès, `Ok(false)` sur EOF avant complétion,
/// `Err` sur erreur I/O fatale.
pub fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<bool> {
    let mut total = 0usize;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => return Ok(false), // EOF
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

/// Lit une frame `width × height` RGBA depuis `reader`.
///
/// # Errors
/// Retourne [`CoreError::Seek`] sur EOF prématuré ou erreur I/O.
pub fn read_frame<R: Read>(
    reader: &mut R,
    width: u32,
    height: u32,
    at: f64,
) -> Result<FrameBuffer, CoreError> {
    let mut frame = FrameBuffer::new(width, height);
    match read_exact_or_eof(reader, &mut frame.data) {
        Ok(true) => Ok(frame),
        Ok(false) => Err(CoreError::seek(at, "aucune frame décodée à cette position")),
        Err(e) => Err(CoreError::seek(at, format!("erreur lecture pipe : {e}"))),
    }
}

/// Capture la frame à `at` en attendant la fin du processus ffmpeg.
fn capture_frame(path: &Path, info: &VideoInfo, at: f64) -> Result<FrameBuffer, CoreError> {
    let mut child = spawn_ffmpeg_seek(path, at)?;
    let result = match child.stdout.as_mut() {
        Some(stdout) => read_frame(stdout, info.width, info.height, at),
        None => Err(CoreError::seek(at, "stdout ffmpeg indisponible")),
    };
    let _ = child.kill();
    let _ = child.wait();
    result
}

/// Source vidéo adossée à ffmpeg : un thread dédié exécute les seeks un par un.
///
/// # Example
/// ```no_run
/// use af_core::traits::VideoSource;
/// use af_source::video::FfmpegVideo;
/// use std::path::Path;
///
/// let mut video = FfmpegVideo::open(Path::new("clip.mp4")).unwrap();
/// let first = video.seek(0.0).wait(None).unwrap();
/// assert_eq!((first.width, first.height), video.native_size());
/// ```
pub struct FfmpegVideo {
    info: VideoInfo,
    cmd_tx: Sender<VideoCommand>,
    path: PathBuf,
}

impl FfmpegVideo {
    /// Sonde le fichier puis démarre le thread `af-video`.
    ///
    /// # Errors
    /// [`CoreError::Decode`] si la vidéo n'est jamais prête (probe impossible),
    /// [`CoreError::ResourceUnavailable`] si le thread ne peut être créé.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let info = probe_video(path)?;
        let (cmd_tx, cmd_rx) = flume::bounded(10);
        let thread_path = path.to_path_buf();

        thread::Builder::new()
            .name("af-video".to_string())
            .spawn(move || video_loop(&thread_path, &info, &cmd_rx))
            .map_err(|e| {
                CoreError::ResourceUnavailable(format!("impossible de spawner le thread vidéo : {e}"))
            })?;

        Ok(Self {
            info,
            cmd_tx,
            path: path.to_path_buf(),
        })
    }
}

impl VideoSource for FfmpegVideo {
    fn duration(&self) -> f64 {
        self.info.duration
    }

    fn native_size(&self) -> (u32, u32) {
        (self.info.width, self.info.height)
    }

    fn seek(&mut self, at: f64) -> PendingFrame<'_> {
        let (reply, rx) = flume::bounded(1);
        if self.cmd_tx.send(VideoCommand::Seek { at, reply }).is_err() {
            return PendingFrame::ready(
                at,
                Err(CoreError::seek(at, "thread vidéo arrêté")),
            );
        }
        PendingFrame::new(at, rx)
    }
}

impl Drop for FfmpegVideo {
    fn drop(&mut self) {
        // Le thread termine le seek en vol éventuel, puis lit Quit.
        let _ = self.cmd_tx.send(VideoCommand::Quit);
        log::debug!("FfmpegVideo fermée : {}", self.path.display());
    }
}

/// Boucle principale du thread vidéo.
fn video_loop(path: &Path, info: &VideoInfo, cmd_rx: &Receiver<VideoCommand>) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            VideoCommand::Seek { at, reply } => {
                let result = capture_frame(path, info, at);
                if let Err(e) = &result {
                    log::warn!("Thread vidéo: {e}");
                }
                // Receveur abandonné (timeout côté appelant) : résultat ignoré.
                let _ = reply.send(result);
            }
            VideoCommand::Quit => {
                log::info!("Thread vidéo: Quit reçu, arrêt propre.");
                return;
            }
        }
    }
    log::info!("Thread vidéo terminé (canal fermé).");
}
