use std::time::Duration;

use af_core::cancel::CancelToken;
use af_core::error::CoreError;
use af_core::frame::FrameBuffer;
use af_core::traits::VideoSource;

/// Plafond dur du nombre de frames extraites par requête.
pub const MAX_FRAMES: usize = 200;

/// Options d'extraction.
#[derive(Clone, Debug, Default)]
pub struct ExtractOptions {
    /// Borne d'attente par seek. `None` = non bornée.
    pub seek_timeout: Option<Duration>,
    /// Vérifié avant chaque seek et pendant l'attente de sa frame.
    pub cancel: Option<CancelToken>,
}

/// `floor(duration · fps)`, validé contre [`MAX_FRAMES`] avant tout seek.
///
/// # Errors
/// - [`CoreError::InvalidArgument`] if `fps` is not a positive finite number.
/// - [`CoreError::Decode`] if the duration is negative or not finite.
/// - [`CoreError::CapacityExceeded`] if the count exceeds [`MAX_FRAMES`].
///
/// # Example
/// ```
/// use af_source::extract::frame_count;
/// assert_eq!(frame_count(2.0, 2.0).unwrap(), 4);
/// assert!(frame_count(100.0, 3.0).is_err());
/// ```
pub fn frame_count(duration: f64, fps: f64) -> Result<usize, CoreError> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(CoreError::InvalidArgument(format!(
            "fps doit être > 0 (reçu {fps})"
        )));
    }
    if !duration.is_finite() || duration < 0.0 {
        return Err(CoreError::Decode(format!("durée vidéo invalide : {duration}")));
    }
    let count = (duration * fps).floor();
    if count > MAX_FRAMES as f64 {
        return Err(CoreError::CapacityExceeded {
            requested: count as u64,
            max: MAX_FRAMES,
        });
    }
    Ok(count as usize)
}

/// Timestamps `i / fps` pour `i = 0 .. count`.
///
/// # Example
/// ```
/// use af_source::extract::frame_timestamps;
/// assert_eq!(frame_timestamps(4, 2.0), vec![0.0, 0.5, 1.0, 1.5]);
/// ```
#[must_use]
pub fn frame_timestamps(count: usize, fps: f64) -> Vec<f64> {
    (0..count).map(|i| i as f64 / fps).collect()
}

/// Extrait `floor(duration · fps)` frames, dans l'ordre des timestamps.
///
/// Les seeks sont strictement séquentiels : chaque [`af_core::PendingFrame`]
/// emprunte la source et doit être résolu avant le seek suivant. Chaque frame
/// doit avoir la taille native annoncée par la source.
///
/// # Errors
/// Capacity and argument errors from [`frame_count`] (before any seek),
/// [`CoreError::Cancelled`] if the token fires, or the first seek failure
/// (including a frame whose size differs from the native size).
///
/// # Example
/// ```
/// use af_core::frame::FrameBuffer;
/// use af_core::traits::{PendingFrame, VideoSource};
/// use af_source::extract::{extract_video_frames, ExtractOptions};
///
/// struct Gray;
/// impl VideoSource for Gray {
///     fn duration(&self) -> f64 { 2.0 }
///     fn native_size(&self) -> (u32, u32) { (8, 8) }
///     fn seek(&mut self, at: f64) -> PendingFrame<'_> {
///         PendingFrame::ready(at, Ok(FrameBuffer::filled(8, 8, (128, 128, 128, 255))))
///     }
/// }
///
/// let frames = extract_video_frames(&mut Gray, 2.0, &ExtractOptions::default()).unwrap();
/// assert_eq!(frames.len(), 4);
/// ```
pub fn extract_video_frames<V: VideoSource + ?Sized>(
    source: &mut V,
    fps: f64,
    options: &ExtractOptions,
) -> Result<Vec<FrameBuffer>, CoreError> {
    let count = frame_count(source.duration(), fps)?;
    log::info!(
        "Extraction de {count} frames à {fps}fps (durée {:.2}s)",
        source.duration()
    );

    let mut frames = Vec::with_capacity(count);
    for (i, at) in frame_timestamps(count, fps).into_iter().enumerate() {
        if let Some(token) = &options.cancel {
            token.check()?;
        }
        let frame = source.capture(at, options.seek_timeout, options.cancel.as_ref())?;
        log::debug!(
            "frame {}/{count} capturée à {at:.3}s ({}x{})",
            i + 1,
            frame.width,
            frame.height
        );
        frames.push(frame);
    }
    Ok(frames)
}
