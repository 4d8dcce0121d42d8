use af_core::cancel::CancelToken;
use af_core::charset::LuminanceLut;
use af_core::error::CoreError;
use af_core::frame::{FrameBuffer, FrameSequence};
use af_source::resize::Resizer;

use crate::convert::image_to_ascii;

/// Convertit une suite de frames en séquence ASCII, dans l'ordre.
///
/// Traitement strictement séquentiel : chaque buffer est consommé puis libéré
/// dès que sa grille est produite, un seul [`Resizer`] sert pour toute la suite.
/// `on_progress(done, total)` est appelé après chaque frame, `cancel` est
/// consulté avant chacune.
///
/// # Errors
/// The first conversion failure aborts the batch, as does
/// [`CoreError::Cancelled`] once `cancel` is set.
///
/// # Example
/// ```
/// use af_core::frame::FrameBuffer;
/// use af_core::charset::LuminanceLut;
/// use af_ascii::batch::frames_to_ascii;
///
/// let frames = vec![FrameBuffer::filled(4, 4, (0, 0, 0, 255)); 3];
/// let mut seen = Vec::new();
/// let mut progress = |done: usize, total: usize| seen.push((done, total));
/// let seq = frames_to_ascii(frames, 2, &LuminanceLut::default(), Some(&mut progress), None).unwrap();
/// assert_eq!(seq.len(), 3);
/// assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
/// ```
pub fn frames_to_ascii(
    frames: Vec<FrameBuffer>,
    target_width: u32,
    lut: &LuminanceLut,
    mut on_progress: Option<&mut dyn FnMut(usize, usize)>,
    cancel: Option<&CancelToken>,
) -> Result<FrameSequence, CoreError> {
    let total = frames.len();
    let mut resizer = Resizer::new();
    let mut sequence = Vec::with_capacity(total);

    for (i, frame) in frames.into_iter().enumerate() {
        if let Some(token) = cancel {
            token.check()?;
        }
        let art = image_to_ascii(&frame, target_width, lut, &mut resizer)?;
        drop(frame);
        sequence.push(art);
        if let Some(report) = on_progress.as_deref_mut() {
            report(i + 1, total);
        }
    }

    log::info!("Batch ASCII terminé : {total} frames à {target_width} colonnes");
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch() {
        let mut calls = 0;
        let mut progress = |_: usize, _: usize| calls += 1;
        let seq = frames_to_ascii(
            Vec::new(),
            10,
            &LuminanceLut::default(),
            Some(&mut progress),
            None,
        )
        .unwrap();
        assert!(seq.is_empty());
        assert_eq!(calls, 0);
    }

    #[test]
    fn order_is_preserved() {
        let frames = vec![
            FrameBuffer::filled(8, 8, (0, 0, 0, 255)),
            FrameBuffer::filled(8, 8, (255, 255, 255, 255)),
            FrameBuffer::filled(8, 8, (0, 0, 0, 255)),
        ];
        let seq = frames_to_ascii(frames, 2, &LuminanceLut::default(), None, None).unwrap();
        assert_eq!(seq, vec!["@@".to_string(), "  ".to_string(), "@@".to_string()]);
    }

    #[test]
    fn failure_aborts_and_stops_progress() {
        let frames = vec![
            FrameBuffer::filled(4, 4, (0, 0, 0, 255)),
            FrameBuffer::new(0, 0),
            FrameBuffer::filled(4, 4, (0, 0, 0, 255)),
        ];
        let mut seen = Vec::new();
        let mut progress = |done: usize, total: usize| seen.push((done, total));
        let err = frames_to_ascii(
            frames,
            2,
            &LuminanceLut::default(),
            Some(&mut progress),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::ResourceUnavailable(_)));
        assert_eq!(seen, vec![(1, 3)]);
    }

    #[test]
    fn every_frame_has_same_shape() {
        let frames = vec![FrameBuffer::filled(60, 30, (120, 40, 200, 255)); 5];
        let seq = frames_to_ascii(frames, 20, &LuminanceLut::default(), None, None).unwrap();
        for art in &seq {
            let lines: Vec<&str> = art.lines().collect();
            assert_eq!(lines.len(), 5);
            assert!(lines.iter().all(|l| l.chars().count() == 20));
        }
    }

    #[test]
    fn cancelled_batch_converts_nothing() {
        let frames = vec![FrameBuffer::filled(4, 4, (0, 0, 0, 255)); 3];
        let token = CancelToken::new();
        token.cancel();
        let mut calls = 0;
        let mut progress = |_: usize, _: usize| calls += 1;
        let err = frames_to_ascii(
            frames,
            2,
            &LuminanceLut::default(),
            Some(&mut progress),
            Some(&token),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
        assert_eq!(calls, 0);
    }

    #[test]
    fn cancel_from_progress_stops_remaining_frames() {
        let frames = vec![FrameBuffer::filled(4, 4, (0, 0, 0, 255)); 4];
        let token = CancelToken::new();
        let trigger = token.clone();
        let mut seen = Vec::new();
        let mut progress = |done: usize, total: usize| {
            seen.push((done, total));
            if done == 2 {
                trigger.cancel();
            }
        };
        let err = frames_to_ascii(
            frames,
            2,
            &LuminanceLut::default(),
            Some(&mut progress),
            Some(&token),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
        assert_eq!(seen, vec![(1, 4), (2, 4)]);
    }
}
