use std::time::Duration;

use af_core::cancel::CancelToken;
use af_core::charset::LuminanceLut;
use af_core::error::CoreError;
use af_core::frame::FrameBuffer;
use af_core::traits::VideoSource;
use af_source::resize::Resizer;

use crate::sampler::frame_to_ascii;

/// Ratio hauteur/largeur d'une cellule de terminal (glyphe ≈ 2× plus haut que large).
pub const CELL_ASPECT: f64 = 0.5;

/// Nombre de lignes pour `target_width` colonnes : `round(tw · h/w · 0.5)`.
///
/// # Example
/// ```
/// use af_ascii::convert::grid_height;
/// assert_eq!(grid_height(100, 200, 100), 25);
/// assert_eq!(grid_height(50, 640, 480), 19);
/// ```
#[must_use]
pub fn grid_height(target_width: u32, src_width: u32, src_height: u32) -> u32 {
    if src_width == 0 {
        return 0;
    }
    let ratio = f64::from(src_height) / f64::from(src_width);
    (f64::from(target_width) * ratio * CELL_ASPECT).round() as u32
}

/// Convertit une image décodée en art ASCII de `target_width` colonnes.
///
/// L'image est d'abord redimensionnée (bilinéaire) à `tw × grid_height`,
/// puis échantillonnée 1:1.
///
/// # Errors
/// [`CoreError::InvalidArgument`] for a zero width, [`CoreError::ResourceUnavailable`]
/// if the image buffer is unreadable.
///
/// # Example
/// ```
/// use af_core::frame::FrameBuffer;
/// use af_core::charset::LuminanceLut;
/// use af_ascii::convert::image_to_ascii;
/// use af_source::resize::Resizer;
///
/// let img = FrameBuffer::filled(80, 40, (255, 255, 255, 255));
/// let art = image_to_ascii(&img, 8, &LuminanceLut::default(), &mut Resizer::new()).unwrap();
/// assert_eq!(art, "        \n        ");
/// ```
pub fn image_to_ascii(
    image: &FrameBuffer,
    target_width: u32,
    lut: &LuminanceLut,
    resizer: &mut Resizer,
) -> Result<String, CoreError> {
    if target_width == 0 {
        return Err(CoreError::InvalidArgument(
            "la largeur cible doit être ≥ 1".into(),
        ));
    }
    image.check_readable()?;

    let rows = grid_height(target_width, image.width, image.height);
    if rows == 0 {
        log::debug!(
            "image {}x{} → 0 ligne à {target_width} colonnes",
            image.width,
            image.height
        );
        return Ok(String::new());
    }

    let surface = resizer.resize(image, target_width, rows)?;
    frame_to_ascii(&surface, target_width, lut)
}

/// Seek la source à `at`, attend la frame, puis la convertit comme une image.
///
/// # Errors
/// [`CoreError::Seek`] if the seek fails, times out or yields a frame that is
/// not the native size, [`CoreError::Cancelled`] if `cancel` fires while
/// waiting, plus those of [`image_to_ascii`].
pub fn video_frame_to_ascii<V: VideoSource + ?Sized>(
    source: &mut V,
    target_width: u32,
    at: f64,
    timeout: Option<Duration>,
    cancel: Option<&CancelToken>,
    lut: &LuminanceLut,
    resizer: &mut Resizer,
) -> Result<String, CoreError> {
    let frame = source.capture(at, timeout, cancel)?;
    log::debug!(
        "frame vidéo à {at:.3}s : {}x{}",
        frame.width,
        frame.height
    );
    image_to_ascii(&frame, target_width, lut, resizer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_core::traits::PendingFrame;

    struct Black {
        seeks: Vec<f64>,
    }

    impl VideoSource for Black {
        fn duration(&self) -> f64 {
            10.0
        }

        fn native_size(&self) -> (u32, u32) {
            (40, 40)
        }

        fn seek(&mut self, at: f64) -> PendingFrame<'_> {
            self.seeks.push(at);
            PendingFrame::ready(at, Ok(FrameBuffer::filled(40, 40, (0, 0, 0, 255))))
        }
    }

    struct Broken;

    impl VideoSource for Broken {
        fn duration(&self) -> f64 {
            1.0
        }

        fn native_size(&self) -> (u32, u32) {
            (1, 1)
        }

        fn seek(&mut self, at: f64) -> PendingFrame<'_> {
            PendingFrame::ready(at, Err(CoreError::seek(at, "aucune frame")))
        }
    }

    #[test]
    fn grid_height_rounds() {
        assert_eq!(grid_height(100, 100, 100), 50);
        assert_eq!(grid_height(150, 1920, 1080), 42);
        assert_eq!(grid_height(10, 100, 1), 0);
        assert_eq!(grid_height(10, 0, 10), 0);
    }

    #[test]
    fn image_output_dimensions() {
        let img = FrameBuffer::filled(200, 100, (90, 90, 90, 255));
        let art = image_to_ascii(&img, 50, &LuminanceLut::default(), &mut Resizer::new()).unwrap();
        let lines: Vec<&str> = art.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines.iter().all(|l| l.chars().count() == 50));
    }

    #[test]
    fn flat_image_gives_empty_art() {
        let img = FrameBuffer::filled(1000, 1, (0, 0, 0, 255));
        let art = image_to_ascii(&img, 10, &LuminanceLut::default(), &mut Resizer::new()).unwrap();
        assert!(art.is_empty());
    }

    #[test]
    fn transparent_image_is_blank() {
        let img = FrameBuffer::filled(16, 16, (0, 0, 0, 0));
        let art = image_to_ascii(&img, 4, &LuminanceLut::default(), &mut Resizer::new()).unwrap();
        assert_eq!(art, "    \n    ");
    }

    #[test]
    fn video_frame_seeks_requested_time() {
        let mut video = Black { seeks: Vec::new() };
        let art = video_frame_to_ascii(
            &mut video,
            4,
            1.5,
            None,
            None,
            &LuminanceLut::default(),
            &mut Resizer::new(),
        )
        .unwrap();
        assert_eq!(video.seeks, vec![1.5]);
        assert_eq!(art, "@@@@\n@@@@");
    }

    #[test]
    fn video_seek_error_propagates() {
        let err = video_frame_to_ascii(
            &mut Broken,
            4,
            0.0,
            None,
            None,
            &LuminanceLut::default(),
            &mut Resizer::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Seek { .. }));
    }

    #[test]
    fn cancelled_still_is_not_converted() {
        let mut video = Black { seeks: Vec::new() };
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = video_frame_to_ascii(
            &mut video,
            4,
            0.0,
            None,
            Some(&cancel),
            &LuminanceLut::default(),
            &mut Resizer::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
    }

    #[test]
    fn still_of_wrong_size_is_seek_error() {
        struct Shrunk;
        impl VideoSource for Shrunk {
            fn duration(&self) -> f64 {
                1.0
            }
            fn native_size(&self) -> (u32, u32) {
                (10, 10)
            }
            fn seek(&mut self, at: f64) -> PendingFrame<'_> {
                PendingFrame::ready(at, Ok(FrameBuffer::filled(3, 7, (0, 0, 0, 255))))
            }
        }

        let err = video_frame_to_ascii(
            &mut Shrunk,
            4,
            0.0,
            None,
            None,
            &LuminanceLut::default(),
            &mut Resizer::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Seek { .. }));
    }
}
