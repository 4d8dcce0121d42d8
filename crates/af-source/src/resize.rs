use af_core::error::CoreError;
use af_core::frame::FrameBuffer;
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};

/// Resizer réutilisable wrappant fast_image_resize.
///
/// Filtre bilinéaire avec prémultiplication alpha, l'équivalent d'un
/// `drawImage` navigateur sur une surface de la taille cible.
///
/// # Example
/// ```
/// use af_source::resize::Resizer;
/// let r = Resizer::new();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch image for source (owned buffer to avoid the mut borrow issue).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// # Errors
    /// Returns [`CoreError::ResourceUnavailable`] if either buffer is unreadable
    /// or the resize operation fails.
    ///
    /// # Example
    /// ```
    /// use af_source::resize::Resizer;
    /// use af_core::frame::FrameBuffer;
    /// let mut r = Resizer::new();
    /// let src = FrameBuffer::new(100, 100);
    /// let mut dst = FrameBuffer::new(50, 50);
    /// r.resize_into(&src, &mut dst).unwrap();
    /// ```
    pub fn resize_into(&mut self, src: &FrameBuffer, dst: &mut FrameBuffer) -> Result<(), CoreError> {
        src.check_readable()?;
        dst.check_readable()?;

        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }

        // Copie forcée : l'API fast_image_resize exige &mut sur la source.
        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x4)
                .map_err(|e| surface_error("source", &e))?;

        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x4)
                .map_err(|e| surface_error("destination", &e))?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .map_err(|e| CoreError::ResourceUnavailable(format!("resize impossible : {e}")))?;

        Ok(())
    }

    /// Alloue un buffer `width × height` et y redimensionne `src`.
    ///
    /// # Errors
    /// Same as [`Resizer::resize_into`].
    pub fn resize(
        &mut self,
        src: &FrameBuffer,
        width: u32,
        height: u32,
    ) -> Result<FrameBuffer, CoreError> {
        let mut dst = FrameBuffer::new(width, height);
        self.resize_into(src, &mut dst)?;
        Ok(dst)
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

fn surface_error(which: &str, e: &impl std::fmt::Display) -> CoreError {
    CoreError::ResourceUnavailable(format!("surface {which} invalide : {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_color_survives_downscale() {
        let src = FrameBuffer::filled(40, 20, (128, 128, 128, 255));
        let dst = Resizer::new().resize(&src, 10, 5).unwrap();
        for y in 0..5 {
            for x in 0..10 {
                let (r, g, b, a) = dst.pixel(x, y);
                assert!(r.abs_diff(128) <= 1 && g.abs_diff(128) <= 1 && b.abs_diff(128) <= 1);
                assert_eq!(a, 255);
            }
        }
    }

    #[test]
    fn same_size_is_a_copy() {
        let src = FrameBuffer::filled(3, 3, (9, 8, 7, 6));
        let dst = Resizer::new().resize(&src, 3, 3).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn empty_source_is_unavailable() {
        let src = FrameBuffer::new(0, 0);
        assert!(matches!(
            Resizer::new().resize(&src, 4, 4),
            Err(CoreError::ResourceUnavailable(_))
        ));
    }

    #[test]
    fn resizer_is_reusable_across_sizes() {
        let mut resizer = Resizer::new();
        let a = resizer.resize(&FrameBuffer::filled(8, 8, (0, 0, 0, 255)), 4, 2).unwrap();
        let b = resizer.resize(&FrameBuffer::filled(16, 4, (255, 255, 255, 255)), 2, 1).unwrap();
        assert_eq!((a.width, a.height), (4, 2));
        assert_eq!((b.width, b.height), (2, 1));
        assert_eq!(b.pixel(1, 0), (255, 255, 255, 255));
    }
}
