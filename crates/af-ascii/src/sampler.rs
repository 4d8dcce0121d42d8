use af_core::charset::LuminanceLut;
use af_core::color::{composite_over_white, luminance_f64};
use af_core::error::CoreError;
use af_core::frame::{AsciiGrid, FrameBuffer};

/// Échantillonne un frame en grille de glyphes, un pixel par cellule.
///
/// `scale = W / tw`, `th = round(H / scale)`. La cellule `(x, y)` lit le pixel
/// `(floor(x·scale), floor(y·scale))`, borné au buffer, composité sur blanc.
///
/// # Errors
/// - [`CoreError::InvalidArgument`] if `target_width` is zero.
/// - [`CoreError::ResourceUnavailable`] if the buffer cannot be read.
///
/// # Example
/// ```
/// use af_core::frame::FrameBuffer;
/// use af_core::charset::LuminanceLut;
/// use af_ascii::sampler::sample_grid;
///
/// let frame = FrameBuffer::filled(20, 10, (0, 0, 0, 255));
/// let grid = sample_grid(&frame, 10, &LuminanceLut::default()).unwrap();
/// assert_eq!((grid.width, grid.height), (10, 5));
/// assert_eq!(grid.get(0, 0), '@');
/// ```
pub fn sample_grid(
    frame: &FrameBuffer,
    target_width: u32,
    lut: &LuminanceLut,
) -> Result<AsciiGrid, CoreError> {
    if target_width == 0 {
        return Err(CoreError::InvalidArgument(
            "la largeur cible doit être ≥ 1".into(),
        ));
    }
    frame.check_readable()?;

    let scale = f64::from(frame.width) / f64::from(target_width);
    let rows = (f64::from(frame.height) / scale).round() as u32;
    let max_x = frame.width - 1;
    let max_y = frame.height - 1;

    let mut grid = AsciiGrid::new(target_width, rows);
    for cy in 0..rows {
        let py = ((f64::from(cy) * scale).floor() as u32).min(max_y);
        for cx in 0..target_width {
            let px = ((f64::from(cx) * scale).floor() as u32).min(max_x);
            let (r, g, b, a) = frame.pixel(px, py);
            let (r, g, b) = composite_over_white(r, g, b, a);
            grid.set(cx, cy, lut.map(luminance_f64(r, g, b)));
        }
    }
    Ok(grid)
}

/// [`sample_grid`] sérialisé : lignes jointes par `\n`, sans `\n` final.
///
/// # Errors
/// Same as [`sample_grid`].
///
/// # Example
/// ```
/// use af_core::frame::FrameBuffer;
/// use af_core::charset::LuminanceLut;
/// use af_ascii::sampler::frame_to_ascii;
///
/// let mut frame = FrameBuffer::filled(2, 2, (255, 255, 255, 255));
/// frame.data[..8].fill(0);
/// frame.data[3] = 255;
/// frame.data[7] = 255;
/// assert_eq!(frame_to_ascii(&frame, 2, &LuminanceLut::default()).unwrap(), "@@\n  ");
/// ```
pub fn frame_to_ascii(
    frame: &FrameBuffer,
    target_width: u32,
    lut: &LuminanceLut,
) -> Result<String, CoreError> {
    Ok(sample_grid(frame, target_width, lut)?.to_string())
}
