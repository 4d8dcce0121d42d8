use std::path::Path;

use af_core::error::CoreError;
use af_core::frame::FrameBuffer;

/// Charge une image depuis le disque, entièrement décodée en RGBA.
///
/// # Errors
/// Returns [`CoreError::Decode`] if the file cannot be read or decoded.
///
/// # Example
/// ```no_run
/// use af_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("test.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer, CoreError> {
    let bytes = std::fs::read(path)
        .map_err(|e| CoreError::Decode(format!("impossible de lire {} : {e}", path.display())))?;
    let frame = decode_image(&bytes).map_err(|e| match e {
        CoreError::Decode(msg) => CoreError::Decode(format!("{} : {msg}", path.display())),
        other => other,
    })?;
    log::debug!(
        "load_image: {}x{} depuis {}",
        frame.width,
        frame.height,
        path.display()
    );
    Ok(frame)
}

/// Décode une image en mémoire (PNG, JPEG, BMP, GIF), format deviné au contenu.
fn decode_image(bytes: &[u8]) -> Result<FrameBuffer, CoreError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| CoreError::Decode(format!("image illisible : {e}")))?;
    into_frame(img)
}

fn into_frame(img: image::DynamicImage) -> Result<FrameBuffer, CoreError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CoreError::Decode(format!(
            "image sans pixels ({width}×{height})"
        )));
    }
    FrameBuffer::from_rgba(width, height, rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(img: &image::RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decode_png_roundtrip_pixels() {
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([255, 255, 255, 0]));
        let frame = decode_image(&png_bytes(&img)).unwrap();
        assert_eq!((frame.width, frame.height), (2, 1));
        assert_eq!(frame.pixel(0, 0), (0, 0, 0, 255));
        assert_eq!(frame.pixel(1, 0).3, 0);
    }

    #[test]
    fn garbage_is_decode_error() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));
    }

    #[test]
    fn missing_file_is_decode_error() {
        let err = load_image(Path::new("/nonexistent/picture.png")).unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));
    }

    #[test]
    fn garbage_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        match load_image(&path).unwrap_err() {
            CoreError::Decode(msg) => assert!(msg.contains("broken.png")),
            other => panic!("erreur inattendue : {other:?}"),
        }
    }

    #[test]
    fn png_file_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        std::fs::write(&path, png_bytes(&image::RgbaImage::new(3, 2))).unwrap();
        let frame = load_image(&path).unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
    }
}
