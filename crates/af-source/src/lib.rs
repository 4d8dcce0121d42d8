//! Visual source modules for ascii-forge (image decoding, resizing, video frames).

pub mod extract;
pub mod image;
pub mod resize;

#[cfg(feature = "video")]
pub mod video;
