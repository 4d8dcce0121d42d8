//! Configuration, types, and shared structures for ascii-forge.
//!
//! This crate contains all shared types, traits, and configuration logic
//! used across the ascii-forge workspace.

pub mod cancel;
pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use cancel::CancelToken;
pub use charset::{ASCII_CHARS, LuminanceLut};
pub use config::ConvertConfig;
pub use error::CoreError;
pub use frame::{AsciiGrid, FrameBuffer, FrameSequence};
pub use traits::{PendingFrame, VideoSource};
