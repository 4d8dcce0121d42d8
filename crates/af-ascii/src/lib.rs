//! ASCII conversion engine for ascii-forge.
//!
//! Converts pixel frames to character grids, single frames or whole sequences.

pub mod batch;
pub mod convert;
pub mod sampler;
