//! Source-code export for ascii-forge: React/TSX components, static or animated.

pub mod codegen;
pub mod emit;
