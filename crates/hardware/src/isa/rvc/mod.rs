//! RISC-V Compressed Extension (C).
//!
//! # Structure
//!
//! - `constants`: Quadrant and opcode definitions for compact instructions.
//! - `expand`: Expansion of 16-bit compact instructions into their 32-bit equivalents.

/// Compact instruction quadrant and opcode constants.
pub mod constants;

/// Logic to expand 16-bit compact instructions into 32-bit equivalents.
pub mod expand;

pub use expand::expand;
