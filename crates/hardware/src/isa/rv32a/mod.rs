//! RISC-V Atomic Extension (A).
//!
//! Only word-sized atomics exist on RV32; every A instruction uses `OP_AMO`
//! with `funct3 = 0b010`.

/// Function code 5 definitions for atomic operations.
pub mod funct5;

/// `funct3` value for word-sized atomics.
pub const FUNCT3_WORD: u32 = 0b010;
