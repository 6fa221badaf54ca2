//! RISC-V Base Integer (I) Function Codes (funct7).

/// Default (ADD, SRL, SLL, etc.).
pub const DEFAULT: u32 = 0b0000000;
/// Subtract.
pub const SUB: u32 = 0b0100000;
/// Shift Right Arithmetic.
pub const SRA: u32 = 0b0100000;
