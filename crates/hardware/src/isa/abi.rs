//! RISC-V Application Binary Interface (ABI) register names.
//!
//! Register indices under their calling-convention names, plus a lookup table
//! used when formatting register dumps.

/// Register x0 (zero register, always zero).
pub const REG_ZERO: usize = 0;
/// Register x1 (return address, ra).
pub const REG_RA: usize = 1;
/// Register x2 (stack pointer, sp).
pub const REG_SP: usize = 2;
/// Register x3 (global pointer, gp).
pub const REG_GP: usize = 3;
/// Register x5 (temporary, t0).
pub const REG_T0: usize = 5;
/// Register x8 (saved register / frame pointer, s0).
pub const REG_S0: usize = 8;
/// Register x10 (first argument/return value, a0).
pub const REG_A0: usize = 10;
/// Register x11 (second argument, a1).
pub const REG_A1: usize = 11;

/// ABI names indexed by register number.
pub const NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Returns the ABI name of a register index.
pub fn name(idx: usize) -> &'static str {
    NAMES.get(idx).copied().unwrap_or("?")
}
