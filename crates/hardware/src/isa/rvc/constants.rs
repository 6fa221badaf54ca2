//! RISC-V Compressed (C) Extension Constants.
//!
//! Defines the quadrants and `funct3` opcodes for 16-bit compact instructions on
//! RV32. Compact instructions are divided into three quadrants (0, 1, 2) by the
//! lowest two bits; quadrant 3 (`0b11`) marks a standard 32-bit instruction.

/// Quadrant 0 (bits 1:0 = 00).
pub const QUADRANT_0: u16 = 0b00;
/// Quadrant 1 (bits 1:0 = 01).
pub const QUADRANT_1: u16 = 0b01;
/// Quadrant 2 (bits 1:0 = 10).
pub const QUADRANT_2: u16 = 0b10;

/// First register of the `x8..x15` window addressed by 3-bit compact fields.
pub const CREG_BASE: u32 = 8;

/// Instructions in Quadrant 0.
pub mod q0 {
    /// Add Immediate, scaled by 4, to Stack Pointer (C.ADDI4SPN).
    pub const C_ADDI4SPN: u16 = 0b000;
    /// Floating-point Load Double (C.FLD), unsupported.
    pub const C_FLD: u16 = 0b001;
    /// Load Word (C.LW).
    pub const C_LW: u16 = 0b010;
    /// Floating-point Load Word (C.FLW), unsupported.
    pub const C_FLW: u16 = 0b011;
    /// Reserved.
    pub const RESERVED: u16 = 0b100;
    /// Floating-point Store Double (C.FSD), unsupported.
    pub const C_FSD: u16 = 0b101;
    /// Store Word (C.SW).
    pub const C_SW: u16 = 0b110;
    /// Floating-point Store Word (C.FSW), unsupported.
    pub const C_FSW: u16 = 0b111;
}

/// Instructions in Quadrant 1.
pub mod q1 {
    /// Add Immediate (C.ADDI, C.NOP).
    pub const C_ADDI: u16 = 0b000;
    /// Jump and Link (C.JAL), RV32 only.
    pub const C_JAL: u16 = 0b001;
    /// Load Immediate (C.LI).
    pub const C_LI: u16 = 0b010;
    /// Load Upper Immediate / Add Immediate 16 to SP (C.LUI / C.ADDI16SP).
    pub const C_LUI_ADDI16SP: u16 = 0b011;
    /// Miscellaneous ALU operations (C.SRLI, C.SRAI, C.ANDI, C.SUB, etc.).
    pub const C_MISC_ALU: u16 = 0b100;
    /// Jump (C.J).
    pub const C_J: u16 = 0b101;
    /// Branch if Equal to Zero (C.BEQZ).
    pub const C_BEQZ: u16 = 0b110;
    /// Branch if Not Equal to Zero (C.BNEZ).
    pub const C_BNEZ: u16 = 0b111;
}

/// Instructions in Quadrant 2.
pub mod q2 {
    /// Shift Left Logical Immediate (C.SLLI).
    pub const C_SLLI: u16 = 0b000;
    /// Floating-point Load Double from SP (C.FLDSP), unsupported.
    pub const C_FLDSP: u16 = 0b001;
    /// Load Word from SP (C.LWSP).
    pub const C_LWSP: u16 = 0b010;
    /// Floating-point Load Word from SP (C.FLWSP), unsupported.
    pub const C_FLWSP: u16 = 0b011;
    /// Jump Register / Move / Breakpoint / Add (C.JR, C.MV, C.EBREAK, C.JALR, C.ADD).
    pub const C_JR_MV_ADD: u16 = 0b100;
    /// Floating-point Store Double to SP (C.FSDSP), unsupported.
    pub const C_FSDSP: u16 = 0b101;
    /// Store Word to SP (C.SWSP).
    pub const C_SWSP: u16 = 0b110;
    /// Floating-point Store Word to SP (C.FSWSP), unsupported.
    pub const C_FSWSP: u16 = 0b111;
}
