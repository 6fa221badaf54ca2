//! RISC-V Integer Multiply/Divide Extension (M).
//!
//! M instructions share the `OP_REG` major opcode and are selected by `funct7`.

/// Function code 3 definitions for multiply/divide operations.
pub mod funct3;

/// `funct7` value selecting the M extension within `OP_REG`.
pub const FUNCT7_MULDIV: u32 = 0b0000001;
