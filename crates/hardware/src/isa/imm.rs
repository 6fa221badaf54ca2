//! Immediate Generator.
//!
//! Extracts and sign/zero-extends the immediate field of a 32-bit instruction.
//! Format selection is purely a function of the major opcode:
//!
//! | Opcode                   | Format |
//! |--------------------------|--------|
//! | `OP-IMM`, `LOAD`, `JALR` | I      |
//! | `STORE`                  | S      |
//! | `BRANCH`                 | B      |
//! | `LUI`, `AUIPC`           | U      |
//! | `JAL`                    | J      |
//! | `SYSTEM`                 | Z (zero-extended 5-bit `rs1` field) |
//!
//! Every other opcode yields zero.

use crate::isa::instruction::InstructionBits;
use crate::isa::rv32i::opcodes;

/// Immediate encoding formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImmFormat {
    /// 12-bit signed immediate in bits 31:20.
    I,
    /// 12-bit signed store offset split across bits 31:25 and 11:7.
    S,
    /// 13-bit signed, even branch offset.
    B,
    /// Upper 20 bits, low 12 bits zero.
    U,
    /// 21-bit signed, even jump offset.
    J,
    /// Zero-extended 5-bit CSR immediate (`zimm`).
    Z,
    /// No immediate.
    None,
}

impl ImmFormat {
    /// Selects the immediate format for a major opcode.
    pub const fn for_opcode(opcode: u32) -> Self {
        match opcode {
            opcodes::OP_IMM | opcodes::OP_LOAD | opcodes::OP_JALR => Self::I,
            opcodes::OP_STORE => Self::S,
            opcodes::OP_BRANCH => Self::B,
            opcodes::OP_LUI | opcodes::OP_AUIPC => Self::U,
            opcodes::OP_JAL => Self::J,
            opcodes::OP_SYSTEM => Self::Z,
            _ => Self::None,
        }
    }
}

/// Sign-extends the low `bits` bits of `value`.
#[inline]
const fn sign_extend(value: u32, bits: u32) -> u32 {
    let shift = 32 - bits;
    (((value << shift) as i32) >> shift) as u32
}

/// Extracts an immediate of the given format.
pub fn extract(inst: u32, format: ImmFormat) -> u32 {
    match format {
        ImmFormat::I => ((inst as i32) >> 20) as u32,
        ImmFormat::S => {
            let imm = ((inst >> 25) << 5) | ((inst >> 7) & 0x1F);
            sign_extend(imm, 12)
        }
        ImmFormat::B => {
            let imm = (((inst >> 31) & 1) << 12)
                | (((inst >> 7) & 1) << 11)
                | (((inst >> 25) & 0x3F) << 5)
                | (((inst >> 8) & 0xF) << 1);
            sign_extend(imm, 13)
        }
        ImmFormat::U => inst & 0xFFFF_F000,
        ImmFormat::J => {
            let imm = (((inst >> 31) & 1) << 20)
                | (((inst >> 12) & 0xFF) << 12)
                | (((inst >> 20) & 1) << 11)
                | (((inst >> 21) & 0x3FF) << 1);
            sign_extend(imm, 21)
        }
        ImmFormat::Z => inst.rs1() as u32,
        ImmFormat::None => 0,
    }
}

/// Generates the immediate for an instruction, selecting the format by opcode.
///
/// # Examples
///
/// ```
/// use k10_core::isa::imm;
///
/// // addi x1, x0, -1
/// assert_eq!(imm::generate(0xFFF0_0093), 0xFFFF_FFFF);
/// // lui x1, 0x12345
/// assert_eq!(imm::generate(0x1234_50B7), 0x1234_5000);
/// ```
pub fn generate(inst: u32) -> u32 {
    extract(inst, ImmFormat::for_opcode(inst.opcode()))
}
