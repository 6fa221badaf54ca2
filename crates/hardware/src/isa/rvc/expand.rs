//! Compact Instruction Expansion.
//!
//! Provides the `expand` function which converts a 16-bit RV32C instruction into its
//! 32-bit equivalent. Reserved encodings, RV64-only forms and floating-point forms
//! expand to `None`; HINT encodings (writes to `x0`, zero shift amounts) expand to
//! their natural 32-bit form and execute as no-ops.

use super::constants::{CREG_BASE, QUADRANT_0, QUADRANT_1, QUADRANT_2, q0, q1, q2};
use crate::isa::privileged::opcodes::EBREAK;
use crate::isa::rv32i::{funct3, funct7, opcodes};

const REG_ZERO: u32 = 0;
const REG_RA: u32 = 1;
const REG_SP: u32 = 2;

/// Extracts `len` bits of `inst` starting at `lo`.
#[inline]
const fn bits(inst: u16, lo: u32, len: u32) -> u32 {
    ((inst as u32) >> lo) & ((1 << len) - 1)
}

/// Full 5-bit register field at bits 11:7.
#[inline]
const fn rd_full(inst: u16) -> u32 {
    bits(inst, 7, 5)
}

/// Full 5-bit register field at bits 6:2.
#[inline]
const fn rs2_full(inst: u16) -> u32 {
    bits(inst, 2, 5)
}

/// Compact 3-bit register field at bits 9:7, mapped to `x8..x15`.
#[inline]
const fn creg_hi(inst: u16) -> u32 {
    CREG_BASE + bits(inst, 7, 3)
}

/// Compact 3-bit register field at bits 4:2, mapped to `x8..x15`.
#[inline]
const fn creg_lo(inst: u16) -> u32 {
    CREG_BASE + bits(inst, 2, 3)
}

/// Sign-extends the low `width` bits of `value`.
#[inline]
const fn sext(value: u32, width: u32) -> u32 {
    let shift = 32 - width;
    (((value << shift) as i32) >> shift) as u32
}

/// 6-bit signed immediate `imm[5] = inst[12]`, `imm[4:0] = inst[6:2]`.
#[inline]
const fn imm6(inst: u16) -> u32 {
    sext((bits(inst, 12, 1) << 5) | bits(inst, 2, 5), 6)
}

const fn i_type(imm: u32, rs1: u32, f3: u32, rd: u32, op: u32) -> u32 {
    ((imm & 0xFFF) << 20) | (rs1 << 15) | (f3 << 12) | (rd << 7) | op
}

const fn s_type(imm: u32, rs2: u32, rs1: u32, f3: u32, op: u32) -> u32 {
    (((imm >> 5) & 0x7F) << 25) | (rs2 << 20) | (rs1 << 15) | (f3 << 12) | ((imm & 0x1F) << 7) | op
}

const fn r_type(f7: u32, rs2: u32, rs1: u32, f3: u32, rd: u32) -> u32 {
    (f7 << 25) | (rs2 << 20) | (rs1 << 15) | (f3 << 12) | (rd << 7) | opcodes::OP_REG
}

const fn b_type(imm: u32, rs2: u32, rs1: u32, f3: u32) -> u32 {
    (((imm >> 12) & 1) << 31)
        | (((imm >> 5) & 0x3F) << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (f3 << 12)
        | (((imm >> 1) & 0xF) << 8)
        | (((imm >> 11) & 1) << 7)
        | opcodes::OP_BRANCH
}

const fn j_type(imm: u32, rd: u32) -> u32 {
    (((imm >> 20) & 1) << 31)
        | (((imm >> 1) & 0x3FF) << 21)
        | (((imm >> 11) & 1) << 20)
        | (((imm >> 12) & 0xFF) << 12)
        | (rd << 7)
        | opcodes::OP_JAL
}

/// Jump offset shared by C.J and C.JAL.
const fn cj_offset(inst: u16) -> u32 {
    let imm = (bits(inst, 12, 1) << 11)
        | (bits(inst, 11, 1) << 4)
        | (bits(inst, 9, 2) << 8)
        | (bits(inst, 8, 1) << 10)
        | (bits(inst, 7, 1) << 6)
        | (bits(inst, 6, 1) << 7)
        | (bits(inst, 3, 3) << 1)
        | (bits(inst, 2, 1) << 5);
    sext(imm, 12)
}

/// Branch offset shared by C.BEQZ and C.BNEZ.
const fn cb_offset(inst: u16) -> u32 {
    let imm = (bits(inst, 12, 1) << 8)
        | (bits(inst, 10, 2) << 3)
        | (bits(inst, 5, 2) << 6)
        | (bits(inst, 3, 2) << 1)
        | (bits(inst, 2, 1) << 5);
    sext(imm, 9)
}

/// Word offset shared by C.LW and C.SW.
const fn clw_offset(inst: u16) -> u32 {
    (bits(inst, 10, 3) << 3) | (bits(inst, 6, 1) << 2) | (bits(inst, 5, 1) << 6)
}

/// Expands a 16-bit RV32C instruction into its 32-bit equivalent.
///
/// # Arguments
///
/// * `inst` - The compact encoding (bits 1:0 must not be `0b11`).
///
/// # Returns
///
/// The equivalent 32-bit encoding, or `None` if the encoding is illegal on RV32IMAC.
pub fn expand(inst: u16) -> Option<u32> {
    let f3 = (inst >> 13) & 0x7;

    match inst & 0x3 {
        QUADRANT_0 => expand_q0(inst, f3),
        QUADRANT_1 => expand_q1(inst, f3),
        QUADRANT_2 => expand_q2(inst, f3),
        _ => None,
    }
}

fn expand_q0(inst: u16, f3: u16) -> Option<u32> {
    match f3 {
        q0::C_ADDI4SPN => {
            let imm = (bits(inst, 11, 2) << 4)
                | (bits(inst, 7, 4) << 6)
                | (bits(inst, 6, 1) << 2)
                | (bits(inst, 5, 1) << 3);
            // Zero immediate is reserved; this also rejects the all-zero half-word.
            (imm != 0)
                .then(|| i_type(imm, REG_SP, funct3::ADD_SUB, creg_lo(inst), opcodes::OP_IMM))
        }
        q0::C_LW => Some(i_type(
            clw_offset(inst),
            creg_hi(inst),
            funct3::LW,
            creg_lo(inst),
            opcodes::OP_LOAD,
        )),
        q0::C_SW => Some(s_type(
            clw_offset(inst),
            creg_lo(inst),
            creg_hi(inst),
            funct3::SW,
            opcodes::OP_STORE,
        )),
        // C.FLD, C.FLW, C.FSD, C.FSW and the reserved slot.
        _ => None,
    }
}

fn expand_q1(inst: u16, f3: u16) -> Option<u32> {
    match f3 {
        q1::C_ADDI => {
            let rd = rd_full(inst);
            Some(i_type(imm6(inst), rd, funct3::ADD_SUB, rd, opcodes::OP_IMM))
        }
        q1::C_JAL => Some(j_type(cj_offset(inst), REG_RA)),
        q1::C_LI => Some(i_type(imm6(inst), REG_ZERO, funct3::ADD_SUB, rd_full(inst), opcodes::OP_IMM)),
        q1::C_LUI_ADDI16SP => {
            let rd = rd_full(inst);
            if rd == REG_SP {
                let imm = (bits(inst, 12, 1) << 9)
                    | (bits(inst, 6, 1) << 4)
                    | (bits(inst, 5, 1) << 6)
                    | (bits(inst, 3, 2) << 7)
                    | (bits(inst, 2, 1) << 5);
                (imm != 0).then(|| {
                    i_type(sext(imm, 10), REG_SP, funct3::ADD_SUB, REG_SP, opcodes::OP_IMM)
                })
            } else {
                let imm = imm6(inst) << 12;
                (imm != 0).then_some(imm | (rd << 7) | opcodes::OP_LUI)
            }
        }
        q1::C_MISC_ALU => expand_q1_alu(inst),
        q1::C_J => Some(j_type(cj_offset(inst), REG_ZERO)),
        q1::C_BEQZ => Some(b_type(cb_offset(inst), REG_ZERO, creg_hi(inst), funct3::BEQ)),
        q1::C_BNEZ => Some(b_type(cb_offset(inst), REG_ZERO, creg_hi(inst), funct3::BNE)),
        _ => None,
    }
}

fn expand_q1_alu(inst: u16) -> Option<u32> {
    let rd = creg_hi(inst);
    let shamt_hi = bits(inst, 12, 1);
    let shamt = bits(inst, 2, 5);

    match bits(inst, 10, 2) {
        // C.SRLI / C.SRAI: shamt[5] set is reserved on RV32.
        0b00 if shamt_hi == 0 => Some(i_type(shamt, rd, funct3::SRL_SRA, rd, opcodes::OP_IMM)),
        0b01 if shamt_hi == 0 => Some(i_type(
            (funct7::SRA << 5) | shamt,
            rd,
            funct3::SRL_SRA,
            rd,
            opcodes::OP_IMM,
        )),
        0b10 => Some(i_type(imm6(inst), rd, funct3::AND, rd, opcodes::OP_IMM)),
        0b11 if shamt_hi == 0 => {
            let rs2 = creg_lo(inst);
            let (f7, f3) = match bits(inst, 5, 2) {
                0b00 => (funct7::SUB, funct3::ADD_SUB),
                0b01 => (funct7::DEFAULT, funct3::XOR),
                0b10 => (funct7::DEFAULT, funct3::OR),
                _ => (funct7::DEFAULT, funct3::AND),
            };
            Some(r_type(f7, rs2, rd, f3, rd))
        }
        // C.SUBW / C.ADDW space and RV32 shift reservations.
        _ => None,
    }
}

fn expand_q2(inst: u16, f3: u16) -> Option<u32> {
    let rd = rd_full(inst);
    let rs2 = rs2_full(inst);

    match f3 {
        q2::C_SLLI => (bits(inst, 12, 1) == 0)
            .then(|| i_type(rs2, rd, funct3::SLL, rd, opcodes::OP_IMM)),
        q2::C_LWSP => {
            let imm = (bits(inst, 12, 1) << 5) | (bits(inst, 4, 3) << 2) | (bits(inst, 2, 2) << 6);
            (rd != REG_ZERO).then(|| i_type(imm, REG_SP, funct3::LW, rd, opcodes::OP_LOAD))
        }
        q2::C_JR_MV_ADD => match (bits(inst, 12, 1), rd, rs2) {
            (0, REG_ZERO, REG_ZERO) => None,
            (0, rs1, REG_ZERO) => Some(i_type(0, rs1, funct3::JALR, REG_ZERO, opcodes::OP_JALR)),
            (0, rd, rs2) => Some(r_type(funct7::DEFAULT, rs2, REG_ZERO, funct3::ADD_SUB, rd)),
            (_, REG_ZERO, REG_ZERO) => Some(EBREAK),
            (_, rs1, REG_ZERO) => Some(i_type(0, rs1, funct3::JALR, REG_RA, opcodes::OP_JALR)),
            (_, rd, rs2) => Some(r_type(funct7::DEFAULT, rs2, rd, funct3::ADD_SUB, rd)),
        },
        q2::C_SWSP => {
            let imm = (bits(inst, 9, 4) << 2) | (bits(inst, 7, 2) << 6);
            Some(s_type(imm, rs2, REG_SP, funct3::SW, opcodes::OP_STORE))
        }
        // C.FLDSP, C.FLWSP, C.FSDSP, C.FSWSP.
        _ => None,
    }
}
