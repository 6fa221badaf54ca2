//! Instruction Decode (ID) Stage.
//!
//! This module implements the second stage of the pipeline. It performs the following:
//! 1. **Expansion:** Compact encodings are expanded to their 32-bit equivalents.
//! 2. **Decoding:** Converts the 32-bit instruction into a [`ControlSignals`] word.
//! 3. **Register Read:** Reads `rs1`/`rs2` with the same-cycle Writeback bypass.
//! 4. **Checks:** PMP execute permission on the PC and privilege-dependent legality
//!    (`mret` from user mode, `dret` outside debug mode).
//!
//! Exceptions found here are attached to the ID/EX entry, whose control word is then
//! reduced to a no-op so the instruction travels to the commit point without side effects.

use crate::common::data::AccessType;
use crate::common::error::Trap;
use crate::common::reg::{RegWrite, RegisterFile};
use crate::core::arch::csr::Csrs;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::pipeline::latches::{IdEx, IfId};
use crate::core::pipeline::signals::{
    AluOp, AtomicOp, BranchCond, ControlSignals, CsrOp, JumpKind, MdOp, MemWidth, OpASrc, OpBSrc,
    WbSrc,
};
use crate::isa::imm;
use crate::isa::instruction::InstructionBits;
use crate::isa::privileged::opcodes as sys_ops;
use crate::isa::rv32a::{FUNCT3_WORD, funct5 as a_funct5};
use crate::isa::rv32i::{funct3 as i_funct3, funct7 as i_funct7, opcodes as i_opcodes};
use crate::isa::rv32m::FUNCT7_MULDIV;
use crate::isa::rvc;

/// Control word marking an undecodable instruction.
fn illegal() -> ControlSignals {
    ControlSignals {
        illegal: true,
        ..ControlSignals::default()
    }
}

/// Decodes a 32-bit instruction into its control word.
///
/// Privilege and debug-state checks are not applied here; see [`decode_stage`].
///
/// # Examples
///
/// ```
/// use k10_core::core::pipeline::stages::decode::decode;
/// use k10_core::core::pipeline::signals::{AluOp, WbSrc};
///
/// // add x3, x1, x2
/// let ctrl = decode(0x0020_81B3);
/// assert_eq!(ctrl.alu, AluOp::Add);
/// assert!(ctrl.reg_write && ctrl.uses_rs1 && ctrl.uses_rs2);
///
/// // lw x5, 8(x10)
/// let ctrl = decode(0x0085_2283);
/// assert!(ctrl.mem_read);
/// assert_eq!(ctrl.wb_sel, WbSrc::Mem);
///
/// assert!(decode(0xFFFF_FFFF).illegal);
/// ```
pub fn decode(inst: u32) -> ControlSignals {
    let funct3 = inst.funct3();
    let funct7 = inst.funct7();
    let mut c = ControlSignals::default();

    match inst.opcode() {
        i_opcodes::OP_LUI => {
            c.alu = AluOp::PassB;
            c.reg_write = true;
        }
        i_opcodes::OP_AUIPC => {
            c.a_src = OpASrc::Pc;
            c.reg_write = true;
        }
        i_opcodes::OP_JAL => {
            c.jump = JumpKind::Jal;
            c.reg_write = true;
            c.wb_sel = WbSrc::PcPlus;
        }
        i_opcodes::OP_JALR if funct3 == i_funct3::JALR => {
            c.jump = JumpKind::Jalr;
            c.uses_rs1 = true;
            c.reg_write = true;
            c.wb_sel = WbSrc::PcPlus;
        }
        i_opcodes::OP_BRANCH => {
            c.branch_cond = match funct3 {
                i_funct3::BEQ => BranchCond::Eq,
                i_funct3::BNE => BranchCond::Ne,
                i_funct3::BLT => BranchCond::Lt,
                i_funct3::BGE => BranchCond::Ge,
                i_funct3::BLTU => BranchCond::Ltu,
                i_funct3::BGEU => BranchCond::Geu,
                _ => return illegal(),
            };
            c.jump = JumpKind::Branch;
            c.uses_rs1 = true;
            c.uses_rs2 = true;
        }
        i_opcodes::OP_LOAD => {
            (c.width, c.signed_load) = match funct3 {
                i_funct3::LB => (MemWidth::Byte, true),
                i_funct3::LH => (MemWidth::Half, true),
                i_funct3::LW => (MemWidth::Word, true),
                i_funct3::LBU => (MemWidth::Byte, false),
                i_funct3::LHU => (MemWidth::Half, false),
                _ => return illegal(),
            };
            c.mem_read = true;
            c.uses_rs1 = true;
            c.reg_write = true;
            c.wb_sel = WbSrc::Mem;
        }
        i_opcodes::OP_STORE => {
            c.width = match funct3 {
                i_funct3::SB => MemWidth::Byte,
                i_funct3::SH => MemWidth::Half,
                i_funct3::SW => MemWidth::Word,
                _ => return illegal(),
            };
            c.mem_write = true;
            c.uses_rs1 = true;
            c.uses_rs2 = true;
        }
        i_opcodes::OP_IMM => {
            c.alu = match (funct3, funct7) {
                (i_funct3::ADD_SUB, _) => AluOp::Add,
                (i_funct3::SLT, _) => AluOp::Slt,
                (i_funct3::SLTU, _) => AluOp::Sltu,
                (i_funct3::XOR, _) => AluOp::Xor,
                (i_funct3::OR, _) => AluOp::Or,
                (i_funct3::AND, _) => AluOp::And,
                (i_funct3::SLL, i_funct7::DEFAULT) => AluOp::Sll,
                (i_funct3::SRL_SRA, i_funct7::DEFAULT) => AluOp::Srl,
                (i_funct3::SRL_SRA, i_funct7::SRA) => AluOp::Sra,
                _ => return illegal(),
            };
            c.uses_rs1 = true;
            c.reg_write = true;
        }
        i_opcodes::OP_REG => {
            c.b_src = OpBSrc::Reg2;
            c.uses_rs1 = true;
            c.uses_rs2 = true;
            c.reg_write = true;
            if funct7 == FUNCT7_MULDIV {
                c.md_en = true;
                c.md_op = MdOp::from_funct3(funct3);
            } else {
                c.alu = match (funct3, funct7) {
                    (i_funct3::ADD_SUB, i_funct7::DEFAULT) => AluOp::Add,
                    (i_funct3::ADD_SUB, i_funct7::SUB) => AluOp::Sub,
                    (i_funct3::SLL, i_funct7::DEFAULT) => AluOp::Sll,
                    (i_funct3::SLT, i_funct7::DEFAULT) => AluOp::Slt,
                    (i_funct3::SLTU, i_funct7::DEFAULT) => AluOp::Sltu,
                    (i_funct3::XOR, i_funct7::DEFAULT) => AluOp::Xor,
                    (i_funct3::SRL_SRA, i_funct7::DEFAULT) => AluOp::Srl,
                    (i_funct3::SRL_SRA, i_funct7::SRA) => AluOp::Sra,
                    (i_funct3::OR, i_funct7::DEFAULT) => AluOp::Or,
                    (i_funct3::AND, i_funct7::DEFAULT) => AluOp::And,
                    _ => return illegal(),
                };
            }
        }
        i_opcodes::OP_MISC_MEM => match funct3 {
            i_funct3::FENCE => c.is_fence = true,
            i_funct3::FENCE_I => c.is_fence_i = true,
            _ => return illegal(),
        },
        i_opcodes::OP_AMO => return decode_atomic(inst),
        i_opcodes::OP_SYSTEM => return decode_system(inst),
        _ => return illegal(),
    }
    c
}

/// Decodes the A extension (`lr.w`, `sc.w` and the AMOs).
fn decode_atomic(inst: u32) -> ControlSignals {
    if inst.funct3() != FUNCT3_WORD {
        return illegal();
    }
    let op = match inst.funct5() {
        a_funct5::LR if inst.rs2() == 0 => AtomicOp::Lr,
        a_funct5::SC => AtomicOp::Sc,
        a_funct5::AMOSWAP => AtomicOp::Swap,
        a_funct5::AMOADD => AtomicOp::Add,
        a_funct5::AMOXOR => AtomicOp::Xor,
        a_funct5::AMOAND => AtomicOp::And,
        a_funct5::AMOOR => AtomicOp::Or,
        a_funct5::AMOMIN => AtomicOp::Min,
        a_funct5::AMOMAX => AtomicOp::Max,
        a_funct5::AMOMINU => AtomicOp::Minu,
        a_funct5::AMOMAXU => AtomicOp::Maxu,
        _ => return illegal(),
    };
    ControlSignals {
        atomic_op: op,
        mem_read: !matches!(op, AtomicOp::Sc),
        mem_write: !matches!(op, AtomicOp::Lr),
        width: MemWidth::Word,
        uses_rs1: true,
        uses_rs2: !matches!(op, AtomicOp::Lr),
        reg_write: true,
        wb_sel: WbSrc::Mem,
        ..ControlSignals::default()
    }
}

/// Decodes SYSTEM: the exact privileged encodings and Zicsr.
fn decode_system(inst: u32) -> ControlSignals {
    let mut c = ControlSignals::default();
    match inst.funct3() {
        sys_ops::PRIV => match inst {
            sys_ops::ECALL => c.is_ecall = true,
            sys_ops::EBREAK => c.is_ebreak = true,
            sys_ops::MRET => c.is_mret = true,
            sys_ops::DRET => c.is_dret = true,
            sys_ops::WFI => c.is_wfi = true,
            _ => return illegal(),
        },
        f3 @ (sys_ops::CSRRW | sys_ops::CSRRS | sys_ops::CSRRC) => {
            c.csr_op = csr_op(f3);
            c.alu = AluOp::PassA;
            c.uses_rs1 = true;
            c.csr_write = c.csr_op == CsrOp::Rw || inst.rs1() != 0;
            c.reg_write = true;
            c.wb_sel = WbSrc::Csr;
        }
        f3 @ (sys_ops::CSRRWI | sys_ops::CSRRSI | sys_ops::CSRRCI) => {
            c.csr_op = csr_op(f3);
            c.csr_imm = true;
            c.alu = AluOp::PassB;
            c.csr_write = c.csr_op == CsrOp::Rw || inst.rs1() != 0;
            c.reg_write = true;
            c.wb_sel = WbSrc::Csr;
        }
        _ => return illegal(),
    }
    c
}

const fn csr_op(funct3: u32) -> CsrOp {
    match funct3 & 0b11 {
        0b01 => CsrOp::Rw,
        0b10 => CsrOp::Rs,
        _ => CsrOp::Rc,
    }
}

/// Executes the instruction decode stage.
///
/// # Arguments
///
/// * `if_id` - The IF/ID latch.
/// * `regs` - The register file.
/// * `wb` - The write Writeback commits this cycle (read bypass).
/// * `csrs` - CSR state: privilege, debug mode and the PMP table.
///
/// # Returns
///
/// The ID/EX entry Decode would issue this cycle. Invalid if IF/ID is empty.
pub fn decode_stage(if_id: &IfId, regs: &RegisterFile, wb: &RegWrite, csrs: &Csrs) -> IdEx {
    if !if_id.valid {
        return IdEx::default();
    }
    let bubble = |exception: Trap| IdEx {
        valid: true,
        pc: if_id.pc,
        inst: if_id.inst,
        ctrl: ControlSignals {
            compressed: if_id.compressed,
            ..ControlSignals::default()
        },
        exception: Some(exception),
        ..IdEx::default()
    };

    if let Some(trap) = if_id.exception {
        return bubble(trap);
    }

    let size = if if_id.compressed { 2 } else { 4 };
    if !csrs
        .pmp
        .check(if_id.pc, size, AccessType::Fetch, csrs.mode)
    {
        return bubble(Trap::InstructionAccessFault(if_id.pc));
    }

    let expanded = if if_id.compressed {
        rvc::expand(if_id.inst as u16)
    } else {
        Some(if_id.inst)
    };
    let Some(inst) = expanded else {
        return bubble(Trap::IllegalInstruction(if_id.inst));
    };

    let mut ctrl = decode(inst);
    ctrl.compressed = if_id.compressed;
    if ctrl.illegal
        || (ctrl.is_mret && csrs.mode == PrivilegeMode::User)
        || (ctrl.is_dret && !csrs.debug_mode)
    {
        return bubble(Trap::IllegalInstruction(if_id.inst));
    }
    if ctrl.is_ecall {
        return bubble(match csrs.mode {
            PrivilegeMode::User => Trap::EnvironmentCallFromUMode,
            PrivilegeMode::Machine => Trap::EnvironmentCallFromMMode,
        });
    }
    if ctrl.is_ebreak {
        return bubble(Trap::Breakpoint(if_id.pc));
    }

    let rs1 = if ctrl.uses_rs1 { inst.rs1() } else { 0 };
    let rs2 = if ctrl.uses_rs2 { inst.rs2() } else { 0 };
    let imm = match inst.opcode() {
        i_opcodes::OP_AMO => 0,
        _ => imm::generate(inst),
    };

    IdEx {
        valid: true,
        pc: if_id.pc,
        inst: if_id.inst,
        rs1,
        rs2,
        rd: if ctrl.reg_write { inst.rd() } else { 0 },
        rv1: regs.read_bypass(rs1, wb),
        rv2: regs.read_bypass(rs2, wb),
        imm,
        csr_addr: inst.csr(),
        ctrl,
        exception: None,
    }
}
