//! Execute (EX) Stage.
//!
//! This module implements the third stage of the pipeline. It performs the following:
//! 1. **Operand Selection:** Chooses ALU inputs from forwarded registers, PC and immediate.
//! 2. **Arithmetic Execution:** Runs the ALU and selects the multiply/divide result.
//! 3. **Branch Resolution:** Evaluates branch conditions and computes jump targets.
//! 4. **System Execution:** Reads CSRs (checking access legality) and computes the
//!    value to write back at the commit point.
//! 5. **Protection:** Checks data accesses against the PMP table.
//!
//! Operand forwarding happens before this stage runs (see
//! [`crate::core::pipeline::hazards::forward_rs`]); so does the multiply/divide
//! evaluation, whose output is passed in.

use crate::common::data::AccessType;
use crate::common::error::Trap;
use crate::core::arch::csr::{CsrView, Csrs};
use crate::core::pipeline::latches::{ExMem, IdEx};
use crate::core::pipeline::signals::{
    AtomicOp, BranchCond, ControlSignals, CsrOp, JumpKind, OpASrc, OpBSrc,
};
use crate::core::units::alu::Alu;
use crate::core::units::mdu::MdOutput;

/// Bit mask to ensure `JALR` target addresses are 2-byte aligned.
const JALR_ALIGNMENT_MASK: u32 = !1;

/// Output of the Execute stage for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecuteResult {
    /// Entry for the EX/MEM latch.
    pub ex_mem: ExMem,
    /// Target of a taken branch or jump.
    pub redirect: Option<u32>,
}

/// Returns the ALU operands `(a, b)` for an instruction with forwarded register values.
pub const fn operands(id_ex: &IdEx, rv1: u32, rv2: u32) -> (u32, u32) {
    let a = match id_ex.ctrl.a_src {
        OpASrc::Reg1 => rv1,
        OpASrc::Pc => id_ex.pc,
        OpASrc::Zero => 0,
    };
    let b = match id_ex.ctrl.b_src {
        OpBSrc::Imm => id_ex.imm,
        OpBSrc::Reg2 => rv2,
    };
    (a, b)
}

/// Evaluates a branch condition.
///
/// # Examples
///
/// ```
/// use k10_core::core::pipeline::stages::execute::branch_taken;
/// use k10_core::core::pipeline::signals::BranchCond;
///
/// assert!(branch_taken(BranchCond::Lt, -1_i32 as u32, 0));
/// assert!(!branch_taken(BranchCond::Ltu, -1_i32 as u32, 0));
/// ```
pub const fn branch_taken(cond: BranchCond, a: u32, b: u32) -> bool {
    match cond {
        BranchCond::Eq => a == b,
        BranchCond::Ne => a != b,
        BranchCond::Lt => (a as i32) < (b as i32),
        BranchCond::Ge => (a as i32) >= (b as i32),
        BranchCond::Ltu => a < b,
        BranchCond::Geu => a >= b,
    }
}

/// Executes the instruction execute stage.
///
/// # Arguments
///
/// * `id_ex` - The ID/EX latch.
/// * `rv1`, `rv2` - Forwarded source register values.
/// * `md` - Multiply/divide unit output for this cycle.
/// * `csrs` - CSR state (reads, legality and PMP).
/// * `view` - Externally sourced CSR inputs (`mip`, `time`).
///
/// # Returns
///
/// The EX/MEM entry and the redirect target of a taken control transfer.
pub fn execute_stage(
    id_ex: &IdEx,
    rv1: u32,
    rv2: u32,
    md: &MdOutput,
    csrs: &Csrs,
    view: &CsrView,
) -> ExecuteResult {
    if !id_ex.valid {
        return ExecuteResult::default();
    }
    let mut ex_mem = ExMem {
        valid: true,
        pc: id_ex.pc,
        inst: id_ex.inst,
        rd: id_ex.rd,
        store_data: rv2,
        csr_addr: id_ex.csr_addr,
        ctrl: id_ex.ctrl,
        exception: id_ex.exception,
        ..ExMem::default()
    };
    if id_ex.exception.is_some() {
        return ExecuteResult {
            ex_mem,
            redirect: None,
        };
    }

    let ctrl = &id_ex.ctrl;
    let (a, b) = operands(id_ex, rv1, rv2);
    ex_mem.alu = if ctrl.md_en {
        md.result
    } else {
        Alu::execute(ctrl.alu, a, b)
    };

    if ctrl.is_csr() {
        if csrs.access_allowed(id_ex.csr_addr, ctrl.csr_write) {
            let old = csrs.read(id_ex.csr_addr, view);
            let src = ex_mem.alu;
            ex_mem.csr_rdata = old;
            ex_mem.csr_wdata = match ctrl.csr_op {
                CsrOp::Rw | CsrOp::None => src,
                CsrOp::Rs => old | src,
                CsrOp::Rc => old & !src,
            };
        } else {
            ex_mem.ctrl = ControlSignals {
                compressed: ctrl.compressed,
                ..ControlSignals::default()
            };
            ex_mem.exception = Some(Trap::IllegalInstruction(id_ex.inst));
        }
    }

    // Misaligned atomics are reported by the Memory stage, ahead of any access fault.
    if ctrl.is_mem() && !(ctrl.is_atomic() && ex_mem.alu & 3 != 0) {
        let addr = ex_mem.alu;
        let access = match (ctrl.mem_read, ctrl.mem_write) {
            (true, true) => AccessType::ReadWrite,
            (false, true) => AccessType::Write,
            _ => AccessType::Read,
        };
        if !csrs
            .pmp
            .check(addr, ctrl.width.bytes(), access, csrs.data_privilege())
        {
            let fault = if ctrl.mem_write || matches!(ctrl.atomic_op, AtomicOp::Sc) {
                Trap::StoreAccessFault(addr)
            } else {
                Trap::LoadAccessFault(addr)
            };
            ex_mem.ctrl = ControlSignals {
                compressed: ctrl.compressed,
                ..ControlSignals::default()
            };
            ex_mem.exception = Some(fault);
        }
    }

    let redirect = match ctrl.jump {
        JumpKind::None => None,
        JumpKind::Branch => {
            branch_taken(ctrl.branch_cond, rv1, rv2).then(|| id_ex.pc.wrapping_add(id_ex.imm))
        }
        JumpKind::Jal => Some(id_ex.pc.wrapping_add(id_ex.imm)),
        JumpKind::Jalr => Some(rv1.wrapping_add(id_ex.imm) & JALR_ALIGNMENT_MASK),
    };

    ExecuteResult { ex_mem, redirect }
}
