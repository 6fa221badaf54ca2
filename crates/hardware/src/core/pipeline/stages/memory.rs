//! Memory Access (MEM) Stage.
//!
//! This module implements the fourth stage of the instruction pipeline, the wrapper
//! around the load/store unit. It performs the following:
//! 1. **Request Mapping:** Turns the EX/MEM control word into an LSU operation.
//! 2. **Atomic Alignment:** Rejects misaligned LR/SC/AMO before any bus traffic.
//! 3. **Fault Mapping:** Converts an LSU bus error into a load or store access fault.
//! 4. **Result Capture:** Builds the MEM/WB entry once the access completes.
//!
//! The Memory stage is also the commit point: the CSR unit evaluates the instruction
//! held here every cycle (see [`crate::core::cpu::csr`]).

use crate::common::error::Trap;
use crate::core::pipeline::latches::{ExMem, MemWb};
use crate::core::pipeline::signals::AtomicOp;
use crate::core::units::lsu::{LsuOutput, MemKind, MemRequest};

/// Maps the instruction in EX/MEM to its LSU operation.
///
/// # Returns
///
/// `None` if the latch is empty or holds no memory access.
pub const fn mem_request(ex_mem: &ExMem) -> Option<MemRequest> {
    let ctrl = &ex_mem.ctrl;
    if !ex_mem.valid || !ctrl.is_mem() {
        return None;
    }
    let kind = match ctrl.atomic_op {
        AtomicOp::None if ctrl.mem_write => MemKind::Store,
        AtomicOp::None => MemKind::Load,
        AtomicOp::Lr => MemKind::LoadReserved,
        AtomicOp::Sc => MemKind::StoreConditional,
        op => MemKind::Amo(op),
    };
    Some(MemRequest {
        addr: ex_mem.alu,
        wdata: ex_mem.store_data,
        width: ctrl.width,
        signed: ctrl.signed_load,
        kind,
    })
}

/// Returns the misaligned-address exception of an atomic instruction, if any.
///
/// `lr.w` reports a load fault; `sc.w` and the AMOs report store/AMO faults.
pub const fn atomic_misaligned(ex_mem: &ExMem) -> Option<Trap> {
    let addr = ex_mem.alu;
    if !ex_mem.valid || !ex_mem.ctrl.is_atomic() || addr & 3 == 0 {
        return None;
    }
    Some(match ex_mem.ctrl.atomic_op {
        AtomicOp::Lr => Trap::LoadAddressMisaligned(addr),
        _ => Trap::StoreAddressMisaligned(addr),
    })
}

/// Converts a completed access with a bus error into its access fault.
pub const fn bus_fault(ex_mem: &ExMem, out: &LsuOutput) -> Option<Trap> {
    if !out.done || !out.err {
        return None;
    }
    let addr = ex_mem.alu;
    Some(match ex_mem.ctrl.atomic_op {
        AtomicOp::Lr => Trap::LoadAccessFault(addr),
        AtomicOp::None if !ex_mem.ctrl.mem_write => Trap::LoadAccessFault(addr),
        _ => Trap::StoreAccessFault(addr),
    })
}

/// Executes the memory stage: builds the MEM/WB entry for an instruction that
/// completes this cycle.
///
/// # Arguments
///
/// * `ex_mem` - The EX/MEM latch.
/// * `lsu` - LSU output for this cycle (load data for memory instructions).
pub const fn mem_stage(ex_mem: &ExMem, lsu: &LsuOutput) -> MemWb {
    MemWb {
        valid: ex_mem.valid,
        pc: ex_mem.pc,
        inst: ex_mem.inst,
        rd: ex_mem.rd,
        alu: ex_mem.alu,
        load_data: lsu.rdata,
        csr_rdata: ex_mem.csr_rdata,
        ctrl: ex_mem.ctrl,
    }
}
