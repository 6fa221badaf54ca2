//! Data Hazard Detection and Forwarding.
//!
//! This module implements the logic for maintaining pipeline consistency when data
//! dependencies exist between instructions. It provides:
//! 1. **Hazard Detection:** Load-use, `fence.i` and CSR read-after-write conditions that
//!    require a stall.
//! 2. **Operand Forwarding:** Resolves Read-After-Write (RAW) hazards for the Execute stage
//!    by bypassing the register file, Memory stage first, then Writeback.
//! 3. **Pipeline Control:** The per-cycle stall/flush summary every latch update reads.
//!
//! A stall in a later stage always stalls every earlier stage; the reverse never happens.

use crate::common::reg::RegWrite;
use crate::core::pipeline::latches::{ExMem, IdEx};

/// Checks if the instruction in Decode must wait for a load in Execute.
///
/// Loads, LR, SC and AMOs produce their result only at the end of the Memory stage,
/// which Execute forwarding cannot reach in time.
///
/// # Arguments
///
/// * `id_ex` - The ID/EX latch (instruction currently in Execute).
/// * `decoded` - The Decode stage's output for the instruction in IF/ID.
///
/// # Returns
///
/// `true` if a one-cycle bubble must be inserted.
///
/// # Examples
///
/// ```text
/// ID/EX stage: lw  x1, 0(x2)    <- loads into x1 (in execute)
/// IF/ID stage: add x3, x1, x4   <- uses x1 (in decode)
/// ```
pub fn need_stall_load_use(id_ex: &IdEx, decoded: &IdEx) -> bool {
    if !id_ex.valid || !decoded.valid || id_ex.rd == 0 || !id_ex.ctrl.result_from_memory() {
        return false;
    }
    (decoded.ctrl.uses_rs1 && decoded.rs1 == id_ex.rd)
        || (decoded.ctrl.uses_rs2 && decoded.rs2 == id_ex.rd)
}

/// Checks if a `fence.i` in Decode must wait for older stores to drain.
///
/// # Arguments
///
/// * `decoded` - The Decode stage's output.
/// * `id_ex` - The ID/EX latch.
/// * `ex_mem` - The EX/MEM latch.
/// * `lsu_busy` - The load/store unit has a transaction in progress.
pub fn need_stall_fence_i(decoded: &IdEx, id_ex: &IdEx, ex_mem: &ExMem, lsu_busy: bool) -> bool {
    decoded.valid
        && decoded.ctrl.is_fence_i
        && ((id_ex.valid && id_ex.ctrl.mem_write) || (ex_mem.valid && ex_mem.ctrl.mem_write) || lsu_busy)
}

/// Checks if the instruction in Execute must wait for a CSR write in Memory.
///
/// CSR reads and PMP checks happen in Execute while CSR writes commit in Memory, so a
/// CSR or memory instruction directly behind a CSR write waits one cycle.
pub fn need_stall_csr(id_ex: &IdEx, ex_mem: &ExMem) -> bool {
    id_ex.valid
        && (id_ex.ctrl.is_csr() || id_ex.ctrl.is_mem())
        && ex_mem.valid
        && ex_mem.exception.is_none()
        && ex_mem.ctrl.csr_write
}

/// Forwards register values from later pipeline stages to resolve data hazards.
///
/// The Memory stage has priority over Writeback because it holds the younger result.
/// Memory-stage instructions whose result comes from memory are never forwarded.
///
/// # Arguments
///
/// * `id_ex` - The instruction in Execute, with the values read in Decode.
/// * `ex_mem` - The EX/MEM latch.
/// * `wb` - The register write Writeback performs this cycle.
///
/// # Returns
///
/// A tuple `(rs1_val, rs2_val)` with the most recent values.
pub fn forward_rs(id_ex: &IdEx, ex_mem: &ExMem, wb: &RegWrite) -> (u32, u32) {
    let mem_fwd = ex_mem.valid
        && ex_mem.exception.is_none()
        && ex_mem.ctrl.reg_write
        && ex_mem.rd != 0
        && !ex_mem.ctrl.result_from_memory();
    let mem_val = ex_mem.result();

    let pick = |src: usize, read: u32| {
        if src == 0 {
            0
        } else if mem_fwd && ex_mem.rd == src {
            mem_val
        } else if wb.en && wb.rd == src {
            wb.data
        } else {
            read
        }
    };
    (pick(id_ex.rs1, id_ex.rv1), pick(id_ex.rs2, id_ex.rv2))
}

/// Stall and flush decisions for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineControl {
    /// Memory stage cannot complete (LSU busy or `wfi` waiting).
    pub mem_stall: bool,
    /// Execute stage cannot complete (divider busy or CSR hazard).
    pub ex_stall: bool,
    /// Decode cannot issue (load-use or `fence.i` wait).
    pub id_stall: bool,
    /// A trap, debug transition or return was taken at the commit point.
    pub flush_all: bool,
    /// Execute resolved a taken branch or jump.
    pub branch_taken: bool,
    /// Decode issued a `fence.i` and refetches the next instruction.
    pub fence_i: bool,
}

impl PipelineControl {
    /// Execute hands its instruction to Memory this cycle.
    pub const fn ex_advances(&self) -> bool {
        !self.mem_stall && !self.ex_stall
    }

    /// Decode hands its instruction to Execute this cycle.
    pub const fn id_advances(&self) -> bool {
        self.ex_advances() && !self.id_stall
    }

    /// Any stage from Decode onward is stalled.
    pub const fn any_stall(&self) -> bool {
        self.mem_stall || self.ex_stall || self.id_stall
    }
}
