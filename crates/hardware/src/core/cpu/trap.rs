//! Trap Handling Logic.
//!
//! This module implements the privilege-state updates behind each commit-point
//! transition. It performs the following:
//! 1. **Trap Entry:** Saves `mepc`/`mcause`/`mtval`, stacks `mstatus.MIE` and enters Machine mode.
//! 2. **Trap Return:** Implements `mret`, restoring the stacked interrupt enable and privilege.
//! 3. **Debug Entry:** Saves `dpc`, records cause and privilege in `dcsr` and enters debug mode.
//! 4. **Debug Return:** Implements `dret`.

use tracing::debug;

use super::csr::CsrUnit;
use crate::common::error::Trap;
use crate::core::arch::csr;
use crate::core::arch::debug::DebugCause;
use crate::core::arch::mode::PrivilegeMode;

impl CsrUnit {
    /// Takes a trap (exception or interrupt).
    ///
    /// # Arguments
    ///
    /// * `cause` - The trap being taken.
    /// * `epc` - PC of the interrupted or faulting instruction.
    pub(super) fn enter_trap(&mut self, cause: Trap, epc: u32) {
        let csrs = &mut self.csrs;
        debug!(
            ?cause,
            epc = format_args!("{epc:#010x}"),
            from = %csrs.mode,
            "trap"
        );

        csrs.mepc = epc & !1;
        csrs.mcause = cause.cause();
        csrs.mtval = cause.tval();

        let mie = csrs.mstatus & csr::MSTATUS_MIE != 0;
        let mut mstatus = csrs.mstatus & !(csr::MSTATUS_MIE | csr::MSTATUS_MPIE | csr::MSTATUS_MPP);
        if mie {
            mstatus |= csr::MSTATUS_MPIE;
        }
        mstatus |= csrs.mode.to_bits() << csr::MSTATUS_MPP_SHIFT;
        csrs.mstatus = mstatus;
        csrs.mode = PrivilegeMode::Machine;
    }

    /// Executes `mret`.
    pub(super) fn trap_return(&mut self) {
        let csrs = &mut self.csrs;
        let target = csrs.mpp();
        let mpie = csrs.mstatus & csr::MSTATUS_MPIE != 0;

        let mut mstatus = csrs.mstatus & !(csr::MSTATUS_MIE | csr::MSTATUS_MPP);
        if mpie {
            mstatus |= csr::MSTATUS_MIE;
        }
        mstatus |= csr::MSTATUS_MPIE;
        mstatus |= PrivilegeMode::User.to_bits() << csr::MSTATUS_MPP_SHIFT;
        if target != PrivilegeMode::Machine {
            mstatus &= !csr::MSTATUS_MPRV;
        }
        csrs.mstatus = mstatus;
        csrs.mode = target;

        debug!(to = %target, pc = format_args!("{:#010x}", csrs.mepc), "mret");
    }

    /// Enters debug mode.
    pub(super) fn enter_debug(&mut self, cause: DebugCause, pc: u32) {
        let csrs = &mut self.csrs;
        debug!(%cause, pc = format_args!("{pc:#010x}"), "debug entry");

        csrs.dpc = pc & !1;
        csrs.dcsr = (csrs.dcsr & !(csr::DCSR_CAUSE_MASK | csr::DCSR_PRV_MASK))
            | (cause.bits() << csr::DCSR_CAUSE_SHIFT)
            | csrs.mode.to_bits();
        csrs.mode = PrivilegeMode::Machine;
        csrs.debug_mode = true;
    }

    /// Executes `dret`.
    pub(super) fn debug_return(&mut self) {
        let csrs = &mut self.csrs;
        let target = PrivilegeMode::from_bits(csrs.dcsr & csr::DCSR_PRV_MASK);
        if target != PrivilegeMode::Machine {
            csrs.mstatus &= !csr::MSTATUS_MPRV;
        }
        csrs.mode = target;
        csrs.debug_mode = false;

        debug!(to = %target, pc = format_args!("{:#010x}", csrs.dpc), "dret");
    }
}
