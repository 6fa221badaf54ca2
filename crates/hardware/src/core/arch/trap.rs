//! Trap Handling Utilities.
//!
//! This module provides helper functions for managing processor traps. It performs
//! the following:
//! 1. **Interrupt Mapping:** Converts pending-and-enabled `mip` bits into the highest
//!    priority interrupt trap.
//! 2. **Vectoring:** Computes the handler address from `mtvec` for a given trap.

use crate::common::constants::NUM_FAST_IRQS;
use crate::common::error::Trap;
use crate::core::arch::csr;

/// Trap handler utility functions.
#[derive(Debug)]
pub struct TrapHandler;

impl TrapHandler {
    /// Selects the highest-priority interrupt among `pending`.
    ///
    /// Priority is external, then software, then timer, then the fast lines in
    /// ascending line order.
    ///
    /// # Arguments
    ///
    /// * `pending` - `mip & mie`.
    ///
    /// # Returns
    ///
    /// The interrupt to take, or `None` if no enabled interrupt is pending.
    ///
    /// # Examples
    ///
    /// ```
    /// use k10_core::core::arch::trap::TrapHandler;
    /// use k10_core::common::error::Trap;
    ///
    /// let pending = (1 << 7) | (1 << 11) | (1 << 18);
    /// assert_eq!(TrapHandler::highest_interrupt(pending), Some(Trap::MachineExternalInterrupt));
    /// assert_eq!(TrapHandler::highest_interrupt(1 << 18), Some(Trap::FastInterrupt(2)));
    /// assert_eq!(TrapHandler::highest_interrupt(0), None);
    /// ```
    pub fn highest_interrupt(pending: u32) -> Option<Trap> {
        if pending & csr::MIP_MEIP != 0 {
            return Some(Trap::MachineExternalInterrupt);
        }
        if pending & csr::MIP_MSIP != 0 {
            return Some(Trap::MachineSoftwareInterrupt);
        }
        if pending & csr::MIP_MTIP != 0 {
            return Some(Trap::MachineTimerInterrupt);
        }
        (0..NUM_FAST_IRQS as u8)
            .find(|&line| pending & (1 << (csr::MIP_FAST_SHIFT + u32::from(line))) != 0)
            .map(Trap::FastInterrupt)
    }

    /// Computes the handler address for `trap`.
    ///
    /// In vectored mode interrupts jump to `base + 4 * code`; exceptions always use
    /// the base.
    pub const fn vector(mtvec: u32, trap: &Trap) -> u32 {
        let base = mtvec & !csr::MTVEC_MODE_MASK;
        if mtvec & csr::MTVEC_MODE_MASK == csr::MTVEC_MODE_VECTORED && trap.is_interrupt() {
            base.wrapping_add(4 * trap.code())
        } else {
            base
        }
    }

    /// Builds the `mip` value from the interrupt input lines.
    pub fn mip_from_lines(external: bool, timer: bool, software: bool, fast: u16) -> u32 {
        let mut mip = 0;
        if external {
            mip |= csr::MIP_MEIP;
        }
        if timer {
            mip |= csr::MIP_MTIP;
        }
        if software {
            mip |= csr::MIP_MSIP;
        }
        mip | ((u32::from(fast) << csr::MIP_FAST_SHIFT) & csr::MIP_FAST_MASK)
    }
}
