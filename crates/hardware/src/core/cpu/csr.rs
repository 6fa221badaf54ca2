//! CSR Unit: the commit-point decision logic.
//!
//! This module implements the unit that owns the CSR file and decides, once per cycle,
//! what happens to the instruction in the Memory stage. It performs the following:
//! 1. **Event Sampling:** Debug halt requests, pending single steps and interrupts,
//!    taken only at an instruction that has not started executing in Memory.
//! 2. **Transition Selection:** Exactly one of debug entry, `dret`, trap entry, `mret`
//!    or a CSR write per cycle, in that priority order.
//! 3. **Counters:** `mcycle` every cycle and `minstret` on retirement, with explicit
//!    CSR writes overriding the increment.
//!
//! The decision is computed from current state in [`CsrUnit::evaluate`] and applied at
//! the clock edge in [`CsrUnit::commit`].

use tracing::debug;

use crate::common::error::Trap;
use crate::config::CoreConfig;
use crate::core::arch::csr::{self, Csrs};
use crate::core::arch::debug::DebugCause;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::arch::trap::TrapHandler;
use crate::core::pipeline::latches::ExMem;

/// An asynchronous event that pre-empts the instruction in the Memory stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsyncEvent {
    /// External debug halt request.
    HaltRequest,
    /// Single step completed on the previous instruction.
    Step,
    /// Enabled, pending interrupt.
    Interrupt(Trap),
}

/// The architectural transition taken at the commit point this cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transition {
    /// Nothing beyond normal retirement.
    #[default]
    None,
    /// Enter debug mode; `pc` is saved to `dpc`.
    DebugEntry {
        /// Value recorded in `dcsr.cause`.
        cause: DebugCause,
        /// PC saved to `dpc`.
        pc: u32,
    },
    /// `ebreak` inside debug mode: restart the halt routine, state untouched.
    DebugReentry,
    /// Exception inside debug mode: jump to the debug exception vector, state untouched.
    DebugException,
    /// Return from debug mode.
    Dret,
    /// Take a trap; `epc` is saved to `mepc`.
    Trap {
        /// Exception or interrupt taken.
        trap: Trap,
        /// PC saved to `mepc`.
        epc: u32,
    },
    /// Return from a machine-mode trap handler.
    Mret,
    /// Commit a Zicsr write.
    CsrWrite {
        /// CSR address.
        addr: u32,
        /// Value to write (before WARL legalization).
        data: u32,
    },
}

/// Result of evaluating the commit point for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitDecision {
    /// Transition to apply at the clock edge.
    pub transition: Transition,
    /// The Memory-stage instruction retires this cycle.
    pub retire: bool,
    /// New PC when the transition redirects; implies flushing the whole pipeline.
    pub redirect: Option<u32>,
}

/// The CSR unit: CSR file, single-step tracking and debug vectors.
#[derive(Clone, Debug)]
pub struct CsrUnit {
    pub(super) csrs: Csrs,
    step_pending: bool,
    debug_halt_addr: u32,
    debug_exception_addr: u32,
}

impl CsrUnit {
    /// Creates the unit in its reset state.
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            csrs: Csrs::new(config.boot_addr, config.hart_id, config.pmp_regions),
            step_pending: false,
            debug_halt_addr: config.debug_halt_addr,
            debug_exception_addr: config.debug_exception_addr,
        }
    }

    /// The CSR file.
    pub const fn csrs(&self) -> &Csrs {
        &self.csrs
    }

    /// The CSR file, mutably. Writes bypass the pipeline and are meant for harnesses.
    pub fn csrs_mut(&mut self) -> &mut Csrs {
        &mut self.csrs
    }

    /// A single step completed and debug entry is due at the next instruction.
    pub const fn step_pending(&self) -> bool {
        self.step_pending
    }

    /// Returns `true` if interrupts may be taken in the current state.
    pub const fn interrupts_enabled(&self) -> bool {
        !self.csrs.debug_mode
            && (matches!(self.csrs.mode, PrivilegeMode::User) || self.csrs.global_irq_enabled())
    }

    /// Samples the asynchronous event with the highest priority.
    ///
    /// Only meaningful at an instruction that has not started executing in Memory;
    /// the caller gates it accordingly.
    ///
    /// # Arguments
    ///
    /// * `debug_req` - External halt request line.
    /// * `mip` - Interrupt-pending bits from the input lines.
    pub fn async_event(&self, debug_req: bool, mip: u32) -> Option<AsyncEvent> {
        if self.csrs.debug_mode {
            return None;
        }
        if debug_req {
            return Some(AsyncEvent::HaltRequest);
        }
        if self.step_pending {
            return Some(AsyncEvent::Step);
        }
        if !self.interrupts_enabled() {
            return None;
        }
        TrapHandler::highest_interrupt(mip & self.csrs.mie).map(AsyncEvent::Interrupt)
    }

    /// Returns `true` if `ebreak` enters debug mode at the current privilege.
    const fn ebreak_to_debug(&self) -> bool {
        let bit = match self.csrs.mode {
            PrivilegeMode::Machine => csr::DCSR_EBREAKM,
            PrivilegeMode::User => csr::DCSR_EBREAKU,
        };
        self.csrs.dcsr & bit != 0
    }

    /// Decides the commit-point transition for this cycle.
    ///
    /// # Arguments
    ///
    /// * `ex_mem` - The instruction in the Memory stage.
    /// * `leaving` - The instruction completes Memory this cycle.
    /// * `event` - Asynchronous event sampled at this instruction, if it is fresh.
    /// * `exception` - Exception carried by or raised for the instruction.
    pub fn evaluate(
        &self,
        ex_mem: &ExMem,
        leaving: bool,
        event: Option<AsyncEvent>,
        exception: Option<Trap>,
    ) -> CommitDecision {
        let pc = ex_mem.pc;
        let transition = if let Some(event) = event {
            match event {
                AsyncEvent::HaltRequest => Transition::DebugEntry {
                    cause: DebugCause::HaltRequest,
                    pc,
                },
                AsyncEvent::Step => Transition::DebugEntry {
                    cause: DebugCause::Step,
                    pc,
                },
                AsyncEvent::Interrupt(trap) => Transition::Trap { trap, epc: pc },
            }
        } else if !ex_mem.valid || !leaving {
            return CommitDecision::default();
        } else if let Some(trap) = exception {
            match trap {
                Trap::Breakpoint(_) if self.csrs.debug_mode => Transition::DebugReentry,
                _ if self.csrs.debug_mode => Transition::DebugException,
                Trap::Breakpoint(_) if self.ebreak_to_debug() => Transition::DebugEntry {
                    cause: DebugCause::Ebreak,
                    pc,
                },
                _ => Transition::Trap { trap, epc: pc },
            }
        } else if ex_mem.ctrl.is_dret {
            Transition::Dret
        } else if ex_mem.ctrl.is_mret {
            Transition::Mret
        } else if ex_mem.ctrl.csr_write {
            Transition::CsrWrite {
                addr: ex_mem.csr_addr,
                data: ex_mem.csr_wdata,
            }
        } else {
            Transition::None
        };

        let retire = event.is_none() && exception.is_none();
        let redirect = match transition {
            Transition::DebugEntry { .. } | Transition::DebugReentry => Some(self.debug_halt_addr),
            Transition::DebugException => Some(self.debug_exception_addr),
            Transition::Dret => Some(self.csrs.dpc),
            Transition::Trap { trap, .. } => Some(TrapHandler::vector(self.csrs.mtvec, &trap)),
            Transition::Mret => Some(self.csrs.mepc),
            Transition::CsrWrite { .. } | Transition::None => None,
        };
        CommitDecision {
            transition,
            retire,
            redirect,
        }
    }

    /// Applies a decision at the clock edge and advances the counters.
    pub fn commit(&mut self, decision: &CommitDecision) {
        let was_debug = self.csrs.debug_mode;
        let stepping = !was_debug && self.csrs.dcsr & csr::DCSR_STEP != 0;

        self.csrs.mcycle = self.csrs.mcycle.wrapping_add(1);
        if decision.retire {
            self.csrs.minstret = self.csrs.minstret.wrapping_add(1);
        }

        match decision.transition {
            Transition::None | Transition::DebugReentry | Transition::DebugException => {}
            Transition::DebugEntry { cause, pc } => self.enter_debug(cause, pc),
            Transition::Dret => self.debug_return(),
            Transition::Trap { trap, epc } => self.enter_trap(trap, epc),
            Transition::Mret => self.trap_return(),
            Transition::CsrWrite { addr, data } => {
                debug!(
                    csr = format_args!("{addr:#05x}"),
                    data = format_args!("{data:#010x}"),
                    "csr write"
                );
                self.csrs.write(addr, data);
            }
        }

        self.step_pending = match decision.transition {
            Transition::DebugEntry { .. } => false,
            Transition::Trap { .. } => stepping,
            _ => self.step_pending || (stepping && decision.retire),
        };
    }
}
