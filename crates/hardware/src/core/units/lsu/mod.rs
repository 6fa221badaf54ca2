//! Load/Store Unit (LSU).
//!
//! Sequences data-bus transactions for the Memory stage. It includes:
//! - [`atomic`]: Read-modify-write ALU for the RISC-V A extension.
//! - [`unaligned`]: Word-crossing detection, lane planning and load assembly.
//!
//! Accesses that fit in one bus word take one transaction, misaligned or not. Accesses
//! that cross a word boundary are split into two back-to-back word transactions whose
//! bus errors accumulate and are reported when the whole access completes. AMOs read the
//! word, combine it with `rs2` and write the result back, returning the original value.
//! `sc.w` without a matching reservation completes at once with no bus traffic.
//!
//! The unit is evaluated once per cycle: [`Lsu::bus_request`] gives the request to drive
//! this cycle and [`Lsu::evaluate`] consumes the bus response and returns the outputs and
//! next state. `busy` drops in the cycle `done` is raised.

/// Atomic memory operation ALU (RISC-V A extension).
pub mod atomic;

/// Unaligned access planning.
pub mod unaligned;

use tracing::trace;

use self::atomic::amo_alu;
use self::unaligned::{assemble_load, crosses_word, high_access, low_access};
use crate::core::pipeline::signals::{AtomicOp, MemWidth};
use crate::soc::traits::{BusRequest, BusResponse};

/// Kind of memory operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemKind {
    /// Ordinary load.
    Load,
    /// Ordinary store.
    Store,
    /// `lr.w`.
    LoadReserved,
    /// `sc.w`.
    StoreConditional,
    /// Read-modify-write AMO.
    Amo(AtomicOp),
}

/// Operation presented by the Memory stage, stable for as long as the unit is busy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemRequest {
    /// Byte address.
    pub addr: u32,
    /// Store data or AMO operand (`rs2`).
    pub wdata: u32,
    /// Access width.
    pub width: MemWidth,
    /// Sign-extend loaded data.
    pub signed: bool,
    /// Operation kind.
    pub kind: MemKind,
}

impl MemRequest {
    const fn writes(&self) -> bool {
        matches!(self.kind, MemKind::Store | MemKind::StoreConditional)
    }
}

/// Outputs of the unit for the current cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LsuOutput {
    /// Access in progress; the Memory stage must stall.
    pub busy: bool,
    /// Access completes this cycle.
    pub done: bool,
    /// Load data, SC status or AMO original value (valid with `done`).
    pub rdata: u32,
    /// A bus error occurred (valid with `done`).
    pub err: bool,
}

/// Transaction sequencing state.
///
/// `granted` is `false` while the current transaction's request is still being held
/// and `true` while waiting for its response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LsuState {
    /// No access in progress.
    #[default]
    Idle,
    /// Single-transaction access.
    Single {
        /// Request accepted.
        granted: bool,
    },
    /// First half of a word-crossing access.
    SplitLow {
        /// Request accepted.
        granted: bool,
    },
    /// Second half of a word-crossing access.
    SplitHigh {
        /// Request accepted.
        granted: bool,
        /// Data of the first half.
        low: u32,
        /// Error seen on the first half.
        err: bool,
    },
    /// AMO read phase.
    AmoRead {
        /// Request accepted.
        granted: bool,
    },
    /// AMO write-back phase.
    AmoWrite {
        /// Request accepted.
        granted: bool,
        /// Value read in the first phase.
        old: u32,
    },
}

/// Load/Store Unit state: sequencing state plus the LR/SC reservation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lsu {
    /// Sequencing state.
    pub state: LsuState,
    /// Word address reserved by the last `lr.w`.
    pub reservation: Option<u32>,
}

impl Lsu {
    /// Creates an idle unit with no reservation.
    pub const fn new() -> Self {
        Self {
            state: LsuState::Idle,
            reservation: None,
        }
    }

    /// Returns `true` if no access is in progress.
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, LsuState::Idle)
    }

    fn reserved(&self, addr: u32) -> bool {
        self.reservation == Some(addr & !3)
    }

    /// Returns the request that starts an access.
    fn first_request(op: &MemRequest) -> BusRequest {
        match op.kind {
            MemKind::Amo(_) => BusRequest::read(op.addr & !3),
            _ => {
                let lanes = low_access(op.addr, op.width, op.wdata);
                if op.writes() {
                    BusRequest::write(lanes.addr, lanes.wdata, lanes.be)
                } else {
                    BusRequest {
                        be: lanes.be,
                        ..BusRequest::read(lanes.addr)
                    }
                }
            }
        }
    }

    /// Computes the data-bus request for this cycle.
    ///
    /// # Arguments
    ///
    /// * `op` - The Memory-stage operation, or `None` when the stage holds no access or
    ///   the access must not start this cycle.
    pub fn bus_request(&self, op: Option<&MemRequest>) -> BusRequest {
        let Some(op) = op else {
            return BusRequest::idle();
        };
        match self.state {
            LsuState::Idle => match op.kind {
                MemKind::StoreConditional if !self.reserved(op.addr) => BusRequest::idle(),
                _ => Self::first_request(op),
            },
            LsuState::Single { granted: false } | LsuState::SplitLow { granted: false } => {
                Self::first_request(op)
            }
            LsuState::SplitHigh { granted: false, .. } => {
                let lanes = high_access(op.addr, op.width, op.wdata);
                if op.writes() {
                    BusRequest::write(lanes.addr, lanes.wdata, lanes.be)
                } else {
                    BusRequest {
                        be: lanes.be,
                        ..BusRequest::read(lanes.addr)
                    }
                }
            }
            LsuState::AmoRead { granted: false } => BusRequest::read(op.addr & !3),
            LsuState::AmoWrite {
                granted: false,
                old,
            } => {
                let MemKind::Amo(amo) = op.kind else {
                    return BusRequest::idle();
                };
                BusRequest::write(op.addr & !3, amo_alu(amo, old, op.wdata), 0xF)
            }
            _ => BusRequest::idle(),
        }
    }

    /// Evaluates one cycle.
    ///
    /// # Arguments
    ///
    /// * `op`   - Same operation passed to [`Lsu::bus_request`] this cycle.
    /// * `resp` - Data-bus response for this cycle.
    ///
    /// # Returns
    ///
    /// The outputs for this cycle and the unit state for the next.
    pub fn evaluate(&self, op: Option<&MemRequest>, resp: &BusResponse) -> (LsuOutput, Self) {
        let busy = LsuOutput {
            busy: true,
            ..LsuOutput::default()
        };
        let Some(op) = op else {
            return (LsuOutput::default(), Self { state: LsuState::Idle, ..*self });
        };
        let with = |state| Self { state, ..*self };

        match self.state {
            LsuState::Idle => {
                let state = match op.kind {
                    MemKind::StoreConditional if !self.reserved(op.addr) => {
                        trace!(addr = format_args!("{:#010x}", op.addr), "sc.w failed");
                        let out = LsuOutput {
                            done: true,
                            rdata: 1,
                            ..LsuOutput::default()
                        };
                        return (out, Self { state: LsuState::Idle, reservation: None });
                    }
                    MemKind::Amo(_) => LsuState::AmoRead { granted: resp.gnt },
                    _ if crosses_word(op.addr, op.width) => {
                        trace!(addr = format_args!("{:#010x}", op.addr), "split access, low half");
                        LsuState::SplitLow { granted: resp.gnt }
                    }
                    _ => LsuState::Single { granted: resp.gnt },
                };
                (busy, with(state))
            }
            LsuState::Single { granted: false } => (busy, with(LsuState::Single { granted: resp.gnt })),
            LsuState::SplitLow { granted: false } => {
                (busy, with(LsuState::SplitLow { granted: resp.gnt }))
            }
            LsuState::AmoRead { granted: false } => {
                (busy, with(LsuState::AmoRead { granted: resp.gnt }))
            }
            LsuState::SplitHigh {
                granted: false,
                low,
                err,
            } => (
                busy,
                with(LsuState::SplitHigh {
                    granted: resp.gnt,
                    low,
                    err,
                }),
            ),
            LsuState::AmoWrite {
                granted: false,
                old,
            } => (
                busy,
                with(LsuState::AmoWrite {
                    granted: resp.gnt,
                    old,
                }),
            ),
            _ if !resp.rvalid => (busy, *self),
            LsuState::Single { .. } => self.complete(op, resp.rdata, 0, resp.err),
            LsuState::SplitLow { .. } => {
                trace!(addr = format_args!("{:#010x}", op.addr), "split access, high half");
                (
                    busy,
                    with(LsuState::SplitHigh {
                        granted: false,
                        low: resp.rdata,
                        err: resp.err,
                    }),
                )
            }
            LsuState::SplitHigh { low, err, .. } => {
                self.complete(op, low, resp.rdata, err || resp.err)
            }
            LsuState::AmoRead { .. } if resp.err => {
                let out = LsuOutput {
                    done: true,
                    err: true,
                    ..LsuOutput::default()
                };
                (out, with(LsuState::Idle))
            }
            LsuState::AmoRead { .. } => (
                busy,
                with(LsuState::AmoWrite {
                    granted: false,
                    old: resp.rdata,
                }),
            ),
            LsuState::AmoWrite { old, .. } => {
                let out = LsuOutput {
                    done: true,
                    rdata: old,
                    err: resp.err,
                    ..LsuOutput::default()
                };
                (out, with(LsuState::Idle))
            }
        }
    }

    /// Finishes a load/store/LR/SC access and updates the reservation.
    fn complete(&self, op: &MemRequest, low: u32, high: u32, err: bool) -> (LsuOutput, Self) {
        let mut reservation = self.reservation;
        let rdata = match op.kind {
            MemKind::Load => assemble_load(op.addr, op.width, op.signed, low, high),
            MemKind::LoadReserved => {
                if !err {
                    reservation = Some(op.addr & !3);
                }
                low
            }
            MemKind::StoreConditional => {
                reservation = None;
                0
            }
            MemKind::Store => {
                let first = op.addr & !3;
                let last = op.addr.wrapping_add(op.width.bytes() - 1) & !3;
                if reservation.is_some_and(|r| r == first || r == last) {
                    reservation = None;
                }
                0
            }
            MemKind::Amo(_) => low,
        };
        let out = LsuOutput {
            busy: false,
            done: true,
            rdata,
            err,
        };
        (
            out,
            Self {
                state: LsuState::Idle,
                reservation,
            },
        )
    }
}
