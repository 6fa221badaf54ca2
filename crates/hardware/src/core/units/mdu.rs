//! Multiply/Divide Unit (MDU).
//!
//! Implements the M extension for the Execute stage:
//! 1. **Multiply:** `mul`, `mulh`, `mulhsu` and `mulhu` are single-cycle and report
//!    `done` in the cycle they are requested.
//! 2. **Divide:** `div`, `divu`, `rem` and `remu` run a 32-iteration restoring divider
//!    over the operand magnitudes, one quotient bit per cycle, and fix up the signs at
//!    the end.
//!
//! The divider follows a request/done handshake. The Execute stage holds `req` high for
//! as long as the instruction occupies the stage. `done` stays asserted with a stable
//! result while `req` stays high; the unit returns to idle when `req` drops or when the
//! stage acknowledges capture with `ack`, so a back-to-back division starts from a clean
//! state. Dropping `req` mid-division aborts it.

use tracing::trace;

use crate::core::pipeline::signals::MdOp;

/// Number of restoring-division iterations (one per quotient bit).
pub const DIV_ITERATIONS: u8 = 32;

/// Request presented by the Execute stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MdRequest {
    /// Request line; high while a multiply/divide instruction sits in Execute.
    pub req: bool,
    /// Operation to perform.
    pub op: MdOp,
    /// First operand (`rs1`).
    pub a: u32,
    /// Second operand (`rs2`).
    pub b: u32,
    /// The requesting instruction leaves Execute this cycle.
    pub ack: bool,
}

/// Combinational outputs of the unit for the current cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MdOutput {
    /// Operation in progress; the Execute stage must stall.
    pub busy: bool,
    /// `result` is valid this cycle.
    pub done: bool,
    /// Product or quotient/remainder.
    pub result: u32,
}

/// Sign-magnitude operands and running state of a division.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Division {
    /// Operation being computed.
    pub op: MdOp,
    /// Dividend magnitude; shifted out one bit per iteration.
    dividend: u32,
    /// Divisor magnitude.
    divisor: u32,
    /// Partial remainder.
    remainder: u32,
    /// Quotient bits produced so far.
    quotient: u32,
    /// Iterations left.
    remaining: u8,
    /// Negate the quotient at the end.
    neg_quotient: bool,
    /// Negate the remainder at the end.
    neg_remainder: bool,
}

impl Division {
    fn setup(op: MdOp, a: u32, b: u32) -> Self {
        let signed = matches!(op, MdOp::Div | MdOp::Rem);
        let a_neg = signed && (a as i32) < 0;
        let b_neg = signed && (b as i32) < 0;
        Self {
            op,
            dividend: if a_neg { a.wrapping_neg() } else { a },
            divisor: if b_neg { b.wrapping_neg() } else { b },
            remainder: 0,
            quotient: 0,
            remaining: DIV_ITERATIONS,
            neg_quotient: a_neg != b_neg,
            neg_remainder: a_neg,
        }
    }

    /// Performs one shift-subtract-restore step.
    fn step(mut self) -> Self {
        let shifted = (u64::from(self.remainder) << 1) | u64::from(self.dividend >> 31);
        self.dividend <<= 1;
        self.quotient <<= 1;
        if shifted >= u64::from(self.divisor) {
            self.remainder = (shifted - u64::from(self.divisor)) as u32;
            self.quotient |= 1;
        } else {
            self.remainder = shifted as u32;
        }
        self.remaining -= 1;
        self
    }

    fn finish(&self) -> u32 {
        let quotient = if self.neg_quotient {
            self.quotient.wrapping_neg()
        } else {
            self.quotient
        };
        let remainder = if self.neg_remainder {
            self.remainder.wrapping_neg()
        } else {
            self.remainder
        };
        if matches!(self.op, MdOp::Div | MdOp::Divu) {
            quotient
        } else {
            remainder
        }
    }
}

/// Divider state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MulDiv {
    /// No division in flight.
    #[default]
    Idle,
    /// Iterating; the result is fixed up when the last step completes.
    Divide(Division),
    /// Special case decided at start; holds the fixed result for one pass.
    Fixed {
        /// Result to report on completion.
        result: u32,
        /// Iterations left before `done`.
        remaining: u8,
    },
    /// Result held until the request drops or is acknowledged.
    Done(u32),
}

impl MulDiv {
    /// Returns `true` if no division is in flight.
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Evaluates the unit for one cycle.
    ///
    /// # Arguments
    ///
    /// * `request` - This cycle's request, operands and acknowledge.
    ///
    /// # Returns
    ///
    /// The combinational outputs for this cycle and the state for the next.
    pub fn evaluate(&self, request: &MdRequest) -> (MdOutput, Self) {
        if !request.req {
            if !self.is_idle() {
                trace!("divider request dropped, aborting");
            }
            return (MdOutput::default(), Self::Idle);
        }

        if let Some(result) = multiply(request.op, request.a, request.b) {
            let out = MdOutput {
                busy: false,
                done: true,
                result,
            };
            return (out, Self::Idle);
        }

        let busy = MdOutput {
            busy: true,
            ..MdOutput::default()
        };
        match *self {
            Self::Idle => {
                trace!(op = ?request.op, a = request.a, b = request.b, "divider start");
                let next = match special_case(request.op, request.a, request.b) {
                    Some(result) => Self::Fixed {
                        result,
                        remaining: DIV_ITERATIONS,
                    },
                    None => Self::Divide(Division::setup(request.op, request.a, request.b)),
                };
                (busy, next)
            }
            Self::Divide(div) => {
                let div = div.step();
                if div.remaining == 0 {
                    let result = div.finish();
                    trace!(result, "divider finish");
                    (busy, Self::Done(result))
                } else {
                    (busy, Self::Divide(div))
                }
            }
            Self::Fixed { result, remaining } => {
                if remaining <= 1 {
                    (busy, Self::Done(result))
                } else {
                    (
                        busy,
                        Self::Fixed {
                            result,
                            remaining: remaining - 1,
                        },
                    )
                }
            }
            Self::Done(result) => {
                let out = MdOutput {
                    busy: false,
                    done: true,
                    result,
                };
                let next = if request.ack { Self::Idle } else { *self };
                (out, next)
            }
        }
    }
}

/// Computes a single-cycle multiply, or returns `None` for the divide operations.
///
/// # Examples
///
/// ```
/// use k10_core::core::units::mdu::multiply;
/// use k10_core::core::pipeline::signals::MdOp;
///
/// assert_eq!(multiply(MdOp::Mul, 7, 6), Some(42));
/// assert_eq!(multiply(MdOp::Mulh, -1_i32 as u32, -1_i32 as u32), Some(0));
/// assert_eq!(multiply(MdOp::Mulhu, 0xFFFF_FFFF, 0xFFFF_FFFF), Some(0xFFFF_FFFE));
/// assert_eq!(multiply(MdOp::Mulhsu, -1_i32 as u32, 2), Some(0xFFFF_FFFF));
/// assert_eq!(multiply(MdOp::Divu, 7, 6), None);
/// ```
pub fn multiply(op: MdOp, a: u32, b: u32) -> Option<u32> {
    let sa = i64::from(a as i32);
    let sb = i64::from(b as i32);
    match op {
        MdOp::Mul => Some(a.wrapping_mul(b)),
        MdOp::Mulh => Some(((sa * sb) >> 32) as u32),
        MdOp::Mulhsu => Some(((sa * i64::from(b)) >> 32) as u32),
        MdOp::Mulhu => Some(((u64::from(a) * u64::from(b)) >> 32) as u32),
        MdOp::Div | MdOp::Divu | MdOp::Rem | MdOp::Remu => None,
    }
}

/// Returns the fixed result for division by zero and signed overflow.
fn special_case(op: MdOp, a: u32, b: u32) -> Option<u32> {
    if b == 0 {
        return Some(match op {
            MdOp::Div | MdOp::Divu => u32::MAX,
            _ => a,
        });
    }
    if matches!(op, MdOp::Div | MdOp::Rem) && a == 0x8000_0000 && b == u32::MAX {
        return Some(match op {
            MdOp::Div => 0x8000_0000,
            _ => 0,
        });
    }
    None
}
