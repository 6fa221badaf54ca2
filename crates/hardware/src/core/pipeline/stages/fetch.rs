//! Instruction Fetch (IF) Stage.
//!
//! This module implements the first stage of the instruction pipeline. The fetch unit
//! reads aligned 32-bit words over the instruction bus and realigns them into
//! instructions, since compact (16-bit) encodings let a 32-bit instruction start in
//! the upper half of a word and straddle two bus words.
//!
//! Fetch never predicts: it walks sequentially until redirected. A redirect clears the
//! realignment buffer and marks any outstanding bus response stale so it is dropped on
//! arrival. Requests depend only on buffer occupancy, never on pipeline stalls.

use tracing::trace;

use crate::common::constants::{INSTRUCTION_SIZE_16, WORD_ADDR_MASK, is_compact};
use crate::common::error::Trap;
use crate::core::pipeline::latches::IfId;
use crate::soc::traits::{BusRequest, BusResponse};

/// Capacity of the realignment buffer in half-words (a leftover half plus one word).
pub const FETCH_BUFFER_HALVES: usize = 3;

/// A buffered half-word tagged with the bus error flag of its word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Half {
    bits: u16,
    err: bool,
}

/// An outstanding instruction-bus transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pending {
    /// A redirect happened after the request; drop the response.
    pub stale: bool,
    /// The low half of the response precedes the fetch PC and is discarded.
    pub skip_low: bool,
}

/// Instruction fetch unit with a half-word realignment buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchUnit {
    buffer: [Half; FETCH_BUFFER_HALVES],
    len: usize,
    /// Address of the oldest buffered half-word.
    pc: u32,
    /// Address of the next word to request.
    next_addr: u32,
    /// The next requested word starts before `pc`.
    skip_low: bool,
    pending: Option<Pending>,
    /// A bus error was delivered; no requests until the next redirect.
    halted: bool,
}

impl FetchUnit {
    /// Creates a fetch unit that starts at `pc`.
    pub const fn new(pc: u32) -> Self {
        Self {
            buffer: [Half { bits: 0, err: false }; FETCH_BUFFER_HALVES],
            len: 0,
            pc,
            next_addr: pc & WORD_ADDR_MASK,
            skip_low: pc & 2 != 0,
            pending: None,
            halted: false,
        }
    }

    /// Address of the next instruction to deliver.
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Number of buffered half-words.
    pub const fn buffered(&self) -> usize {
        self.len
    }

    /// The outstanding transaction, if any.
    pub const fn pending(&self) -> Option<Pending> {
        self.pending
    }

    /// Instruction-bus request for this cycle.
    pub const fn bus_request(&self) -> BusRequest {
        if self.pending.is_none() && !self.halted && self.len <= 1 {
            BusRequest::read(self.next_addr)
        } else {
            BusRequest::idle()
        }
    }

    /// The instruction at the head of the buffer, as it would enter IF/ID this cycle.
    ///
    /// A half-word tagged with a bus error yields an instruction access fault at the
    /// instruction's PC.
    pub fn output(&self) -> IfId {
        if self.len == 0 {
            return IfId::default();
        }
        let first = self.buffer[0];
        let fault = IfId {
            valid: true,
            pc: self.pc,
            inst: 0,
            compressed: true,
            exception: Some(Trap::InstructionAccessFault(self.pc)),
        };
        if first.err {
            return fault;
        }
        if is_compact(first.bits) {
            return IfId {
                valid: true,
                pc: self.pc,
                inst: u32::from(first.bits),
                compressed: true,
                exception: None,
            };
        }
        if self.len < 2 {
            return IfId::default();
        }
        let second = self.buffer[1];
        if second.err {
            return IfId {
                compressed: false,
                ..fault
            };
        }
        IfId {
            valid: true,
            pc: self.pc,
            inst: u32::from(first.bits) | (u32::from(second.bits) << 16),
            compressed: false,
            exception: None,
        }
    }

    fn push(&mut self, half: Half) {
        if self.len < FETCH_BUFFER_HALVES {
            self.buffer[self.len] = half;
            self.len += 1;
        }
    }

    fn pop(&mut self, halves: usize) {
        let n = halves.min(self.len);
        self.buffer.copy_within(n.., 0);
        self.len -= n;
        self.pc = self.pc.wrapping_add(n as u32 * INSTRUCTION_SIZE_16);
    }

    /// Computes the fetch unit state for the next cycle.
    ///
    /// # Arguments
    ///
    /// * `req` - The request driven this cycle (from [`FetchUnit::bus_request`]).
    /// * `resp` - The instruction-bus response this cycle.
    /// * `consume` - IF/ID accepted [`FetchUnit::output`] this cycle.
    /// * `redirect` - New fetch PC, if the pipeline redirects this cycle.
    pub fn next(
        &self,
        req: &BusRequest,
        resp: &BusResponse,
        consume: bool,
        redirect: Option<u32>,
    ) -> Self {
        let mut next = *self;

        if consume {
            let head = self.output();
            next.pop(if head.compressed { 1 } else { 2 });
        }

        if resp.rvalid {
            match next.pending.take() {
                Some(p) if p.stale => {
                    trace!(pc = format_args!("{:#010x}", self.pc), "dropping stale fetch response");
                }
                Some(p) => {
                    let lo = Half {
                        bits: resp.rdata as u16,
                        err: resp.err,
                    };
                    let hi = Half {
                        bits: (resp.rdata >> 16) as u16,
                        err: resp.err,
                    };
                    if !p.skip_low {
                        next.push(lo);
                    }
                    next.push(hi);
                    if resp.err {
                        next.halted = true;
                    }
                }
                None => {}
            }
        }

        if req.req && resp.gnt {
            next.pending = Some(Pending {
                stale: false,
                skip_low: self.skip_low,
            });
            next.next_addr = self.next_addr.wrapping_add(4);
            next.skip_low = false;
        }

        if let Some(target) = redirect {
            trace!(target = format_args!("{:#010x}", target), "fetch redirect");
            let pending = next.pending.map(|p| Pending { stale: true, ..p });
            next = Self {
                pending,
                ..Self::new(target)
            };
        }
        next
    }
}
