//! Bus interface between the core and its memory system.
//!
//! The core drives two identical single-outstanding request/response ports, one for
//! instruction fetch and one for data. This module defines:
//! 1. **Signals:** [`BusRequest`] and [`BusResponse`], one of each per port per cycle.
//! 2. **Ports:** [`BusPort`], the cycle-level protocol the core talks to.
//! 3. **Targets:** [`BusTarget`], the word-level storage a port performs accesses on.
//!
//! Protocol: the requester holds `req` with a stable address until `gnt`. A granted
//! transaction completes with exactly one `rvalid` pulse in a later cycle, carrying
//! read data and the `err` flag. A response with no outstanding request is a protocol
//! violation on the port's side.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

/// Request presented by the core on a bus port for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusRequest {
    /// Request valid.
    pub req: bool,
    /// Word-aligned byte address.
    pub addr: u32,
    /// Write enable.
    pub we: bool,
    /// Write data, already shifted into its byte lanes.
    pub wdata: u32,
    /// Byte-enable strobe (bit `i` enables byte lane `i`).
    pub be: u8,
}

impl BusRequest {
    /// Returns an idle request.
    pub const fn idle() -> Self {
        Self {
            req: false,
            addr: 0,
            we: false,
            wdata: 0,
            be: 0,
        }
    }

    /// Returns a full-word read request.
    pub const fn read(addr: u32) -> Self {
        Self {
            req: true,
            addr,
            we: false,
            wdata: 0,
            be: 0xF,
        }
    }

    /// Returns a strobed write request.
    pub const fn write(addr: u32, wdata: u32, be: u8) -> Self {
        Self {
            req: true,
            addr,
            we: true,
            wdata,
            be,
        }
    }
}

/// Response returned by a bus port for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusResponse {
    /// The request presented this cycle was accepted.
    pub gnt: bool,
    /// A previously granted transaction completes this cycle.
    pub rvalid: bool,
    /// Read data (valid with `rvalid`).
    pub rdata: u32,
    /// The completing transaction failed (valid with `rvalid`).
    pub err: bool,
}

/// A cycle-level bus port.
///
/// `cycle` is called exactly once per core cycle. The response must depend only on
/// the port's own state and the request presented in the same call; the port then
/// advances its state to the next cycle.
pub trait BusPort {
    /// Presents `req` for one cycle and returns this cycle's response.
    fn cycle(&mut self, req: &BusRequest) -> BusResponse;
}

/// Error returned by a [`BusTarget`] access.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BusError {
    /// No storage backs the address.
    #[error("address {0:#010x} is not mapped")]
    Unmapped(u32),
    /// The address lies in a range configured to fault.
    #[error("access to {0:#010x} faulted")]
    Faulted(u32),
}

/// Word-addressed storage behind a bus port.
pub trait BusTarget {
    /// Reads the aligned word containing `addr`.
    fn read_word(&mut self, addr: u32) -> Result<u32, BusError>;

    /// Writes the byte lanes of `data` selected by `strobe` into the word containing `addr`.
    fn write_word(&mut self, addr: u32, data: u32, strobe: u8) -> Result<(), BusError>;
}

/// A target shared by several ports (instruction and data side of one memory).
impl<T: BusTarget> BusTarget for Rc<RefCell<T>> {
    fn read_word(&mut self, addr: u32) -> Result<u32, BusError> {
        self.borrow_mut().read_word(addr)
    }

    fn write_word(&mut self, addr: u32, data: u32, strobe: u8) -> Result<(), BusError> {
        self.borrow_mut().write_word(addr, data, strobe)
    }
}
