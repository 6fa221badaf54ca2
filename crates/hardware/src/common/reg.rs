//! Integer Register File.
//!
//! This module provides the `RegisterFile` struct holding the 32 architectural
//! integer registers. It provides:
//! 1. **Storage:** 32 × 32-bit registers with `x0` hardwired to zero.
//! 2. **Same-Cycle Bypass:** Reads that observe the write being committed this cycle,
//!    so Decode sees a Writeback result without waiting for the clock edge.
//! 3. **Observability:** A dump helper for tracing and test failure messages.

use std::fmt;

use crate::common::constants::NUM_REGS;
use crate::isa::abi;

/// A register-file write presented by the Writeback stage this cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegWrite {
    /// Write enable.
    pub en: bool,
    /// Destination register index.
    pub rd: usize,
    /// Value to write.
    pub data: u32,
}

/// Architectural integer register file.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u32; NUM_REGS],
}

impl RegisterFile {
    /// Creates a new register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register. Register `x0` always returns 0.
    #[inline]
    pub fn read(&self, idx: usize) -> u32 {
        if idx == 0 { 0 } else { self.regs[idx & (NUM_REGS - 1)] }
    }

    /// Reads a register through the same-cycle write bypass.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    /// * `wb` - The write Writeback presents this cycle.
    ///
    /// # Returns
    ///
    /// The value being written when `wb` targets `idx`, otherwise the stored value.
    #[inline]
    pub fn read_bypass(&self, idx: usize, wb: &RegWrite) -> u32 {
        if idx != 0 && wb.en && wb.rd == idx {
            wb.data
        } else {
            self.read(idx)
        }
    }

    /// Writes a register. Writes to `x0` are accepted and ignored.
    #[inline]
    pub fn write(&mut self, idx: usize, val: u32) {
        if idx != 0 {
            self.regs[idx & (NUM_REGS - 1)] = val;
        }
    }

    /// Commits a Writeback request at the clock edge.
    #[inline]
    pub fn commit(&mut self, wb: &RegWrite) {
        if wb.en {
            self.write(wb.rd, wb.data);
        }
    }

    /// Returns a snapshot of all 32 registers.
    pub const fn snapshot(&self) -> [u32; NUM_REGS] {
        self.regs
    }
}

impl fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.regs.chunks(4).enumerate() {
            for (col, val) in chunk.iter().enumerate() {
                write!(f, "{:>4} = {val:#010x}  ", abi::name(row * 4 + col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
