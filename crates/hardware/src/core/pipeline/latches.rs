//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the four latches of the 5-stage pipeline:
//! Fetch → IF/ID → Decode → ID/EX → Execute → EX/MEM → Memory → MEM/WB → Writeback.
//!
//! 1. **Instruction Flow:** Each latch carries one instruction plus a `valid` bit.
//! 2. **Bubbles:** `Default` is the canonical no-op (invalid, all-default control word)
//!    injected on flush or stall.
//! 3. **Trap Propagation:** Exceptions detected before the Memory stage ride along in
//!    `exception` and are acted on at the commit point.

use crate::common::error::Trap;
use crate::core::pipeline::signals::{ControlSignals, WbSrc};

/// IF/ID latch (Fetch to Decode).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IfId {
    /// Latch holds an instruction.
    pub valid: bool,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Raw encoding; the low 16 bits for a compact instruction.
    pub inst: u32,
    /// Fetched as a 16-bit compact encoding.
    pub compressed: bool,
    /// Instruction access fault raised by the fetch.
    pub exception: Option<Trap>,
}

/// ID/EX latch (Decode to Execute).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdEx {
    /// Latch holds an instruction.
    pub valid: bool,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Raw encoding as fetched (reported as `mtval` for illegal instructions).
    pub inst: u32,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Destination register index.
    pub rd: usize,
    /// Value read for `rs1`.
    pub rv1: u32,
    /// Value read for `rs2`.
    pub rv2: u32,
    /// Generated immediate.
    pub imm: u32,
    /// CSR address for Zicsr instructions.
    pub csr_addr: u32,
    /// Decoded control word.
    pub ctrl: ControlSignals,
    /// Exception detected in Fetch or Decode.
    pub exception: Option<Trap>,
}

/// EX/MEM latch (Execute to Memory).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExMem {
    /// Latch holds an instruction.
    pub valid: bool,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Raw encoding.
    pub inst: u32,
    /// Destination register index.
    pub rd: usize,
    /// ALU or multiply/divide result; the effective address for memory instructions.
    pub alu: u32,
    /// Store data or AMO operand (forwarded `rs2`).
    pub store_data: u32,
    /// CSR address.
    pub csr_addr: u32,
    /// CSR value read in Execute.
    pub csr_rdata: u32,
    /// CSR value to commit.
    pub csr_wdata: u32,
    /// Decoded control word.
    pub ctrl: ControlSignals,
    /// Exception detected up to and including Execute.
    pub exception: Option<Trap>,
}

impl ExMem {
    /// Value this instruction will write back, for forwarding.
    ///
    /// Meaningless for instructions whose result comes from memory.
    pub const fn result(&self) -> u32 {
        match self.ctrl.wb_sel {
            WbSrc::PcPlus => self.pc.wrapping_add(self.ctrl.size()),
            WbSrc::Csr => self.csr_rdata,
            WbSrc::Alu | WbSrc::Mem => self.alu,
        }
    }
}

/// MEM/WB latch (Memory to Writeback).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemWb {
    /// Latch holds an instruction.
    pub valid: bool,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Raw encoding.
    pub inst: u32,
    /// Destination register index.
    pub rd: usize,
    /// ALU or multiply/divide result.
    pub alu: u32,
    /// Load data, SC status or AMO original value.
    pub load_data: u32,
    /// CSR value read in Execute.
    pub csr_rdata: u32,
    /// Decoded control word.
    pub ctrl: ControlSignals,
}
