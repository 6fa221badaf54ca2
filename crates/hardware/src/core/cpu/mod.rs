//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which serves as the container for the
//! entire processor state. It coordinates the following:
//! 1. **State Management:** Maintains the register file, the CSR unit and the fetch PC.
//! 2. **Pipeline Control:** Holds the four inter-stage latches of the five-stage pipeline.
//! 3. **Execution Units:** Owns the load/store unit and the iterative multiply/divide unit.
//! 4. **System Integration:** Drives an instruction and a data [`BusPort`] once per cycle.
//!
//! [`BusPort`]: crate::soc::BusPort

/// CSR unit: commit-point decisions and counters.
pub mod csr;

/// Two-phase cycle evaluation and pipeline coordination.
pub mod execution;

/// Trap, `mret`, debug entry and `dret` state updates.
pub mod trap;

use crate::common::reg::RegisterFile;
use crate::config::CoreConfig;
use crate::core::arch::csr::Csrs;
use crate::core::pipeline::latches::{ExMem, IdEx, IfId, MemWb};
use crate::core::pipeline::stages::FetchUnit;
use crate::core::units::lsu::Lsu;
use crate::core::units::mdu::MulDiv;

pub use self::csr::{AsyncEvent, CommitDecision, CsrUnit, Transition};

/// Input lines sampled by the core every cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreInputs {
    /// Synchronous reset; while high the core holds its reset state.
    pub reset: bool,
    /// Machine external interrupt line (`mip.MEIP`).
    pub irq_external: bool,
    /// Machine timer interrupt line (`mip.MTIP`).
    pub irq_timer: bool,
    /// Machine software interrupt line (`mip.MSIP`).
    pub irq_software: bool,
    /// Fast interrupt lines 0-14 (bit 15 is ignored).
    pub irq_fast: u16,
    /// Debug halt request.
    pub debug_req: bool,
    /// Platform time, read through `time`/`timeh`.
    pub time: u64,
}

/// An instruction that left the Memory stage without trapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Retired {
    /// Instruction address.
    pub pc: u32,
    /// Raw encoding (16-bit for compact instructions).
    pub inst: u32,
    /// Core cycle in which the instruction retired, counted from the last reset.
    pub cycle: u64,
}

/// Main CPU structure containing all processor state and components.
///
/// The CPU evaluates all five pipeline stages from its current state each cycle and
/// then commits the results together, so stage order inside a cycle never matters.
#[derive(Clone, Debug)]
pub struct Cpu {
    /// Elaboration-time parameters, re-read on reset.
    config: CoreConfig,

    /// General-purpose registers.
    pub regs: RegisterFile,
    /// CSR file plus commit-point control.
    pub csr: CsrUnit,

    /// Fetch unit with its realignment buffer.
    fetch: FetchUnit,
    /// Load/store unit.
    lsu: Lsu,
    /// Multiply/divide unit.
    mdu: MulDiv,

    /// IF/ID Latch.
    pub if_id: IfId,
    /// ID/EX Latch.
    pub id_ex: IdEx,
    /// EX/MEM Latch.
    pub ex_mem: ExMem,
    /// MEM/WB Latch.
    pub mem_wb: MemWb,

    /// Cycles since the last reset.
    cycles: u64,
    /// Most recent instruction to retire.
    last_retired: Option<Retired>,
}

impl Cpu {
    /// Creates a core in its reset state.
    ///
    /// # Arguments
    ///
    /// * `config` - Elaboration-time parameters (boot address, hart id, PMP size, debug vectors).
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            config: config.clone(),
            regs: RegisterFile::new(),
            csr: CsrUnit::new(config),
            fetch: FetchUnit::new(config.boot_addr),
            lsu: Lsu::new(),
            mdu: MulDiv::Idle,
            if_id: IfId::default(),
            id_ex: IdEx::default(),
            ex_mem: ExMem::default(),
            mem_wb: MemWb::default(),
            cycles: 0,
            last_retired: None,
        }
    }

    /// Returns every architectural and pipeline register to its reset value.
    pub fn reset(&mut self) {
        *self = Self::new(&self.config);
    }

    /// The configuration the core was built with.
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// The CSR file.
    pub const fn csrs(&self) -> &Csrs {
        self.csr.csrs()
    }

    /// Address of the next instruction the fetch unit will hand to Decode.
    pub const fn fetch_pc(&self) -> u32 {
        self.fetch.pc()
    }

    /// The fetch unit.
    pub const fn fetch(&self) -> &FetchUnit {
        &self.fetch
    }

    /// The load/store unit.
    pub const fn lsu(&self) -> &Lsu {
        &self.lsu
    }

    /// The multiply/divide unit.
    pub const fn mdu(&self) -> &MulDiv {
        &self.mdu
    }

    /// Cycles evaluated since the last reset.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The most recently retired instruction.
    pub const fn last_retired(&self) -> Option<Retired> {
        self.last_retired
    }

    /// The instruction retired by the latest cycle, if that cycle retired one.
    pub fn retired_this_cycle(&self) -> Option<Retired> {
        self.last_retired.filter(|r| r.cycle + 1 == self.cycles)
    }

    /// Returns `true` while the hart is in debug mode.
    pub const fn in_debug_mode(&self) -> bool {
        self.csr.csrs().debug_mode
    }
}
