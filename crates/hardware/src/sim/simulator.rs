//! Simulator: owns the core, its memory and both bus ports side by side.
//!
//! The core never owns its memory; it only sees the two [`BusPort`]s passed to
//! [`Cpu::tick`]. Both ports front the same [`Memory`], so stores are visible to
//! later instruction fetches.
//!
//! [`BusPort`]: crate::soc::BusPort

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::common::error::SimError;
use crate::config::Config;
use crate::core::arch::csr::CsrView;
use crate::core::arch::trap::TrapHandler;
use crate::core::cpu::CoreInputs;
use crate::core::Cpu;
use crate::soc::{LatencyPort, Memory};

/// Memory shared by the instruction and data ports.
pub type SharedMemory = Rc<RefCell<Memory>>;

/// Top-level simulator: core, memory and bus ports.
#[derive(Debug)]
pub struct Simulator {
    /// The core.
    pub cpu: Cpu,
    /// Input lines presented to the core every cycle; `time` is overwritten by `tick`.
    pub inputs: CoreInputs,
    memory: SharedMemory,
    ibus: LatencyPort<SharedMemory>,
    dbus: LatencyPort<SharedMemory>,
    max_cycles: u64,
    cycles: u64,
}

impl Simulator {
    /// Builds a simulator from a configuration.
    ///
    /// # Returns
    ///
    /// `Err` if the configuration fails validation.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        let memory = Rc::new(RefCell::new(Memory::from_config(&config.memory)));
        debug!(
            base = format_args!("{:#010x}", config.memory.base),
            size = config.memory.size,
            ibus_latency = config.memory.ibus_latency,
            dbus_latency = config.memory.dbus_latency,
            "building simulator"
        );
        Ok(Self {
            cpu: Cpu::new(&config.core),
            inputs: CoreInputs::default(),
            ibus: LatencyPort::new(Rc::clone(&memory), config.memory.ibus_latency),
            dbus: LatencyPort::new(Rc::clone(&memory), config.memory.dbus_latency),
            memory,
            max_cycles: config.general.max_cycles,
            cycles: 0,
        })
    }

    /// Copies a program image into memory.
    ///
    /// # Arguments
    ///
    /// * `addr` - Load address.
    /// * `image` - Raw little-endian bytes.
    pub fn load_program(&mut self, addr: u32, image: &[u8]) -> Result<(), SimError> {
        self.memory
            .borrow_mut()
            .load(addr, image)
            .map_err(|_| SimError::ImageOutOfRange {
                addr,
                len: image.len(),
            })?;
        debug!(addr = format_args!("{addr:#010x}"), len = image.len(), "loaded program");
        Ok(())
    }

    /// Copies a sequence of 32-bit words into memory.
    pub fn load_words(&mut self, addr: u32, words: &[u32]) -> Result<(), SimError> {
        let image: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        self.load_program(addr, &image)
    }

    /// Advances the core by one cycle.
    pub fn tick(&mut self) {
        self.inputs.time = self.cycles;
        self.cpu.tick(&self.inputs, &mut self.ibus, &mut self.dbus);
        self.cycles += 1;
    }

    /// Applies one cycle of reset to the core and drops in-flight bus transactions.
    pub fn reset(&mut self) {
        let inputs = CoreInputs {
            reset: true,
            ..self.inputs
        };
        self.cpu.tick(&inputs, &mut self.ibus, &mut self.dbus);
        self.ibus.reset();
        self.dbus.reset();
        self.cycles += 1;
    }

    /// Ticks until `halt` holds after a cycle or the cycle budget runs out.
    ///
    /// # Returns
    ///
    /// The number of cycles run, or [`SimError::CycleLimit`].
    pub fn run_until(&mut self, mut halt: impl FnMut(&Cpu) -> bool) -> Result<u64, SimError> {
        for n in 1..=self.max_cycles {
            self.tick();
            if halt(&self.cpu) {
                return Ok(n);
            }
        }
        warn!(
            max_cycles = self.max_cycles,
            pc = format_args!("{:#010x}", self.cpu.fetch_pc()),
            "cycle limit reached"
        );
        Err(SimError::CycleLimit(self.max_cycles))
    }

    /// Runs until an instruction with encoding `inst` retires.
    ///
    /// Only retirements in a cycle run by this call count, so an earlier retirement of
    /// the same encoding does not end the run.
    pub fn run_until_retired(&mut self, inst: u32) -> Result<u64, SimError> {
        self.run_until(|cpu| cpu.retired_this_cycle().is_some_and(|r| r.inst == inst))
    }

    /// Cycles ticked since construction, including reset cycles.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Overrides the cycle budget of [`Simulator::run_until`].
    pub fn set_max_cycles(&mut self, max_cycles: u64) {
        self.max_cycles = max_cycles;
    }

    /// Reads general-purpose register `idx`.
    pub fn reg(&self, idx: usize) -> u32 {
        self.cpu.regs.read(idx)
    }

    /// Reads a CSR as an instruction would, with `mip` and `time` from the current inputs.
    pub fn csr(&self, addr: u32) -> u32 {
        let view = CsrView {
            mip: TrapHandler::mip_from_lines(
                self.inputs.irq_external,
                self.inputs.irq_timer,
                self.inputs.irq_software,
                self.inputs.irq_fast,
            ),
            time: self.cycles,
        };
        self.cpu.csrs().read(addr, &view)
    }

    /// Borrows the memory.
    pub fn memory(&self) -> Ref<'_, Memory> {
        self.memory.borrow()
    }

    /// Reads a memory word, or `None` if unmapped.
    pub fn read_u32(&self, addr: u32) -> Option<u32> {
        self.memory.borrow().read_u32(addr)
    }
}
