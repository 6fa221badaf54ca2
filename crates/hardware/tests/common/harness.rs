use std::sync::Once;

use k10_core::Simulator;
use k10_core::config::Config;
use k10_core::core::Cpu;
use tracing_subscriber::EnvFilter;

use crate::common::builder::instruction::HALT;

/// Default reset PC and memory base.
pub const BOOT: u32 = 0x8000_0000;

/// Cycle budget for test programs.
pub const TEST_MAX_CYCLES: u64 = 20_000;

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per process; filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Configuration used by most tests: defaults with a smaller cycle budget.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.general.max_cycles = TEST_MAX_CYCLES;
    config
}

pub struct TestContext {
    pub sim: Simulator,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        init_tracing();
        let sim = Simulator::new(&config).expect("test configuration must be valid");
        Self { sim }
    }

    /// Convenience accessor for the CPU.
    pub fn cpu(&self) -> &Cpu {
        &self.sim.cpu
    }

    /// Mutable convenience accessor for the CPU.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.sim.cpu
    }

    /// Load a sequence of 32-bit instructions at the boot address.
    pub fn load_program(self, instructions: &[u32]) -> Self {
        self.load_at(BOOT, instructions)
    }

    /// Load a sequence of 32-bit words at `addr`.
    pub fn load_at(mut self, addr: u32, words: &[u32]) -> Self {
        self.sim
            .load_words(addr, words)
            .expect("program must fit in memory");
        self
    }

    /// Load a sequence of 16-bit half-words at `addr`.
    pub fn load_halves(mut self, addr: u32, halves: &[u16]) -> Self {
        let image: Vec<u8> = halves.iter().flat_map(|h| h.to_le_bytes()).collect();
        self.sim
            .load_program(addr, &image)
            .expect("program must fit in memory");
        self
    }

    /// Set a general-purpose register value directly.
    pub fn set_reg(&mut self, reg: usize, val: u32) {
        self.sim.cpu.regs.write(reg, val);
    }

    /// Read a general-purpose register value.
    pub fn get_reg(&self, reg: usize) -> u32 {
        self.sim.reg(reg)
    }

    /// Read a CSR as software would.
    pub fn csr(&self, addr: u32) -> u32 {
        self.sim.csr(addr)
    }

    /// Read a memory word; panics if unmapped.
    pub fn read_u32(&self, addr: u32) -> u32 {
        self.sim.read_u32(addr).expect("address must be mapped")
    }

    /// Run the CPU for a specific number of cycles.
    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.sim.tick();
        }
    }

    /// Run until the halt marker (`jal x0, 0`) retires. Returns the cycle count.
    pub fn run_to_halt(&mut self) -> u64 {
        self.sim
            .run_until_retired(HALT)
            .expect("program should reach the halt marker")
    }

    /// Run until `pred` holds. Returns the cycle count.
    pub fn run_until(&mut self, pred: impl FnMut(&Cpu) -> bool) -> u64 {
        self.sim.run_until(pred).expect("condition should be reached")
    }
}
