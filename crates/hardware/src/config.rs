//! Configuration system for the K10 core model.
//!
//! This module defines the configuration structures used to parameterize the core and
//! its simulation wrapper. It provides:
//! 1. **Defaults:** Baseline build-time constants (boot address, PMP size, debug vectors).
//! 2. **Structures:** Hierarchical config for general, core, and memory settings.
//! 3. **Loading:** JSON parsing from strings or files, followed by validation.
//!
//! The `core` section models elaboration-time parameters: a [`crate::Cpu`] reads it once
//! at construction and again on reset, never while running.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::common::constants::PMP_MAX_REGIONS;
use crate::common::error::ConfigError;

/// Default configuration constants.
///
/// These values define the baseline core when not explicitly overridden in JSON.
mod defaults {
    /// Reset program counter.
    pub const BOOT_ADDR: u32 = 0x8000_0000;

    /// Hart identifier reported by `mhartid`.
    pub const HART_ID: u32 = 0;

    /// Number of implemented PMP regions.
    pub const PMP_REGIONS: usize = 16;

    /// Debug-mode entry vector (debug module halt routine).
    pub const DEBUG_HALT_ADDR: u32 = 0x1A11_0800;

    /// Vector taken by exceptions raised while already in debug mode.
    pub const DEBUG_EXCEPTION_ADDR: u32 = 0x1A11_0808;

    /// Base address of the simulated memory.
    pub const MEM_BASE: u32 = 0x8000_0000;

    /// Size of the simulated memory (1 MiB).
    pub const MEM_SIZE: usize = 1024 * 1024;

    /// Cycles between a bus grant and its response pulse.
    pub const BUS_LATENCY: u64 = 1;

    /// Simulator cycle budget for `run_until`.
    pub const MAX_CYCLES: u64 = 1_000_000;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use k10_core::config::Config;
///
/// let json = r#"{
///     "core": { "boot_addr": 4096, "pmp_regions": 8 },
///     "memory": { "base": 0, "size": 65536, "dbus_latency": 3 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.core.boot_addr, 0x1000);
/// assert_eq!(config.core.pmp_regions, 8);
/// assert_eq!(config.memory.dbus_latency, 3);
/// assert_eq!(config.memory.ibus_latency, 1);
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Elaboration-time core parameters.
    #[serde(default)]
    pub core: CoreConfig,
    /// Simulated memory and bus timing.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses and validates a configuration from JSON text.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON document; every section and field is optional.
    ///
    /// # Returns
    ///
    /// The validated configuration, or the parse/validation error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        debug!(
            boot_addr = format_args!("{:#010x}", config.core.boot_addr),
            pmp_regions = config.core.pmp_regions,
            hart_id = config.core.hart_id,
            "loaded core configuration"
        );
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks every field for values the core cannot be built with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.core.pmp_regions > PMP_MAX_REGIONS {
            return Err(ConfigError::Invalid {
                field: "core.pmp_regions",
                reason: format!(
                    "{} regions requested, at most {PMP_MAX_REGIONS} are addressable",
                    self.core.pmp_regions
                ),
            });
        }
        for (field, addr) in [
            ("core.boot_addr", self.core.boot_addr),
            ("core.debug_halt_addr", self.core.debug_halt_addr),
            ("core.debug_exception_addr", self.core.debug_exception_addr),
        ] {
            if addr & 1 != 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{addr:#010x} is not half-word aligned"),
                });
            }
        }
        if self.memory.size == 0 || self.memory.size % 4 != 0 {
            return Err(ConfigError::Invalid {
                field: "memory.size",
                reason: format!("{} is not a non-zero multiple of 4", self.memory.size),
            });
        }
        if u64::from(self.memory.base) + self.memory.size as u64 > 1 << 32 {
            return Err(ConfigError::Invalid {
                field: "memory.size",
                reason: "memory extends past the 32-bit address space".to_owned(),
            });
        }
        if let Some(range) = self.memory.error_ranges.iter().find(|r| r[0] >= r[1]) {
            return Err(ConfigError::Invalid {
                field: "memory.error_ranges",
                reason: format!("empty range [{:#x}, {:#x})", range[0], range[1]),
            });
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GeneralConfig {
    /// Cycle budget for [`crate::sim::Simulator::run_until`].
    #[serde(default = "GeneralConfig::default_max_cycles")]
    pub max_cycles: u64,
}

impl GeneralConfig {
    const fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_cycles: defaults::MAX_CYCLES,
        }
    }
}

/// Elaboration-time core parameters.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CoreConfig {
    /// Reset program counter; also the reset value of `mtvec`.
    #[serde(default = "CoreConfig::default_boot_addr")]
    pub boot_addr: u32,

    /// Value of `mhartid`.
    #[serde(default = "CoreConfig::default_hart_id")]
    pub hart_id: u32,

    /// Number of implemented PMP regions (0-16).
    #[serde(default = "CoreConfig::default_pmp_regions")]
    pub pmp_regions: usize,

    /// PC loaded on debug-mode entry.
    #[serde(default = "CoreConfig::default_debug_halt_addr")]
    pub debug_halt_addr: u32,

    /// PC loaded when an exception occurs inside debug mode.
    #[serde(default = "CoreConfig::default_debug_exception_addr")]
    pub debug_exception_addr: u32,
}

impl CoreConfig {
    const fn default_boot_addr() -> u32 {
        defaults::BOOT_ADDR
    }

    const fn default_hart_id() -> u32 {
        defaults::HART_ID
    }

    const fn default_pmp_regions() -> usize {
        defaults::PMP_REGIONS
    }

    const fn default_debug_halt_addr() -> u32 {
        defaults::DEBUG_HALT_ADDR
    }

    const fn default_debug_exception_addr() -> u32 {
        defaults::DEBUG_EXCEPTION_ADDR
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            boot_addr: defaults::BOOT_ADDR,
            hart_id: defaults::HART_ID,
            pmp_regions: defaults::PMP_REGIONS,
            debug_halt_addr: defaults::DEBUG_HALT_ADDR,
            debug_exception_addr: defaults::DEBUG_EXCEPTION_ADDR,
        }
    }
}

/// Simulated memory and bus-port timing.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MemoryConfig {
    /// First byte address backed by memory.
    #[serde(default = "MemoryConfig::default_base")]
    pub base: u32,

    /// Memory size in bytes.
    #[serde(default = "MemoryConfig::default_size")]
    pub size: usize,

    /// Instruction-bus response latency in cycles (minimum 1).
    #[serde(default = "MemoryConfig::default_latency")]
    pub ibus_latency: u64,

    /// Data-bus response latency in cycles (minimum 1).
    #[serde(default = "MemoryConfig::default_latency")]
    pub dbus_latency: u64,

    /// Half-open `[start, end)` address ranges answered with a bus error.
    #[serde(default)]
    pub error_ranges: Vec<[u32; 2]>,
}

impl MemoryConfig {
    const fn default_base() -> u32 {
        defaults::MEM_BASE
    }

    const fn default_size() -> usize {
        defaults::MEM_SIZE
    }

    const fn default_latency() -> u64 {
        defaults::BUS_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: defaults::MEM_BASE,
            size: defaults::MEM_SIZE,
            ibus_latency: defaults::BUS_LATENCY,
            dbus_latency: defaults::BUS_LATENCY,
            error_ranges: Vec::new(),
        }
    }
}
