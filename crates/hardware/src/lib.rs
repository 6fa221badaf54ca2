//! Cycle-level model of the K10 RISC-V core.
//!
//! This crate implements a 5-stage in-order RV32IMAC core with the following:
//! 1. **Core:** Pipeline (fetch, decode, execute, memory, writeback), hazard and forwarding
//!    unit, and the two-phase cycle evaluation.
//! 2. **Units:** ALU, iterative multiply/divide, load/store unit with unaligned splitting
//!    and atomics, and physical memory protection.
//! 3. **Privileged Architecture:** CSRs, traps, interrupts, debug mode and `wfi`.
//! 4. **ISA:** Encodings for RV32I/M/A, Zicsr and the compact extension expander.
//! 5. **SoC and Simulation:** Bus ports, a flat memory and a bounded run loop.

/// Common types and constants (traps, errors, register file).
pub mod common;
/// Build-time configuration (defaults and hierarchical config structures).
pub mod config;
/// CPU core (pipeline, arch state, execution units, orchestration).
pub mod core;
/// Instruction set (fields, immediates, RV32I/M/A, RVC, privileged).
pub mod isa;
/// Simulation wrapper (core, memory, bus ports, run loop).
pub mod sim;
/// Bus-side collaborators (signals, ports, memory).
pub mod soc;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Main CPU type; holds the pipeline, units and architectural state.
pub use crate::core::Cpu;
/// Simulator wrapping a core with memory and bus ports.
pub use crate::sim::Simulator;
