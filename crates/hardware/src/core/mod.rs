//! The K10 core.
//!
//! Everything between the two bus ports: the five-stage pipeline, its execution units,
//! the privileged architectural state, and [`Cpu`], which evaluates all of them once
//! per clock edge.

/// Architecture-specific components (CSRs, privilege modes, traps, debug).
pub mod arch;

/// The core itself and its per-cycle evaluation.
pub mod cpu;

/// Pipeline stages, latches, control signals and the hazard unit.
pub mod pipeline;

/// Execution units (ALU, multiply/divide, LSU, PMP).
pub mod units;

pub use self::cpu::{CoreInputs, Cpu};
