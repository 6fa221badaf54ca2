//! Simulation wrapper.
//!
//! Connects a [`crate::Cpu`] to a shared flat memory through one instruction and one
//! data bus port, and provides a bounded run loop with caller-defined halt conditions.

/// Core + memory + bus ports, and the run loop.
pub mod simulator;

pub use simulator::{SharedMemory, Simulator};
