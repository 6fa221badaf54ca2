//! Execution units and functional components.
//!
//! This module contains the processor's execution units: the integer ALU, the
//! iterative multiply/divide unit, the load/store unit and the physical memory
//! protection checker.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Load/Store Unit for data-bus transactions, unaligned splitting and atomics.
pub mod lsu;

/// Multiply/Divide Unit (single-cycle multiply, iterative divide).
pub mod mdu;

/// Physical Memory Protection checker.
pub mod pmp;
