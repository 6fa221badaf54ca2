//! Five-stage in-order pipeline.
//!
//! Fetch, Decode, Execute, Memory and Writeback communicate only through the four
//! latches in [`latches`]. The pieces here are pure: each stage maps the current
//! latch contents to its outputs, and [`crate::Cpu`] decides which outputs are
//! committed.
//! 1. **Hazards:** Load-use, CSR and `fence.i` stalls, operand forwarding and the
//!    per-cycle control summary.
//! 2. **Latches:** IF/ID, ID/EX, EX/MEM and MEM/WB.
//! 3. **Signals:** The decoded control word.
//! 4. **Stages:** One module per stage.

/// Stall detection and operand forwarding.
pub mod hazards;

/// Inter-stage pipeline latches (IF/ID, ID/EX, EX/MEM, MEM/WB).
pub mod latches;

/// Control word produced by Decode.
pub mod signals;

/// Pipeline stage implementations (fetch, decode, execute, memory, writeback).
pub mod stages;
