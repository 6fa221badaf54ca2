//! Pipeline stage implementations.
//!
//! This module contains the individual implementations for the five stages of the
//! instruction pipeline. Every stage is a function of the current latch contents;
//! the core orchestrator commits all results together at the end of the cycle.
//! 1. **Fetch:** Realigns instruction-bus words into instructions.
//! 2. **Decode:** Expands, decodes and reads operands.
//! 3. **Execute:** Performs ALU operations, resolves branches and reads CSRs.
//! 4. **Memory:** Drives the load/store unit; the commit point for traps.
//! 5. **Writeback:** Selects the register-file write.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch unit.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

/// Decode stage entry point (ID stage).
pub use decode::decode_stage;
/// Execute stage entry point (EX stage).
pub use execute::execute_stage;
/// Fetch unit (IF stage).
pub use fetch::FetchUnit;
/// Memory stage entry point (MEM stage).
pub use memory::mem_stage;
/// Writeback stage entry point (WB stage).
pub use writeback::wb_stage;
