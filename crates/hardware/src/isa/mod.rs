//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains encoding constants, field accessors, the immediate generator and the
//! compact-instruction expander, organized by RISC-V extension.
//!
//! # Extensions
//!
//! * `rv32i`: Base Integer Instruction Set (32-bit), including Zicsr/Zifencei opcodes.
//! * `rv32m`: Integer Multiplication and Division.
//! * `rv32a`: Atomic Instructions.
//! * `rvc`: Compressed Instructions.
//! * `privileged`: Privileged Architecture (trap causes, system instructions).

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Immediate generator.
pub mod imm;

/// Instruction field extraction utilities.
pub mod instruction;

/// Privileged architecture definitions (trap causes, system instructions).
pub mod privileged;

/// Atomic memory operations extension.
pub mod rv32a;

/// Base integer instruction set.
pub mod rv32i;

/// Integer multiply/divide extension.
pub mod rv32m;

/// Compressed instruction extension.
pub mod rvc;
