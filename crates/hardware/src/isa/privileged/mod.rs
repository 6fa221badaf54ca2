//! Privileged Architecture Definitions.
//!
//! # Modules
//!
//! - `cause`: Exception and interrupt cause codes.
//! - `opcodes`: System instruction encodings (ECALL, EBREAK, MRET, DRET, WFI, CSR*).

/// Exception and interrupt cause code definitions.
pub mod cause;

/// System instruction encodings.
pub mod opcodes;
