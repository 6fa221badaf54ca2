//! Common types and constants shared across the core.
//!
//! This module provides fundamental building blocks used by every component. It includes:
//! 1. **Constants:** Instruction sizes, register geometry, platform bounds.
//! 2. **Memory Access:** Classification of accesses for permission checks.
//! 3. **Error Handling:** Trap representation plus configuration and simulator errors.
//! 4. **Register Management:** The integer register file with same-cycle bypass.

/// Common constants used throughout the core.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types and trap definitions.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use data::AccessType;
pub use error::{ConfigError, SimError, Trap};
pub use reg::{RegWrite, RegisterFile};
