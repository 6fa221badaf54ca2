//! RISC-V architecture-specific components.
//!
//! This module contains the implementation of core RISC-V architectural elements.
//! It includes the following modules:
//! 1. **CSRs:** Control and Status Register definitions and access logic.
//! 2. **Debug:** Debug-mode entry causes.
//! 3. **Modes:** Privilege mode definitions and transitions.
//! 4. **Traps:** Interrupt arbitration and trap vectoring.

/// Control and Status Register (CSR) definitions and access logic.
pub mod csr;

/// Debug-mode entry causes.
pub mod debug;

/// Privilege mode definitions and transitions.
pub mod mode;

/// Interrupt arbitration and trap vectoring.
pub mod trap;
