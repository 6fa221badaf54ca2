//! Trap and error definitions.
//!
//! This module defines the error handling and trap mechanisms for the core. It provides:
//! 1. **Trap Representation:** Every synchronous exception and asynchronous interrupt the
//!    core can raise, with its `mcause` and `mtval` encodings.
//! 2. **Configuration Errors:** Failures while loading or validating a [`crate::Config`].
//! 3. **Simulation Errors:** Failures surfaced by the [`crate::sim::Simulator`] run loop.
//!
//! None of these are fatal to the core itself: traps are recovered architecturally by
//! redirecting to a handler, and only the simulator wrapper returns `Err`.

use std::io;

use thiserror::Error;

use crate::isa::privileged::cause::{exception, interrupt, INTERRUPT_BIT};

/// RISC-V trap types representing exceptions and interrupts.
///
/// Traps cause the processor to transfer control to the trap vector held in `mtvec`.
/// This enum covers every trap an RV32IMAC machine/user core can take.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Trap {
    /// Instruction address misaligned exception.
    ///
    /// Never produced with the compact extension present (every jump target is
    /// half-word aligned), but kept so that the cause table is complete.
    #[error("InstructionAddressMisaligned({0:#x})")]
    InstructionAddressMisaligned(u32),

    /// Instruction access fault exception.
    ///
    /// Raised when an instruction fetch returns a bus error or the fetch address
    /// fails the PMP execute check. The associated value is the faulting PC.
    #[error("InstructionAccessFault({0:#x})")]
    InstructionAccessFault(u32),

    /// Illegal instruction exception.
    ///
    /// Raised for undefined encodings, illegal CSR accesses and privileged
    /// instructions executed at the wrong level. The associated value is the
    /// instruction encoding (16-bit for compact instructions).
    #[error("IllegalInstruction({0:#x})")]
    IllegalInstruction(u32),

    /// Breakpoint exception raised by `ebreak`. The associated value is the PC.
    #[error("Breakpoint({0:#x})")]
    Breakpoint(u32),

    /// Load address misaligned exception (misaligned `lr.w` or AMO read).
    #[error("LoadAddressMisaligned({0:#x})")]
    LoadAddressMisaligned(u32),

    /// Load access fault exception (bus error or PMP denial).
    #[error("LoadAccessFault({0:#x})")]
    LoadAccessFault(u32),

    /// Store/AMO address misaligned exception.
    #[error("StoreAddressMisaligned({0:#x})")]
    StoreAddressMisaligned(u32),

    /// Store/AMO access fault exception (bus error or PMP denial).
    #[error("StoreAccessFault({0:#x})")]
    StoreAccessFault(u32),

    /// Environment call from user mode.
    #[error("EnvironmentCallFromUMode")]
    EnvironmentCallFromUMode,

    /// Environment call from machine mode.
    #[error("EnvironmentCallFromMMode")]
    EnvironmentCallFromMMode,

    /// Machine software interrupt (`mip.MSIP`).
    #[error("MachineSoftwareInterrupt")]
    MachineSoftwareInterrupt,

    /// Machine timer interrupt (`mip.MTIP`).
    #[error("MachineTimerInterrupt")]
    MachineTimerInterrupt,

    /// Machine external interrupt (`mip.MEIP`).
    #[error("MachineExternalInterrupt")]
    MachineExternalInterrupt,

    /// Platform "fast" interrupt line `0..=14`, reported with cause `16 + line`.
    #[error("FastInterrupt({0})")]
    FastInterrupt(u8),
}

impl Trap {
    /// Returns `true` for asynchronous interrupts.
    pub const fn is_interrupt(&self) -> bool {
        matches!(
            self,
            Self::MachineSoftwareInterrupt
                | Self::MachineTimerInterrupt
                | Self::MachineExternalInterrupt
                | Self::FastInterrupt(_)
        )
    }

    /// Returns the exception or interrupt code, without the interrupt bit.
    pub const fn code(&self) -> u32 {
        match self {
            Self::InstructionAddressMisaligned(_) => exception::INSTRUCTION_ADDRESS_MISALIGNED,
            Self::InstructionAccessFault(_) => exception::INSTRUCTION_ACCESS_FAULT,
            Self::IllegalInstruction(_) => exception::ILLEGAL_INSTRUCTION,
            Self::Breakpoint(_) => exception::BREAKPOINT,
            Self::LoadAddressMisaligned(_) => exception::LOAD_ADDRESS_MISALIGNED,
            Self::LoadAccessFault(_) => exception::LOAD_ACCESS_FAULT,
            Self::StoreAddressMisaligned(_) => exception::STORE_ADDRESS_MISALIGNED,
            Self::StoreAccessFault(_) => exception::STORE_ACCESS_FAULT,
            Self::EnvironmentCallFromUMode => exception::ENVIRONMENT_CALL_FROM_U_MODE,
            Self::EnvironmentCallFromMMode => exception::ENVIRONMENT_CALL_FROM_M_MODE,
            Self::MachineSoftwareInterrupt => interrupt::MACHINE_SOFTWARE,
            Self::MachineTimerInterrupt => interrupt::MACHINE_TIMER,
            Self::MachineExternalInterrupt => interrupt::MACHINE_EXTERNAL,
            Self::FastInterrupt(line) => interrupt::FAST_BASE + *line as u32,
        }
    }

    /// Returns the value written to `mcause` on trap entry.
    pub const fn cause(&self) -> u32 {
        if self.is_interrupt() {
            INTERRUPT_BIT | self.code()
        } else {
            self.code()
        }
    }

    /// Returns the value written to `mtval` on trap entry.
    ///
    /// Memory faults report the faulting address, illegal instructions their
    /// encoding and breakpoints the PC; everything else reports zero.
    pub const fn tval(&self) -> u32 {
        match self {
            Self::InstructionAddressMisaligned(v)
            | Self::InstructionAccessFault(v)
            | Self::IllegalInstruction(v)
            | Self::Breakpoint(v)
            | Self::LoadAddressMisaligned(v)
            | Self::LoadAccessFault(v)
            | Self::StoreAddressMisaligned(v)
            | Self::StoreAccessFault(v) => *v,
            _ => 0,
        }
    }
}

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    /// The configuration text is not valid JSON for [`crate::Config`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the core cannot be built with.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
}

/// Errors surfaced by the simulator wrapper.
#[derive(Debug, Error)]
pub enum SimError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A program image does not fit in the simulated memory.
    #[error("program image of {len} bytes at {addr:#010x} does not fit in memory")]
    ImageOutOfRange {
        /// Load address of the image.
        addr: u32,
        /// Image length in bytes.
        len: usize,
    },

    /// The halt condition did not trigger within the cycle budget.
    #[error("halt condition not reached within {0} cycles")]
    CycleLimit(u64),
}
