//! Debug-mode entry causes.
//!
//! The core implements the halt/resume subset of the RISC-V debug specification:
//! entry saves the PC in `dpc`, records the cause and previous privilege in `dcsr`
//! and jumps to the configured halt address; `dret` returns.

use std::fmt;

/// Reason recorded in `dcsr.cause` on debug entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugCause {
    /// `ebreak` with `dcsr.ebreakm`/`dcsr.ebreaku` set.
    Ebreak = 1,
    /// External halt request.
    HaltRequest = 3,
    /// Single step completed.
    Step = 4,
}

impl DebugCause {
    /// Returns the `dcsr.cause` encoding.
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for DebugCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ebreak => "ebreak",
            Self::HaltRequest => "haltreq",
            Self::Step => "step",
        };
        write!(f, "{name}")
    }
}
