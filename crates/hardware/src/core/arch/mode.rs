//! RISC-V Privilege Modes.
//!
//! This module defines the privilege levels implemented by the core. It implements the following:
//! 1. **Mode Classification:** User (U) and Machine (M) modes; there is no supervisor mode.
//! 2. **Serialization:** Conversion between the 2-bit `MPP`/`dcsr.prv` encoding and enum variants.
//! 3. **Observability:** Display formatting for privilege states.

use std::fmt;

/// RISC-V privilege mode levels.
///
/// Ordering follows the privilege hierarchy, so `mode < PrivilegeMode::Machine`
/// reads as "below the trap-handling level".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrivilegeMode {
    /// User mode (U-mode), for application code.
    User = 0,

    /// Machine mode (M-mode), the reset and trap-handling level.
    #[default]
    Machine = 3,
}

impl PrivilegeMode {
    /// Converts a 2-bit privilege encoding to a mode.
    ///
    /// # Arguments
    ///
    /// * `val` - Encoded privilege (`0b00` user, `0b11` machine).
    ///
    /// # Returns
    ///
    /// The corresponding mode. Encodings of unimplemented levels (supervisor,
    /// reserved) map to `User`, the WARL legalization used for `MPP` and `dcsr.prv`.
    pub const fn from_bits(val: u32) -> Self {
        match val & 0b11 {
            0b11 => Self::Machine,
            _ => Self::User,
        }
    }

    /// Returns the 2-bit encoding of the mode.
    pub const fn to_bits(self) -> u32 {
        self as u32
    }

    /// Returns the human-readable name of the mode.
    pub const fn name(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Machine => "Machine",
        }
    }
}

impl fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
