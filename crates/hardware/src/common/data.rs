//! Memory access classification.
//!
//! Categorizes accesses for the PMP checker, which evaluates read, write and
//! execute permissions separately.

/// Type of memory access being performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch (execute permission).
    Fetch,
    /// Data load, including `lr.w`.
    Read,
    /// Data store, including `sc.w`.
    Write,
    /// Atomic read-modify-write; needs both read and write permission.
    ReadWrite,
}

impl AccessType {
    /// Returns `true` if the access needs read permission.
    pub const fn reads(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    /// Returns `true` if the access needs write permission.
    pub const fn writes(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }

    /// Returns `true` if the access needs execute permission.
    pub const fn executes(self) -> bool {
        matches!(self, Self::Fetch)
    }
}
