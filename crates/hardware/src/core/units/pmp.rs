//! Physical Memory Protection (PMP) Checker.
//!
//! This module implements RISC-V Physical Memory Protection, which restricts memory
//! accesses based on the privilege level and a table of regions configured through
//! `pmpcfg0`–`pmpcfg3` and `pmpaddr0`–`pmpaddr15`.
//!
//! PMP supports three address-matching modes:
//! - **TOR** (Top of Range): region is `[pmpaddr[i-1], pmpaddr[i])`.
//! - **NA4**: Naturally aligned 4-byte region.
//! - **NAPOT**: Naturally aligned power-of-two region.
//!
//! Among matching regions the lowest index decides. Machine mode is allowed unless
//! the deciding region is locked and forbids the access; user mode is denied unless
//! the deciding region grants it. A core built without regions performs no checks.

use crate::common::constants::PMP_MAX_REGIONS;
use crate::common::data::AccessType;
use crate::core::arch::mode::PrivilegeMode;

/// PMP address-matching mode field (bits 4:3 of a cfg byte).
const A_SHIFT: u8 = 3;
const A_MASK: u8 = 0x3;

/// PMP configuration permission bits.
const PMP_R: u8 = 1 << 0;
const PMP_W: u8 = 1 << 1;
const PMP_X: u8 = 1 << 2;
const PMP_L: u8 = 1 << 7;

/// Implemented cfg bits (bits 6:5 are reserved and read zero).
const CFG_WRITE_MASK: u8 = PMP_L | (A_MASK << A_SHIFT) | PMP_X | PMP_W | PMP_R;

/// Address matching mode extracted from a cfg byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PmpAddrMatch {
    /// Entry is disabled.
    Off = 0,
    /// Top of Range: region is `[pmpaddr[i-1], pmpaddr[i])`.
    Tor = 1,
    /// Naturally aligned 4-byte region.
    Na4 = 2,
    /// Naturally aligned power-of-two region.
    Napot = 3,
}

impl PmpAddrMatch {
    /// Decodes the 2-bit A field.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & A_MASK {
            0 => Self::Off,
            1 => Self::Tor,
            2 => Self::Na4,
            _ => Self::Napot,
        }
    }
}

/// One PMP region: its configuration byte and address register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PmpEntry {
    /// Configuration byte (`L`, `A`, `X`, `W`, `R`).
    pub cfg: u8,
    /// Address register (byte address >> 2).
    pub addr: u32,
}

impl PmpEntry {
    /// Returns the address-matching mode.
    pub const fn match_mode(&self) -> PmpAddrMatch {
        PmpAddrMatch::from_bits(self.cfg >> A_SHIFT)
    }

    /// Returns true if the L (lock) bit is set.
    pub const fn is_locked(&self) -> bool {
        self.cfg & PMP_L != 0
    }

    /// Returns true if the entry's permission bits grant the access.
    pub const fn permits(&self, access: AccessType) -> bool {
        (!access.reads() || self.cfg & PMP_R != 0)
            && (!access.writes() || self.cfg & PMP_W != 0)
            && (!access.executes() || self.cfg & PMP_X != 0)
    }
}

/// Byte range `[lo, hi)` of a NAPOT entry.
///
/// The number of trailing ones in `pmpaddr` selects a region of `2^(ones + 3)` bytes.
fn napot_range(pmpaddr: u32) -> (u64, u64) {
    let trailing = u64::from(pmpaddr.trailing_ones());
    let size = 1u64 << (trailing + 3);
    let base = (u64::from(pmpaddr) << 2) & !(size - 1);
    (base, base + size)
}

/// Half-open byte range `[addr, addr + size)` of an access.
fn access_bounds(addr: u32, size: u32) -> (u64, u64) {
    let lo = u64::from(addr);
    (lo, lo + u64::from(size.max(1)))
}

/// PMP region table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pmp {
    entries: [PmpEntry; PMP_MAX_REGIONS],
    regions: usize,
}

impl Pmp {
    /// Creates a table with `regions` implemented entries, all disabled.
    pub fn new(regions: usize) -> Self {
        Self {
            entries: [PmpEntry::default(); PMP_MAX_REGIONS],
            regions: regions.min(PMP_MAX_REGIONS),
        }
    }

    /// Number of implemented regions.
    pub const fn regions(&self) -> usize {
        self.regions
    }

    /// Returns the implemented entries.
    pub fn entries(&self) -> &[PmpEntry] {
        &self.entries[..self.regions]
    }

    /// Returns `true` if the address register `idx` is write-protected.
    ///
    /// An address register is locked by its own `L` bit, and also by the next
    /// entry's `L` bit when that entry uses it as the bottom of a TOR range.
    fn addr_locked(&self, idx: usize) -> bool {
        if self.entries[idx].is_locked() {
            return true;
        }
        self.entries
            .get(idx + 1)
            .filter(|_| idx + 1 < self.regions)
            .is_some_and(|next| next.is_locked() && next.match_mode() == PmpAddrMatch::Tor)
    }

    /// Reads `pmpcfg<group>` (four packed cfg bytes).
    pub fn read_cfg_group(&self, group: usize) -> u32 {
        (0..4).fold(0, |acc, byte| {
            let idx = group * 4 + byte;
            let cfg = if idx < self.regions { self.entries[idx].cfg } else { 0 };
            acc | (u32::from(cfg) << (byte * 8))
        })
    }

    /// Writes `pmpcfg<group>`; locked and unimplemented entries ignore their byte.
    pub fn write_cfg_group(&mut self, group: usize, val: u32) {
        for byte in 0..4 {
            let idx = group * 4 + byte;
            if idx >= self.regions || self.entries[idx].is_locked() {
                continue;
            }
            let mut cfg = (val >> (byte * 8)) as u8 & CFG_WRITE_MASK;
            // W without R is reserved.
            if cfg & PMP_R == 0 {
                cfg &= !PMP_W;
            }
            self.entries[idx].cfg = cfg;
        }
    }

    /// Reads `pmpaddr<idx>`.
    pub fn read_addr(&self, idx: usize) -> u32 {
        if idx < self.regions { self.entries[idx].addr } else { 0 }
    }

    /// Writes `pmpaddr<idx>` unless it is locked or unimplemented.
    pub fn write_addr(&mut self, idx: usize, val: u32) {
        if idx < self.regions && !self.addr_locked(idx) {
            self.entries[idx].addr = val;
        }
    }

    /// Byte range covered by entry `idx`, or `None` if it is off.
    fn range(&self, idx: usize) -> Option<(u64, u64)> {
        let entry = &self.entries[idx];
        match entry.match_mode() {
            PmpAddrMatch::Off => None,
            PmpAddrMatch::Tor => {
                let lo = if idx == 0 { 0 } else { u64::from(self.entries[idx - 1].addr) << 2 };
                Some((lo, u64::from(entry.addr) << 2))
            }
            PmpAddrMatch::Na4 => {
                let base = u64::from(entry.addr) << 2;
                Some((base, base + 4))
            }
            PmpAddrMatch::Napot => Some(napot_range(entry.addr)),
        }
    }

    /// Returns the index of the lowest-numbered region overlapping any byte of the access.
    pub fn matching_region(&self, addr: u32, size: u32) -> Option<usize> {
        let (lo, hi) = access_bounds(addr, size);
        (0..self.regions).find(|&idx| {
            self.range(idx)
                .is_some_and(|(start, end)| lo < end && hi > start)
        })
    }

    /// Returns `true` if region `idx` contains every byte of the access.
    fn covers(&self, idx: usize, addr: u32, size: u32) -> bool {
        let (lo, hi) = access_bounds(addr, size);
        self.range(idx)
            .is_some_and(|(start, end)| lo >= start && hi <= end)
    }

    /// Checks whether an access is permitted.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address of the access.
    /// * `size` - Access size in bytes.
    /// * `access` - Kind of access (fetch, read, write, atomic).
    /// * `mode` - Effective privilege of the access.
    ///
    /// # Returns
    ///
    /// `true` if the access may proceed, `false` for an access fault.
    pub fn check(&self, addr: u32, size: u32, access: AccessType, mode: PrivilegeMode) -> bool {
        if self.regions == 0 {
            return true;
        }
        match (self.matching_region(addr, size), mode) {
            // A partial match fails regardless of privilege or lock.
            (Some(idx), _) if !self.covers(idx, addr, size) => false,
            (Some(idx), PrivilegeMode::Machine) => {
                let entry = &self.entries[idx];
                !entry.is_locked() || entry.permits(access)
            }
            (Some(idx), PrivilegeMode::User) => self.entries[idx].permits(access),
            (None, PrivilegeMode::Machine) => true,
            (None, PrivilegeMode::User) => false,
        }
    }
}
