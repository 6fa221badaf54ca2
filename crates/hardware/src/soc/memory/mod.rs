//! Flat simulated memory.
//!
//! A little-endian byte store mapped at a base address. It provides:
//! 1. **Bus target:** Word reads and strobed word writes for [`BusTarget`] ports.
//! 2. **Fault injection:** Configured address ranges that answer every access with an error.
//! 3. **Host access:** Image loading and byte/word inspection for the simulator and tests.

use crate::config::MemoryConfig;
use crate::soc::traits::{BusError, BusTarget};

/// Simulated system memory.
#[derive(Clone, Debug)]
pub struct Memory {
    /// First mapped byte address.
    base: u32,
    /// Backing bytes.
    data: Vec<u8>,
    /// Half-open ranges that fault on access.
    error_ranges: Vec<[u32; 2]>,
}

impl Memory {
    /// Creates a zero-filled memory.
    ///
    /// # Arguments
    ///
    /// * `base` - First mapped byte address.
    /// * `size` - Size in bytes.
    pub fn new(base: u32, size: usize) -> Self {
        Self {
            base,
            data: vec![0; size],
            error_ranges: Vec::new(),
        }
    }

    /// Creates a memory from the `memory` configuration section.
    pub fn from_config(config: &MemoryConfig) -> Self {
        let mut mem = Self::new(config.base, config.size);
        mem.error_ranges.clone_from(&config.error_ranges);
        mem
    }

    /// Adds a half-open `[start, end)` range that faults on access.
    pub fn add_error_range(&mut self, start: u32, end: u32) {
        self.error_ranges.push([start, end]);
    }

    /// Returns the first mapped address.
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Returns the memory size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Translates an address range to a byte offset, if fully mapped.
    fn offset(&self, addr: u32, len: usize) -> Option<usize> {
        let off = addr.checked_sub(self.base)? as usize;
        (off.checked_add(len)? <= self.data.len()).then_some(off)
    }

    fn check(&self, addr: u32) -> Result<usize, BusError> {
        if self
            .error_ranges
            .iter()
            .any(|&[start, end]| (start..end).contains(&addr))
        {
            return Err(BusError::Faulted(addr));
        }
        self.offset(addr, 4).ok_or(BusError::Unmapped(addr))
    }

    /// Copies `bytes` into memory starting at `addr`.
    ///
    /// # Returns
    ///
    /// `Err` with the first unmapped address if the image does not fit.
    pub fn load(&mut self, addr: u32, bytes: &[u8]) -> Result<(), BusError> {
        let off = self
            .offset(addr, bytes.len())
            .ok_or(BusError::Unmapped(addr))?;
        self.data[off..off + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Reads one byte, or `None` if unmapped.
    pub fn read_u8(&self, addr: u32) -> Option<u8> {
        self.offset(addr, 1).map(|off| self.data[off])
    }

    /// Reads a little-endian word at any byte address, or `None` if unmapped.
    pub fn read_u32(&self, addr: u32) -> Option<u32> {
        let off = self.offset(addr, 4)?;
        let mut bytes = [0; 4];
        bytes.copy_from_slice(&self.data[off..off + 4]);
        Some(u32::from_le_bytes(bytes))
    }

    /// Writes a little-endian word at any byte address.
    pub fn write_u32(&mut self, addr: u32, val: u32) -> Result<(), BusError> {
        self.load(addr, &val.to_le_bytes())
    }
}

impl BusTarget for Memory {
    fn read_word(&mut self, addr: u32) -> Result<u32, BusError> {
        let off = self.check(addr & !3)?;
        let mut bytes = [0; 4];
        bytes.copy_from_slice(&self.data[off..off + 4]);
        Ok(u32::from_le_bytes(bytes))
    }

    fn write_word(&mut self, addr: u32, data: u32, strobe: u8) -> Result<(), BusError> {
        let off = self.check(addr & !3)?;
        for (lane, byte) in data.to_le_bytes().into_iter().enumerate() {
            if strobe & (1 << lane) != 0 {
                self.data[off + lane] = byte;
            }
        }
        Ok(())
    }
}
