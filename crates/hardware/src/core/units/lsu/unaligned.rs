//! Unaligned memory access handling.
//!
//! The data bus only carries word-aligned transactions. This module plans how an access
//! of any width at any byte address maps onto one or two of them:
//! 1. **Crossing:** whether the access straddles a word boundary.
//! 2. **Lanes:** byte-enable strobes and shifted write data for each half.
//! 3. **Assembly:** recombining the read data and applying sign/zero extension.

use crate::core::pipeline::signals::MemWidth;

/// Returns `true` if the access spans two bus words.
///
/// A byte never crosses, a half-word crosses only at offset 3 and a word crosses at
/// every non-zero offset.
///
/// # Examples
///
/// ```
/// use k10_core::core::units::lsu::unaligned::crosses_word;
/// use k10_core::core::pipeline::signals::MemWidth;
///
/// assert!(!crosses_word(0x103, MemWidth::Byte));
/// assert!(!crosses_word(0x101, MemWidth::Half));
/// assert!(crosses_word(0x103, MemWidth::Half));
/// assert!(crosses_word(0x102, MemWidth::Word));
/// ```
pub const fn crosses_word(addr: u32, width: MemWidth) -> bool {
    (addr & 3) + width.bytes() > 4
}

/// Returns `true` if the address is naturally aligned for the width.
pub const fn is_aligned(addr: u32, width: MemWidth) -> bool {
    addr & (width.bytes() - 1) == 0
}

/// Byte-lane mask of the access, unshifted (bit per byte of the value).
const fn value_mask(width: MemWidth) -> u8 {
    match width {
        MemWidth::Byte => 0b0001,
        MemWidth::Half => 0b0011,
        MemWidth::Word => 0b1111,
    }
}

/// One word-aligned bus transaction of a planned access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordAccess {
    /// Word-aligned address.
    pub addr: u32,
    /// Byte-enable strobe.
    pub be: u8,
    /// Write data placed in its lanes.
    pub wdata: u32,
}

/// Plans the first (or only) transaction of an access.
pub const fn low_access(addr: u32, width: MemWidth, data: u32) -> WordAccess {
    let off = addr & 3;
    WordAccess {
        addr: addr & !3,
        be: ((value_mask(width) as u32) << off) as u8 & 0xF,
        wdata: data << (8 * off),
    }
}

/// Plans the second transaction of a word-crossing access.
///
/// Only meaningful when [`crosses_word`] holds, so the offset is never zero.
pub const fn high_access(addr: u32, width: MemWidth, data: u32) -> WordAccess {
    let off = addr & 3;
    WordAccess {
        addr: (addr & !3).wrapping_add(4),
        be: (((value_mask(width) as u32) << off) >> 4) as u8,
        wdata: data >> ((32 - 8 * off) & 31),
    }
}

/// Extracts the loaded value from one or two read words.
///
/// # Arguments
///
/// * `addr`   - Byte address of the access.
/// * `width`  - Access width.
/// * `signed` - Sign-extend the result.
/// * `low`    - Data of the first word.
/// * `high`   - Data of the second word (ignored unless the access crosses).
///
/// # Examples
///
/// ```
/// use k10_core::core::units::lsu::unaligned::assemble_load;
/// use k10_core::core::pipeline::signals::MemWidth;
///
/// // lw from offset 2: upper half of the low word, lower half of the high word.
/// assert_eq!(assemble_load(0x102, MemWidth::Word, false, 0xBBBB_AAAA, 0xDDDD_CCCC), 0xCCCC_BBBB);
/// // lh from offset 3, sign extended.
/// assert_eq!(assemble_load(0x103, MemWidth::Half, true, 0x8000_0000, 0x0000_0080), 0xFFFF_8080);
/// ```
pub const fn assemble_load(addr: u32, width: MemWidth, signed: bool, low: u32, high: u32) -> u32 {
    let joined = ((high as u64) << 32) | low as u64;
    let raw = (joined >> (8 * (addr & 3))) as u32;
    extend(raw, width, signed)
}

/// Masks a raw value to the access width and applies sign or zero extension.
pub const fn extend(raw: u32, width: MemWidth, signed: bool) -> u32 {
    match (width, signed) {
        (MemWidth::Byte, true) => raw as u8 as i8 as i32 as u32,
        (MemWidth::Byte, false) => raw & 0xFF,
        (MemWidth::Half, true) => raw as u16 as i16 as i32 as u32,
        (MemWidth::Half, false) => raw & 0xFFFF,
        (MemWidth::Word, _) => raw,
    }
}
