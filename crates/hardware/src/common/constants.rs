//! Global Core Constants.
//!
//! This module defines core-wide constants used across the pipeline. It includes:
//! 1. **Instruction Constants:** Instruction sizes and the compact-width test.
//! 2. **Register Constants:** Register file geometry.
//! 3. **Platform Constants:** PMP table bound and the number of fast interrupt lines.

/// Size of a compact (16-bit) instruction in bytes.
pub const INSTRUCTION_SIZE_16: u32 = 2;

/// Size of a standard (32-bit) instruction in bytes.
pub const INSTRUCTION_SIZE_32: u32 = 4;

/// Low two bits of a half-word that mark a standard-width instruction.
///
/// Any other value in bits `[1:0]` marks a compact instruction.
pub const STANDARD_INSTRUCTION_LOW_BITS: u16 = 0b11;

/// Bit mask for extracting the opcode field from an instruction.
pub const OPCODE_MASK: u32 = 0x7F;

/// Canonical no-op encoding (`addi x0, x0, 0`).
pub const NOP_ENCODING: u32 = 0x0000_0013;

/// Number of architectural integer registers.
pub const NUM_REGS: usize = 32;

/// Maximum number of PMP regions the CSR map can address.
pub const PMP_MAX_REGIONS: usize = 16;

/// Number of implementation-defined fast interrupt lines.
pub const NUM_FAST_IRQS: usize = 15;

/// Bytes per data/instruction bus word.
pub const BUS_WORD_BYTES: u32 = 4;

/// Mask selecting the word-aligned part of an address.
pub const WORD_ADDR_MASK: u32 = !(BUS_WORD_BYTES - 1);

/// Returns `true` if the half-word starts a compact instruction.
#[inline]
pub const fn is_compact(low_half: u16) -> bool {
    low_half & STANDARD_INSTRUCTION_LOW_BITS != STANDARD_INSTRUCTION_LOW_BITS
}
