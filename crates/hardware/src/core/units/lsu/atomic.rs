//! Atomic memory operation ALU.
//!
//! Implements the read-modify-write arithmetic for RISC-V A-extension
//! atomic memory operations (AMO). Given the current memory value and
//! the register source value, computes the new value to be written back.

use crate::core::pipeline::signals::AtomicOp;

/// Performs the combine step of an AMO.
///
/// # Arguments
///
/// * `op`      - The atomic operation type
/// * `mem_val` - The value just read from memory
/// * `reg_val` - The value from the source register (`rs2`)
///
/// # Returns
///
/// The value written back to memory. LR, SC and `None` return `reg_val`.
///
/// # Examples
///
/// ```
/// use k10_core::core::units::lsu::atomic::amo_alu;
/// use k10_core::core::pipeline::signals::AtomicOp;
///
/// assert_eq!(amo_alu(AtomicOp::Add, 5, 7), 12);
/// assert_eq!(amo_alu(AtomicOp::Min, -3_i32 as u32, 2), -3_i32 as u32);
/// assert_eq!(amo_alu(AtomicOp::Minu, -3_i32 as u32, 2), 2);
/// ```
pub fn amo_alu(op: AtomicOp, mem_val: u32, reg_val: u32) -> u32 {
    let a = mem_val as i32;
    let b = reg_val as i32;
    match op {
        AtomicOp::Add => mem_val.wrapping_add(reg_val),
        AtomicOp::Xor => mem_val ^ reg_val,
        AtomicOp::And => mem_val & reg_val,
        AtomicOp::Or => mem_val | reg_val,
        AtomicOp::Min => a.min(b) as u32,
        AtomicOp::Max => a.max(b) as u32,
        AtomicOp::Minu => mem_val.min(reg_val),
        AtomicOp::Maxu => mem_val.max(reg_val),
        AtomicOp::Swap | AtomicOp::Lr | AtomicOp::Sc | AtomicOp::None => reg_val,
    }
}
