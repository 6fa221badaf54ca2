//! ALU logical, comparison and pass-through operations.

use crate::core::pipeline::signals::AluOp;

/// Executes a logical, set-less-than or pass-through operation.
///
/// Comparisons return 1 or 0. Returns `0` for opcodes outside this group.
pub fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    match op {
        AluOp::Or => a | b,
        AluOp::And => a & b,
        AluOp::Xor => a ^ b,
        AluOp::Slt => u32::from((a as i32) < (b as i32)),
        AluOp::Sltu => u32::from(a < b),
        AluOp::PassA => a,
        AluOp::PassB => b,
        _ => 0,
    }
}
