//! ALU arithmetic operations.
//!
//! Addition and subtraction wrap modulo 2^32. Multiplication and division live in
//! the separate multiply/divide unit ([`crate::core::units::mdu`]).

use crate::core::pipeline::signals::AluOp;

/// Executes an add or subtract.
pub fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        _ => 0,
    }
}
