//! Compact Instruction Expansion Tests.
//!
//! Each case pairs a 16-bit encoding with the 32-bit instruction it must expand to.

use k10_core::isa::rvc::expand;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::instruction::{EBREAK, HALT, NOP, asm};

#[rstest]
#[case::c_nop(0x0001, NOP)]
#[case::c_li(0x4515, asm().addi(10, 0, 5).build())]
#[case::c_addi_negative(0x157D, asm().addi(10, 10, -1).build())]
#[case::c_mv(0x852E, asm().add(10, 0, 11).build())]
#[case::c_add(0x952E, asm().add(10, 10, 11).build())]
#[case::c_jr(0x8082, asm().jalr(0, 1, 0).build())]
#[case::c_ebreak(0x9002, EBREAK)]
#[case::c_lw(0x4080, asm().lw(8, 9, 0).build())]
#[case::c_sw(0xC0C0, asm().sw(8, 9, 4).build())]
#[case::c_j_self(0xA001, HALT)]
#[case::c_beqz(0xC001, asm().beq(8, 0, 0).build())]
fn expands_to_base_encoding(#[case] half: u16, #[case] expected: u32) {
    assert_eq!(expand(half), Some(expected));
}

#[rstest]
#[case::all_zero(0x0000)]
#[case::addi4spn_zero_imm(0x0004)]
#[case::lui_zero_imm(0x6501)]
#[case::lwsp_rd_zero(0x4002)]
#[case::jr_x0(0x8002)]
#[case::slli_shamt5(0x1506)]
#[case::c_fld(0x2000)]
#[case::c_flwsp(0x6002)]
fn rejects_illegal_encodings(#[case] half: u16) {
    assert_eq!(expand(half), None);
}

#[test]
fn hint_encodings_expand() {
    // c.li x0, 1 writes x0 and is a HINT.
    assert_eq!(expand(0x4005), Some(asm().addi(0, 0, 1).build()));
}
