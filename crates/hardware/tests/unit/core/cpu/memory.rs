//! Memory Instruction Tests.

use k10_core::core::arch::csr;
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::{asm, li, FENCE_I, HALT};
use crate::common::harness::{test_config, TestContext, BOOT};

const DATA: u32 = BOOT + 0x400;
const HANDLER: u32 = BOOT + 0x200;

/// Prepends `li x10, DATA`.
fn with_data_base(body: &[u32]) -> Vec<u32> {
    [li(10, DATA).as_slice(), body].concat()
}

/// Installs a trap handler that records `mcause`/`mtval` in x28/x29 and halts.
fn with_recording_handler(ctx: TestContext) -> TestContext {
    ctx.load_at(
        HANDLER,
        &[
            asm().csrr(28, csr::MCAUSE).build(),
            asm().csrr(29, csr::MTVAL).build(),
            HALT,
        ],
    )
}

/// `li x11, HANDLER; csrw mtvec, x11` followed by `body`.
fn with_handler_installed(body: &[u32]) -> Vec<u32> {
    [
        li(11, HANDLER).as_slice(),
        &[asm().csrrw(0, csr::MTVEC, 11).build()],
        &with_data_base(body),
    ]
    .concat()
}

#[test]
fn sub_word_loads_extend_correctly() {
    let program = with_data_base(&[
        asm().lb(1, 10, 3).build(),
        asm().lbu(2, 10, 3).build(),
        asm().lh(3, 10, 2).build(),
        asm().lhu(4, 10, 2).build(),
        HALT,
    ]);
    let mut ctx = TestContext::new()
        .load_program(&program)
        .load_at(DATA, &[0x8081_7F01]);
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(1), 0xFFFF_FF80);
    assert_eq!(ctx.get_reg(2), 0x80);
    assert_eq!(ctx.get_reg(3), 0xFFFF_8081);
    assert_eq!(ctx.get_reg(4), 0x8081);
}

#[test]
fn misaligned_loads_within_and_across_words() {
    let program = with_data_base(&[
        asm().lw(1, 10, 1).build(),
        asm().lh(2, 10, 3).build(),
        asm().lb(3, 10, 7).build(),
        asm().lhu(4, 10, 1).build(),
        HALT,
    ]);
    let mut ctx = TestContext::new()
        .load_program(&program)
        .load_at(DATA, &[0x4433_2211, 0x8877_6655]);
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(1), 0x5544_3322);
    assert_eq!(ctx.get_reg(2), 0x5544);
    assert_eq!(ctx.get_reg(3), 0xFFFF_FF88);
    assert_eq!(ctx.get_reg(4), 0x3322);
}

#[test]
fn misaligned_store_spans_two_words() {
    let program = [
        li(1, 0xDDCC_BBAA).as_slice(),
        &with_data_base(&[
            asm().sw(1, 10, 6).build(),
            asm().sh(1, 10, 11).build(),
            asm().lw(2, 10, 6).build(),
            HALT,
        ]),
    ]
    .concat();
    let mut ctx = TestContext::new()
        .load_program(&program)
        .load_at(DATA, &[0x4433_2211, 0x8877_6655, 0, 0]);
    ctx.run_to_halt();
    assert_eq!(ctx.read_u32(DATA + 4), 0xBBAA_6655);
    assert_eq!(ctx.read_u32(DATA + 8), 0xAA00_DDCC);
    assert_eq!(ctx.read_u32(DATA + 12), 0x0000_00BB);
    assert_eq!(ctx.get_reg(2), 0xDDCC_BBAA);
}

#[test]
fn byte_and_half_stores_merge() {
    let program = with_data_base(&[
        asm().addi(1, 0, 0x5A).build(),
        asm().sb(1, 10, 1).build(),
        asm().sh(1, 10, 2).build(),
        asm().lw(2, 10, 0).build(),
        HALT,
    ]);
    let mut ctx = TestContext::new()
        .load_program(&program)
        .load_at(DATA, &[0xFFFF_FFFF]);
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(2), 0x005A_5AFF);
}

#[test]
fn amo_returns_old_value_and_updates_memory() {
    let program = with_data_base(&[
        asm().addi(2, 0, 3).build(),
        asm().amoadd_w(1, 10, 2).build(),
        asm().addi(3, 0, -9).build(),
        asm().amomax_w(4, 10, 3).build(),
        asm().amominu_w(5, 10, 3).build(),
        asm().amoswap_w(6, 10, 0).build(),
        HALT,
    ]);
    let mut ctx = TestContext::new().load_program(&program).load_at(DATA, &[5]);
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(1), 5);
    // max(8, -9) = 8, minu(8, 0xFFFF_FFF7) = 8.
    assert_eq!(ctx.get_reg(4), 8);
    assert_eq!(ctx.get_reg(5), 8);
    assert_eq!(ctx.get_reg(6), 8);
    assert_eq!(ctx.read_u32(DATA), 0);
}

#[test]
fn load_reserved_store_conditional() {
    let program = with_data_base(&[
        asm().addi(2, 0, 42).build(),
        asm().lr_w(1, 10).build(),
        asm().sc_w(3, 10, 2).build(),
        // Reservation consumed: this one fails.
        asm().sc_w(4, 10, 1).build(),
        HALT,
    ]);
    let mut ctx = TestContext::new().load_program(&program).load_at(DATA, &[7]);
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(1), 7);
    assert_eq!(ctx.get_reg(3), 0);
    assert_eq!(ctx.get_reg(4), 1);
    assert_eq!(ctx.read_u32(DATA), 42);
}

#[test]
fn store_between_lr_and_sc_breaks_the_reservation() {
    let program = with_data_base(&[
        asm().lr_w(1, 10).build(),
        asm().sb(0, 10, 2).build(),
        asm().sc_w(3, 10, 10).build(),
        HALT,
    ]);
    let mut ctx = TestContext::new()
        .load_program(&program)
        .load_at(DATA, &[0x00FF_0000]);
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(3), 1);
    assert_eq!(ctx.read_u32(DATA), 0);
}

#[test]
fn misaligned_atomic_traps_without_touching_memory() {
    let program = with_handler_installed(&[
        asm().addi(10, 10, 2).build(),
        asm().amoadd_w(1, 10, 10).build(),
        HALT,
    ]);
    let mut ctx = with_recording_handler(
        TestContext::new()
            .load_program(&program)
            .load_at(DATA, &[0x1111_1111, 0x2222_2222]),
    );
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(28), 6);
    assert_eq!(ctx.get_reg(29), DATA + 2);
    assert_eq!(ctx.get_reg(1), 0);
    assert_eq!(ctx.read_u32(DATA), 0x1111_1111);
    assert_eq!(ctx.read_u32(DATA + 4), 0x2222_2222);
}

#[test]
fn misaligned_load_reserved_is_a_load_fault() {
    let program = with_handler_installed(&[
        asm().addi(10, 10, 1).build(),
        asm().lr_w(1, 10).build(),
        HALT,
    ]);
    let mut ctx = with_recording_handler(TestContext::new().load_program(&program));
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(28), 4);
    assert_eq!(ctx.get_reg(29), DATA + 1);
}

#[test]
fn bus_error_raises_access_fault() {
    let mut config = test_config();
    config.memory.error_ranges = vec![[DATA + 0x100, DATA + 0x200]];
    let program = with_handler_installed(&[asm().lw(1, 10, 0x104).build(), HALT]);
    let mut ctx = with_recording_handler(TestContext::with_config(config).load_program(&program));
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(28), 5);
    assert_eq!(ctx.get_reg(29), DATA + 0x104);
    assert_eq!(ctx.csr(csr::MEPC), BOOT + 20);
}

#[test]
fn store_bus_error_raises_store_fault() {
    let mut config = test_config();
    config.memory.error_ranges = vec![[DATA + 0x100, DATA + 0x200]];
    let program = with_handler_installed(&[asm().sw(0, 10, 0x1FE).build(), HALT]);
    let mut ctx = with_recording_handler(TestContext::with_config(config).load_program(&program));
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(28), 7);
    assert_eq!(ctx.get_reg(29), DATA + 0x1FE);
}

#[test]
fn unmapped_access_raises_access_fault() {
    let program = with_handler_installed(&[
        asm().lui(12, 0x1_0000).build(),
        asm().lw(1, 12, 0).build(),
        HALT,
    ]);
    let mut ctx = with_recording_handler(TestContext::new().load_program(&program));
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(28), 5);
    assert_eq!(ctx.get_reg(29), 0x1000_0000);
}

#[test]
fn fence_i_makes_stores_visible_to_fetch() {
    let patched = asm().addi(5, 0, 42).build();
    let target = BOOT + 24;
    let program = [
        li(10, target).as_slice(),
        &li(11, patched),
        &[asm().sw(11, 10, 0).build(), FENCE_I, asm().addi(5, 0, 1).build(), HALT],
    ]
    .concat();
    let mut ctx = TestContext::new().load_program(&program);
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(5), 42);
}
