//! Core Reset Tests.

use k10_core::core::arch::csr;
use k10_core::core::arch::mode::PrivilegeMode;
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::{asm, HALT};
use crate::common::harness::{test_config, TestContext, BOOT};

#[test]
fn reset_state() {
    let ctx = TestContext::new();
    let cpu = ctx.cpu();
    assert_eq!(cpu.fetch_pc(), BOOT);
    assert_eq!(cpu.csrs().mode, PrivilegeMode::Machine);
    assert!(!cpu.in_debug_mode());
    assert_eq!(cpu.last_retired(), None);
    assert_eq!(ctx.csr(csr::MTVEC), BOOT);
    assert_eq!(ctx.csr(csr::MSTATUS), 0);
}

#[test]
fn reset_mid_program_restarts_at_boot() {
    let mut ctx = TestContext::new().load_program(&[
        asm().addi(1, 1, 1).build(),
        asm().csrrwi(0, csr::MSCRATCH, 7).build(),
        HALT,
    ]);
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(1), 1);

    ctx.sim.reset();
    assert_eq!(ctx.get_reg(1), 0);
    assert_eq!(ctx.csr(csr::MSCRATCH), 0);
    assert_eq!(ctx.cpu().cycles(), 0);

    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(1), 1);
}

#[test]
fn reset_input_holds_the_core() {
    let mut ctx = TestContext::new().load_program(&[asm().addi(1, 0, 3).build(), HALT]);
    ctx.sim.inputs.reset = true;
    ctx.run(20);
    assert_eq!(ctx.cpu().last_retired(), None);
    assert_eq!(ctx.cpu().fetch_pc(), BOOT);

    ctx.sim.inputs.reset = false;
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(1), 3);
}

#[test]
fn boot_address_comes_from_config() {
    let mut config = test_config();
    config.core.boot_addr = BOOT + 0x100;
    let mut ctx = TestContext::with_config(config)
        .load_at(BOOT + 0x100, &[asm().auipc(1, 0).build(), HALT]);
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(1), BOOT + 0x100);
    assert_eq!(ctx.csr(csr::MTVEC), BOOT + 0x100);
}
