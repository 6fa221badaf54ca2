//! CSR File Tests.
//!
//! Covers access legality per privilege/debug state, WARL legalization and the
//! externally sourced `mip`/`time` reads.

use k10_core::core::arch::csr::{self, CsrView, Csrs};
use k10_core::core::arch::mode::PrivilegeMode;
use pretty_assertions::assert_eq;
use rstest::rstest;

const BOOT: u32 = 0x8000_0000;

fn csrs() -> Csrs {
    Csrs::new(BOOT, 7, 16)
}

#[test]
fn reset_values() {
    let c = csrs();
    let view = CsrView::default();
    assert_eq!(c.mode, PrivilegeMode::Machine);
    assert!(!c.debug_mode);
    assert_eq!(c.read(csr::MHARTID, &view), 7);
    assert_eq!(c.read(csr::MTVEC, &view), BOOT);
    assert_eq!(c.read(csr::MISA, &view), csr::MISA_VALUE);
    assert_eq!(c.read(csr::MVENDORID, &view), 0);
    assert_eq!(c.read(csr::DCSR, &view) >> 28, 4);
}

#[rstest]
#[case::mstatus_rw(csr::MSTATUS, true, true)]
#[case::mvendorid_read(csr::MVENDORID, false, true)]
#[case::mvendorid_write(csr::MVENDORID, true, false)]
#[case::cycle_write(csr::CYCLE, true, false)]
#[case::mcycle_write(csr::MCYCLE, true, true)]
#[case::pmpaddr(csr::PMPADDR0 + 3, true, true)]
#[case::dcsr_outside_debug(csr::DCSR, false, false)]
#[case::dpc_outside_debug(csr::DPC, false, false)]
#[case::sstatus_unimplemented(0x100, false, false)]
#[case::unknown(0x7C0, false, false)]
fn machine_mode_legality(#[case] addr: u32, #[case] write: bool, #[case] allowed: bool) {
    assert_eq!(csrs().access_allowed(addr, write), allowed);
}

#[test]
fn debug_csrs_are_accessible_in_debug_mode() {
    let mut c = csrs();
    c.debug_mode = true;
    assert!(c.access_allowed(csr::DCSR, true));
    assert!(c.access_allowed(csr::DSCRATCH1, true));
}

#[rstest]
#[case::mstatus(csr::MSTATUS)]
#[case::mscratch(csr::MSCRATCH)]
#[case::mcycle(csr::MCYCLE)]
fn user_mode_cannot_touch_machine_csrs(#[case] addr: u32) {
    let mut c = csrs();
    c.mode = PrivilegeMode::User;
    assert!(!c.access_allowed(addr, false));
}

#[test]
fn user_counters_follow_mcounteren() {
    let mut c = csrs();
    c.mode = PrivilegeMode::User;
    assert!(!c.access_allowed(csr::CYCLE, false));
    assert!(!c.access_allowed(csr::TIME, false));
    assert!(!c.access_allowed(csr::INSTRETH, false));

    c.mcounteren = csr::MCOUNTEREN_CY | csr::MCOUNTEREN_IR;
    assert!(c.access_allowed(csr::CYCLE, false));
    assert!(c.access_allowed(csr::CYCLEH, false));
    assert!(!c.access_allowed(csr::TIME, false));
    assert!(c.access_allowed(csr::INSTRETH, false));
}

#[test]
fn mstatus_keeps_only_implemented_fields() {
    let mut c = csrs();
    c.write(csr::MSTATUS, 0xFFFF_FFFF);
    assert_eq!(c.mstatus, csr::MSTATUS_WRITE_MASK);
    assert_eq!(c.mpp(), PrivilegeMode::Machine);

    // MPP = supervisor is not implemented and legalizes to user.
    c.write(csr::MSTATUS, 0b01 << csr::MSTATUS_MPP_SHIFT);
    assert_eq!(c.mpp(), PrivilegeMode::User);
}

#[rstest]
#[case::direct(0x8000_0100, 0x8000_0100)]
#[case::vectored(0x8000_0101, 0x8000_0101)]
#[case::reserved_mode(0x8000_0102, 0x8000_0100)]
#[case::reserved_mode_3(0x8000_0103, 0x8000_0100)]
fn mtvec_mode_is_warl(#[case] written: u32, #[case] read_back: u32) {
    let mut c = csrs();
    c.write(csr::MTVEC, written);
    assert_eq!(c.mtvec, read_back);
}

#[test]
fn epc_registers_clear_bit_zero() {
    let mut c = csrs();
    c.write(csr::MEPC, 0x8000_0003);
    c.write(csr::DPC, 0x8000_0005);
    assert_eq!(c.mepc, 0x8000_0002);
    assert_eq!(c.dpc, 0x8000_0004);
}

#[test]
fn read_only_fields_ignore_writes() {
    let mut c = csrs();
    let view = CsrView::default();
    c.write(csr::MISA, 0);
    c.write(csr::MHARTID, 0);
    c.write(csr::MIP, 0xFFFF_FFFF);
    assert_eq!(c.read(csr::MISA, &view), csr::MISA_VALUE);
    assert_eq!(c.read(csr::MHARTID, &view), 7);
    assert_eq!(c.read(csr::MIP, &view), 0);
}

#[test]
fn mie_masks_unimplemented_bits() {
    let mut c = csrs();
    c.write(csr::MIE, 0xFFFF_FFFF);
    assert_eq!(c.mie, csr::MIE_WRITE_MASK);
    assert_eq!(c.mie & (1 << 31), 0);
    assert_eq!(c.mie & (1 << 5), 0);
}

#[test]
fn dcsr_writes_only_touch_control_bits() {
    let mut c = csrs();
    let before = c.dcsr;
    c.write(csr::DCSR, 0xFFFF_FFFF);
    assert_eq!(c.dcsr >> 28, 4, "xdebugver is read-only");
    assert_eq!(c.dcsr & csr::DCSR_CAUSE_MASK, before & csr::DCSR_CAUSE_MASK);
    assert_ne!(c.dcsr & csr::DCSR_STEP, 0);
    assert_ne!(c.dcsr & csr::DCSR_EBREAKM, 0);
}

#[test]
fn counters_are_split_into_halves() {
    let mut c = csrs();
    let view = CsrView::default();
    c.mcycle = 0x1_2345_6789;
    c.minstret = 0xAB_0000_0001;
    assert_eq!(c.read(csr::MCYCLE, &view), 0x2345_6789);
    assert_eq!(c.read(csr::MCYCLEH, &view), 1);
    assert_eq!(c.read(csr::CYCLEH, &view), 1);
    assert_eq!(c.read(csr::INSTRETH, &view), 0xAB);

    c.write(csr::MCYCLEH, 0xFF);
    assert_eq!(c.mcycle, 0xFF_2345_6789);
    c.write(csr::MINSTRET, 7);
    assert_eq!(c.minstret, 0xAB_0000_0007);
}

#[test]
fn mip_and_time_come_from_the_view() {
    let c = csrs();
    let view = CsrView {
        mip: csr::MIP_MTIP | (1 << 31),
        time: 0x5_0000_0009,
    };
    assert_eq!(c.read(csr::MIP, &view), csr::MIP_MTIP);
    assert_eq!(c.read(csr::TIME, &view), 9);
    assert_eq!(c.read(csr::TIMEH, &view), 5);
}

#[test]
fn mprv_selects_mpp_for_data_accesses() {
    let mut c = csrs();
    assert_eq!(c.data_privilege(), PrivilegeMode::Machine);
    c.write(csr::MSTATUS, csr::MSTATUS_MPRV);
    assert_eq!(c.data_privilege(), PrivilegeMode::User);
    c.mode = PrivilegeMode::User;
    assert_eq!(c.data_privilege(), PrivilegeMode::User);
}
