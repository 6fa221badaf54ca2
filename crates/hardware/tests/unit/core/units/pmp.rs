//! Physical Memory Protection Tests.

use k10_core::common::AccessType;
use k10_core::core::arch::mode::PrivilegeMode;
use k10_core::core::units::pmp::{Pmp, PmpAddrMatch};
use rstest::rstest;

const R: u32 = 0x01;
const W: u32 = 0x02;
const X: u32 = 0x04;
const TOR: u32 = 1 << 3;
const NA4: u32 = 2 << 3;
const NAPOT: u32 = 3 << 3;
const L: u32 = 0x80;

const M: PrivilegeMode = PrivilegeMode::Machine;
const U: PrivilegeMode = PrivilegeMode::User;

/// Byte address and power-of-two size to a NAPOT `pmpaddr` value.
fn napot(base: u32, size: u32) -> u32 {
    (base >> 2) | ((size >> 3) - 1)
}

#[test]
fn without_regions_everything_is_allowed() {
    let pmp = Pmp::new(0);
    assert!(pmp.check(0x1000, 4, AccessType::Write, U));
    assert_eq!(pmp.read_cfg_group(0), 0);
}

#[test]
fn unmatched_access_default() {
    let pmp = Pmp::new(16);
    assert!(pmp.check(0x1000, 4, AccessType::Read, M));
    assert!(!pmp.check(0x1000, 4, AccessType::Read, U));
    assert!(!pmp.check(0x1000, 2, AccessType::Fetch, U));
}

#[test]
fn tor_region_covers_previous_address_to_own() {
    let mut pmp = Pmp::new(16);
    pmp.write_addr(0, 0x1000 >> 2);
    pmp.write_addr(1, 0x2000 >> 2);
    pmp.write_cfg_group(0, (TOR | R | X) << 8);

    assert_eq!(pmp.entries()[1].match_mode(), PmpAddrMatch::Tor);
    assert!(pmp.check(0x1000, 4, AccessType::Read, U));
    assert!(pmp.check(0x1FFC, 4, AccessType::Fetch, U));
    assert!(!pmp.check(0x1FFC, 4, AccessType::Write, U));
    assert!(!pmp.check(0x0FFC, 4, AccessType::Read, U));
    assert!(!pmp.check(0x2000, 4, AccessType::Read, U));
    assert!(!pmp.check(0x1FFE, 4, AccessType::Read, U));
}

#[test]
fn access_straddling_a_region_edge_fails_in_every_mode() {
    let mut pmp = Pmp::new(16);
    pmp.write_addr(0, 0x1004 >> 2);
    pmp.write_cfg_group(0, L | NA4);

    assert_eq!(pmp.matching_region(0x1006, 4), Some(0));
    assert!(!pmp.check(0x1006, 4, AccessType::Write, M));
    assert!(!pmp.check(0x1006, 1, AccessType::Write, M));
    assert!(!pmp.check(0x1002, 4, AccessType::Read, M));
    assert!(pmp.check(0x1000, 4, AccessType::Write, M));
    assert!(pmp.check(0x1008, 4, AccessType::Write, M));
}

#[test]
fn partial_match_of_an_unlocked_region_fails_in_machine_mode() {
    let mut pmp = Pmp::new(16);
    // Entry 0 is an unlocked read-write word; entry 1 covers everything around it.
    pmp.write_addr(0, 0x2000 >> 2);
    pmp.write_addr(1, napot(0, 0x1_0000));
    pmp.write_cfg_group(0, (NA4 | R | W) | ((NAPOT | R | W) << 8));

    assert!(pmp.check(0x2000, 4, AccessType::Write, M));
    assert!(!pmp.check(0x2002, 4, AccessType::Write, M));
    assert!(!pmp.check(0x2002, 4, AccessType::Write, U));
    assert!(pmp.check(0x2004, 4, AccessType::Write, U));
}

#[test]
fn tor_entry_zero_starts_at_address_zero() {
    let mut pmp = Pmp::new(16);
    pmp.write_addr(0, 0x100 >> 2);
    pmp.write_cfg_group(0, TOR | R);
    assert!(pmp.check(0, 4, AccessType::Read, U));
    assert!(!pmp.check(0x100, 4, AccessType::Read, U));
}

#[test]
fn na4_matches_exactly_one_word() {
    let mut pmp = Pmp::new(16);
    pmp.write_addr(2, 0x4000 >> 2);
    pmp.write_cfg_group(0, (NA4 | R | W) << 16);
    assert!(pmp.check(0x4000, 4, AccessType::ReadWrite, U));
    assert!(pmp.check(0x4002, 2, AccessType::Write, U));
    assert!(!pmp.check(0x4004, 4, AccessType::Read, U));
}

#[rstest]
#[case::eight_bytes(0x8000_0000, 8)]
#[case::four_kib(0x8000_1000, 0x1000)]
#[case::one_mib(0x8010_0000, 0x10_0000)]
fn napot_region_bounds(#[case] base: u32, #[case] size: u32) {
    let mut pmp = Pmp::new(4);
    pmp.write_addr(0, napot(base, size));
    pmp.write_cfg_group(0, NAPOT | R);
    assert!(pmp.check(base, 4, AccessType::Read, U));
    assert!(pmp.check(base + size - 4, 4, AccessType::Read, U));
    assert!(!pmp.check(base + size, 4, AccessType::Read, U));
    assert!(!pmp.check(base.wrapping_sub(4), 4, AccessType::Read, U));
}

#[test]
fn lowest_matching_index_decides() {
    let mut pmp = Pmp::new(16);
    // Entry 0 denies everything in a 4 KiB page, entry 1 allows a larger region around it.
    pmp.write_addr(0, napot(0x8000_0000, 0x1000));
    pmp.write_addr(1, napot(0x8000_0000, 0x10_0000));
    pmp.write_cfg_group(0, NAPOT | ((NAPOT | R | W | X) << 8));

    assert_eq!(pmp.matching_region(0x8000_0010, 4), Some(0));
    assert!(!pmp.check(0x8000_0010, 4, AccessType::Read, U));
    assert_eq!(pmp.matching_region(0x8000_2000, 4), Some(1));
    assert!(pmp.check(0x8000_2000, 4, AccessType::Read, U));
}

#[test]
fn machine_mode_is_checked_only_against_locked_entries() {
    let mut pmp = Pmp::new(16);
    pmp.write_addr(0, napot(0x2000, 0x100));
    pmp.write_addr(1, napot(0x3000, 0x100));
    pmp.write_cfg_group(0, (NAPOT | R) | ((L | NAPOT | R) << 8));

    assert!(pmp.check(0x2000, 4, AccessType::Write, M));
    assert!(!pmp.check(0x3000, 4, AccessType::Write, M));
    assert!(pmp.check(0x3000, 4, AccessType::Read, M));
}

#[test]
fn locked_entries_ignore_writes() {
    let mut pmp = Pmp::new(16);
    pmp.write_addr(0, 0x100);
    pmp.write_cfg_group(0, L | NA4 | R);
    pmp.write_cfg_group(0, R | W | X);
    pmp.write_addr(0, 0x200);
    assert_eq!(pmp.read_cfg_group(0) & 0xFF, L | NA4 | R);
    assert_eq!(pmp.read_addr(0), 0x100);
}

#[test]
fn locked_tor_entry_protects_the_bottom_address() {
    let mut pmp = Pmp::new(16);
    pmp.write_addr(0, 0x100);
    pmp.write_addr(1, 0x200);
    pmp.write_cfg_group(0, (L | TOR | R) << 8);
    pmp.write_addr(0, 0x180);
    assert_eq!(pmp.read_addr(0), 0x100);
}

#[test]
fn write_without_read_is_reserved() {
    let mut pmp = Pmp::new(16);
    pmp.write_cfg_group(0, NA4 | W | X);
    assert_eq!(pmp.read_cfg_group(0) & 0xFF, NA4 | X);
}

#[test]
fn unimplemented_regions_read_zero() {
    let mut pmp = Pmp::new(2);
    pmp.write_cfg_group(0, 0x1F1F_1F1F);
    pmp.write_addr(5, 0x1234);
    assert_eq!(pmp.read_cfg_group(0), 0x0000_1F1F);
    assert_eq!(pmp.read_addr(5), 0);
    assert_eq!(pmp.regions(), 2);
}
