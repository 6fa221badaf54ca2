//! Control and Status Register (CSR) definitions and operations.
//!
//! This module implements the CSR storage of the core. It provides:
//! 1. **Address Definitions:** Constants for every implemented machine, counter, PMP and debug CSR.
//! 2. **Field Masks:** Bitmasks and shifts for `mstatus`, `mip`/`mie`, `mtvec`, `mcounteren` and `dcsr`.
//! 3. **Register Storage:** The `Csrs` struct holding the architectural state.
//! 4. **Access Logic:** Legality checks plus WARL-legalizing read and write operations.
//!
//! Privilege level and debug-mode state live in `Csrs` as well, but only the CSR unit
//! in [`crate::core::cpu::csr`] mutates them, once per cycle.

use crate::common::constants::NUM_FAST_IRQS;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::units::pmp::Pmp;

/// Machine vendor ID CSR address.
pub const MVENDORID: u32 = 0xF11;
/// Machine architecture ID CSR address.
pub const MARCHID: u32 = 0xF12;
/// Machine implementation ID CSR address.
pub const MIMPID: u32 = 0xF13;
/// Machine hardware thread ID CSR address.
pub const MHARTID: u32 = 0xF14;

/// Machine status register CSR address.
pub const MSTATUS: u32 = 0x300;
/// Machine ISA register CSR address.
pub const MISA: u32 = 0x301;
/// Machine interrupt enable register CSR address.
pub const MIE: u32 = 0x304;
/// Machine trap vector base address register CSR address.
pub const MTVEC: u32 = 0x305;
/// Machine counter enable register CSR address.
pub const MCOUNTEREN: u32 = 0x306;

/// Machine scratch register CSR address.
pub const MSCRATCH: u32 = 0x340;
/// Machine exception program counter CSR address.
pub const MEPC: u32 = 0x341;
/// Machine trap cause CSR address.
pub const MCAUSE: u32 = 0x342;
/// Machine trap value CSR address.
pub const MTVAL: u32 = 0x343;
/// Machine interrupt pending CSR address.
pub const MIP: u32 = 0x344;

/// PMP configuration register 0 (entries 0-3).
pub const PMPCFG0: u32 = 0x3A0;
/// PMP configuration register 3 (entries 12-15).
pub const PMPCFG3: u32 = 0x3A3;
/// PMP address register 0.
pub const PMPADDR0: u32 = 0x3B0;
/// PMP address register 15.
pub const PMPADDR15: u32 = 0x3BF;

/// Debug control and status CSR address.
pub const DCSR: u32 = 0x7B0;
/// Debug program counter CSR address.
pub const DPC: u32 = 0x7B1;
/// Debug scratch register 0 CSR address.
pub const DSCRATCH0: u32 = 0x7B2;
/// Debug scratch register 1 CSR address.
pub const DSCRATCH1: u32 = 0x7B3;

/// Machine cycle counter (low half).
pub const MCYCLE: u32 = 0xB00;
/// Machine retired-instruction counter (low half).
pub const MINSTRET: u32 = 0xB02;
/// Machine cycle counter (high half).
pub const MCYCLEH: u32 = 0xB80;
/// Machine retired-instruction counter (high half).
pub const MINSTRETH: u32 = 0xB82;

/// User cycle counter shadow (low half).
pub const CYCLE: u32 = 0xC00;
/// User real-time shadow (low half).
pub const TIME: u32 = 0xC01;
/// User retired-instruction shadow (low half).
pub const INSTRET: u32 = 0xC02;
/// User cycle counter shadow (high half).
pub const CYCLEH: u32 = 0xC80;
/// User real-time shadow (high half).
pub const TIMEH: u32 = 0xC81;
/// User retired-instruction shadow (high half).
pub const INSTRETH: u32 = 0xC82;

/// Machine interrupt enable bit in `mstatus`.
pub const MSTATUS_MIE: u32 = 1 << 3;
/// Previous machine interrupt enable bit in `mstatus`.
pub const MSTATUS_MPIE: u32 = 1 << 7;
/// Shift for the previous privilege field in `mstatus`.
pub const MSTATUS_MPP_SHIFT: u32 = 11;
/// Previous privilege field in `mstatus`.
pub const MSTATUS_MPP: u32 = 0b11 << MSTATUS_MPP_SHIFT;
/// Modify-privilege bit in `mstatus` (data accesses use `MPP`).
pub const MSTATUS_MPRV: u32 = 1 << 17;
/// Writable `mstatus` bits.
pub const MSTATUS_WRITE_MASK: u32 = MSTATUS_MIE | MSTATUS_MPIE | MSTATUS_MPP | MSTATUS_MPRV;

/// Machine software interrupt pending/enable bit.
pub const MIP_MSIP: u32 = 1 << 3;
/// Machine timer interrupt pending/enable bit.
pub const MIP_MTIP: u32 = 1 << 7;
/// Machine external interrupt pending/enable bit.
pub const MIP_MEIP: u32 = 1 << 11;
/// Bit position of fast interrupt line 0 in `mip`/`mie`.
pub const MIP_FAST_SHIFT: u32 = 16;
/// Fast interrupt bits in `mip`/`mie`.
pub const MIP_FAST_MASK: u32 = ((1 << NUM_FAST_IRQS) - 1) << MIP_FAST_SHIFT;
/// Implemented `mip`/`mie` bits.
pub const MIE_WRITE_MASK: u32 = MIP_MSIP | MIP_MTIP | MIP_MEIP | MIP_FAST_MASK;

/// `mtvec` mode field.
pub const MTVEC_MODE_MASK: u32 = 0b11;
/// `mtvec` vectored mode encoding.
pub const MTVEC_MODE_VECTORED: u32 = 0b01;

/// `mcounteren` cycle bit.
pub const MCOUNTEREN_CY: u32 = 1 << 0;
/// `mcounteren` time bit.
pub const MCOUNTEREN_TM: u32 = 1 << 1;
/// `mcounteren` instret bit.
pub const MCOUNTEREN_IR: u32 = 1 << 2;

/// Debug spec version field of `dcsr` (external debug support, version 4).
pub const DCSR_XDEBUGVER: u32 = 4 << 28;
/// `dcsr.ebreakm`: `ebreak` in machine mode enters debug mode.
pub const DCSR_EBREAKM: u32 = 1 << 15;
/// `dcsr.ebreaku`: `ebreak` in user mode enters debug mode.
pub const DCSR_EBREAKU: u32 = 1 << 12;
/// Shift for the `dcsr.cause` field.
pub const DCSR_CAUSE_SHIFT: u32 = 6;
/// `dcsr.cause` field.
pub const DCSR_CAUSE_MASK: u32 = 0b111 << DCSR_CAUSE_SHIFT;
/// `dcsr.step`: single-step enable.
pub const DCSR_STEP: u32 = 1 << 2;
/// `dcsr.prv` field.
pub const DCSR_PRV_MASK: u32 = 0b11;
/// Debugger-writable `dcsr` bits.
pub const DCSR_WRITE_MASK: u32 = DCSR_EBREAKM | DCSR_EBREAKU | DCSR_STEP | DCSR_PRV_MASK;

/// `misa` value: MXL=1 (RV32) with extensions A, C, I, M and U.
pub const MISA_VALUE: u32 = (1 << 30) | (1 << 0) | (1 << 2) | (1 << 8) | (1 << 12) | (1 << 20);

/// Returns `true` if address bits `[11:10]` place the CSR in read-only space.
#[inline]
pub const fn is_read_only(addr: u32) -> bool {
    (addr >> 10) & 0b11 == 0b11
}

/// Returns the minimum privilege encoded in address bits `[9:8]`.
#[inline]
pub const fn min_privilege(addr: u32) -> PrivilegeMode {
    match (addr >> 8) & 0b11 {
        0b00 => PrivilegeMode::User,
        // Supervisor and hypervisor spaces are unimplemented; treat them as machine-only.
        _ => PrivilegeMode::Machine,
    }
}

/// Returns `true` for the debug-mode-only CSRs (`dcsr`, `dpc`, `dscratch0/1`).
#[inline]
pub const fn is_debug_only(addr: u32) -> bool {
    matches!(addr, DCSR | DPC | DSCRATCH0 | DSCRATCH1)
}

/// Inputs sampled from outside the CSR file that some reads depend on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CsrView {
    /// Current interrupt-pending bits (`mip`), from the interrupt lines.
    pub mip: u32,
    /// 64-bit time input for `time`/`timeh`.
    pub time: u64,
}

/// Architectural CSR state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Csrs {
    /// Current privilege level.
    pub mode: PrivilegeMode,
    /// Set while the hart is halted in debug mode.
    pub debug_mode: bool,
    /// Hart identifier (read-only, fixed at elaboration).
    pub hart_id: u32,
    /// `mstatus` (only `MSTATUS_WRITE_MASK` bits are ever set).
    pub mstatus: u32,
    /// `mie`.
    pub mie: u32,
    /// `mtvec` (base plus mode).
    pub mtvec: u32,
    /// `mcounteren`.
    pub mcounteren: u32,
    /// `mscratch`.
    pub mscratch: u32,
    /// `mepc`.
    pub mepc: u32,
    /// `mcause`.
    pub mcause: u32,
    /// `mtval`.
    pub mtval: u32,
    /// 64-bit cycle counter.
    pub mcycle: u64,
    /// 64-bit retired-instruction counter.
    pub minstret: u64,
    /// `dcsr`.
    pub dcsr: u32,
    /// `dpc`.
    pub dpc: u32,
    /// `dscratch0`.
    pub dscratch0: u32,
    /// `dscratch1`.
    pub dscratch1: u32,
    /// PMP region table.
    pub pmp: Pmp,
}

impl Csrs {
    /// Creates the reset-state CSR file.
    ///
    /// # Arguments
    ///
    /// * `boot_addr` - Reset `mtvec` base (direct mode).
    /// * `hart_id` - Value of `mhartid`.
    /// * `pmp_regions` - Number of implemented PMP regions.
    pub fn new(boot_addr: u32, hart_id: u32, pmp_regions: usize) -> Self {
        Self {
            mode: PrivilegeMode::Machine,
            debug_mode: false,
            hart_id,
            mstatus: 0,
            mie: 0,
            mtvec: boot_addr & !MTVEC_MODE_MASK,
            mcounteren: 0,
            mscratch: 0,
            mepc: 0,
            mcause: 0,
            mtval: 0,
            mcycle: 0,
            minstret: 0,
            dcsr: DCSR_XDEBUGVER | PrivilegeMode::Machine.to_bits(),
            dpc: 0,
            dscratch0: 0,
            dscratch1: 0,
            pmp: Pmp::new(pmp_regions),
        }
    }

    /// Checks whether an access is legal in the current privilege/debug state.
    ///
    /// # Arguments
    ///
    /// * `addr` - 12-bit CSR address.
    /// * `write` - Whether the instruction writes the CSR.
    ///
    /// # Returns
    ///
    /// `true` if the access may proceed; `false` raises an illegal-instruction exception.
    pub fn access_allowed(&self, addr: u32, write: bool) -> bool {
        if !Self::exists(addr) {
            return false;
        }
        if self.mode < min_privilege(addr) {
            return false;
        }
        if write && is_read_only(addr) {
            return false;
        }
        if is_debug_only(addr) && !self.debug_mode {
            return false;
        }
        if self.mode == PrivilegeMode::User {
            let gate = match addr {
                CYCLE | CYCLEH => MCOUNTEREN_CY,
                TIME | TIMEH => MCOUNTEREN_TM,
                INSTRET | INSTRETH => MCOUNTEREN_IR,
                _ => return true,
            };
            return self.mcounteren & gate != 0;
        }
        true
    }

    /// Returns `true` if a register backs the address.
    pub const fn exists(addr: u32) -> bool {
        matches!(
            addr,
            MVENDORID..=MHARTID
                | MSTATUS
                | MISA
                | MIE
                | MTVEC
                | MCOUNTEREN
                | MSCRATCH..=MIP
                | PMPCFG0..=PMPCFG3
                | PMPADDR0..=PMPADDR15
                | DCSR..=DSCRATCH1
                | MCYCLE
                | MINSTRET
                | MCYCLEH
                | MINSTRETH
                | CYCLE..=INSTRET
                | CYCLEH..=INSTRETH
        )
    }

    /// Reads a CSR. Legality must be checked first; unknown addresses read zero.
    pub fn read(&self, addr: u32, view: &CsrView) -> u32 {
        match addr {
            MVENDORID | MARCHID | MIMPID => 0,
            MHARTID => self.hart_id,
            MSTATUS => self.mstatus,
            MISA => MISA_VALUE,
            MIE => self.mie,
            MTVEC => self.mtvec,
            MCOUNTEREN => self.mcounteren,
            MSCRATCH => self.mscratch,
            MEPC => self.mepc,
            MCAUSE => self.mcause,
            MTVAL => self.mtval,
            MIP => view.mip & MIE_WRITE_MASK,
            PMPCFG0..=PMPCFG3 => self.pmp.read_cfg_group((addr - PMPCFG0) as usize),
            PMPADDR0..=PMPADDR15 => self.pmp.read_addr((addr - PMPADDR0) as usize),
            DCSR => self.dcsr,
            DPC => self.dpc,
            DSCRATCH0 => self.dscratch0,
            DSCRATCH1 => self.dscratch1,
            MCYCLE | CYCLE => self.mcycle as u32,
            MCYCLEH | CYCLEH => (self.mcycle >> 32) as u32,
            MINSTRET | INSTRET => self.minstret as u32,
            MINSTRETH | INSTRETH => (self.minstret >> 32) as u32,
            TIME => view.time as u32,
            TIMEH => (view.time >> 32) as u32,
            _ => 0,
        }
    }

    /// Writes a CSR, applying WARL legalization. Read-only and unknown addresses are ignored.
    pub fn write(&mut self, addr: u32, val: u32) {
        match addr {
            MSTATUS => {
                let mut next = val & MSTATUS_WRITE_MASK;
                let mpp = PrivilegeMode::from_bits(next >> MSTATUS_MPP_SHIFT);
                next = (next & !MSTATUS_MPP) | (mpp.to_bits() << MSTATUS_MPP_SHIFT);
                self.mstatus = next;
            }
            MIE => self.mie = val & MIE_WRITE_MASK,
            MTVEC => {
                let mode = val & MTVEC_MODE_MASK;
                let mode = if mode == MTVEC_MODE_VECTORED { mode } else { 0 };
                self.mtvec = (val & !MTVEC_MODE_MASK) | mode;
            }
            MCOUNTEREN => self.mcounteren = val & (MCOUNTEREN_CY | MCOUNTEREN_TM | MCOUNTEREN_IR),
            MSCRATCH => self.mscratch = val,
            MEPC => self.mepc = val & !1,
            MCAUSE => self.mcause = val,
            MTVAL => self.mtval = val,
            PMPCFG0..=PMPCFG3 => self.pmp.write_cfg_group((addr - PMPCFG0) as usize, val),
            PMPADDR0..=PMPADDR15 => self.pmp.write_addr((addr - PMPADDR0) as usize, val),
            DCSR => self.dcsr = (self.dcsr & !DCSR_WRITE_MASK) | (val & DCSR_WRITE_MASK),
            DPC => self.dpc = val & !1,
            DSCRATCH0 => self.dscratch0 = val,
            DSCRATCH1 => self.dscratch1 = val,
            MCYCLE => self.mcycle = (self.mcycle & !0xFFFF_FFFF) | u64::from(val),
            MCYCLEH => self.mcycle = (self.mcycle & 0xFFFF_FFFF) | (u64::from(val) << 32),
            MINSTRET => self.minstret = (self.minstret & !0xFFFF_FFFF) | u64::from(val),
            MINSTRETH => self.minstret = (self.minstret & 0xFFFF_FFFF) | (u64::from(val) << 32),
            _ => {}
        }
    }

    /// Returns `true` if `mstatus.MIE` is set.
    #[inline]
    pub const fn global_irq_enabled(&self) -> bool {
        self.mstatus & MSTATUS_MIE != 0
    }

    /// Returns the privilege saved in `mstatus.MPP`.
    #[inline]
    pub const fn mpp(&self) -> PrivilegeMode {
        PrivilegeMode::from_bits(self.mstatus >> MSTATUS_MPP_SHIFT)
    }

    /// Returns the effective privilege for data accesses (honours `mstatus.MPRV`).
    #[inline]
    pub const fn data_privilege(&self) -> PrivilegeMode {
        if matches!(self.mode, PrivilegeMode::Machine) && self.mstatus & MSTATUS_MPRV != 0 {
            self.mpp()
        } else {
            self.mode
        }
    }
}
