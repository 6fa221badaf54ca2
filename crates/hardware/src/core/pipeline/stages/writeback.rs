//! Writeback (WB) Stage.
//!
//! The final stage selects the value committed to the register file from the ALU
//! result, load data, link address or CSR read value. Writes to `x0` are presented
//! like any other and dropped by the register file.

use crate::common::reg::RegWrite;
use crate::core::pipeline::latches::MemWb;
use crate::core::pipeline::signals::WbSrc;

/// Executes the writeback stage.
///
/// # Returns
///
/// The register write to commit at the end of this cycle; also forwarded to Execute
/// and bypassed to Decode.
pub const fn wb_stage(mem_wb: &MemWb) -> RegWrite {
    let data = match mem_wb.ctrl.wb_sel {
        WbSrc::Alu => mem_wb.alu,
        WbSrc::Mem => mem_wb.load_data,
        WbSrc::PcPlus => mem_wb.pc.wrapping_add(mem_wb.ctrl.size()),
        WbSrc::Csr => mem_wb.csr_rdata,
    };
    RegWrite {
        en: mem_wb.valid && mem_wb.ctrl.reg_write,
        rd: mem_wb.rd,
        data,
    }
}
