//! Main Execution Loop.
//!
//! This module implements the core execution cycle of the CPU. It performs the following:
//! 1. **Combinational Phase:** Evaluates every stage from the current latches, the two bus
//!    responses and the input lines, without modifying any state.
//! 2. **Pipeline Coordination:** Derives stalls, flushes and redirects and selects the next
//!    value of every latch.
//! 3. **Commit Phase:** Writes registers, CSRs, unit state and latches at the clock edge.
//! 4. **Observability:** Emits `trace!` events for retirement, redirects and stalls.

use tracing::trace;

use super::csr::CommitDecision;
use super::{CoreInputs, Cpu, Retired};
use crate::core::arch::csr::CsrView;
use crate::core::arch::trap::TrapHandler;
use crate::core::pipeline::hazards::{
    forward_rs, need_stall_csr, need_stall_fence_i, need_stall_load_use, PipelineControl,
};
use crate::core::pipeline::latches::{ExMem, IdEx, IfId, MemWb};
use crate::core::pipeline::stages::memory::{atomic_misaligned, bus_fault, mem_request};
use crate::core::pipeline::stages::{decode_stage, execute_stage, mem_stage, wb_stage};
use crate::core::units::mdu::MdRequest;
use crate::soc::{BusPort, BusRequest};

impl Cpu {
    /// Advances the core by one clock cycle.
    ///
    /// Each port's [`BusPort::cycle`] is called exactly once.
    ///
    /// With `inputs.reset` set, the core discards any response delivered this cycle and
    /// forgets its outstanding requests. Callers driving a core-only reset must drop the
    /// ports' in-flight transactions as well, as [`crate::sim::Simulator::reset`] does.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Reset, interrupt, debug and time lines for this cycle.
    /// * `ibus` - Instruction-bus port.
    /// * `dbus` - Data-bus port.
    pub fn tick(&mut self, inputs: &CoreInputs, ibus: &mut dyn BusPort, dbus: &mut dyn BusPort) {
        if inputs.reset {
            let _ = ibus.cycle(&BusRequest::idle());
            let _ = dbus.cycle(&BusRequest::idle());
            self.reset();
            return;
        }

        let mip = TrapHandler::mip_from_lines(
            inputs.irq_external,
            inputs.irq_timer,
            inputs.irq_software,
            inputs.irq_fast,
        );
        let view = CsrView {
            mip,
            time: inputs.time,
        };
        let csrs = self.csr.csrs();
        let if_id = self.if_id;
        let id_ex = self.id_ex;
        let ex_mem = self.ex_mem;

        // Writeback
        let wb = wb_stage(&self.mem_wb);

        // Memory: the commit point
        let carried = if ex_mem.valid {
            ex_mem.exception.or_else(|| atomic_misaligned(&ex_mem))
        } else {
            None
        };
        let is_wfi =
            ex_mem.valid && carried.is_none() && ex_mem.ctrl.is_wfi && !csrs.debug_mode;
        let wfi_wait = is_wfi && mip & csrs.mie == 0 && !inputs.debug_req;
        let fresh = ex_mem.valid && self.lsu.is_idle() && !is_wfi;
        let event = if fresh {
            self.csr.async_event(inputs.debug_req, mip)
        } else {
            None
        };
        let mem_op = if event.is_none() && carried.is_none() {
            mem_request(&ex_mem)
        } else {
            None
        };
        let dreq = self.lsu.bus_request(mem_op.as_ref());
        let dresp = dbus.cycle(&dreq);
        let (lsu_out, lsu_next) = self.lsu.evaluate(mem_op.as_ref(), &dresp);

        let mem_stall = lsu_out.busy || wfi_wait;
        let leaving = ex_mem.valid && !mem_stall;
        let exception = carried.or_else(|| bus_fault(&ex_mem, &lsu_out));
        let decision = self.csr.evaluate(&ex_mem, leaving, event, exception);
        let flush_all = decision.redirect.is_some();

        // Execute
        let (rv1, rv2) = forward_rs(&id_ex, &ex_mem, &wb);
        let csr_stall = need_stall_csr(&id_ex, &ex_mem);
        let md_req = MdRequest {
            req: id_ex.valid && id_ex.ctrl.md_en && id_ex.exception.is_none(),
            op: id_ex.ctrl.md_op,
            a: rv1,
            b: rv2,
            ack: !mem_stall || flush_all,
        };
        let (md_out, mdu_next) = self.mdu.evaluate(&md_req);
        let ex_stall = csr_stall || (md_req.req && !md_out.done);
        let ex = execute_stage(&id_ex, rv1, rv2, &md_out, csrs, &view);

        // Decode
        let decoded = decode_stage(&if_id, &self.regs, &wb, csrs);
        let load_use = need_stall_load_use(&id_ex, &decoded);
        let fence_wait = need_stall_fence_i(&decoded, &id_ex, &ex_mem, !self.lsu.is_idle());

        let mut ctl = PipelineControl {
            mem_stall,
            ex_stall,
            id_stall: load_use || fence_wait,
            flush_all,
            branch_taken: false,
            fence_i: false,
        };
        ctl.branch_taken = ex.redirect.is_some() && ctl.ex_advances();
        ctl.fence_i = decoded.valid
            && decoded.exception.is_none()
            && decoded.ctrl.is_fence_i
            && !ctl.branch_taken
            && ctl.id_advances();

        if load_use || fence_wait || csr_stall {
            trace!(
                pc = format_args!("{:#010x}", if_id.pc),
                load_use, fence_wait, csr_stall, "stall"
            );
        }

        // Fetch
        let redirect = if flush_all {
            decision.redirect
        } else if ctl.branch_taken {
            ex.redirect
        } else if ctl.fence_i {
            Some(decoded.pc.wrapping_add(decoded.ctrl.size()))
        } else {
            None
        };
        if let Some(target) = redirect {
            trace!(target = format_args!("{target:#010x}"), "redirect");
        }
        let fetched = self.fetch.output();
        let ireq = self.fetch.bus_request();
        let iresp = ibus.cycle(&ireq);
        let consume = fetched.valid && redirect.is_none() && !ctl.any_stall();
        let fetch_next = self.fetch.next(&ireq, &iresp, consume, redirect);

        // Latch selection
        let mem_wb_next = if flush_all || mem_stall {
            MemWb::default()
        } else {
            mem_stage(&ex_mem, &lsu_out)
        };
        let ex_mem_next = if flush_all {
            ExMem::default()
        } else if mem_stall {
            ex_mem
        } else if ex_stall {
            ExMem::default()
        } else {
            ex.ex_mem
        };
        let id_ex_next = if flush_all {
            IdEx::default()
        } else if mem_stall || ex_stall {
            IdEx { rv1, rv2, ..id_ex }
        } else if ctl.branch_taken || ctl.id_stall {
            IdEx::default()
        } else {
            decoded
        };
        let if_id_next = if flush_all || ctl.branch_taken || ctl.fence_i {
            IfId::default()
        } else if ctl.any_stall() {
            if_id
        } else {
            fetched
        };

        // Commit
        self.regs.commit(&wb);
        self.commit_point(&decision, &ex_mem);
        self.lsu = lsu_next;
        self.mdu = mdu_next;
        self.fetch = fetch_next;
        self.if_id = if_id_next;
        self.id_ex = id_ex_next;
        self.ex_mem = ex_mem_next;
        self.mem_wb = mem_wb_next;
        self.cycles += 1;
    }

    /// Applies the commit-point decision and records retirement.
    fn commit_point(&mut self, decision: &CommitDecision, ex_mem: &ExMem) {
        self.csr.commit(decision);
        if decision.retire {
            trace!(
                pc = format_args!("{:#010x}", ex_mem.pc),
                inst = format_args!("{:#010x}", ex_mem.inst),
                "retire"
            );
            self.last_retired = Some(Retired {
                pc: ex_mem.pc,
                inst: ex_mem.inst,
                cycle: self.cycles,
            });
        }
    }
}
