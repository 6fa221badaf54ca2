//! Fixed-latency bus port.
//!
//! [`LatencyPort`] is the simplest responder that honours the core's bus protocol. It:
//! 1. **Grants** a request whenever no transaction is in flight.
//! 2. **Performs** the access on its target in the grant cycle.
//! 3. **Responds** with one `rvalid` pulse `latency` cycles after the grant.
//!
//! Only one transaction is ever outstanding, so a request arriving while a response is
//! pending waits without a grant.

use tracing::trace;

use crate::soc::traits::{BusPort, BusRequest, BusResponse, BusTarget};

/// A granted transaction waiting for its response cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct InFlight {
    /// Cycles until `rvalid`.
    countdown: u64,
    /// Read data captured at grant.
    rdata: u32,
    /// Access failed.
    err: bool,
}

/// Single-outstanding bus port with a fixed response latency.
#[derive(Debug)]
pub struct LatencyPort<T> {
    target: T,
    latency: u64,
    in_flight: Option<InFlight>,
}

impl<T: BusTarget> LatencyPort<T> {
    /// Creates a port in front of `target`.
    ///
    /// # Arguments
    ///
    /// * `target` - Storage the port accesses.
    /// * `latency` - Cycles from grant to response; values below 1 are raised to 1.
    pub fn new(target: T, latency: u64) -> Self {
        Self {
            target,
            latency: latency.max(1),
            in_flight: None,
        }
    }

    /// Returns the configured latency.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Returns `true` while a granted transaction awaits its response.
    pub const fn busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Returns the target.
    pub const fn target(&self) -> &T {
        &self.target
    }

    /// Returns the target mutably.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Drops any transaction in flight.
    pub fn reset(&mut self) {
        self.in_flight = None;
    }

    fn access(&mut self, req: &BusRequest) -> InFlight {
        let result = if req.we {
            self.target
                .write_word(req.addr, req.wdata, req.be)
                .map(|()| 0)
        } else {
            self.target.read_word(req.addr)
        };
        match result {
            Ok(rdata) => InFlight {
                countdown: self.latency,
                rdata,
                err: false,
            },
            Err(e) => {
                trace!(addr = format_args!("{:#010x}", req.addr), error = %e, "bus error");
                InFlight {
                    countdown: self.latency,
                    rdata: 0,
                    err: true,
                }
            }
        }
    }
}

impl<T: BusTarget> BusPort for LatencyPort<T> {
    fn cycle(&mut self, req: &BusRequest) -> BusResponse {
        let mut resp = BusResponse::default();
        if let Some(mut flight) = self.in_flight.take() {
            flight.countdown -= 1;
            if flight.countdown == 0 {
                resp.rvalid = true;
                resp.rdata = flight.rdata;
                resp.err = flight.err;
            } else {
                self.in_flight = Some(flight);
            }
            // The port frees up only after the response cycle.
            return BusResponse {
                gnt: false,
                ..resp
            };
        }
        if req.req {
            resp.gnt = true;
            self.in_flight = Some(self.access(req));
        }
        resp
    }
}
