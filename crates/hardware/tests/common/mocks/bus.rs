use k10_core::soc::{BusPort, BusRequest, BusResponse};
use mockall::mock;

mock! {
    pub Bus {}
    impl BusPort for Bus {
        fn cycle(&mut self, req: &BusRequest) -> BusResponse;
    }
}

/// Response that accepts the presented request.
pub const fn grant() -> BusResponse {
    BusResponse {
        gnt: true,
        rvalid: false,
        rdata: 0,
        err: false,
    }
}

/// Response that neither grants nor completes anything.
pub const fn stall() -> BusResponse {
    BusResponse {
        gnt: false,
        rvalid: false,
        rdata: 0,
        err: false,
    }
}

/// Successful completion carrying `rdata`.
pub const fn respond(rdata: u32) -> BusResponse {
    BusResponse {
        gnt: false,
        rvalid: true,
        rdata,
        err: false,
    }
}

/// Failed completion.
pub const fn respond_err() -> BusResponse {
    BusResponse {
        gnt: false,
        rvalid: true,
        rdata: 0,
        err: true,
    }
}
