//! Bus-side collaborators of the core.
//!
//! This module holds everything the core talks to over its instruction and data ports:
//! the bus signal types and traits, a flat memory target, and a fixed-latency port that
//! connects the two.

/// Fixed-latency single-outstanding bus port.
pub mod interconnect;

/// Flat little-endian memory target.
pub mod memory;

/// Bus signals, port and target traits.
pub mod traits;

pub use interconnect::LatencyPort;
pub use memory::Memory;
pub use traits::{BusError, BusPort, BusRequest, BusResponse, BusTarget};
