



/// Loads, stores, atomics, bus errors and `fence.i`.
pub mod memory;


/// Reset behavior of the core.
pub mod reset;
