
/// `TestContext` harness around the simulator.
pub mod harness;
