//! Outbound adapters driven by the application layer.

mod simulated;

pub use simulated::SimulatedProcessor;
