//! Core types and service wiring for the surtidor fuel-price browser.

/// Station filtering and presentation helpers.
pub mod filter;
/// Domain models and identifiers shared by providers and front-ends.
pub mod model;
/// Trait describing the fuel-price directory interface.
pub mod ports;
/// Opening-hours evaluation.
pub mod schedule;
/// Request tagging for discarding stale responses.
pub mod sequence;
/// High-level service facade used by clients.
pub mod service;

pub use filter::*;
pub use model::*;
pub use ports::*;
pub use schedule::*;
pub use sequence::*;
pub use service::*;
