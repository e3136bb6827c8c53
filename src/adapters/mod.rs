//! Adapters layer: Concrete implementations of ports.
//!
//! - `heuristic`: weighted-sum risk scorer behind the `RiskModel` port
//! - `sanitize`: PII filtering for logs

pub mod heuristic;
pub mod sanitize;
