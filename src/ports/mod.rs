//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the application and whatever computes the risk estimate.

mod risk_model;

pub use risk_model::RiskModel;
