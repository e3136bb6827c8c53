//! # HeartGuard
//!
//! Multi-step cardiovascular risk questionnaire with a heuristic scoring core.
//!
//! This crate provides:
//! - A form aggregate collecting personal, medical, lifestyle, symptom, and
//!   vital-sign answers across six linear steps
//! - A deterministic weighted-sum risk scorer producing a percentage,
//!   category, key factors, recommendations, and chart data
//! - A terminal UI for local-only assessments
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (FormData, AnalysisResult, RiskLevel)
//! - `ports`: Trait definition for the scoring seam
//! - `adapters`: Concrete implementations (heuristic scorer, log sanitizer)
//! - `application`: Session and assessment orchestration
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{AnalysisResult, FormData, RiskLevel};

/// Result type for HeartGuard operations
pub type Result<T> = std::result::Result<T, HeartguardError>;

/// Main error type for HeartGuard
#[derive(Debug, thiserror::Error)]
pub enum HeartguardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid scoring policy: {0}")]
    Policy(String),

    #[error("Session error: {0}")]
    Session(String),
}
