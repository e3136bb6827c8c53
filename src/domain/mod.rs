//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no external dependencies.
//! All types are serializable.

mod assessment;
mod form;

pub use assessment::{AnalysisResult, Assessment, KeyFactor, MetricPoint, RiskLevel};
pub use form::{
    Answer, Attachment, DietType, ExerciseFrequency, FormData, FormPatch, FormStep, Gender,
};
