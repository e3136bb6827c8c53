//! Terminal user interface for the questionnaire.
//!
//! A linear six-section form, a processing screen while the background
//! worker runs, and a results screen for the completed assessment.

pub mod app;
pub mod styles;
pub mod ui;
pub mod worker;

pub use app::App;
