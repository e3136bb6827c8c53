//! Application layer: Use cases orchestrating domain and ports.

mod service;
mod session;

pub use service::AssessmentService;
pub use session::{Advance, FormSession};
