//! Risk model port: the seam where a real clinical backend would sit.
//!
//! The shipped implementation is a local heuristic; a future remote scoring
//! service would implement the same trait behind the same handoff.

use crate::domain::{AnalysisResult, FormData};

/// Maps a completed aggregate to a risk assessment.
///
/// Implementations must be deterministic and side-effect-free: the same
/// aggregate always yields the same result. Scoring is infallible by
/// contract; missing or malformed input degrades a contribution to zero
/// rather than raising a fault.
pub trait RiskModel: Send + Sync {
    /// Score one aggregate snapshot.
    fn assess(&self, form: &FormData) -> AnalysisResult;
}
