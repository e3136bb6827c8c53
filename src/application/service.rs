//! Assessment service: the single handoff from aggregate to scorer.
//!
//! Takes a snapshot of the completed aggregate, runs it through the risk
//! model behind the port, and wraps the outcome in a timestamped record.

use std::sync::Arc;

use crate::domain::{Assessment, FormData};
use crate::ports::RiskModel;

/// Service for scoring completed questionnaires.
pub struct AssessmentService<M>
where
    M: RiskModel,
{
    model: Arc<M>,
}

impl<M> AssessmentService<M>
where
    M: RiskModel,
{
    /// Create a new assessment service.
    pub fn new(model: Arc<M>) -> Self {
        Self { model }
    }

    /// Score one aggregate snapshot and build the assessment record.
    ///
    /// Pure apart from logging: the same snapshot always produces the same
    /// percentage, level, factors, and recommendations.
    pub fn assess(&self, form: &FormData) -> Assessment {
        let result = self.model.assess(form);
        let assessment = Assessment::new(result);

        tracing::info!(
            "Assessment complete: risk={:.1}%, level={}, factors={}, recommendations={}",
            assessment.result.risk_percentage,
            assessment.result.risk_level,
            assessment.result.key_factors.len(),
            assessment.result.recommendations.len(),
        );

        assessment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::heuristic::HeuristicModel;
    use crate::domain::{Answer, RiskLevel};

    fn create_test_service() -> AssessmentService<HeuristicModel> {
        AssessmentService::new(Arc::new(HeuristicModel::default()))
    }

    #[test]
    fn test_assessment_record_carries_result() {
        let service = create_test_service();
        let mut form = FormData::default();
        form.age = "72".to_string();
        form.has_heart_disease = Answer::Yes;

        let assessment = service.assess(&form);
        assert!(assessment.result.risk_percentage > 0.0);
        assert_eq!(assessment.id.len(), 36);
    }

    #[test]
    fn test_empty_aggregate_scores_low() {
        let service = create_test_service();
        let assessment = service.assess(&FormData::default());
        assert_eq!(assessment.result.risk_level, RiskLevel::Low);
    }
}
