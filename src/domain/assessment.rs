//! Assessment result types.
//!
//! Output of the heuristic cardiovascular risk scoring: a percentage, a
//! categorical level, the ranked contributing factors, advisory text, and a
//! chart-ready series of vital-sign metrics.

use serde::{Deserialize, Serialize};

/// Risk level classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Moderate risk, monitoring recommended
    Moderate,
    /// High risk, intervention recommended
    High,
}

impl RiskLevel {
    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - No significant indicators",
            Self::Moderate => "Moderate risk - Follow-up recommended",
            Self::High => "High risk - Immediate consultation advised",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (16, 185, 129),      // Emerald (#10B981)
            Self::Moderate => (251, 191, 36), // Amber (#FBBF24)
            Self::High => (244, 63, 94),      // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// One input judged to have contributed to the computed percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFactor {
    /// Display label, e.g. "Heart disease"
    pub label: String,
    /// Weighted points this factor added to the percentage
    pub points: f64,
}

/// A vital-sign metric paired with its reference normal range.
///
/// `value` is `None` when the user entered nothing or a non-numeric string.
/// Visualization only; the range takes no part in classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub metric: String,
    pub value: Option<f64>,
    pub normal_min: f64,
    pub normal_max: f64,
}

impl MetricPoint {
    /// Whether the entered value falls inside the reference range.
    ///
    /// `None` when there is no numeric value to judge.
    #[must_use]
    pub fn in_range(&self) -> Option<bool> {
        self.value
            .map(|v| v >= self.normal_min && v <= self.normal_max)
    }
}

/// Outcome of scoring one aggregate. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Accumulated risk, clamped to [0, 100]
    pub risk_percentage: f64,
    /// Cut-point classification of the percentage
    pub risk_level: RiskLevel,
    /// Contributing factors, ranked by weighted share (largest first)
    pub key_factors: Vec<KeyFactor>,
    /// Advisory text per triggered factor, deduplicated, in factor order
    pub recommendations: Vec<String>,
    /// Vital-sign series for the results chart
    pub graph_data: Vec<MetricPoint>,
}

/// Complete assessment record: the result plus session metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Unique identifier (local only, never transmitted)
    pub id: String,

    /// The scoring outcome
    pub result: AnalysisResult,

    /// Timestamp of submission
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    /// Wrap a scoring outcome in a new record.
    #[must_use]
    pub fn new(result: AnalysisResult) -> Self {
        Self {
            id: uuid_v4(),
            result,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Generate a simple UUID v4 (random) using CSPRNG.
///
/// Uses ChaCha20Rng seeded from OS entropy to ensure cryptographic randomness
/// on all platforms. This prevents UUID prediction attacks.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_range_judgement() {
        let point = MetricPoint {
            metric: "Systolic BP".to_string(),
            value: Some(118.0),
            normal_min: 90.0,
            normal_max: 120.0,
        };
        assert_eq!(point.in_range(), Some(true));

        let missing = MetricPoint {
            metric: "BMI".to_string(),
            value: None,
            normal_min: 18.5,
            normal_max: 24.9,
        };
        assert_eq!(missing.in_range(), None);
    }

    #[test]
    fn test_assessment_record() {
        let result = AnalysisResult {
            risk_percentage: 12.0,
            risk_level: RiskLevel::Low,
            key_factors: vec![],
            recommendations: vec![],
            graph_data: vec![],
        };
        let assessment = Assessment::new(result);
        assert_eq!(assessment.result.risk_level, RiskLevel::Low);
        assert_eq!(assessment.id.len(), 36); // UUID format with dashes
    }

    #[test]
    fn test_uuid_generation() {
        let id1 = uuid_v4();
        let id2 = uuid_v4();
        assert_ne!(id1, id2);
    }
}
