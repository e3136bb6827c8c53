//! Heuristic risk model: the local implementation of the [`RiskModel`] port.
//!
//! A deterministic weighted sum over the aggregate: a baseline from age and
//! gender, then contributions per affirmed history flag, adverse lifestyle
//! choice, reported symptom, and out-of-threshold vital sign. The total is
//! clamped to [0, 100] and classified against fixed cut points.
//!
//! The weights and cut points carry no clinical authority; they are data
//! ([`ScoringPolicy`]) with compiled defaults, overridable from a JSON file
//! named by `HEARTGUARD_POLICY_PATH`. The clinical trigger thresholds
//! (140 mmHg systolic and friends) are standard reference values and stay
//! as named constants.

use serde::{Deserialize, Serialize};

use crate::domain::{
    AnalysisResult, Answer, DietType, ExerciseFrequency, FormData, Gender, KeyFactor, MetricPoint,
};
use crate::ports::RiskModel;
use crate::HeartguardError;

/// How many ranked contributors the key-factors list keeps.
const MAX_KEY_FACTORS: usize = 6;

// Clinical trigger thresholds (reference values, not configuration).
const SYSTOLIC_CRISIS: f64 = 180.0;
const SYSTOLIC_HIGH: f64 = 140.0;
const SYSTOLIC_ELEVATED: f64 = 130.0;
const DIASTOLIC_HIGH: f64 = 90.0;
const CHOLESTEROL_HIGH: f64 = 240.0;
const CHOLESTEROL_BORDERLINE: f64 = 200.0;
const BLOOD_SUGAR_DIABETIC: f64 = 126.0;
const BLOOD_SUGAR_ELEVATED: f64 = 100.0;
const HEART_RATE_HIGH: f64 = 100.0;
const BMI_OBESE: f64 = 30.0;
const BMI_OVERWEIGHT: f64 = 25.0;

/// Percentage thresholds separating the risk categories.
///
/// A percentage exactly on a cut point maps to the higher category:
/// 39 is Low, 40 is Moderate, 69 is Moderate, 70 is High.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutPoints {
    pub moderate: f64,
    pub high: f64,
}

impl Default for CutPoints {
    fn default() -> Self {
        Self {
            moderate: 40.0,
            high: 70.0,
        }
    }
}

/// Weighted points each input can add to the percentage.
///
/// All weights are non-negative so that affirming any adverse input never
/// lowers the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    // Baseline
    pub age_over_65: f64,
    pub age_50s: f64,
    pub age_40s: f64,
    pub age_30s: f64,
    pub male_sex: f64,

    // Medical history
    pub heart_disease: f64,
    pub family_history: f64,
    pub diabetes: f64,
    pub hypertension: f64,
    pub high_cholesterol: f64,
    pub prior_surgery: f64,

    // Lifestyle
    pub smoking: f64,
    pub alcohol: f64,
    pub exercise_never: f64,
    pub exercise_rare: f64,
    pub exercise_occasional: f64,
    pub diet_processed: f64,
    pub diet_mixed: f64,

    // Symptoms
    pub chest_pain_base: f64,
    pub chest_pain_per_point: f64,
    pub breathlessness: f64,
    pub fatigue: f64,
    pub dizziness: f64,
    pub swelling: f64,

    // Vital signs
    pub bp_crisis: f64,
    pub bp_high: f64,
    pub bp_elevated: f64,
    pub diastolic_high: f64,
    pub cholesterol_high: f64,
    pub cholesterol_borderline: f64,
    pub blood_sugar_diabetic: f64,
    pub blood_sugar_elevated: f64,
    pub heart_rate_high: f64,
    pub bmi_obese: f64,
    pub bmi_overweight: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            age_over_65: 20.0,
            age_50s: 12.0,
            age_40s: 8.0,
            age_30s: 4.0,
            male_sex: 5.0,

            heart_disease: 20.0,
            family_history: 15.0,
            diabetes: 10.0,
            hypertension: 10.0,
            high_cholesterol: 8.0,
            prior_surgery: 3.0,

            smoking: 12.0,
            alcohol: 4.0,
            exercise_never: 8.0,
            exercise_rare: 5.0,
            exercise_occasional: 2.0,
            diet_processed: 6.0,
            diet_mixed: 2.0,

            chest_pain_base: 6.0,
            chest_pain_per_point: 1.0,
            breathlessness: 6.0,
            fatigue: 3.0,
            dizziness: 3.0,
            swelling: 4.0,

            bp_crisis: 12.0,
            bp_high: 8.0,
            bp_elevated: 4.0,
            diastolic_high: 4.0,
            cholesterol_high: 8.0,
            cholesterol_borderline: 4.0,
            blood_sugar_diabetic: 6.0,
            blood_sugar_elevated: 3.0,
            heart_rate_high: 4.0,
            bmi_obese: 6.0,
            bmi_overweight: 3.0,
        }
    }
}

/// The full scoring configuration: weights plus cut points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub weights: FactorWeights,
    pub cut_points: CutPoints,
}

impl ScoringPolicy {
    /// Load the policy from a JSON file. Fields the file omits keep their
    /// compiled defaults.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, HeartguardError> {
        let raw = std::fs::read_to_string(path)?;
        let policy: Self = serde_json::from_str(&raw)?;
        Ok(policy)
    }

    /// Resolve the policy from `HEARTGUARD_POLICY_PATH`, falling back to the
    /// compiled defaults when the variable is unset.
    ///
    /// # Errors
    /// Returns error if the variable names an unreadable or invalid file.
    pub fn from_env() -> Result<Self, HeartguardError> {
        match std::env::var("HEARTGUARD_POLICY_PATH") {
            Ok(path) => {
                tracing::info!("Loading scoring policy from {path}");
                Self::from_file(std::path::Path::new(&path))
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Map a percentage to its risk category.
    #[must_use]
    pub fn classify(&self, percentage: f64) -> crate::domain::RiskLevel {
        use crate::domain::RiskLevel;
        if percentage >= self.cut_points.high {
            RiskLevel::High
        } else if percentage >= self.cut_points.moderate {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

/// Inputs the scorer can attribute points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Factor {
    Age,
    MaleSex,
    HeartDisease,
    FamilyHistory,
    Diabetes,
    Hypertension,
    HighCholesterolHistory,
    PriorSurgery,
    Smoking,
    Alcohol,
    LowExercise,
    PoorDiet,
    ChestPain,
    Breathlessness,
    Fatigue,
    Dizziness,
    Swelling,
    HighBloodPressure,
    HighCholesterol,
    HighBloodSugar,
    ElevatedHeartRate,
    HighBmi,
}

impl Factor {
    fn label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::MaleSex => "Male sex",
            Self::HeartDisease => "Heart disease",
            Self::FamilyHistory => "Family history of heart disease",
            Self::Diabetes => "Diabetes",
            Self::Hypertension => "Diagnosed hypertension",
            Self::HighCholesterolHistory => "Diagnosed high cholesterol",
            Self::PriorSurgery => "Previous surgeries",
            Self::Smoking => "Smoking",
            Self::Alcohol => "Alcohol consumption",
            Self::LowExercise => "Low exercise frequency",
            Self::PoorDiet => "Diet",
            Self::ChestPain => "Chest pain",
            Self::Breathlessness => "Shortness of breath",
            Self::Fatigue => "Fatigue",
            Self::Dizziness => "Dizziness",
            Self::Swelling => "Swelling",
            Self::HighBloodPressure => "High blood pressure",
            Self::HighCholesterol => "High cholesterol reading",
            Self::HighBloodSugar => "Elevated blood sugar",
            Self::ElevatedHeartRate => "Elevated resting heart rate",
            Self::HighBmi => "Elevated BMI",
        }
    }

    /// Advisory text for a triggered factor. Several factors intentionally
    /// share one advisory so the final list deduplicates.
    fn advice(self) -> Option<&'static str> {
        match self {
            Self::Age | Self::MaleSex => None,
            Self::HeartDisease => {
                Some("Stay in regular contact with your cardiologist and keep prescribed medication current.")
            }
            Self::FamilyHistory => {
                Some("With a family history of heart disease, schedule periodic cardiovascular screenings.")
            }
            Self::Diabetes | Self::HighBloodSugar => {
                Some("Keep blood sugar under control through diet, activity, and regular glucose monitoring.")
            }
            Self::Hypertension | Self::HighBloodPressure => {
                Some("Monitor your blood pressure regularly and review readings with your physician.")
            }
            Self::HighCholesterolHistory | Self::HighCholesterol => {
                Some("Reduce saturated fat intake and have your lipid profile rechecked.")
            }
            Self::PriorSurgery => {
                Some("Share your surgical history with any new treating physician.")
            }
            Self::Smoking => Some("Quitting smoking is the single most effective step to lower cardiovascular risk."),
            Self::Alcohol => Some("Limit alcohol consumption to moderate levels."),
            Self::LowExercise => {
                Some("Aim for at least 150 minutes of moderate aerobic activity per week.")
            }
            Self::PoorDiet => {
                Some("Favor a balanced diet rich in vegetables, whole grains, and lean protein.")
            }
            Self::ChestPain => {
                Some("Recurring chest pain warrants prompt evaluation by a medical professional.")
            }
            Self::Breathlessness | Self::Fatigue | Self::Dizziness | Self::Swelling => {
                Some("Discuss persistent symptoms with your doctor, even if they seem minor.")
            }
            Self::ElevatedHeartRate => {
                Some("An elevated resting heart rate can reflect stress or deconditioning; track it over time.")
            }
            Self::HighBmi => Some("Gradual weight reduction lowers strain on the heart."),
        }
    }
}

/// Parse a user-entered metric string; non-numeric input counts as absent.
fn parse_metric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The shipped weighted-sum scorer.
#[derive(Debug, Clone, Default)]
pub struct HeuristicModel {
    policy: ScoringPolicy,
}

impl HeuristicModel {
    #[must_use]
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    fn contributions(&self, form: &FormData) -> Vec<(Factor, f64)> {
        let w = &self.policy.weights;
        let mut out: Vec<(Factor, f64)> = Vec::new();
        let mut add = |factor: Factor, points: f64| {
            if points > 0.0 {
                out.push((factor, points));
            }
        };

        // 1. Baseline from age and gender
        if let Some(age) = parse_metric(&form.age) {
            let points = if age >= 65.0 {
                w.age_over_65
            } else if age >= 50.0 {
                w.age_50s
            } else if age >= 40.0 {
                w.age_40s
            } else if age >= 30.0 {
                w.age_30s
            } else {
                0.0
            };
            add(Factor::Age, points);
        }
        if form.gender == Gender::Male {
            add(Factor::MaleSex, w.male_sex);
        }

        // 2. Medical history
        let history: [(Answer, Factor, f64); 6] = [
            (form.has_heart_disease, Factor::HeartDisease, w.heart_disease),
            (form.has_family_history, Factor::FamilyHistory, w.family_history),
            (form.has_diabetes, Factor::Diabetes, w.diabetes),
            (form.has_hypertension, Factor::Hypertension, w.hypertension),
            (
                form.has_high_cholesterol,
                Factor::HighCholesterolHistory,
                w.high_cholesterol,
            ),
            (
                form.has_previous_surgeries,
                Factor::PriorSurgery,
                w.prior_surgery,
            ),
        ];
        for (answer, factor, weight) in history {
            if answer.is_yes() {
                add(factor, weight);
            }
        }

        // 3. Lifestyle
        if form.is_smoker.is_yes() {
            add(Factor::Smoking, w.smoking);
        }
        if form.consumes_alcohol.is_yes() {
            add(Factor::Alcohol, w.alcohol);
        }
        let exercise = match form.exercise_frequency {
            ExerciseFrequency::Never => w.exercise_never,
            ExerciseFrequency::Rare => w.exercise_rare,
            ExerciseFrequency::Occasional => w.exercise_occasional,
            ExerciseFrequency::Daily
            | ExerciseFrequency::Regular
            | ExerciseFrequency::Unspecified => 0.0,
        };
        add(Factor::LowExercise, exercise);
        let diet = match form.diet_type {
            DietType::Processed => w.diet_processed,
            DietType::Mixed => w.diet_mixed,
            DietType::Balanced | DietType::Unspecified => 0.0,
        };
        add(Factor::PoorDiet, diet);

        // 4. Symptoms; chest pain scales with severity
        if form.has_chest_pain.is_yes() {
            let severity = f64::from(form.chest_pain_severity.min(10));
            add(
                Factor::ChestPain,
                w.chest_pain_base + severity * w.chest_pain_per_point,
            );
        }
        if form.has_shortness_of_breath.is_yes() {
            add(Factor::Breathlessness, w.breathlessness);
        }
        if form.has_fatigue.is_yes() {
            add(Factor::Fatigue, w.fatigue);
        }
        if form.has_dizziness.is_yes() {
            add(Factor::Dizziness, w.dizziness);
        }
        if form.has_swelling.is_yes() {
            add(Factor::Swelling, w.swelling);
        }

        // 5. Vital signs against clinical thresholds
        let mut bp_points = 0.0;
        if let Some(systolic) = parse_metric(&form.systolic_bp) {
            bp_points += if systolic >= SYSTOLIC_CRISIS {
                w.bp_crisis
            } else if systolic >= SYSTOLIC_HIGH {
                w.bp_high
            } else if systolic >= SYSTOLIC_ELEVATED {
                w.bp_elevated
            } else {
                0.0
            };
        }
        if let Some(diastolic) = parse_metric(&form.diastolic_bp) {
            if diastolic >= DIASTOLIC_HIGH {
                bp_points += w.diastolic_high;
            }
        }
        add(Factor::HighBloodPressure, bp_points);

        if let Some(cholesterol) = parse_metric(&form.cholesterol_level) {
            let points = if cholesterol >= CHOLESTEROL_HIGH {
                w.cholesterol_high
            } else if cholesterol >= CHOLESTEROL_BORDERLINE {
                w.cholesterol_borderline
            } else {
                0.0
            };
            add(Factor::HighCholesterol, points);
        }
        if let Some(sugar) = parse_metric(&form.blood_sugar) {
            let points = if sugar >= BLOOD_SUGAR_DIABETIC {
                w.blood_sugar_diabetic
            } else if sugar >= BLOOD_SUGAR_ELEVATED {
                w.blood_sugar_elevated
            } else {
                0.0
            };
            add(Factor::HighBloodSugar, points);
        }
        if let Some(rate) = parse_metric(&form.resting_heart_rate) {
            if rate > HEART_RATE_HIGH {
                add(Factor::ElevatedHeartRate, w.heart_rate_high);
            }
        }
        if let Some(bmi) = parse_metric(&form.bmi) {
            let points = if bmi >= BMI_OBESE {
                w.bmi_obese
            } else if bmi >= BMI_OVERWEIGHT {
                w.bmi_overweight
            } else {
                0.0
            };
            add(Factor::HighBmi, points);
        }

        out
    }

    fn graph_data(form: &FormData) -> Vec<MetricPoint> {
        let metrics: [(&str, &str, f64, f64); 6] = [
            ("Systolic BP", &form.systolic_bp, 90.0, 120.0),
            ("Diastolic BP", &form.diastolic_bp, 60.0, 80.0),
            ("Cholesterol", &form.cholesterol_level, 125.0, 200.0),
            ("Blood sugar", &form.blood_sugar, 70.0, 100.0),
            ("Resting heart rate", &form.resting_heart_rate, 60.0, 100.0),
            ("BMI", &form.bmi, 18.5, 24.9),
        ];

        metrics
            .into_iter()
            .map(|(metric, raw, normal_min, normal_max)| MetricPoint {
                metric: metric.to_string(),
                value: parse_metric(raw),
                normal_min,
                normal_max,
            })
            .collect()
    }
}

impl RiskModel for HeuristicModel {
    fn assess(&self, form: &FormData) -> AnalysisResult {
        let mut ranked = self.contributions(form);
        let total: f64 = ranked.iter().map(|(_, points)| points).sum();
        let risk_percentage = total.clamp(0.0, 100.0);

        // Rank by contribution; stable sort keeps insertion order on ties.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut recommendations: Vec<String> = Vec::new();
        for (factor, _) in &ranked {
            if let Some(advice) = factor.advice() {
                if !recommendations.iter().any(|r| r == advice) {
                    recommendations.push(advice.to_string());
                }
            }
        }

        let key_factors = ranked
            .iter()
            .take(MAX_KEY_FACTORS)
            .map(|(factor, points)| KeyFactor {
                label: factor.label().to_string(),
                points: *points,
            })
            .collect();

        AnalysisResult {
            risk_percentage,
            risk_level: self.policy.classify(risk_percentage),
            key_factors,
            recommendations,
            graph_data: Self::graph_data(form),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskLevel;

    fn high_risk_form() -> FormData {
        FormData {
            age: "70".to_string(),
            gender: Gender::Male,
            has_heart_disease: Answer::Yes,
            has_family_history: Answer::Yes,
            is_smoker: Answer::Yes,
            has_chest_pain: Answer::Yes,
            chest_pain_severity: 9,
            systolic_bp: "160".to_string(),
            ..FormData::default()
        }
    }

    fn low_risk_form() -> FormData {
        FormData {
            name: "Sam".to_string(),
            age: "25".to_string(),
            gender: Gender::Female,
            has_heart_disease: Answer::No,
            has_family_history: Answer::No,
            has_diabetes: Answer::No,
            has_hypertension: Answer::No,
            has_high_cholesterol: Answer::No,
            has_previous_surgeries: Answer::No,
            is_smoker: Answer::No,
            consumes_alcohol: Answer::No,
            exercise_frequency: ExerciseFrequency::Regular,
            diet_type: DietType::Balanced,
            has_chest_pain: Answer::No,
            has_shortness_of_breath: Answer::No,
            has_fatigue: Answer::No,
            has_dizziness: Answer::No,
            has_swelling: Answer::No,
            systolic_bp: "112".to_string(),
            diastolic_bp: "72".to_string(),
            cholesterol_level: "170".to_string(),
            blood_sugar: "85".to_string(),
            resting_heart_rate: "64".to_string(),
            bmi: "22.1".to_string(),
            ..FormData::default()
        }
    }

    #[test]
    fn test_percentage_stays_in_range() {
        let model = HeuristicModel::default();

        let mut worst = high_risk_form();
        worst.has_diabetes = Answer::Yes;
        worst.has_hypertension = Answer::Yes;
        worst.has_high_cholesterol = Answer::Yes;
        worst.has_previous_surgeries = Answer::Yes;
        worst.consumes_alcohol = Answer::Yes;
        worst.exercise_frequency = ExerciseFrequency::Never;
        worst.diet_type = DietType::Processed;
        worst.has_shortness_of_breath = Answer::Yes;
        worst.has_fatigue = Answer::Yes;
        worst.has_dizziness = Answer::Yes;
        worst.has_swelling = Answer::Yes;
        worst.chest_pain_severity = 10;
        worst.systolic_bp = "220".to_string();
        worst.diastolic_bp = "130".to_string();
        worst.cholesterol_level = "400".to_string();
        worst.blood_sugar = "300".to_string();
        worst.resting_heart_rate = "140".to_string();
        worst.bmi = "45".to_string();

        let result = model.assess(&worst);
        assert!(result.risk_percentage <= 100.0);
        assert!(result.risk_percentage >= 0.0);
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_unanswered_contributes_nothing() {
        let model = HeuristicModel::default();
        let result = model.assess(&FormData::default());

        assert_eq!(result.risk_percentage, 0.0);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.key_factors.is_empty());
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_idempotence() {
        let model = HeuristicModel::default();
        let form = high_risk_form();
        assert_eq!(model.assess(&form), model.assess(&form));
    }

    #[test]
    fn test_monotonicity_of_adverse_flags() {
        let model = HeuristicModel::default();
        let flips: Vec<fn(&mut FormData)> = vec![
            |f| f.has_heart_disease = Answer::Yes,
            |f| f.has_family_history = Answer::Yes,
            |f| f.has_diabetes = Answer::Yes,
            |f| f.has_hypertension = Answer::Yes,
            |f| f.has_high_cholesterol = Answer::Yes,
            |f| f.has_previous_surgeries = Answer::Yes,
            |f| f.is_smoker = Answer::Yes,
            |f| f.consumes_alcohol = Answer::Yes,
            |f| f.has_chest_pain = Answer::Yes,
            |f| f.has_shortness_of_breath = Answer::Yes,
            |f| f.has_fatigue = Answer::Yes,
            |f| f.has_dizziness = Answer::Yes,
            |f| f.has_swelling = Answer::Yes,
        ];

        for baseline in [FormData::default(), low_risk_form(), high_risk_form()] {
            let before = model.assess(&baseline).risk_percentage;
            for flip in &flips {
                let mut flipped = baseline.clone();
                flip(&mut flipped);
                let after = model.assess(&flipped).risk_percentage;
                assert!(
                    after >= before,
                    "flip lowered risk: {after} < {before}"
                );
            }
        }
    }

    #[test]
    fn test_cut_point_boundaries() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.classify(39.0), RiskLevel::Low);
        assert_eq!(policy.classify(40.0), RiskLevel::Moderate);
        assert_eq!(policy.classify(69.0), RiskLevel::Moderate);
        assert_eq!(policy.classify(70.0), RiskLevel::High);
        assert_eq!(policy.classify(0.0), RiskLevel::Low);
        assert_eq!(policy.classify(100.0), RiskLevel::High);
    }

    #[test]
    fn test_high_risk_scenario() {
        let model = HeuristicModel::default();
        let result = model.assess(&high_risk_form());

        assert_eq!(result.risk_level, RiskLevel::High);
        assert!(result.risk_percentage >= model.policy().cut_points.high);

        let labels: Vec<&str> = result.key_factors.iter().map(|f| f.label.as_str()).collect();
        assert!(labels.contains(&"Heart disease"), "labels: {labels:?}");
        assert!(labels.contains(&"High blood pressure"), "labels: {labels:?}");
    }

    #[test]
    fn test_low_risk_scenario() {
        let model = HeuristicModel::default();
        let result = model.assess(&low_risk_form());

        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.recommendations.is_empty());
        // All entered vitals sit inside their reference ranges.
        for point in &result.graph_data {
            assert_eq!(point.in_range(), Some(true), "{} out of range", point.metric);
        }
    }

    #[test]
    fn test_non_numeric_vitals_treated_as_absent() {
        let model = HeuristicModel::default();
        let mut with_garbage = low_risk_form();
        with_garbage.systolic_bp = "one sixty".to_string();
        with_garbage.bmi = "NaN".to_string();

        let mut with_blanks = low_risk_form();
        with_blanks.systolic_bp = String::new();
        with_blanks.bmi = String::new();

        assert_eq!(
            model.assess(&with_garbage).risk_percentage,
            model.assess(&with_blanks).risk_percentage
        );
    }

    #[test]
    fn test_severity_counts_only_with_chest_pain() {
        let model = HeuristicModel::default();
        let mut form = FormData::default();
        form.chest_pain_severity = 10;
        let without_pain = model.assess(&form).risk_percentage;
        assert_eq!(without_pain, 0.0);

        form.has_chest_pain = Answer::Yes;
        let with_pain = model.assess(&form).risk_percentage;
        assert!(with_pain > without_pain);
    }

    #[test]
    fn test_key_factors_ranked_and_capped() {
        let model = HeuristicModel::default();
        let mut form = high_risk_form();
        form.has_diabetes = Answer::Yes;
        form.has_hypertension = Answer::Yes;
        form.has_fatigue = Answer::Yes;
        form.bmi = "33".to_string();

        let result = model.assess(&form);
        assert!(result.key_factors.len() <= 6);
        for pair in result.key_factors.windows(2) {
            assert!(pair[0].points >= pair[1].points);
        }
        assert!(result.key_factors.iter().all(|f| f.points > 0.0));
    }

    #[test]
    fn test_shared_advice_deduplicates() {
        let model = HeuristicModel::default();
        let mut form = FormData::default();
        form.has_hypertension = Answer::Yes;
        form.systolic_bp = "150".to_string();

        let result = model.assess(&form);
        let bp_advice: Vec<&String> = result
            .recommendations
            .iter()
            .filter(|r| r.contains("blood pressure"))
            .collect();
        assert_eq!(bp_advice.len(), 1);
    }

    #[test]
    fn test_partial_policy_override() {
        let policy: ScoringPolicy =
            serde_json::from_str(r#"{"cut_points": {"moderate": 30.0}}"#).expect("Should parse");
        assert_eq!(policy.cut_points.moderate, 30.0);
        // Omitted fields keep the compiled defaults.
        assert_eq!(policy.cut_points.high, CutPoints::default().high);
        assert_eq!(policy.weights, FactorWeights::default());
    }
}
