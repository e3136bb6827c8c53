//! Questionnaire aggregate: everything the user enters across the six steps.
//!
//! The aggregate is append/overwrite-only while a session runs. No validation
//! happens here; out-of-range or empty values pass through unchanged and the
//! scorer degrades them to zero-weight contributions.

use serde::{Deserialize, Serialize};

/// Tri-state answer to a yes/no question.
///
/// `Unanswered` is never treated as an affirmation by the scorer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
    #[default]
    Unanswered,
}

impl Answer {
    /// True only for an explicit "yes".
    #[must_use]
    pub fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// Self-reported gender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    Unspecified,
}

/// How often the user exercises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseFrequency {
    /// Most days of the week
    Daily,
    /// A few sessions per week
    Regular,
    /// A few sessions per month
    Occasional,
    /// Less than monthly
    Rare,
    Never,
    #[default]
    Unspecified,
}

/// Broad diet classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietType {
    Balanced,
    Mixed,
    /// Mostly processed or high-fat food
    Processed,
    #[default]
    Unspecified,
}

/// An attached file carried through the aggregate as an opaque blob.
///
/// Contents are never parsed; only the name and declared type are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Size of the attached blob in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// The complete set of user-entered answers for one assessment session.
///
/// Numeric vitals and age are kept as the raw strings the user typed; the
/// scorer parses them and treats non-numeric input as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    // Personal information
    pub name: String,
    pub age: String,
    pub gender: Gender,
    pub email: String,
    pub phone: String,

    // Medical history
    pub has_heart_disease: Answer,
    pub has_family_history: Answer,
    pub has_diabetes: Answer,
    pub has_hypertension: Answer,
    pub has_high_cholesterol: Answer,
    pub has_previous_surgeries: Answer,

    // Lifestyle & habits
    pub is_smoker: Answer,
    pub consumes_alcohol: Answer,
    pub exercise_frequency: ExerciseFrequency,
    pub diet_type: DietType,

    // Symptoms
    pub has_chest_pain: Answer,
    /// 0-10 scale, only counted when chest pain is affirmed
    pub chest_pain_severity: u8,
    pub has_shortness_of_breath: Answer,
    pub has_fatigue: Answer,
    pub has_dizziness: Answer,
    pub has_swelling: Answer,

    // Vital signs & test results
    pub systolic_bp: String,
    pub diastolic_bp: String,
    pub cholesterol_level: String,
    pub blood_sugar: String,
    pub resting_heart_rate: String,
    pub bmi: String,
    pub ecg_image: Option<Attachment>,
    pub echo_image: Option<Attachment>,

    // Doctor reports
    pub doctor_reports: Vec<Attachment>,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: String::new(),
            gender: Gender::Unspecified,
            email: String::new(),
            phone: String::new(),
            has_heart_disease: Answer::Unanswered,
            has_family_history: Answer::Unanswered,
            has_diabetes: Answer::Unanswered,
            has_hypertension: Answer::Unanswered,
            has_high_cholesterol: Answer::Unanswered,
            has_previous_surgeries: Answer::Unanswered,
            is_smoker: Answer::Unanswered,
            consumes_alcohol: Answer::Unanswered,
            exercise_frequency: ExerciseFrequency::Unspecified,
            diet_type: DietType::Unspecified,
            has_chest_pain: Answer::Unanswered,
            chest_pain_severity: 5,
            has_shortness_of_breath: Answer::Unanswered,
            has_fatigue: Answer::Unanswered,
            has_dizziness: Answer::Unanswered,
            has_swelling: Answer::Unanswered,
            systolic_bp: String::new(),
            diastolic_bp: String::new(),
            cholesterol_level: String::new(),
            blood_sugar: String::new(),
            resting_heart_rate: String::new(),
            bmi: String::new(),
            ecg_image: None,
            echo_image: None,
            doctor_reports: Vec::new(),
        }
    }
}

macro_rules! merge_field {
    ($self:ident, $patch:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $self.$field = value;
            }
        )+
    };
}

impl FormData {
    /// Merge a partial update into the aggregate.
    ///
    /// Fields the patch leaves unset are untouched; fields it sets overwrite
    /// the current value wholesale (including the report list).
    pub fn apply(&mut self, patch: FormPatch) {
        merge_field!(
            self, patch, name, age, gender, email, phone, has_heart_disease, has_family_history,
            has_diabetes, has_hypertension, has_high_cholesterol, has_previous_surgeries,
            is_smoker, consumes_alcohol, exercise_frequency, diet_type, has_chest_pain,
            chest_pain_severity, has_shortness_of_breath, has_fatigue, has_dizziness,
            has_swelling, systolic_bp, diastolic_bp, cholesterol_level, blood_sugar,
            resting_heart_rate, bmi, ecg_image, echo_image, doctor_reports,
        );
    }
}

/// A partial set of aggregate fields.
///
/// One `Option` per [`FormData`] field so a merge is total over the field
/// set: whatever a step edits goes here, everything else stays `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormPatch {
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<Gender>,
    pub email: Option<String>,
    pub phone: Option<String>,

    pub has_heart_disease: Option<Answer>,
    pub has_family_history: Option<Answer>,
    pub has_diabetes: Option<Answer>,
    pub has_hypertension: Option<Answer>,
    pub has_high_cholesterol: Option<Answer>,
    pub has_previous_surgeries: Option<Answer>,

    pub is_smoker: Option<Answer>,
    pub consumes_alcohol: Option<Answer>,
    pub exercise_frequency: Option<ExerciseFrequency>,
    pub diet_type: Option<DietType>,

    pub has_chest_pain: Option<Answer>,
    pub chest_pain_severity: Option<u8>,
    pub has_shortness_of_breath: Option<Answer>,
    pub has_fatigue: Option<Answer>,
    pub has_dizziness: Option<Answer>,
    pub has_swelling: Option<Answer>,

    pub systolic_bp: Option<String>,
    pub diastolic_bp: Option<String>,
    pub cholesterol_level: Option<String>,
    pub blood_sugar: Option<String>,
    pub resting_heart_rate: Option<String>,
    pub bmi: Option<String>,
    pub ecg_image: Option<Option<Attachment>>,
    pub echo_image: Option<Option<Attachment>>,

    pub doctor_reports: Option<Vec<Attachment>>,
}

/// One of the six questionnaire sections, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormStep {
    #[default]
    PersonalInfo,
    MedicalHistory,
    Lifestyle,
    Symptoms,
    VitalSigns,
    DoctorReports,
}

impl FormStep {
    /// All steps in questionnaire order.
    pub const ALL: [Self; 6] = [
        Self::PersonalInfo,
        Self::MedicalHistory,
        Self::Lifestyle,
        Self::Symptoms,
        Self::VitalSigns,
        Self::DoctorReports,
    ];

    #[must_use]
    pub fn first() -> Self {
        Self::PersonalInfo
    }

    /// Zero-based position of this step.
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default()
    }

    /// The following step, or `None` past the last section.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The preceding step, or `None` before the first section.
    #[must_use]
    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    #[must_use]
    pub fn is_last(self) -> bool {
        self == *Self::ALL.last().unwrap_or(&Self::DoctorReports)
    }

    /// Section heading shown in the progress bar.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::PersonalInfo => "Personal Info",
            Self::MedicalHistory => "Medical History",
            Self::Lifestyle => "Lifestyle",
            Self::Symptoms => "Symptoms",
            Self::VitalSigns => "Vital Signs",
            Self::DoctorReports => "Doctor Reports",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aggregate() {
        let form = FormData::default();
        assert_eq!(form.has_heart_disease, Answer::Unanswered);
        assert_eq!(form.chest_pain_severity, 5);
        assert!(form.systolic_bp.is_empty());
        assert!(form.doctor_reports.is_empty());
    }

    #[test]
    fn test_apply_merges_only_set_fields() {
        let mut form = FormData::default();
        form.name = "Jordan".to_string();
        form.has_diabetes = Answer::No;

        form.apply(FormPatch {
            age: Some("54".to_string()),
            is_smoker: Some(Answer::Yes),
            ..FormPatch::default()
        });

        assert_eq!(form.age, "54");
        assert_eq!(form.is_smoker, Answer::Yes);
        // Untouched by the patch
        assert_eq!(form.name, "Jordan");
        assert_eq!(form.has_diabetes, Answer::No);
    }

    #[test]
    fn test_apply_overwrites_report_list_wholesale() {
        let mut form = FormData::default();
        form.doctor_reports = vec![Attachment::new("old.pdf", "application/pdf", vec![1])];

        form.apply(FormPatch {
            doctor_reports: Some(vec![
                Attachment::new("a.pdf", "application/pdf", vec![2]),
                Attachment::new("b.pdf", "application/pdf", vec![3]),
            ]),
            ..FormPatch::default()
        });

        assert_eq!(form.doctor_reports.len(), 2);
        assert_eq!(form.doctor_reports[0].file_name, "a.pdf");
    }

    #[test]
    fn test_empty_patch_is_a_noop() {
        let mut form = FormData::default();
        form.apply(FormPatch {
            age: Some("70".to_string()),
            ecg_image: Some(Some(Attachment::new("ecg.png", "image/png", vec![0xff]))),
            ..FormPatch::default()
        });
        let before = form.clone();

        form.apply(FormPatch::default());
        assert_eq!(form, before);
    }

    #[test]
    fn test_step_order_and_guards() {
        let mut step = FormStep::first();
        let mut visited = vec![step];
        while let Some(next) = step.next() {
            step = next;
            visited.push(step);
        }
        assert_eq!(visited.len(), FormStep::ALL.len());
        assert!(step.is_last());
        assert!(step.next().is_none());
        assert!(FormStep::first().prev().is_none());
        assert_eq!(FormStep::VitalSigns.prev(), Some(FormStep::Symptoms));
        assert_eq!(FormStep::Symptoms.index(), 3);
    }
}
