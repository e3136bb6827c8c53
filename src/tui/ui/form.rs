//! Questionnaire screens: one field list per section.
//!
//! Field edits stay local to the screen state; they are folded into the
//! session aggregate as a [`FormPatch`] when the user leaves the section,
//! so the merge is always partial and never disturbs other sections.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{
    Answer, Attachment, DietType, ExerciseFrequency, FormData, FormPatch, FormStep, Gender,
};
use crate::tui::styles::MedicalTheme;

const TRI_STATE: &[&str] = &["unanswered", "yes", "no"];
const GENDERS: &[&str] = &["unspecified", "male", "female", "other"];
const EXERCISE: &[&str] = &[
    "unspecified",
    "daily",
    "regular",
    "occasional",
    "rare",
    "never",
];
const DIETS: &[&str] = &["unspecified", "balanced", "mixed", "processed"];

/// Editable value of a single form field.
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// Free text, including the numeric vitals (parsed later, never here)
    Text(String),
    /// One of a fixed option list
    Choice {
        options: &'static [&'static str],
        selected: usize,
    },
    /// 0-10 severity scale
    Slider(u8),
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub value: FieldValue,
}

impl FormField {
    fn text(label: &'static str, hint: &'static str, value: &str) -> Self {
        Self {
            label,
            hint,
            value: FieldValue::Text(value.to_string()),
        }
    }

    fn choice(label: &'static str, options: &'static [&'static str], selected: usize) -> Self {
        Self {
            label,
            hint: "",
            value: FieldValue::Choice { options, selected },
        }
    }

    fn tri(label: &'static str, answer: Answer) -> Self {
        Self::choice(label, TRI_STATE, answer_index(answer))
    }
}

fn answer_index(answer: Answer) -> usize {
    match answer {
        Answer::Unanswered => 0,
        Answer::Yes => 1,
        Answer::No => 2,
    }
}

fn index_answer(index: usize) -> Answer {
    match index {
        1 => Answer::Yes,
        2 => Answer::No,
        _ => Answer::Unanswered,
    }
}

fn gender_index(gender: Gender) -> usize {
    match gender {
        Gender::Unspecified => 0,
        Gender::Male => 1,
        Gender::Female => 2,
        Gender::Other => 3,
    }
}

fn index_gender(index: usize) -> Gender {
    match index {
        1 => Gender::Male,
        2 => Gender::Female,
        3 => Gender::Other,
        _ => Gender::Unspecified,
    }
}

fn exercise_index(freq: ExerciseFrequency) -> usize {
    match freq {
        ExerciseFrequency::Unspecified => 0,
        ExerciseFrequency::Daily => 1,
        ExerciseFrequency::Regular => 2,
        ExerciseFrequency::Occasional => 3,
        ExerciseFrequency::Rare => 4,
        ExerciseFrequency::Never => 5,
    }
}

fn index_exercise(index: usize) -> ExerciseFrequency {
    match index {
        1 => ExerciseFrequency::Daily,
        2 => ExerciseFrequency::Regular,
        3 => ExerciseFrequency::Occasional,
        4 => ExerciseFrequency::Rare,
        5 => ExerciseFrequency::Never,
        _ => ExerciseFrequency::Unspecified,
    }
}

fn diet_index(diet: DietType) -> usize {
    match diet {
        DietType::Unspecified => 0,
        DietType::Balanced => 1,
        DietType::Mixed => 2,
        DietType::Processed => 3,
    }
}

fn index_diet(index: usize) -> DietType {
    match index {
        1 => DietType::Balanced,
        2 => DietType::Mixed,
        3 => DietType::Processed,
        _ => DietType::Unspecified,
    }
}

/// Questionnaire screen state for the current section.
pub struct FormScreenState {
    pub step: FormStep,
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
    /// File names already attached, shown on the reports section
    pub attached: Vec<String>,
}

impl FormScreenState {
    /// Build the screen for a section, seeded from the current aggregate so
    /// moving back and forth never loses entered values.
    #[must_use]
    pub fn for_step(step: FormStep, form: &FormData) -> Self {
        let fields = match step {
            FormStep::PersonalInfo => vec![
                FormField::text("Full name", "as on medical records", &form.name),
                FormField::text("Age", "years", &form.age),
                FormField::choice("Gender", GENDERS, gender_index(form.gender)),
                FormField::text("Email", "for the report copy", &form.email),
                FormField::text("Phone", "callback number", &form.phone),
            ],
            FormStep::MedicalHistory => vec![
                FormField::tri("Diagnosed heart disease", form.has_heart_disease),
                FormField::tri("Family history of heart disease", form.has_family_history),
                FormField::tri("Diabetes", form.has_diabetes),
                FormField::tri("Hypertension", form.has_hypertension),
                FormField::tri("High cholesterol", form.has_high_cholesterol),
                FormField::tri("Previous surgeries", form.has_previous_surgeries),
            ],
            FormStep::Lifestyle => vec![
                FormField::tri("Smoker", form.is_smoker),
                FormField::tri("Consumes alcohol", form.consumes_alcohol),
                FormField::choice(
                    "Exercise frequency",
                    EXERCISE,
                    exercise_index(form.exercise_frequency),
                ),
                FormField::choice("Diet type", DIETS, diet_index(form.diet_type)),
            ],
            FormStep::Symptoms => vec![
                FormField::tri("Chest pain", form.has_chest_pain),
                FormField {
                    label: "Chest pain severity",
                    hint: "0-10",
                    value: FieldValue::Slider(form.chest_pain_severity.min(10)),
                },
                FormField::tri("Shortness of breath", form.has_shortness_of_breath),
                FormField::tri("Fatigue", form.has_fatigue),
                FormField::tri("Dizziness", form.has_dizziness),
                FormField::tri("Swelling", form.has_swelling),
            ],
            FormStep::VitalSigns => vec![
                FormField::text("Systolic BP", "mmHg", &form.systolic_bp),
                FormField::text("Diastolic BP", "mmHg", &form.diastolic_bp),
                FormField::text("Cholesterol", "mg/dL", &form.cholesterol_level),
                FormField::text("Blood sugar", "mg/dL fasting", &form.blood_sugar),
                FormField::text("Resting heart rate", "bpm", &form.resting_heart_rate),
                FormField::text("BMI", "kg/m2", &form.bmi),
                FormField::text("ECG image path", "optional", ""),
                FormField::text("Echo image path", "optional", ""),
            ],
            FormStep::DoctorReports => vec![FormField::text(
                "Add report file path",
                "optional, attached on Next",
                "",
            )],
        };

        let mut attached: Vec<String> = Vec::new();
        if let Some(ecg) = &form.ecg_image {
            attached.push(format!("ECG: {}", ecg.file_name));
        }
        if let Some(echo) = &form.echo_image {
            attached.push(format!("Echo: {}", echo.file_name));
        }
        for report in &form.doctor_reports {
            attached.push(format!(
                "{} ({} bytes)",
                report.file_name,
                report.size_bytes()
            ));
        }

        Self {
            step,
            fields,
            selected_field: 0,
            error_message: None,
            attached,
        }
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current field (text fields only)
    pub fn input_char(&mut self, c: char) {
        if let FieldValue::Text(value) = &mut self.fields[self.selected_field].value {
            if !c.is_control() {
                value.push(c);
                self.error_message = None;
            }
        }
    }

    /// Delete the last character of a text field
    pub fn delete_char(&mut self) {
        if let FieldValue::Text(value) = &mut self.fields[self.selected_field].value {
            value.pop();
        }
    }

    /// Cycle a choice backwards or lower the slider
    pub fn cycle_left(&mut self) {
        match &mut self.fields[self.selected_field].value {
            FieldValue::Choice { options, selected } => {
                *selected = if *selected == 0 {
                    options.len() - 1
                } else {
                    *selected - 1
                };
            }
            FieldValue::Slider(v) => *v = v.saturating_sub(1),
            FieldValue::Text(_) => {}
        }
    }

    /// Cycle a choice forwards or raise the slider
    pub fn cycle_right(&mut self) {
        match &mut self.fields[self.selected_field].value {
            FieldValue::Choice { options, selected } => {
                *selected = (*selected + 1) % options.len();
            }
            FieldValue::Slider(v) => *v = (*v + 1).min(10),
            FieldValue::Text(_) => {}
        }
    }

    fn text_at(&self, index: usize) -> String {
        match &self.fields[index].value {
            FieldValue::Text(value) => value.clone(),
            _ => String::new(),
        }
    }

    fn choice_at(&self, index: usize) -> usize {
        match &self.fields[index].value {
            FieldValue::Choice { selected, .. } => *selected,
            _ => 0,
        }
    }

    /// Fold the screen's fields into a partial aggregate update.
    ///
    /// Attachment paths are read here; an unreadable path is reported to the
    /// user instead of silently dropped.
    pub fn to_patch(&self, form: &FormData) -> Result<FormPatch, String> {
        let mut patch = FormPatch::default();

        match self.step {
            FormStep::PersonalInfo => {
                patch.name = Some(self.text_at(0));
                patch.age = Some(self.text_at(1));
                patch.gender = Some(index_gender(self.choice_at(2)));
                patch.email = Some(self.text_at(3));
                patch.phone = Some(self.text_at(4));
            }
            FormStep::MedicalHistory => {
                patch.has_heart_disease = Some(index_answer(self.choice_at(0)));
                patch.has_family_history = Some(index_answer(self.choice_at(1)));
                patch.has_diabetes = Some(index_answer(self.choice_at(2)));
                patch.has_hypertension = Some(index_answer(self.choice_at(3)));
                patch.has_high_cholesterol = Some(index_answer(self.choice_at(4)));
                patch.has_previous_surgeries = Some(index_answer(self.choice_at(5)));
            }
            FormStep::Lifestyle => {
                patch.is_smoker = Some(index_answer(self.choice_at(0)));
                patch.consumes_alcohol = Some(index_answer(self.choice_at(1)));
                patch.exercise_frequency = Some(index_exercise(self.choice_at(2)));
                patch.diet_type = Some(index_diet(self.choice_at(3)));
            }
            FormStep::Symptoms => {
                patch.has_chest_pain = Some(index_answer(self.choice_at(0)));
                if let FieldValue::Slider(severity) = self.fields[1].value {
                    patch.chest_pain_severity = Some(severity);
                }
                patch.has_shortness_of_breath = Some(index_answer(self.choice_at(2)));
                patch.has_fatigue = Some(index_answer(self.choice_at(3)));
                patch.has_dizziness = Some(index_answer(self.choice_at(4)));
                patch.has_swelling = Some(index_answer(self.choice_at(5)));
            }
            FormStep::VitalSigns => {
                patch.systolic_bp = Some(self.text_at(0));
                patch.diastolic_bp = Some(self.text_at(1));
                patch.cholesterol_level = Some(self.text_at(2));
                patch.blood_sugar = Some(self.text_at(3));
                patch.resting_heart_rate = Some(self.text_at(4));
                patch.bmi = Some(self.text_at(5));

                let ecg_path = self.text_at(6);
                if !ecg_path.trim().is_empty() {
                    patch.ecg_image = Some(Some(read_attachment(ecg_path.trim())?));
                }
                let echo_path = self.text_at(7);
                if !echo_path.trim().is_empty() {
                    patch.echo_image = Some(Some(read_attachment(echo_path.trim())?));
                }
            }
            FormStep::DoctorReports => {
                let path = self.text_at(0);
                if !path.trim().is_empty() {
                    let mut reports = form.doctor_reports.clone();
                    reports.push(read_attachment(path.trim())?);
                    patch.doctor_reports = Some(reports);
                }
            }
        }

        Ok(patch)
    }
}

/// Read a file into an opaque attachment. Contents are never parsed.
fn read_attachment(path: &str) -> Result<Attachment, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("{path}: {e}"))?;
    let file_name = std::path::Path::new(path)
        .file_name()
        .map_or_else(|| path.to_string(), |n| n.to_string_lossy().into_owned());
    Ok(Attachment::new(file_name, guess_mime(path), bytes))
}

fn guess_mime(path: &str) -> &'static str {
    let ext = std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Render the questionnaire screen for the current section.
pub fn render_questionnaire(f: &mut Frame, area: Rect, state: &FormScreenState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(2), // Step progress
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_header(f, chunks[0], state.step);
    render_progress(f, chunks[1], state.step);
    render_fields(f, chunks[2], state);
    render_footer(f, chunks[3], state);
}

fn render_header(f: &mut Frame, area: Rect, step: FormStep) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Heart Disease Risk Assessment", MedicalTheme::title()),
        Span::styled(
            format!(
                " │ Step {}/{}: {}",
                step.index() + 1,
                FormStep::ALL.len(),
                step.title()
            ),
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_progress(f: &mut Frame, area: Rect, current: FormStep) {
    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, step) in FormStep::ALL.iter().enumerate() {
        let style = if step.index() < current.index() {
            MedicalTheme::success()
        } else if *step == current {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_muted()
        };
        spans.push(Span::styled(step.title(), style));
        if i + 1 < FormStep::ALL.len() {
            spans.push(Span::styled(" > ", MedicalTheme::text_muted()));
        }
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_fields(f: &mut Frame, area: Rect, state: &FormScreenState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = state.fields.len().div_ceil(2);

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );

    // The reports section has a single field; show what is already attached
    // in the free column.
    if state.step == FormStep::DoctorReports && !state.attached.is_empty() {
        render_attached(f, columns[1], &state.attached);
    }
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let border_style = if is_selected {
            MedicalTheme::border_focused()
        } else {
            MedicalTheme::border()
        };

        let title_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let content = Paragraph::new(field_line(field, is_selected)).block(block);
        f.render_widget(content, chunks[i]);
    }
}

fn field_line(field: &FormField, is_selected: bool) -> Line<'_> {
    let mut spans = vec![Span::raw(" ")];
    match &field.value {
        FieldValue::Text(value) => {
            if value.is_empty() {
                spans.push(Span::styled(field.hint, MedicalTheme::text_muted()));
            } else {
                spans.push(Span::styled(value.as_str(), MedicalTheme::text()));
            }
            if is_selected {
                spans.push(Span::styled(
                    "▌",
                    ratatui::style::Style::default().fg(MedicalTheme::PRIMARY_LIGHT),
                ));
            }
        }
        FieldValue::Choice { options, selected } => {
            spans.push(Span::styled("◀ ", MedicalTheme::text_muted()));
            spans.push(Span::styled(options[*selected], MedicalTheme::text()));
            spans.push(Span::styled(" ▶", MedicalTheme::text_muted()));
        }
        FieldValue::Slider(v) => {
            let filled = usize::from(*v);
            spans.push(Span::styled(
                "▮".repeat(filled),
                MedicalTheme::warning(),
            ));
            spans.push(Span::styled(
                "▯".repeat(10 - filled),
                MedicalTheme::text_muted(),
            ));
            spans.push(Span::styled(format!(" {v}/10"), MedicalTheme::text()));
        }
    }
    Line::from(spans)
}

fn render_attached(f: &mut Frame, area: Rect, attached: &[String]) {
    let mut lines = vec![Line::from(Span::styled(
        "Attached files",
        MedicalTheme::subtitle(),
    ))];
    for name in attached {
        lines.push(Line::from(vec![
            Span::styled("  - ", MedicalTheme::text_muted()),
            Span::styled(name.as_str(), MedicalTheme::text()),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &FormScreenState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        let next_label = if state.step.is_last() {
            "Submit "
        } else {
            "Next "
        };
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Field ", MedicalTheme::key_desc()),
            Span::styled("[←→] ", MedicalTheme::key_hint()),
            Span::styled("Option ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled(next_label, MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Back ", MedicalTheme::key_desc()),
            Span::styled("[Ctrl+Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_info_round_trip() {
        let mut form = FormData::default();
        form.name = "Alex".to_string();
        form.gender = Gender::Female;

        let mut state = FormScreenState::for_step(FormStep::PersonalInfo, &form);
        // Age field is the second one
        state.next_field();
        state.input_char('4');
        state.input_char('7');

        let patch = state.to_patch(&form).expect("Should build patch");
        assert_eq!(patch.age.as_deref(), Some("47"));
        assert_eq!(patch.name.as_deref(), Some("Alex"));
        assert_eq!(patch.gender, Some(Gender::Female));
        // Nothing outside this section is touched.
        assert!(patch.systolic_bp.is_none());
        assert!(patch.has_heart_disease.is_none());
    }

    #[test]
    fn test_tri_state_cycling() {
        let form = FormData::default();
        let mut state = FormScreenState::for_step(FormStep::MedicalHistory, &form);

        state.cycle_right(); // unanswered -> yes
        let patch = state.to_patch(&form).expect("Should build patch");
        assert_eq!(patch.has_heart_disease, Some(Answer::Yes));

        state.cycle_left(); // back to unanswered
        let patch = state.to_patch(&form).expect("Should build patch");
        assert_eq!(patch.has_heart_disease, Some(Answer::Unanswered));
    }

    #[test]
    fn test_slider_bounds() {
        let form = FormData::default();
        let mut state = FormScreenState::for_step(FormStep::Symptoms, &form);
        state.next_field(); // severity slider

        for _ in 0..20 {
            state.cycle_right();
        }
        let patch = state.to_patch(&form).expect("Should build patch");
        assert_eq!(patch.chest_pain_severity, Some(10));

        for _ in 0..20 {
            state.cycle_left();
        }
        let patch = state.to_patch(&form).expect("Should build patch");
        assert_eq!(patch.chest_pain_severity, Some(0));
    }

    #[test]
    fn test_vitals_pass_through_unvalidated() {
        let form = FormData::default();
        let mut state = FormScreenState::for_step(FormStep::VitalSigns, &form);
        for c in "not a number".chars() {
            state.input_char(c);
        }

        let patch = state.to_patch(&form).expect("Should build patch");
        assert_eq!(patch.systolic_bp.as_deref(), Some("not a number"));
    }

    #[test]
    fn test_missing_report_path_is_an_error() {
        let form = FormData::default();
        let mut state = FormScreenState::for_step(FormStep::DoctorReports, &form);
        for c in "/definitely/not/here.pdf".chars() {
            state.input_char(c);
        }

        assert!(state.to_patch(&form).is_err());
    }

    #[test]
    fn test_empty_report_path_is_a_noop() {
        let form = FormData::default();
        let state = FormScreenState::for_step(FormStep::DoctorReports, &form);
        let patch = state.to_patch(&form).expect("Should build patch");
        assert!(patch.doctor_reports.is_none());
    }

    #[test]
    fn test_mime_guessing() {
        assert_eq!(guess_mime("scan.PNG"), "image/png");
        assert_eq!(guess_mime("report.pdf"), "application/pdf");
        assert_eq!(guess_mime("mystery.bin"), "application/octet-stream");
    }
}
