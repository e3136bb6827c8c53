//! Form session: the single owner of the questionnaire aggregate.
//!
//! Holds the aggregate and the current step, applies partial updates as the
//! user moves through sections, and signals submission when advancing past
//! the last section. Scoring itself happens elsewhere; the session only
//! hands out snapshots.

use crate::domain::{FormData, FormPatch, FormStep};

/// What a call to [`FormSession::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given section.
    Moved(FormStep),
    /// Already on the last section; the aggregate is ready for scoring.
    Submit,
}

/// One questionnaire session: aggregate plus linear step position.
#[derive(Debug, Clone, Default)]
pub struct FormSession {
    form: FormData,
    step: FormStep,
}

impl FormSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the current aggregate.
    #[must_use]
    pub fn form(&self) -> &FormData {
        &self.form
    }

    /// The section the user is currently on.
    #[must_use]
    pub fn step(&self) -> FormStep {
        self.step
    }

    /// Merge a partial set of fields into the aggregate.
    ///
    /// No validation happens here; values pass through unchanged.
    pub fn update(&mut self, patch: FormPatch) {
        self.form.apply(patch);
    }

    /// Take a snapshot of the aggregate for scoring.
    #[must_use]
    pub fn snapshot(&self) -> FormData {
        self.form.clone()
    }

    /// Move to the next section, or signal submission on the last one.
    pub fn advance(&mut self) -> Advance {
        match self.step.next() {
            Some(next) => {
                self.step = next;
                Advance::Moved(next)
            }
            None => Advance::Submit,
        }
    }

    /// Move to the previous section; a no-op before the first.
    pub fn retreat(&mut self) -> FormStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Restore the default aggregate and the first section.
    pub fn reset(&mut self) {
        tracing::debug!("Resetting questionnaire session");
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Answer;

    #[test]
    fn test_starts_at_first_step_with_defaults() {
        let session = FormSession::new();
        assert_eq!(session.step(), FormStep::PersonalInfo);
        assert_eq!(session.form(), &FormData::default());
    }

    #[test]
    fn test_update_merges_partial_fields() {
        let mut session = FormSession::new();
        session.update(FormPatch {
            name: Some("Alex".to_string()),
            ..FormPatch::default()
        });
        session.update(FormPatch {
            has_diabetes: Some(Answer::Yes),
            ..FormPatch::default()
        });

        assert_eq!(session.form().name, "Alex");
        assert_eq!(session.form().has_diabetes, Answer::Yes);
    }

    #[test]
    fn test_advance_signals_submit_on_last_step() {
        let mut session = FormSession::new();
        for _ in 0..FormStep::ALL.len() - 1 {
            assert!(matches!(session.advance(), Advance::Moved(_)));
        }
        assert_eq!(session.step(), FormStep::DoctorReports);

        // Past the end: no movement, submission is signalled instead.
        assert_eq!(session.advance(), Advance::Submit);
        assert_eq!(session.step(), FormStep::DoctorReports);
        assert_eq!(session.advance(), Advance::Submit);
    }

    #[test]
    fn test_retreat_is_a_noop_on_first_step() {
        let mut session = FormSession::new();
        assert_eq!(session.retreat(), FormStep::PersonalInfo);

        session.advance();
        session.advance();
        assert_eq!(session.retreat(), FormStep::MedicalHistory);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut session = FormSession::new();
        session.update(FormPatch {
            age: Some("61".to_string()),
            is_smoker: Some(Answer::Yes),
            ..FormPatch::default()
        });
        session.advance();
        session.advance();

        session.reset();
        assert_eq!(session.step(), FormStep::PersonalInfo);
        assert_eq!(session.form(), &FormData::default());
    }
}
