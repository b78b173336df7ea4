//! OnboardingWizard: a strictly ordered multi-step form.
//!
//! Forward movement is gated on the current step validating. Validation
//! failures are recorded per field for display and never leave this
//! module. Submission is split in two: the wizard hands out the payload
//! and records the outcome, while the async call itself lives in
//! [`OnboardingManager`](super::manager::OnboardingManager).

use serde::Serialize;
use tracing::{debug, info, warn};

use super::model::{FieldValue, StepDefinition, WizardFormState, WizardSchema};
use super::state::WizardPhase;
use crate::error::{FieldErrors, WizardError};

/// Result of a successful `next()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "step", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Cursor moved to this step.
    Advanced(usize),
    /// The last step validated; the form is ready to submit.
    Complete,
}

/// Completion badge for one step indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepStatus {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub complete: bool,
    pub current: bool,
}

#[derive(Debug, Clone)]
pub struct OnboardingWizard {
    schema: WizardSchema,
    form: WizardFormState,
    cursor: usize,
    phase: WizardPhase,
    errors: FieldErrors,
    last_error: Option<String>,
}

impl OnboardingWizard {
    pub fn new(schema: WizardSchema) -> Self {
        Self::with_form(schema, WizardFormState::new())
    }

    /// Start on step 0 with values already filled in.
    pub fn with_form(schema: WizardSchema, form: WizardFormState) -> Self {
        Self {
            schema,
            form,
            cursor: 0,
            phase: WizardPhase::Editing,
            errors: FieldErrors::new(),
            last_error: None,
        }
    }

    pub fn schema(&self) -> &WizardSchema {
        &self.schema
    }

    pub fn form(&self) -> &WizardFormState {
        &self.form
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn step_count(&self) -> usize {
        self.schema.len()
    }

    pub fn is_last_step(&self) -> bool {
        self.cursor + 1 == self.step_count()
    }

    pub fn current_step(&self) -> &StepDefinition {
        &self.schema.steps()[self.cursor]
    }

    /// Errors recorded by the last rejected `next()`, minus fields edited since.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn field_error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// Message from the last failed submission, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Write a value. Only allowed while editing.
    pub fn update_field(&mut self, key: impl Into<String>, value: FieldValue) -> Result<(), WizardError> {
        if !self.phase.accepts_edits() {
            return Err(self.invalid_phase("update fields"));
        }
        let key = key.into();
        self.errors.remove(&key);
        self.form.set(key, value);
        Ok(())
    }

    /// Unsatisfied fields of step `index` with their messages. Empty for an
    /// out-of-range index.
    pub fn missing_fields(&self, index: usize) -> FieldErrors {
        let Some(step) = self.schema.step(index) else {
            return FieldErrors::new();
        };
        step.fields
            .iter()
            .filter(|field| !field.is_satisfied_by(self.form.get(&field.key)))
            .map(|field| (field.key.clone(), field.error_message()))
            .collect()
    }

    /// Whether every field of step `index` is satisfied. Out of range is `false`.
    pub fn validate_step(&self, index: usize) -> bool {
        self.schema.step(index).is_some_and(|step| {
            step.fields
                .iter()
                .all(|field| field.is_satisfied_by(self.form.get(&field.key)))
        })
    }

    /// Advance past the current step if it validates.
    ///
    /// On rejection the cursor stays put and the per-field errors are both
    /// returned and recorded.
    pub fn next(&mut self) -> Result<StepOutcome, WizardError> {
        if self.phase != WizardPhase::Editing {
            return Err(self.invalid_phase("advance"));
        }

        let missing = self.missing_fields(self.cursor);
        if !missing.is_empty() {
            debug!(step = self.cursor, missing = missing.len(), "Step rejected");
            self.errors = missing.clone();
            return Err(WizardError::StepIncomplete {
                step: self.cursor,
                errors: missing,
            });
        }

        self.errors.clear();
        if self.is_last_step() {
            self.phase = WizardPhase::Complete;
            info!(steps = self.step_count(), "Wizard complete");
            Ok(StepOutcome::Complete)
        } else {
            self.cursor += 1;
            debug!(step = self.cursor, "Advanced to step");
            Ok(StepOutcome::Advanced(self.cursor))
        }
    }

    /// Step back without validating. From `Complete` this reopens the last
    /// step. At step 0, while submitting, or once submitted it does nothing.
    pub fn previous(&mut self) -> usize {
        if self.phase.is_frozen() {
            return self.cursor;
        }
        if self.phase == WizardPhase::Complete {
            self.phase = WizardPhase::Editing;
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
        self.cursor
    }

    /// Fill in values from an existing profile before the user starts.
    /// Returns how many values were written.
    pub fn prefill(&mut self, values: WizardFormState) -> Result<usize, WizardError> {
        if !self.phase.accepts_edits() {
            return Err(self.invalid_phase("prefill"));
        }
        let count = values.len();
        for (key, _) in values.iter() {
            self.errors.remove(key);
        }
        self.form.merge(values);
        Ok(count)
    }

    /// Percentage of all fields whose rule is satisfied, rounded.
    pub fn progress(&self) -> u8 {
        let total = self.schema.field_count();
        if total == 0 {
            return 0;
        }
        let satisfied = self
            .schema
            .fields()
            .filter(|field| field.is_satisfied_by(self.form.get(&field.key)))
            .count();
        (satisfied as f64 * 100.0 / total as f64).round() as u8
    }

    pub fn step_statuses(&self) -> Vec<StepStatus> {
        self.schema
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step)| StepStatus {
                index,
                id: step.id.clone(),
                title: step.title.clone(),
                complete: self.validate_step(index),
                current: index == self.cursor && self.phase == WizardPhase::Editing,
            })
            .collect()
    }

    /// Freeze the form and hand out the payload for the profile service.
    ///
    /// Only from `Complete`. Until the outcome is recorded with
    /// [`mark_submitted`](Self::mark_submitted) or
    /// [`submission_failed`](Self::submission_failed), edits and navigation
    /// are refused.
    pub fn begin_submission(&mut self) -> Result<WizardFormState, WizardError> {
        if !self.phase.can_transition_to(WizardPhase::Submitting) {
            return Err(self.invalid_phase("submit"));
        }
        self.phase = WizardPhase::Submitting;
        Ok(self.form.clone())
    }

    pub fn mark_submitted(&mut self) -> Result<(), WizardError> {
        if !self.phase.can_transition_to(WizardPhase::Submitted) {
            return Err(self.invalid_phase("mark submitted"));
        }
        self.phase = WizardPhase::Submitted;
        self.last_error = None;
        info!("Profile submission accepted");
        Ok(())
    }

    /// Reopen the last step so the user can correct input and retry.
    pub fn submission_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "Profile submission failed");
        if self.phase == WizardPhase::Submitting {
            self.phase = WizardPhase::Editing;
            self.cursor = self.step_count() - 1;
        }
        self.last_error = Some(message);
    }

    fn invalid_phase(&self, action: &str) -> WizardError {
        WizardError::InvalidPhase {
            phase: self.phase.to_string(),
            action: action.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::onboarding::model::{FieldRule, FieldSpec};
    use crate::onboarding::schema::healer_onboarding_steps;

    fn two_step() -> OnboardingWizard {
        let schema = WizardSchema::new(vec![
            StepDefinition::new("basic", "Basic", "", vec![FieldSpec::required("firstName", "First name")]),
            StepDefinition::new(
                "rates",
                "Rates",
                "",
                vec![FieldSpec::new("hourlyRate", "Hourly rate", FieldRule::GreaterThan(0.0))],
            ),
        ])
        .unwrap();
        OnboardingWizard::new(schema)
    }

    fn completed() -> OnboardingWizard {
        let mut wizard = two_step();
        wizard.update_field("firstName", "Ana".into()).unwrap();
        wizard.update_field("hourlyRate", FieldValue::Number(85.0)).unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.next().unwrap(), StepOutcome::Complete);
        wizard
    }

    #[test]
    fn blank_name_rejects_then_advances_once_filled() {
        let mut wizard = two_step();
        wizard.update_field("firstName", "".into()).unwrap();

        let err = wizard.next().unwrap_err();
        match err {
            WizardError::StepIncomplete { step, errors } => {
                assert_eq!(step, 0);
                assert_eq!(errors["firstName"], "First name is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(wizard.cursor(), 0);
        assert_eq!(wizard.field_error("firstName"), Some("First name is required"));

        wizard.update_field("firstName", "Ana".into()).unwrap();
        assert!(wizard.field_error("firstName").is_none(), "editing clears the error");
        assert_eq!(wizard.next().unwrap(), StepOutcome::Advanced(1));
        assert_eq!(wizard.cursor(), 1);
        assert_eq!(wizard.current_step().id, "rates");
    }

    #[test]
    fn validate_step_is_pure_and_bounds_checked() {
        let mut wizard = two_step();
        assert!(!wizard.validate_step(0));
        assert!(!wizard.validate_step(7));
        assert!(wizard.errors().is_empty());
        wizard.update_field("firstName", "Ana".into()).unwrap();
        assert!(wizard.validate_step(0));
        assert!(!wizard.validate_step(1));
        assert!(wizard.missing_fields(7).is_empty());
    }

    #[test]
    fn previous_stops_at_first_step() {
        let mut wizard = two_step();
        assert_eq!(wizard.previous(), 0);
        wizard.update_field("firstName", "Ana".into()).unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.previous(), 0);
        assert_eq!(wizard.phase(), WizardPhase::Editing);
    }

    #[test]
    fn previous_from_complete_reopens_last_step() {
        let mut wizard = completed();
        assert_eq!(wizard.phase(), WizardPhase::Complete);
        assert_eq!(wizard.previous(), 1);
        assert_eq!(wizard.phase(), WizardPhase::Editing);
        assert!(wizard.is_last_step());
    }

    #[test]
    fn complete_blocks_edits_and_next() {
        let mut wizard = completed();
        assert!(matches!(
            wizard.update_field("firstName", "Bo".into()),
            Err(WizardError::InvalidPhase { .. })
        ));
        assert!(matches!(wizard.next(), Err(WizardError::InvalidPhase { .. })));
    }

    #[test]
    fn payload_only_when_complete() {
        let mut wizard = two_step();
        assert!(wizard.begin_submission().is_err());
        assert_eq!(wizard.phase(), WizardPhase::Editing);

        let mut wizard = completed();
        let payload = wizard.begin_submission().unwrap();
        assert_eq!(payload.get("firstName"), Some(&FieldValue::from("Ana")));
        assert_eq!(wizard.phase(), WizardPhase::Submitting);
        assert!(wizard.begin_submission().is_err(), "one submission at a time");
    }

    #[test]
    fn submitting_freezes_navigation_and_edits() {
        let mut wizard = completed();
        wizard.begin_submission().unwrap();

        assert_eq!(wizard.previous(), 1);
        assert_eq!(wizard.phase(), WizardPhase::Submitting);
        assert!(matches!(wizard.next(), Err(WizardError::InvalidPhase { .. })));
        assert!(wizard.update_field("firstName", "Bo".into()).is_err());
        assert!(wizard.prefill(WizardFormState::new()).is_err());

        wizard.mark_submitted().unwrap();
        assert_eq!(wizard.phase(), WizardPhase::Submitted);
    }

    #[test]
    fn mark_submitted_requires_submission_in_flight() {
        let mut wizard = completed();
        assert!(wizard.mark_submitted().is_err());
        assert_eq!(wizard.phase(), WizardPhase::Complete);
    }

    #[test]
    fn prefill_merges_and_clears_errors() {
        let mut wizard = two_step();
        assert!(wizard.next().is_err());
        assert!(wizard.field_error("firstName").is_some());

        let mut values = WizardFormState::new();
        values.set("firstName", "Ana".into());
        values.set("hourlyRate", FieldValue::Number(90.0));
        assert_eq!(wizard.prefill(values).unwrap(), 2);
        assert!(wizard.field_error("firstName").is_none());
        assert_eq!(wizard.progress(), 100);
    }

    #[test]
    fn submitted_is_terminal() {
        let mut wizard = completed();
        wizard.begin_submission().unwrap();
        wizard.mark_submitted().unwrap();
        assert_eq!(wizard.phase(), WizardPhase::Submitted);
        assert_eq!(wizard.previous(), 1);
        assert_eq!(wizard.phase(), WizardPhase::Submitted);
        assert!(wizard.update_field("firstName", "Bo".into()).is_err());
        assert!(wizard.mark_submitted().is_err());
    }

    #[test]
    fn failed_submission_reopens_last_step_with_error() {
        let mut wizard = completed();
        wizard.begin_submission().unwrap();
        wizard.submission_failed("Failed to create profile");
        assert_eq!(wizard.phase(), WizardPhase::Editing);
        assert_eq!(wizard.cursor(), 1);
        assert_eq!(wizard.last_error(), Some("Failed to create profile"));
        assert_eq!(wizard.form().get("firstName"), Some(&FieldValue::from("Ana")));

        // Retry path
        assert_eq!(wizard.next().unwrap(), StepOutcome::Complete);
        wizard.begin_submission().unwrap();
        wizard.mark_submitted().unwrap();
        assert!(wizard.last_error().is_none());
    }

    #[test]
    fn progress_rounds_over_all_fields() {
        let schema = WizardSchema::new(vec![StepDefinition::new(
            "basic",
            "Basic",
            "",
            vec![
                FieldSpec::required("firstName", "First name"),
                FieldSpec::required("lastName", "Last name"),
                FieldSpec::required("bio", "Bio"),
            ],
        )])
        .unwrap();
        let mut wizard = OnboardingWizard::new(schema);
        assert_eq!(wizard.progress(), 0);
        wizard.update_field("firstName", "Ana".into()).unwrap();
        assert_eq!(wizard.progress(), 33);
        wizard.update_field("lastName", "Reyes".into()).unwrap();
        assert_eq!(wizard.progress(), 67);
        wizard.update_field("bio", "Sound healer".into()).unwrap();
        assert_eq!(wizard.progress(), 100);
    }

    #[test]
    fn step_statuses_track_badges() {
        let mut wizard = two_step();
        wizard.update_field("hourlyRate", "120".into()).unwrap();
        let statuses = wizard.step_statuses();
        assert_eq!(statuses.len(), 2);
        assert!(!statuses[0].complete);
        assert!(statuses[0].current);
        assert!(statuses[1].complete);
        assert!(!statuses[1].current);
    }

    #[test]
    fn healer_onboarding_walks_six_steps() {
        let mut wizard = OnboardingWizard::with_form(
            healer_onboarding_steps().unwrap(),
            crate::onboarding::schema::healer_onboarding_defaults(),
        );
        for (key, value) in [
            ("firstName", FieldValue::from("Ana")),
            ("lastName", FieldValue::from("Reyes")),
            ("bio", FieldValue::from("Sound healer")),
            ("location", FieldValue::from("Austin, TX")),
        ] {
            wizard.update_field(key, value).unwrap();
        }
        assert_eq!(wizard.next().unwrap(), StepOutcome::Advanced(1));

        let err = wizard.next().unwrap_err();
        assert!(matches!(err, WizardError::StepIncomplete { step: 1, ref errors } if errors.len() == 2));
        wizard.update_field("specialties", vec!["Sound Healing"].into()).unwrap();
        wizard.update_field("sessionTypes", vec!["Virtual"].into()).unwrap();
        assert_eq!(wizard.next().unwrap(), StepOutcome::Advanced(2));
        assert_eq!(wizard.next().unwrap(), StepOutcome::Advanced(3));

        assert_eq!(
            wizard.next().unwrap_err().to_string(),
            "Step 3 has 1 unsatisfied field(s)"
        );
        wizard.update_field("hourlyRate", FieldValue::Number(90.0)).unwrap();
        assert_eq!(wizard.next().unwrap(), StepOutcome::Advanced(4));
        assert_eq!(wizard.next().unwrap(), StepOutcome::Advanced(5));
        assert_eq!(wizard.next().unwrap(), StepOutcome::Complete);
        assert_eq!(wizard.progress(), 100);
    }

    proptest! {
        #[test]
        fn full_progress_iff_every_step_validates(filled in proptest::collection::vec(any::<bool>(), 3)) {
            let schema = WizardSchema::new(vec![
                StepDefinition::new("a", "A", "", vec![FieldSpec::required("first", "First")]),
                StepDefinition::new("b", "B", "", vec![
                    FieldSpec::required("second", "Second"),
                    FieldSpec::list("third", "Third"),
                ]),
            ]).unwrap();
            let mut wizard = OnboardingWizard::new(schema);
            if filled[0] { wizard.update_field("first", "x".into()).unwrap(); }
            if filled[1] { wizard.update_field("second", "y".into()).unwrap(); }
            if filled[2] { wizard.update_field("third", vec!["z"].into()).unwrap(); }

            let all_valid = (0..wizard.step_count()).all(|i| wizard.validate_step(i));
            prop_assert_eq!(wizard.progress() == 100, all_valid);
        }

        #[test]
        fn rejected_next_never_moves_cursor(name in "[ a-z]{0,4}") {
            let mut wizard = two_step();
            wizard.update_field("firstName", FieldValue::Text(name.clone())).unwrap();
            let before = wizard.cursor();
            if wizard.next().is_err() {
                prop_assert_eq!(wizard.cursor(), before);
                prop_assert!(name.trim().is_empty());
            } else {
                prop_assert_eq!(wizard.cursor(), 1);
            }
        }
    }
}
