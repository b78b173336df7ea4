//! OnboardingManager: owns the wizard behind a lock and runs the async
//! submission and prompt-dismissal flows around it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::model::{FieldValue, StepDefinition, WizardFormState};
use super::state::WizardPhase;
use super::wizard::{OnboardingWizard, StepOutcome, StepStatus};
use crate::api::{ProfileSource, ProfileSubmitter};
use crate::error::{FieldErrors, WizardError};
use crate::store::{SettingsStore, settings_keys};

/// The completion prompt stays hidden at or above this percentage.
pub const PROMPT_THRESHOLD: u8 = 80;

/// Snapshot of the wizard for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub phase: WizardPhase,
    pub cursor: usize,
    pub step_count: usize,
    pub current_step: StepDefinition,
    pub steps: Vec<StepStatus>,
    pub progress: u8,
    pub errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub form: WizardFormState,
    pub show_prompt: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

pub struct OnboardingManager {
    wizard: RwLock<OnboardingWizard>,
    submitter: Arc<dyn ProfileSubmitter>,
    settings: Arc<dyn SettingsStore>,
    user_id: String,
}

impl OnboardingManager {
    pub fn new(
        wizard: OnboardingWizard,
        submitter: Arc<dyn ProfileSubmitter>,
        settings: Arc<dyn SettingsStore>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            wizard: RwLock::new(wizard),
            submitter,
            settings,
            user_id: user_id.into(),
        }
    }

    pub async fn status(&self) -> OnboardingStatus {
        let (mut status, progress, finished) = {
            let wizard = self.wizard.read().await;
            let progress = wizard.progress();
            let finished = wizard.phase().is_terminal();
            let status = OnboardingStatus {
                phase: wizard.phase(),
                cursor: wizard.cursor(),
                step_count: wizard.step_count(),
                current_step: wizard.current_step().clone(),
                steps: wizard.step_statuses(),
                progress,
                errors: wizard.errors().clone(),
                last_error: wizard.last_error().map(str::to_string),
                form: wizard.form().clone(),
                show_prompt: false,
                submitted_at: None,
            };
            (status, progress, finished)
        };

        status.show_prompt = !finished
            && progress < PROMPT_THRESHOLD
            && match self.prompt_dismissed().await {
                Ok(dismissed) => !dismissed,
                Err(e) => {
                    warn!("Failed to read prompt setting: {e}");
                    true
                }
            };
        status.submitted_at = self.submitted_at().await;
        status
    }

    pub async fn update_field(&self, key: impl Into<String>, value: FieldValue) -> Result<(), WizardError> {
        self.wizard.write().await.update_field(key, value)
    }

    pub async fn next(&self) -> Result<StepOutcome, WizardError> {
        self.wizard.write().await.next()
    }

    pub async fn previous(&self) -> usize {
        self.wizard.write().await.previous()
    }

    pub async fn progress(&self) -> u8 {
        self.wizard.read().await.progress()
    }

    pub async fn phase(&self) -> WizardPhase {
        self.wizard.read().await.phase()
    }

    /// Prefill the form from the user's stored profile.
    ///
    /// Returns how many values were taken. A user without a profile yet
    /// gets `Ok(0)`.
    pub async fn load_profile(&self, source: &dyn ProfileSource) -> Result<usize, WizardError> {
        let profile = source.fetch_profile().await.map_err(WizardError::ProfileLoad)?;
        let Some(profile) = profile else {
            return Ok(0);
        };

        let mut wizard = self.wizard.write().await;
        let values = WizardFormState::from_profile_json(&profile, wizard.schema());
        let count = wizard.prefill(values)?;
        info!(user_id = %self.user_id, fields = count, progress = wizard.progress(), "Profile loaded");
        Ok(count)
    }

    /// Hand the completed form to the profile service, once.
    ///
    /// The wizard moves to `Submitting` before the lock is released, so
    /// edits, navigation and a second submit are refused while the request
    /// is in flight. On failure the wizard reopens its last step and the
    /// error is returned; there is no retry.
    pub async fn submit(&self) -> Result<(), WizardError> {
        let payload = self.wizard.write().await.begin_submission()?;

        match self.submitter.submit_profile(&payload).await {
            Ok(()) => {
                self.wizard.write().await.mark_submitted()?;
                self.record_submission().await;
                info!(user_id = %self.user_id, fields = payload.len(), "Profile submitted");
                Ok(())
            }
            Err(e) => {
                self.wizard.write().await.submission_failed(e.to_string());
                Err(WizardError::Submission(e))
            }
        }
    }

    /// Whether to show the completion prompt: not yet submitted, progress
    /// under the threshold, and the user has not dismissed it.
    pub async fn should_prompt(&self) -> Result<bool, WizardError> {
        {
            let wizard = self.wizard.read().await;
            if wizard.phase().is_terminal() || wizard.progress() >= PROMPT_THRESHOLD {
                return Ok(false);
            }
        }
        Ok(!self.prompt_dismissed().await?)
    }

    pub async fn dismiss_prompt(&self) -> Result<(), WizardError> {
        self.settings
            .set_setting(
                &self.user_id,
                settings_keys::PROFILE_PROMPT_DISMISSED,
                &serde_json::Value::Bool(true),
            )
            .await?;
        info!(user_id = %self.user_id, "Profile prompt dismissed");
        Ok(())
    }

    async fn prompt_dismissed(&self) -> Result<bool, WizardError> {
        let value = self
            .settings
            .get_setting(&self.user_id, settings_keys::PROFILE_PROMPT_DISMISSED)
            .await?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    async fn record_submission(&self) {
        let now = Utc::now().to_rfc3339();
        if let Err(e) = self
            .settings
            .set_setting(
                &self.user_id,
                settings_keys::PROFILE_SUBMITTED_AT,
                &serde_json::Value::String(now),
            )
            .await
        {
            warn!("Failed to persist submission time: {e}");
        }
    }

    async fn submitted_at(&self) -> Option<DateTime<Utc>> {
        let value = self
            .settings
            .get_setting(&self.user_id, settings_keys::PROFILE_SUBMITTED_AT)
            .await
            .inspect_err(|e| warn!("Failed to read submission time: {e}"))
            .ok()??;
        let raw = value.as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::error::ApiError;
    use crate::onboarding::model::{FieldSpec, WizardSchema};
    use crate::store::MemorySettings;

    struct StubSubmitter {
        calls: AtomicUsize,
        fail: bool,
    }

    impl StubSubmitter {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl ProfileSubmitter for StubSubmitter {
        async fn submit_profile(&self, _form: &WizardFormState) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ApiError::Rejected {
                    endpoint: "/api/profile".into(),
                    status: 500,
                    message: "Failed to update profile".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    /// Holds every submission until released.
    struct GatedSubmitter {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl ProfileSubmitter for GatedSubmitter {
        async fn submit_profile(&self, _form: &WizardFormState) -> Result<(), ApiError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(())
        }
    }

    struct StubProfile(Result<Option<serde_json::Value>, u16>);

    #[async_trait]
    impl ProfileSource for StubProfile {
        async fn fetch_profile(&self) -> Result<Option<serde_json::Value>, ApiError> {
            self.0.clone().map_err(|status| ApiError::Rejected {
                endpoint: "/api/profile".into(),
                status,
                message: "Unauthorized".into(),
            })
        }
    }

    fn wizard() -> OnboardingWizard {
        let schema = WizardSchema::new(vec![
            StepDefinition::new(
                "basic",
                "Basic",
                "",
                vec![
                    FieldSpec::required("firstName", "First name"),
                    FieldSpec::required("lastName", "Last name"),
                ],
            ),
            StepDefinition::new("bio", "Bio", "", vec![FieldSpec::required("bio", "Bio")]),
        ])
        .unwrap();
        OnboardingWizard::new(schema)
    }

    fn manager(submitter: Arc<StubSubmitter>) -> OnboardingManager {
        OnboardingManager::new(wizard(), submitter, Arc::new(MemorySettings::new()), "default")
    }

    async fn complete(manager: &OnboardingManager) {
        manager.update_field("firstName", "Ana".into()).await.unwrap();
        manager.update_field("lastName", "Reyes".into()).await.unwrap();
        manager.next().await.unwrap();
        manager.update_field("bio", "Sound healer".into()).await.unwrap();
        assert_eq!(manager.next().await.unwrap(), StepOutcome::Complete);
    }

    #[tokio::test]
    async fn submit_before_complete_is_rejected_without_calling_out() {
        let submitter = StubSubmitter::new(false);
        let manager = manager(submitter.clone());
        let err = manager.submit().await.unwrap_err();
        assert!(matches!(err, WizardError::InvalidPhase { .. }));
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_submit_is_terminal_and_recorded() {
        let submitter = StubSubmitter::new(false);
        let manager = manager(submitter.clone());
        complete(&manager).await;

        manager.submit().await.unwrap();
        assert_eq!(manager.phase().await, WizardPhase::Submitted);
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
        assert!(manager.status().await.submitted_at.is_some());

        // A second submit does not reach the collaborator again.
        assert!(manager.submit().await.is_err());
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_submit_reopens_last_step_and_keeps_form() {
        let submitter = StubSubmitter::new(true);
        let manager = manager(submitter.clone());
        complete(&manager).await;

        let err = manager.submit().await.unwrap_err();
        assert!(matches!(err, WizardError::Submission(ApiError::Rejected { status: 500, .. })));
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);

        let status = manager.status().await;
        assert_eq!(status.phase, WizardPhase::Editing);
        assert_eq!(status.cursor, 1);
        assert!(status.last_error.unwrap().contains("Failed to update profile"));
        assert_eq!(status.form.get("bio"), Some(&FieldValue::from("Sound healer")));
        assert!(status.submitted_at.is_none());
    }

    #[tokio::test]
    async fn navigation_during_submit_does_not_strand_accepted_profile() {
        let submitter = Arc::new(GatedSubmitter {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let manager = Arc::new(OnboardingManager::new(
            wizard(),
            submitter.clone(),
            Arc::new(MemorySettings::new()),
            "default",
        ));
        complete(&manager).await;

        let in_flight = tokio::spawn({
            let manager = Arc::clone(&manager);
            async move { manager.submit().await }
        });
        submitter.entered.notified().await;

        assert_eq!(manager.phase().await, WizardPhase::Submitting);
        assert_eq!(manager.previous().await, 1);
        assert!(manager.update_field("bio", "changed".into()).await.is_err());
        assert!(matches!(manager.submit().await, Err(WizardError::InvalidPhase { .. })));
        assert_eq!(manager.phase().await, WizardPhase::Submitting);

        submitter.release.notify_one();
        in_flight.await.unwrap().unwrap();
        assert_eq!(manager.phase().await, WizardPhase::Submitted);
        assert!(!manager.should_prompt().await.unwrap());
    }

    #[tokio::test]
    async fn load_profile_prefills_known_fields() {
        let manager = manager(StubSubmitter::new(false));
        let source = StubProfile(Ok(Some(serde_json::json!({
            "firstName": "Ana",
            "lastName": "Reyes",
            "email": "ana@example.com",
        }))));

        assert_eq!(manager.load_profile(&source).await.unwrap(), 2);
        let status = manager.status().await;
        assert_eq!(status.progress, 67);
        assert_eq!(status.form.get("firstName"), Some(&FieldValue::from("Ana")));
        assert!(status.form.get("email").is_none());
    }

    #[tokio::test]
    async fn load_profile_without_profile_or_on_error_leaves_form_empty() {
        let manager = manager(StubSubmitter::new(false));
        assert_eq!(manager.load_profile(&StubProfile(Ok(None))).await.unwrap(), 0);

        let err = manager.load_profile(&StubProfile(Err(401))).await.unwrap_err();
        assert!(matches!(err, WizardError::ProfileLoad(ApiError::Rejected { status: 401, .. })));
        assert_eq!(manager.progress().await, 0);
    }

    #[tokio::test]
    async fn prompt_hidden_at_threshold() {
        let manager = manager(StubSubmitter::new(false));
        assert!(manager.should_prompt().await.unwrap());

        manager.update_field("firstName", "Ana".into()).await.unwrap();
        manager.update_field("lastName", "Reyes".into()).await.unwrap();
        // 2 of 3 fields: 67%
        assert!(manager.should_prompt().await.unwrap());

        manager.update_field("bio", "Sound healer".into()).await.unwrap();
        assert!(!manager.should_prompt().await.unwrap());
    }

    #[tokio::test]
    async fn dismissed_prompt_stays_hidden() {
        let settings = Arc::new(MemorySettings::new());
        let manager = OnboardingManager::new(wizard(), StubSubmitter::new(false), settings.clone(), "u1");
        manager.dismiss_prompt().await.unwrap();
        assert!(!manager.should_prompt().await.unwrap());
        assert!(!manager.status().await.show_prompt);

        let flag = settings
            .get_setting("u1", settings_keys::PROFILE_PROMPT_DISMISSED)
            .await
            .unwrap();
        assert_eq!(flag, Some(serde_json::json!(true)));
    }
}
