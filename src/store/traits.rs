//! Storage trait for per-user settings.

use async_trait::async_trait;

use crate::error::DatabaseError;

/// Well-known settings keys.
pub mod settings_keys {
    /// Set once the user closes the profile-completion prompt.
    pub const PROFILE_PROMPT_DISMISSED: &str = "profile_completion_dismissed";
    /// RFC 3339 timestamp of the last accepted profile submission.
    pub const PROFILE_SUBMITTED_AT: &str = "profile_submitted_at";
}

/// Async key/value store of JSON settings, scoped by user.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError>;

    /// Insert or overwrite.
    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError>;

    /// Returns whether a row was removed.
    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, DatabaseError>;
}
