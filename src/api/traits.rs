//! Collaborator contracts for the remote marketplace API.
//!
//! The engines never talk to the network themselves; the managers call
//! through these traits so tests can substitute stubs.

use async_trait::async_trait;

use super::types::{ProviderPage, ProviderQuery};
use crate::error::ApiError;
use crate::onboarding::model::WizardFormState;

/// Source of provider records.
#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    /// Fetch one page of providers matching the server-side criteria.
    async fn fetch_providers(&self, query: &ProviderQuery) -> Result<ProviderPage, ApiError>;
}

/// Destination for a completed profile wizard.
#[async_trait]
pub trait ProfileSubmitter: Send + Sync {
    /// Persist the full form state. All-or-nothing; no partial submission.
    async fn submit_profile(&self, form: &WizardFormState) -> Result<(), ApiError>;
}

/// Where an existing profile is read from to prefill the wizard.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// The stored profile object, or `None` when the user has none yet.
    async fn fetch_profile(&self) -> Result<Option<serde_json::Value>, ApiError>;
}
