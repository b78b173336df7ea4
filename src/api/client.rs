//! reqwest-backed implementation of the marketplace collaborators.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use super::traits::{ProfileSource, ProfileSubmitter, ProviderDirectory};
use super::types::{ApiErrorBody, ProfileEnvelope, ProviderPage, ProviderQuery};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::onboarding::model::WizardFormState;

const HEALERS_PATH: &str = "/healers";
const PROFILE_PATH: &str = "/profile";

/// HTTP client for the marketplace REST API.
pub struct HttpApiClient {
    base_url: String,
    token: Option<SecretString>,
    client: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestFailed {
                endpoint: base_url.clone(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            base_url,
            token,
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(
            config.api_base_url.clone(),
            config.api_token.clone(),
            config.http_timeout,
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Turn a non-2xx response into `ApiError::Rejected`, using the body's
    /// `message` when present.
    async fn check(endpoint: &str, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| "An error occurred".to_string());
        warn!(endpoint = %endpoint, status = status.as_u16(), %message, "API request rejected");
        Err(ApiError::Rejected {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ProviderDirectory for HttpApiClient {
    async fn fetch_providers(&self, query: &ProviderQuery) -> Result<ProviderPage, ApiError> {
        let endpoint = self.endpoint(HEALERS_PATH);
        debug!(endpoint = %endpoint, page = query.page, limit = query.limit, "Fetching providers");

        let response = self
            .authorize(self.client.get(&endpoint).query(query))
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;
        let response = Self::check(&endpoint, response).await?;

        let page: ProviderPage = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;
        info!(count = page.healers.len(), "Fetched providers");
        Ok(page)
    }
}

#[async_trait]
impl ProfileSubmitter for HttpApiClient {
    async fn submit_profile(&self, form: &WizardFormState) -> Result<(), ApiError> {
        let endpoint = self.endpoint(PROFILE_PATH);
        debug!(endpoint = %endpoint, fields = form.len(), "Submitting profile");

        let response = self
            .authorize(self.client.put(&endpoint).json(form))
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;
        Self::check(&endpoint, response).await?;
        info!("Profile submitted");
        Ok(())
    }
}

#[async_trait]
impl ProfileSource for HttpApiClient {
    async fn fetch_profile(&self) -> Result<Option<serde_json::Value>, ApiError> {
        let endpoint = self.endpoint(PROFILE_PATH);
        debug!(endpoint = %endpoint, "Fetching profile");

        let response = self
            .authorize(self.client.get(&endpoint))
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;
        let response = Self::check(&endpoint, response).await?;

        let envelope: ProfileEnvelope = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;
        Ok(envelope.profile.filter(|p| !p.is_null()))
    }
}
