//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::onboarding::schema::{ProfileRole, WizardKind};

/// Runtime configuration for the local service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the marketplace REST API (without the `/api` suffix).
    pub api_base_url: String,
    /// Bearer token attached to API requests, if any.
    pub api_token: Option<SecretString>,
    /// Port the local REST surface listens on.
    pub listen_port: u16,
    /// Path of the libSQL settings database.
    pub db_path: PathBuf,
    /// Page size requested from the provider directory.
    pub page_limit: u32,
    /// Per-request timeout for the API client.
    pub http_timeout: Duration,
    /// Settings namespace (single-user system).
    pub user_id: String,
    /// Which side of the marketplace the wizard serves.
    pub role: ProfileRole,
    /// Profile completion or first-time onboarding.
    pub wizard: WizardKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3003".to_string(),
            api_token: None,
            listen_port: 8080,
            db_path: PathBuf::from("./data/healer-hub.db"),
            page_limit: 20,
            http_timeout: Duration::from_secs(15),
            user_id: "default".to_string(),
            role: ProfileRole::Healer,
            wizard: WizardKind::Profile,
        }
    }
}

impl AppConfig {
    /// Build config from `HEALER_HUB_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source.
    ///
    /// Unparseable numbers fall back to their defaults. An unknown role or
    /// wizard kind is an error, as is seeker onboarding.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = get("HEALER_HUB_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let api_token = get("HEALER_HUB_API_TOKEN").map(SecretString::from);

        let listen_port: u16 = get("HEALER_HUB_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.listen_port);

        let db_path = get("HEALER_HUB_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let page_limit: u32 = get("HEALER_HUB_PAGE_LIMIT")
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.page_limit);

        let http_timeout = get("HEALER_HUB_HTTP_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        let user_id = get("HEALER_HUB_USER_ID").unwrap_or(defaults.user_id);

        let role = match get("HEALER_HUB_ROLE") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "HEALER_HUB_ROLE".to_string(),
                message: format!("expected 'healer' or 'seeker', got '{raw}'"),
            })?,
            None => defaults.role,
        };

        let wizard = match get("HEALER_HUB_WIZARD") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "HEALER_HUB_WIZARD".to_string(),
                message: format!("expected 'profile' or 'onboarding', got '{raw}'"),
            })?,
            None => defaults.wizard,
        };
        if role == ProfileRole::Seeker && wizard == WizardKind::Onboarding {
            return Err(ConfigError::InvalidValue {
                key: "HEALER_HUB_WIZARD".to_string(),
                message: "onboarding is only available for healers".to_string(),
            });
        }

        Ok(Self {
            api_base_url,
            api_token,
            listen_port,
            db_path,
            page_limit,
            http_timeout,
            user_id,
            role,
            wizard,
        })
    }
}
