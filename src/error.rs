//! Error types for Healer Hub.

use std::collections::BTreeMap;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Settings store errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors from the remote marketplace API (provider fetch, profile submission).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("Request to {endpoint} rejected with status {status}: {message}")]
    Rejected {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

/// Field key → human-readable validation message.
pub type FieldErrors = BTreeMap<String, String>;

/// Onboarding wizard errors.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Step {step} has {} unsatisfied field(s)", errors.len())]
    StepIncomplete { step: usize, errors: FieldErrors },

    #[error("Cannot {action} while wizard is {phase}")]
    InvalidPhase { phase: String, action: String },

    #[error("Invalid wizard schema: {0}")]
    InvalidSchema(String),

    #[error("Profile submission failed: {0}")]
    Submission(#[from] ApiError),

    #[error("Profile could not be loaded: {0}")]
    ProfileLoad(ApiError),

    #[error("Settings error: {0}")]
    Settings(#[from] DatabaseError),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
