//! REST endpoints for the onboarding wizard.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use super::manager::OnboardingManager;
use super::model::FieldValue;
use crate::error::WizardError;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub manager: Arc<OnboardingManager>,
}

#[derive(Debug, Deserialize)]
struct FieldUpdateBody {
    key: String,
    value: FieldValue,
}

/// Map a wizard error onto a status code and JSON body.
fn error_response(err: WizardError) -> Response {
    let status = match &err {
        WizardError::StepIncomplete { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        WizardError::InvalidPhase { .. } => StatusCode::CONFLICT,
        WizardError::Submission(_) | WizardError::ProfileLoad(_) => StatusCode::BAD_GATEWAY,
        WizardError::InvalidSchema(_) | WizardError::Settings(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let body = match &err {
        WizardError::StepIncomplete { step, errors } => serde_json::json!({
            "error": err.to_string(),
            "step": step,
            "errors": errors,
        }),
        _ => serde_json::json!({"error": err.to_string()}),
    };
    (status, Json(body)).into_response()
}

/// GET /api/onboarding/status
async fn get_status(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.manager.status().await)
}

/// POST /api/onboarding/fields
async fn update_field(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<FieldUpdateBody>,
) -> Response {
    match state.manager.update_field(body.key, body.value).await {
        Ok(()) => Json(state.manager.status().await).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/onboarding/next
///
/// 422 with per-field messages when the current step does not validate.
async fn next_step(State(state): State<OnboardingRouteState>) -> Response {
    match state.manager.next().await {
        Ok(outcome) => Json(serde_json::json!({
            "result": outcome,
            "status": state.manager.status().await,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/onboarding/previous
async fn previous_step(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    state.manager.previous().await;
    Json(state.manager.status().await)
}

/// POST /api/onboarding/submit
async fn submit(State(state): State<OnboardingRouteState>) -> Response {
    match state.manager.submit().await {
        Ok(()) => Json(state.manager.status().await).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/onboarding/dismiss
async fn dismiss_prompt(State(state): State<OnboardingRouteState>) -> Response {
    match state.manager.dismiss_prompt().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding/status", get(get_status))
        .route("/api/onboarding/fields", post(update_field))
        .route("/api/onboarding/next", post(next_step))
        .route("/api/onboarding/previous", post(previous_step))
        .route("/api/onboarding/submit", post(submit))
        .route("/api/onboarding/dismiss", post(dismiss_prompt))
        .with_state(state)
}
