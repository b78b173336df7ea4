//! HTTP surface: merges the search and onboarding routers behind one app.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    http::{Method, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::get,
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::api::HttpApiClient;
use crate::config::AppConfig;
use crate::error::Result;
use crate::onboarding::{OnboardingManager, OnboardingRouteState, OnboardingWizard, onboarding_routes};
use crate::search::{SearchFilterEngine, SearchManager, SearchRouteState, search_routes};
use crate::store::{LibSqlBackend, SettingsStore};

/// Wire every collaborator from `config` and build the router.
///
/// An unreachable provider directory or profile service is logged and
/// skipped: the app starts with an empty collection or a blank form.
pub async fn build_app(config: &AppConfig) -> Result<Router> {
    let layout = config.role.wizard_layout(config.wizard)?;
    let settings: Arc<dyn SettingsStore> = Arc::new(LibSqlBackend::new_local(&config.db_path).await?);
    let client = Arc::new(HttpApiClient::from_config(config)?);

    let search = Arc::new(SearchManager::new(
        SearchFilterEngine::new(),
        client.clone(),
        config.page_limit,
    ));
    match search.refresh().await {
        Ok(results) => info!(providers = results.total_providers, "Initial provider load"),
        Err(e) => warn!("Provider directory unavailable, starting empty: {e}"),
    }

    let onboarding = Arc::new(OnboardingManager::new(
        OnboardingWizard::with_form(layout.schema, layout.defaults),
        client.clone(),
        settings,
        config.user_id.clone(),
    ));
    match onboarding.load_profile(client.as_ref()).await {
        Ok(fields) => info!(fields, "Wizard prefilled from stored profile"),
        Err(e) => warn!("Starting wizard without stored profile: {e}"),
    }

    Ok(app_router(search, onboarding))
}

/// Build the full application router.
pub fn app_router(search: Arc<SearchManager>, onboarding: Arc<OnboardingManager>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health))
        .merge(search_routes(SearchRouteState { manager: search }))
        .merge(onboarding_routes(OnboardingRouteState { manager: onboarding }))
        .layer(cors)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "healer-hub"
    }))
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
