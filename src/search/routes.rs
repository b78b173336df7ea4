//! REST endpoints for provider search and filtering.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;

use super::filter::{FilterDefaults, FilterField, FilterUpdate, SetField};
use super::manager::SearchManager;
use super::model::Coordinates;

/// Shared state for search routes.
#[derive(Clone)]
pub struct SearchRouteState {
    pub manager: Arc<SearchManager>,
}

#[derive(Debug, Deserialize)]
struct SetItemBody {
    field: SetField,
    item: String,
}

#[derive(Debug, Default, Deserialize)]
struct ClearParams {
    field: Option<FilterField>,
}

#[derive(Debug, Default, Deserialize)]
struct RefreshParams {
    page: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct SuggestionParams {
    #[serde(default)]
    q: String,
}

/// Build the search REST routes.
pub fn search_routes(state: SearchRouteState) -> Router {
    Router::new()
        .route("/api/search", get(get_results))
        .route("/api/search/filters", post(update_filter))
        .route("/api/search/filters/add", post(add_to_filter))
        .route("/api/search/filters/remove", post(remove_from_filter))
        .route("/api/search/filters/clear", post(clear_filters))
        .route("/api/search/filters/seed", post(seed_filters))
        .route("/api/search/reference", post(set_reference_point))
        .route("/api/search/options", get(get_options))
        .route("/api/search/suggestions", get(get_suggestions))
        .route("/api/search/refresh", post(refresh))
        .with_state(state)
}

async fn get_results(State(state): State<SearchRouteState>) -> impl IntoResponse {
    Json(state.manager.results().await)
}

async fn update_filter(
    State(state): State<SearchRouteState>,
    Json(update): Json<FilterUpdate>,
) -> impl IntoResponse {
    Json(state.manager.update_filter(update).await)
}

async fn add_to_filter(
    State(state): State<SearchRouteState>,
    Json(body): Json<SetItemBody>,
) -> impl IntoResponse {
    Json(state.manager.add_to_filter(body.field, &body.item).await)
}

async fn remove_from_filter(
    State(state): State<SearchRouteState>,
    Json(body): Json<SetItemBody>,
) -> impl IntoResponse {
    Json(state.manager.remove_from_filter(body.field, &body.item).await)
}

/// POST /api/search/filters/clear[?field=...]
///
/// Without `field`, every criterion returns to its default.
async fn clear_filters(
    State(state): State<SearchRouteState>,
    Query(params): Query<ClearParams>,
) -> impl IntoResponse {
    let results = match params.field {
        Some(field) => state.manager.clear_filter(field).await,
        None => state.manager.clear_filters().await,
    };
    Json(results)
}

/// POST /api/search/filters/seed?search=..&specialty=Reiki,Sound
///
/// Replaces the criteria with values taken from a page URL.
async fn seed_filters(
    State(state): State<SearchRouteState>,
    Query(defaults): Query<FilterDefaults>,
) -> impl IntoResponse {
    Json(state.manager.seed_filters(defaults).await)
}

/// POST /api/search/reference with `{"lat": .., "lng": ..}` or `null`.
async fn set_reference_point(
    State(state): State<SearchRouteState>,
    Json(point): Json<Option<Coordinates>>,
) -> impl IntoResponse {
    Json(state.manager.set_reference_point(point).await)
}

async fn get_options(State(state): State<SearchRouteState>) -> impl IntoResponse {
    Json(state.manager.options().await)
}

async fn get_suggestions(
    State(state): State<SearchRouteState>,
    Query(params): Query<SuggestionParams>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "suggestions": state.manager.suggestions(&params.q).await,
    }))
}

/// POST /api/search/refresh[?page=N]
///
/// 502 when the directory fetch fails; the previous results are kept.
async fn refresh(State(state): State<SearchRouteState>, Query(params): Query<RefreshParams>) -> Response {
    match state.manager.refresh_page(params.page.unwrap_or(1)).await {
        Ok(results) => Json(results).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}
