//! SearchManager: shares a `SearchFilterEngine` across request handlers
//! and refreshes its collection from the provider directory.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::engine::{FilterOptions, SearchFilterEngine};
use super::filter::{FilterDefaults, FilterField, FilterSpec, FilterUpdate, SetField};
use super::model::{Coordinates, ProviderRecord};
use crate::api::{Pagination, ProviderDirectory, ProviderQuery};
use crate::error::ApiError;

/// One matched provider with its distance from the reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub provider: ProviderRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
}

/// The derived view after the latest change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub results: Vec<SearchResult>,
    pub total_results: usize,
    pub total_providers: usize,
    pub active_filter_count: usize,
    pub filters: FilterSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Outcome of a set-field add or remove.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetChange {
    /// Whether the selection changed.
    pub changed: bool,
    pub results: SearchResults,
}

pub struct SearchManager {
    engine: RwLock<SearchFilterEngine>,
    pagination: RwLock<Option<Pagination>>,
    directory: Arc<dyn ProviderDirectory>,
    page_limit: u32,
}

impl SearchManager {
    pub fn new(engine: SearchFilterEngine, directory: Arc<dyn ProviderDirectory>, page_limit: u32) -> Self {
        Self {
            engine: RwLock::new(engine),
            pagination: RwLock::new(None),
            directory,
            page_limit,
        }
    }

    /// Fetch the first page for the current filters and replace the
    /// collection. On failure the previous collection stays in place.
    pub async fn refresh(&self) -> Result<SearchResults, ApiError> {
        self.refresh_page(1).await
    }

    /// Fetch `page` (1-based) for the current filters.
    pub async fn refresh_page(&self, page: u32) -> Result<SearchResults, ApiError> {
        let query = {
            let engine = self.engine.read().await;
            ProviderQuery::from_filters(engine.filters(), page, self.page_limit)
        };

        let fetched = match self.directory.fetch_providers(&query).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!("Provider refresh failed, keeping previous results: {e}");
                return Err(e);
            }
        };

        let count = fetched.healers.len();
        let mut engine = self.engine.write().await;
        engine.set_providers(fetched.healers);
        *self.pagination.write().await = fetched.pagination;
        info!(count, page = query.page, "Provider collection refreshed");
        Ok(self.snapshot(&engine).await)
    }

    pub async fn results(&self) -> SearchResults {
        let engine = self.engine.read().await;
        self.snapshot(&engine).await
    }

    /// Build the view from an engine the caller already holds locked, so
    /// the view always reflects the caller's own change.
    async fn snapshot(&self, engine: &SearchFilterEngine) -> SearchResults {
        let results = engine
            .hits()
            .map(|(provider, distance_miles)| SearchResult {
                provider: provider.clone(),
                distance_miles,
            })
            .collect();
        SearchResults {
            results,
            total_results: engine.total_results(),
            total_providers: engine.providers().len(),
            active_filter_count: engine.active_filter_count(),
            filters: engine.filters().clone(),
            pagination: self.pagination.read().await.clone(),
        }
    }

    pub async fn update_filter(&self, update: FilterUpdate) -> SearchResults {
        let mut engine = self.engine.write().await;
        engine.update_filter(update);
        self.snapshot(&engine).await
    }

    pub async fn add_to_filter(&self, field: SetField, item: &str) -> SetChange {
        let mut engine = self.engine.write().await;
        let changed = engine.add_to_filter(field, item);
        SetChange {
            changed,
            results: self.snapshot(&engine).await,
        }
    }

    pub async fn remove_from_filter(&self, field: SetField, item: &str) -> SetChange {
        let mut engine = self.engine.write().await;
        let changed = engine.remove_from_filter(field, item);
        SetChange {
            changed,
            results: self.snapshot(&engine).await,
        }
    }

    pub async fn clear_filters(&self) -> SearchResults {
        let mut engine = self.engine.write().await;
        engine.clear_filters();
        self.snapshot(&engine).await
    }

    pub async fn clear_filter(&self, field: FilterField) -> SearchResults {
        let mut engine = self.engine.write().await;
        engine.clear_filter(field);
        self.snapshot(&engine).await
    }

    pub async fn seed_filters(&self, defaults: FilterDefaults) -> SearchResults {
        let mut engine = self.engine.write().await;
        engine.seed_filters(defaults);
        self.snapshot(&engine).await
    }

    pub async fn set_reference_point(&self, point: Option<Coordinates>) -> SearchResults {
        let mut engine = self.engine.write().await;
        engine.set_reference_point(point);
        self.snapshot(&engine).await
    }

    pub async fn set_providers(&self, providers: Vec<ProviderRecord>) {
        self.engine.write().await.set_providers(providers);
    }

    pub async fn options(&self) -> FilterOptions {
        self.engine.read().await.options().clone()
    }

    pub async fn suggestions(&self, prefix: &str) -> Vec<String> {
        self.engine
            .read()
            .await
            .suggestions(prefix)
            .map(str::to_string)
            .collect()
    }
}
