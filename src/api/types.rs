//! Request/response shapes exchanged with the marketplace API.

use serde::{Deserialize, Serialize};

use crate::search::filter::{FilterSpec, SortKey};
use crate::search::model::ProviderRecord;

/// Query parameters for a provider fetch: the server-relevant subset of a
/// `FilterSpec`, plus paging.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderQuery {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
    /// Comma-joined specialty selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub sort_by: SortKey,
    pub page: u32,
    pub limit: u32,
}

impl ProviderQuery {
    pub fn from_filters(filters: &FilterSpec, page: u32, limit: u32) -> Self {
        let trimmed = |s: &str| s.trim().to_string();
        Self {
            search: trimmed(&filters.query),
            location: trimmed(&filters.location),
            specialty: (!filters.specialties.is_empty()).then(|| filters.specialties.join(",")),
            session_type: filters.session_types.first().cloned(),
            rating: (filters.min_rating > 0.0).then_some(filters.min_rating),
            sort_by: filters.sort_by,
            page: page.max(1),
            limit,
        }
    }
}

/// Paging metadata returned alongside a provider page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub pages: u32,
}

/// One page of providers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderPage {
    #[serde(default, alias = "providers")]
    pub healers: Vec<ProviderRecord>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// `GET /api/profile` response body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProfileEnvelope {
    pub profile: Option<serde_json::Value>,
}

/// Error body shape returned by the API on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiErrorBody {
    pub message: Option<String>,
}
