//! SearchFilterEngine: applies a `FilterSpec` to the provider collection.
//!
//! Every mutation synchronously re-runs the filter and sort stages, so the
//! derived results are always consistent with the current spec.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use tracing::debug;

use super::filter::{FilterDefaults, FilterField, FilterSpec, FilterUpdate, SetField, SortKey};
use super::model::{Coordinates, ProviderRecord};

/// Upper bound on autocomplete suggestions.
pub const MAX_SUGGESTIONS: usize = 8;

/// Every selectable value present in the current collection, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub specialties: Vec<String>,
    pub session_types: Vec<String>,
    pub languages: Vec<String>,
    pub locations: Vec<String>,
}

impl FilterOptions {
    pub fn from_providers(providers: &[ProviderRecord]) -> Self {
        let mut specialties = BTreeSet::new();
        let mut session_types = BTreeSet::new();
        let mut languages = BTreeSet::new();
        let mut locations = BTreeSet::new();

        for provider in providers {
            specialties.extend(provider.tags.iter().cloned());
            session_types.extend(provider.session_types.iter().cloned());
            languages.extend(provider.languages.iter().cloned());
            if !provider.location.is_empty() {
                locations.insert(provider.location.clone());
            }
        }

        Self {
            specialties: specialties.into_iter().collect(),
            session_types: session_types.into_iter().collect(),
            languages: languages.into_iter().collect(),
            locations: locations.into_iter().collect(),
        }
    }
}

/// A matched record, by position in the backing collection.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SearchHit {
    index: usize,
    distance: Option<f64>,
}

/// Holds the filter spec and provider collection, and the derived view.
#[derive(Debug, Clone, Default)]
pub struct SearchFilterEngine {
    providers: Vec<ProviderRecord>,
    filters: FilterSpec,
    reference_point: Option<Coordinates>,
    options: FilterOptions,
    hits: Vec<SearchHit>,
}

impl SearchFilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from incoming defaults (e.g. URL parameters).
    pub fn with_defaults(defaults: FilterDefaults) -> Self {
        Self {
            filters: FilterSpec::from_defaults(defaults),
            ..Self::default()
        }
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Replace the backing collection wholesale.
    pub fn set_providers(&mut self, providers: Vec<ProviderRecord>) {
        self.options = FilterOptions::from_providers(&providers);
        self.providers = providers;
        self.recompute();
    }

    /// Set a scalar field or replace a range. Out-of-domain values are clamped.
    pub fn update_filter(&mut self, update: FilterUpdate) {
        self.filters.apply(update);
        self.recompute();
    }

    /// Add to a set-valued field. Returns whether the selection changed.
    pub fn add_to_filter(&mut self, field: SetField, item: &str) -> bool {
        let changed = self.filters.add(field, item);
        if changed {
            self.recompute();
        }
        changed
    }

    /// Remove from a set-valued field. Returns whether the selection changed.
    pub fn remove_from_filter(&mut self, field: SetField, item: &str) -> bool {
        let changed = self.filters.remove(field, item);
        if changed {
            self.recompute();
        }
        changed
    }

    /// Reset every criterion to its default.
    pub fn clear_filters(&mut self) {
        self.filters = FilterSpec::default();
        self.recompute();
    }

    /// Replace every criterion with one seeded from `defaults`.
    pub fn seed_filters(&mut self, defaults: FilterDefaults) {
        self.filters = FilterSpec::from_defaults(defaults);
        self.recompute();
    }

    /// Reset a single criterion to its default.
    pub fn clear_filter(&mut self, field: FilterField) {
        self.filters.clear_field(field);
        self.recompute();
    }

    /// Set (or forget) the seeker's position used for distance.
    pub fn set_reference_point(&mut self, point: Option<Coordinates>) {
        self.reference_point = point;
        self.recompute();
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn providers(&self) -> &[ProviderRecord] {
        &self.providers
    }

    pub fn reference_point(&self) -> Option<Coordinates> {
        self.reference_point
    }

    /// Matching records in result order.
    pub fn filtered_result(&self) -> Vec<&ProviderRecord> {
        self.hits.iter().map(|hit| &self.providers[hit.index]).collect()
    }

    /// Matching records paired with their distance from the reference point.
    pub fn hits(&self) -> impl Iterator<Item = (&ProviderRecord, Option<f64>)> + '_ {
        self.hits
            .iter()
            .map(|hit| (&self.providers[hit.index], hit.distance))
    }

    pub fn total_results(&self) -> usize {
        self.hits.len()
    }

    pub fn active_filter_count(&self) -> usize {
        self.filters.active_count()
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Up to [`MAX_SUGGESTIONS`] distinct tags and names containing `prefix`
    /// (case-insensitive). Empty unless the prefix has at least two characters.
    pub fn suggestions<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        let needle = prefix.trim().to_lowercase();
        let active = needle.chars().count() > 1;
        let mut seen = HashSet::new();

        self.providers
            .iter()
            .filter(move |_| active)
            .flat_map(|p| p.tags.iter().chain(std::iter::once(&p.name)))
            .map(String::as_str)
            .filter(move |candidate| candidate.to_lowercase().contains(&needle))
            .filter(move |candidate| seen.insert(*candidate))
            .take(MAX_SUGGESTIONS)
    }

    // ── Internals ───────────────────────────────────────────────────

    fn distance_to(&self, record: &ProviderRecord) -> Option<f64> {
        let origin = self.reference_point?;
        let target = record.coordinates?;
        Some(origin.distance_miles(&target))
    }

    fn recompute(&mut self) {
        let mut hits: Vec<SearchHit> = self
            .providers
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let distance = self.distance_to(record);
                self.filters
                    .matches(record, distance)
                    .then_some(SearchHit { index, distance })
            })
            .collect();

        sort_hits(&mut hits, &self.providers, self.filters.sort_by);

        debug!(
            total = self.providers.len(),
            matched = hits.len(),
            sort_by = %self.filters.sort_by,
            "Search results recomputed"
        );
        self.hits = hits;
    }
}

/// Stable sort; equal keys keep collection order.
fn sort_hits(hits: &mut [SearchHit], providers: &[ProviderRecord], key: SortKey) {
    let rec = |hit: &SearchHit| &providers[hit.index];
    match key {
        SortKey::Rating => hits.sort_by(|a, b| rec(b).rating.total_cmp(&rec(a).rating)),
        SortKey::Reviews => hits.sort_by(|a, b| rec(b).review_count.cmp(&rec(a).review_count)),
        SortKey::PriceLow => hits.sort_by(|a, b| rec(a).price.total_cmp(&rec(b).price)),
        SortKey::PriceHigh => hits.sort_by(|a, b| rec(b).price.total_cmp(&rec(a).price)),
        SortKey::Experience => {
            hits.sort_by(|a, b| rec(b).experience_years.cmp(&rec(a).experience_years))
        }
        SortKey::Distance => hits.sort_by(|a, b| {
            let da = a.distance.unwrap_or(f64::INFINITY);
            let db = b.distance.unwrap_or(f64::INFINITY);
            da.total_cmp(&db)
        }),
        SortKey::Name => {
            hits.sort_by(|a, b| rec(a).name.to_lowercase().cmp(&rec(b).name.to_lowercase()))
        }
    }
}
