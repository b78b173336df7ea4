//! The active search criteria and their per-record predicates.
//!
//! `FilterSpec` is only mutated through [`FilterSpec::apply`],
//! [`FilterSpec::add`], [`FilterSpec::remove`] and the clear operations, all
//! of which keep the range invariants (`min ≤ max`, bounds inside their
//! domain) intact. Malformed input is clamped, never rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::ProviderRecord;

/// Selectable price interval.
pub const PRICE_DOMAIN: ClosedRange<f64> = ClosedRange { min: 0.0, max: 200.0 };
/// Selectable years-of-experience interval.
pub const EXPERIENCE_DOMAIN: ClosedRange<u32> = ClosedRange { min: 0, max: 20 };
/// Selectable search radius in miles.
pub const RADIUS_DOMAIN: ClosedRange<f64> = ClosedRange { min: 5.0, max: 100.0 };
/// Selectable minimum rating.
pub const RATING_DOMAIN: ClosedRange<f64> = ClosedRange { min: 0.0, max: 5.0 };
/// Radius used until the seeker picks one.
pub const DEFAULT_RADIUS: f64 = 25.0;

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Highest rating first.
    #[default]
    Rating,
    /// Most reviews first.
    Reviews,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Most years of experience first.
    Experience,
    /// Nearest first; records without a distance go last.
    Distance,
    /// Alphabetical, case-insensitive.
    Name,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Rating => "rating",
            Self::Reviews => "reviews",
            Self::PriceLow => "price_low",
            Self::PriceHigh => "price_high",
            Self::Experience => "experience",
            Self::Distance => "distance",
            Self::Name => "name",
        };
        write!(f, "{s}")
    }
}

/// A closed interval `[min, max]` with `min ≤ max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosedRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> ClosedRange<T> {
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Like `contains`, but a `max` sitting on the domain's upper edge
    /// reads as "and above" (200 means 200+).
    pub fn admits(&self, value: T, domain: ClosedRange<T>) -> bool {
        self.min <= value && (self.max >= domain.max || value <= self.max)
    }

    /// Clamp `value` into this interval.
    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Build a range from two bounds in any order, clamped into `domain`.
    ///
    /// An inverted pair is swapped: `[150, 50]` becomes `[50, 150]`.
    pub fn normalized(a: T, b: T, domain: ClosedRange<T>) -> Self {
        let (a, b) = (domain.clamp(a), domain.clamp(b));
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Move the lower bound; it may not pass the current upper bound.
    pub fn with_min(self, value: T, domain: ClosedRange<T>) -> Self {
        let floor = ClosedRange {
            min: domain.min,
            max: self.max,
        };
        Self {
            min: floor.clamp(value),
            max: self.max,
        }
    }

    /// Move the upper bound; it may not pass the current lower bound.
    pub fn with_max(self, value: T, domain: ClosedRange<T>) -> Self {
        let ceiling = ClosedRange {
            min: self.min,
            max: domain.max,
        };
        Self {
            min: self.min,
            max: ceiling.clamp(value),
        }
    }
}

/// Replace NaN/infinite input with a fallback before clamping.
fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// A single scalar or range update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FilterUpdate {
    Query(String),
    Location(String),
    Radius(f64),
    MinRating(f64),
    SortBy(SortKey),
    /// Replace the whole price interval.
    PriceRange(f64, f64),
    /// Replace the whole experience interval.
    ExperienceRange(u32, u32),
    PriceMin(f64),
    PriceMax(f64),
    ExperienceMin(u32),
    ExperienceMax(u32),
}

/// The set-valued criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetField {
    Specialties,
    SessionTypes,
    Languages,
}

/// Every criterion, for resetting one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Query,
    Location,
    Radius,
    Specialties,
    SessionTypes,
    Languages,
    PriceRange,
    ExperienceRange,
    MinRating,
    SortBy,
}

/// Optional starting values, e.g. parsed from a URL query string.
///
/// Set-valued fields are comma-separated.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterDefaults {
    #[serde(alias = "query")]
    pub search: Option<String>,
    pub location: Option<String>,
    pub radius: Option<f64>,
    #[serde(alias = "specialty")]
    pub specialties: Option<String>,
    #[serde(alias = "sessionType")]
    pub session_types: Option<String>,
    pub languages: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub experience_min: Option<u32>,
    pub experience_max: Option<u32>,
    #[serde(alias = "rating")]
    pub min_rating: Option<f64>,
    pub sort_by: Option<SortKey>,
}

/// The full set of active search criteria.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    pub query: String,
    pub location: String,
    pub radius: f64,
    pub specialties: Vec<String>,
    pub session_types: Vec<String>,
    pub languages: Vec<String>,
    pub price_range: ClosedRange<f64>,
    pub experience_range: ClosedRange<u32>,
    pub min_rating: f64,
    pub sort_by: SortKey,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            query: String::new(),
            location: String::new(),
            radius: DEFAULT_RADIUS,
            specialties: Vec::new(),
            session_types: Vec::new(),
            languages: Vec::new(),
            price_range: PRICE_DOMAIN,
            experience_range: EXPERIENCE_DOMAIN,
            min_rating: RATING_DOMAIN.min,
            sort_by: SortKey::default(),
        }
    }
}

impl FilterSpec {
    /// Seed a spec from optional defaults; every value goes through the
    /// same clamping as a live update.
    pub fn from_defaults(defaults: FilterDefaults) -> Self {
        let mut spec = Self::default();
        if let Some(search) = defaults.search {
            spec.apply(FilterUpdate::Query(search));
        }
        if let Some(location) = defaults.location {
            spec.apply(FilterUpdate::Location(location));
        }
        if let Some(radius) = defaults.radius {
            spec.apply(FilterUpdate::Radius(radius));
        }
        for (field, raw) in [
            (SetField::Specialties, defaults.specialties),
            (SetField::SessionTypes, defaults.session_types),
            (SetField::Languages, defaults.languages),
        ] {
            for item in raw.iter().flat_map(|s| s.split(',')) {
                spec.add(field, item);
            }
        }
        if defaults.price_min.is_some() || defaults.price_max.is_some() {
            spec.apply(FilterUpdate::PriceRange(
                defaults.price_min.unwrap_or(PRICE_DOMAIN.min),
                defaults.price_max.unwrap_or(PRICE_DOMAIN.max),
            ));
        }
        if defaults.experience_min.is_some() || defaults.experience_max.is_some() {
            spec.apply(FilterUpdate::ExperienceRange(
                defaults.experience_min.unwrap_or(EXPERIENCE_DOMAIN.min),
                defaults.experience_max.unwrap_or(EXPERIENCE_DOMAIN.max),
            ));
        }
        if let Some(rating) = defaults.min_rating {
            spec.apply(FilterUpdate::MinRating(rating));
        }
        if let Some(sort_by) = defaults.sort_by {
            spec.apply(FilterUpdate::SortBy(sort_by));
        }
        spec
    }

    /// Apply a scalar or range update, clamping into the allowed domain.
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Query(query) => self.query = query,
            FilterUpdate::Location(location) => self.location = location,
            FilterUpdate::Radius(radius) => {
                self.radius = RADIUS_DOMAIN.clamp(finite_or(radius, DEFAULT_RADIUS));
            }
            FilterUpdate::MinRating(rating) => {
                self.min_rating = RATING_DOMAIN.clamp(finite_or(rating, RATING_DOMAIN.min));
            }
            FilterUpdate::SortBy(sort_by) => self.sort_by = sort_by,
            FilterUpdate::PriceRange(a, b) => {
                self.price_range = ClosedRange::normalized(
                    finite_or(a, PRICE_DOMAIN.min),
                    finite_or(b, PRICE_DOMAIN.max),
                    PRICE_DOMAIN,
                );
            }
            FilterUpdate::ExperienceRange(a, b) => {
                self.experience_range = ClosedRange::normalized(a, b, EXPERIENCE_DOMAIN);
            }
            FilterUpdate::PriceMin(v) => {
                self.price_range = self
                    .price_range
                    .with_min(finite_or(v, PRICE_DOMAIN.min), PRICE_DOMAIN);
            }
            FilterUpdate::PriceMax(v) => {
                self.price_range = self
                    .price_range
                    .with_max(finite_or(v, PRICE_DOMAIN.max), PRICE_DOMAIN);
            }
            FilterUpdate::ExperienceMin(v) => {
                self.experience_range = self.experience_range.with_min(v, EXPERIENCE_DOMAIN);
            }
            FilterUpdate::ExperienceMax(v) => {
                self.experience_range = self.experience_range.with_max(v, EXPERIENCE_DOMAIN);
            }
        }
    }

    fn set_mut(&mut self, field: SetField) -> &mut Vec<String> {
        match field {
            SetField::Specialties => &mut self.specialties,
            SetField::SessionTypes => &mut self.session_types,
            SetField::Languages => &mut self.languages,
        }
    }

    /// The current selection for a set-valued field.
    pub fn set(&self, field: SetField) -> &[String] {
        match field {
            SetField::Specialties => &self.specialties,
            SetField::SessionTypes => &self.session_types,
            SetField::Languages => &self.languages,
        }
    }

    /// Add an item to a set-valued field. Returns `false` if it was already
    /// present or blank.
    pub fn add(&mut self, field: SetField, item: &str) -> bool {
        let item = item.trim();
        if item.is_empty() {
            return false;
        }
        let set = self.set_mut(field);
        if set.iter().any(|existing| existing == item) {
            return false;
        }
        set.push(item.to_string());
        true
    }

    /// Remove an item from a set-valued field. Returns `false` if it was absent.
    pub fn remove(&mut self, field: SetField, item: &str) -> bool {
        let item = item.trim();
        let set = self.set_mut(field);
        let before = set.len();
        set.retain(|existing| existing != item);
        set.len() != before
    }

    /// Reset a single criterion to its default.
    pub fn clear_field(&mut self, field: FilterField) {
        let defaults = Self::default();
        match field {
            FilterField::Query => self.query = defaults.query,
            FilterField::Location => self.location = defaults.location,
            FilterField::Radius => self.radius = defaults.radius,
            FilterField::Specialties => self.specialties.clear(),
            FilterField::SessionTypes => self.session_types.clear(),
            FilterField::Languages => self.languages.clear(),
            FilterField::PriceRange => self.price_range = defaults.price_range,
            FilterField::ExperienceRange => self.experience_range = defaults.experience_range,
            FilterField::MinRating => self.min_rating = defaults.min_rating,
            FilterField::SortBy => self.sort_by = defaults.sort_by,
        }
    }

    /// Number of criteria that narrow the result set.
    ///
    /// Radius and sort order never count.
    pub fn active_count(&self) -> usize {
        [
            !self.query.trim().is_empty(),
            !self.location.trim().is_empty(),
            !self.specialties.is_empty(),
            !self.session_types.is_empty(),
            !self.languages.is_empty(),
            self.min_rating > RATING_DOMAIN.min,
            self.price_range != PRICE_DOMAIN,
            self.experience_range != EXPERIENCE_DOMAIN,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    // ── Predicates ──────────────────────────────────────────────────

    /// Name, primary specialty or bio contains the query (case-insensitive).
    pub fn matches_query(&self, record: &ProviderRecord) -> bool {
        let needle = self.query.trim().to_lowercase();
        needle.is_empty()
            || [&record.name, &record.specialty, &record.bio]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Location label contains the location text (case-insensitive).
    pub fn matches_location(&self, record: &ProviderRecord) -> bool {
        let needle = self.location.trim().to_lowercase();
        needle.is_empty() || record.location.to_lowercase().contains(&needle)
    }

    /// Unknown distances are never excluded.
    pub fn within_radius(&self, distance: Option<f64>) -> bool {
        distance.is_none_or(|d| d <= self.radius)
    }

    pub fn matches_specialties(&self, record: &ProviderRecord) -> bool {
        intersects_or_unselected(&self.specialties, &record.tags)
    }

    pub fn matches_session_types(&self, record: &ProviderRecord) -> bool {
        intersects_or_unselected(&self.session_types, &record.session_types)
    }

    pub fn matches_languages(&self, record: &ProviderRecord) -> bool {
        intersects_or_unselected(&self.languages, &record.languages)
    }

    pub fn matches_price(&self, record: &ProviderRecord) -> bool {
        self.price_range.admits(record.price, PRICE_DOMAIN)
    }

    pub fn matches_experience(&self, record: &ProviderRecord) -> bool {
        self.experience_range.admits(record.experience_years, EXPERIENCE_DOMAIN)
    }

    pub fn matches_rating(&self, record: &ProviderRecord) -> bool {
        record.rating >= self.min_rating
    }

    /// All stages at once. `distance` is the record's distance from the
    /// seeker, when both positions are known.
    pub fn matches(&self, record: &ProviderRecord, distance: Option<f64>) -> bool {
        self.matches_query(record)
            && self.matches_location(record)
            && self.within_radius(distance)
            && self.matches_specialties(record)
            && self.matches_session_types(record)
            && self.matches_languages(record)
            && self.matches_price(record)
            && self.matches_experience(record)
            && self.matches_rating(record)
    }
}

/// True when nothing is selected, or any selected label equals one of the
/// record's labels (case-insensitive).
fn intersects_or_unselected(selected: &[String], labels: &[String]) -> bool {
    selected.is_empty()
        || selected.iter().any(|wanted| {
            let wanted = wanted.to_lowercase();
            labels.iter().any(|label| label.to_lowercase() == wanted)
        })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn record() -> ProviderRecord {
        ProviderRecord::new("h1", "Sarah Moonwell")
            .with_specialty("Reiki Master")
            .with_tags(["Reiki", "Energy Healing"])
            .with_bio("Certified in Usui Reiki")
            .with_rating(4.9, 127)
            .with_location("San Francisco, CA", None)
            .with_price(85.0)
            .with_experience(8)
            .with_session_types(["Virtual", "In-Person"])
            .with_languages(["English", "Spanish"])
    }

    #[test]
    fn default_spec_matches_everything() {
        let spec = FilterSpec::default();
        assert!(spec.matches(&record(), None));
        assert!(spec.matches(&ProviderRecord::new("x", "Bare"), None));
        assert_eq!(spec.active_count(), 0);
    }

    #[test]
    fn inverted_price_range_is_swapped() {
        let mut spec = FilterSpec::default();
        spec.apply(FilterUpdate::PriceRange(150.0, 50.0));
        assert_eq!(spec.price_range, ClosedRange { min: 50.0, max: 150.0 });
    }

    #[test]
    fn range_bounds_are_clamped_to_domain() {
        let mut spec = FilterSpec::default();
        spec.apply(FilterUpdate::PriceRange(-10.0, 500.0));
        assert_eq!(spec.price_range, PRICE_DOMAIN);
        spec.apply(FilterUpdate::ExperienceRange(25, 3));
        assert_eq!(spec.experience_range, ClosedRange { min: 3, max: 20 });
    }

    #[test]
    fn single_bound_cannot_cross_the_other() {
        let mut spec = FilterSpec::default();
        spec.apply(FilterUpdate::PriceMax(120.0));
        spec.apply(FilterUpdate::PriceMin(180.0));
        assert_eq!(spec.price_range, ClosedRange { min: 120.0, max: 120.0 });

        spec.apply(FilterUpdate::ExperienceMin(10));
        spec.apply(FilterUpdate::ExperienceMax(4));
        assert_eq!(spec.experience_range, ClosedRange { min: 10, max: 10 });
    }

    #[test]
    fn radius_and_rating_are_clamped() {
        let mut spec = FilterSpec::default();
        spec.apply(FilterUpdate::Radius(1.0));
        assert_eq!(spec.radius, 5.0);
        spec.apply(FilterUpdate::Radius(500.0));
        assert_eq!(spec.radius, 100.0);
        spec.apply(FilterUpdate::MinRating(7.5));
        assert_eq!(spec.min_rating, 5.0);
        spec.apply(FilterUpdate::MinRating(-1.0));
        assert_eq!(spec.min_rating, 0.0);
        spec.apply(FilterUpdate::MinRating(f64::NAN));
        assert_eq!(spec.min_rating, 0.0);
    }

    #[test]
    fn add_is_idempotent_and_remove_of_absent_is_noop() {
        let mut spec = FilterSpec::default();
        assert!(spec.add(SetField::Specialties, "Reiki"));
        let once = spec.clone();
        assert!(!spec.add(SetField::Specialties, "Reiki"));
        assert_eq!(spec, once);

        assert!(!spec.remove(SetField::Languages, "French"));
        assert_eq!(spec, once);
        assert!(spec.remove(SetField::Specialties, "Reiki"));
        assert!(spec.specialties.is_empty());
    }

    #[test]
    fn blank_items_are_ignored() {
        let mut spec = FilterSpec::default();
        assert!(!spec.add(SetField::Languages, "   "));
        assert!(spec.languages.is_empty());
    }

    #[test]
    fn query_searches_name_specialty_and_bio_only() {
        let mut spec = FilterSpec::default();
        spec.apply(FilterUpdate::Query("usui".into()));
        assert!(spec.matches_query(&record()));
        spec.apply(FilterUpdate::Query("MOONWELL".into()));
        assert!(spec.matches_query(&record()));
        // Languages are not part of the text match.
        spec.apply(FilterUpdate::Query("spanish".into()));
        assert!(!spec.matches_query(&record()));
    }

    #[test]
    fn set_filters_use_intersection() {
        let mut spec = FilterSpec::default();
        spec.add(SetField::Specialties, "crystal healing");
        assert!(!spec.matches_specialties(&record()));
        spec.add(SetField::Specialties, "reiki");
        assert!(spec.matches_specialties(&record()));

        spec.add(SetField::SessionTypes, "Phone");
        assert!(!spec.matches_session_types(&record()));
        spec.add(SetField::Languages, "Spanish");
        assert!(spec.matches_languages(&record()));
    }

    #[test]
    fn radius_only_excludes_known_distances() {
        let spec = FilterSpec::default();
        assert!(spec.within_radius(None));
        assert!(spec.within_radius(Some(25.0)));
        assert!(!spec.within_radius(Some(25.1)));
    }

    #[test]
    fn top_of_domain_is_open_ended() {
        let mut spec = FilterSpec::default();
        let pricey = record().with_price(250.0).with_experience(30);
        assert!(spec.matches_price(&pricey));
        assert!(spec.matches_experience(&pricey));

        spec.apply(FilterUpdate::PriceMax(199.0));
        spec.apply(FilterUpdate::ExperienceMax(19));
        assert!(!spec.matches_price(&pricey));
        assert!(!spec.matches_experience(&pricey));

        spec.apply(FilterUpdate::PriceRange(220.0, 260.0));
        assert_eq!(spec.price_range, ClosedRange { min: 200.0, max: 200.0 });
        assert!(spec.matches_price(&pricey));
        assert!(!spec.matches_price(&record().with_price(150.0)));
    }

    #[test]
    fn clear_field_resets_one_criterion() {
        let mut spec = FilterSpec::default();
        spec.apply(FilterUpdate::Query("reiki".into()));
        spec.apply(FilterUpdate::PriceRange(20.0, 80.0));
        spec.clear_field(FilterField::PriceRange);
        assert_eq!(spec.price_range, PRICE_DOMAIN);
        assert_eq!(spec.query, "reiki");
        assert_eq!(spec.active_count(), 1);
    }

    #[test]
    fn active_count_ignores_radius_and_sort() {
        let mut spec = FilterSpec::default();
        spec.apply(FilterUpdate::Radius(50.0));
        spec.apply(FilterUpdate::SortBy(SortKey::Name));
        assert_eq!(spec.active_count(), 0);
        spec.add(SetField::Languages, "English");
        spec.apply(FilterUpdate::MinRating(4.0));
        spec.apply(FilterUpdate::ExperienceMin(2));
        assert_eq!(spec.active_count(), 3);
    }

    #[test]
    fn defaults_seed_and_clamp() {
        let defaults: FilterDefaults = serde_json::from_value(serde_json::json!({
            "search": "reiki",
            "specialties": "Reiki, Meditation,,Reiki",
            "sessionType": "Virtual",
            "priceMin": 150.0,
            "priceMax": 50.0,
            "rating": 9.0,
            "sortBy": "price_low",
            "radius": 2.0
        }))
        .unwrap();
        let spec = FilterSpec::from_defaults(defaults);
        assert_eq!(spec.query, "reiki");
        assert_eq!(spec.specialties, vec!["Reiki", "Meditation"]);
        assert_eq!(spec.session_types, vec!["Virtual"]);
        assert_eq!(spec.price_range, ClosedRange { min: 50.0, max: 150.0 });
        assert_eq!(spec.min_rating, 5.0);
        assert_eq!(spec.sort_by, SortKey::PriceLow);
        assert_eq!(spec.radius, 5.0);
    }

    #[test]
    fn filter_update_wire_format() {
        let update: FilterUpdate =
            serde_json::from_str(r#"{"field":"price_range","value":[150,50]}"#).unwrap();
        assert_eq!(update, FilterUpdate::PriceRange(150.0, 50.0));
        let update: FilterUpdate =
            serde_json::from_str(r#"{"field":"sort_by","value":"distance"}"#).unwrap();
        assert_eq!(update, FilterUpdate::SortBy(SortKey::Distance));
    }

    #[test]
    fn sort_key_display_matches_serde() {
        for key in [
            SortKey::Rating,
            SortKey::Reviews,
            SortKey::PriceLow,
            SortKey::PriceHigh,
            SortKey::Experience,
            SortKey::Distance,
            SortKey::Name,
        ] {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(format!("\"{key}\""), json);
        }
    }

    fn any_update() -> impl Strategy<Value = FilterUpdate> {
        prop_oneof![
            (-500.0f64..500.0, -500.0f64..500.0).prop_map(|(a, b)| FilterUpdate::PriceRange(a, b)),
            (0u32..40, 0u32..40).prop_map(|(a, b)| FilterUpdate::ExperienceRange(a, b)),
            (-500.0f64..500.0).prop_map(FilterUpdate::PriceMin),
            (-500.0f64..500.0).prop_map(FilterUpdate::PriceMax),
            (0u32..40).prop_map(FilterUpdate::ExperienceMin),
            (0u32..40).prop_map(FilterUpdate::ExperienceMax),
            (-10.0f64..10.0).prop_map(FilterUpdate::MinRating),
            (-50.0f64..500.0).prop_map(FilterUpdate::Radius),
        ]
    }

    proptest! {
        #[test]
        fn ranges_never_invert(updates in proptest::collection::vec(any_update(), 1..20)) {
            let mut spec = FilterSpec::default();
            for update in updates {
                spec.apply(update);
                prop_assert!(spec.price_range.min <= spec.price_range.max);
                prop_assert!(spec.experience_range.min <= spec.experience_range.max);
                prop_assert!(PRICE_DOMAIN.contains(spec.price_range.min));
                prop_assert!(PRICE_DOMAIN.contains(spec.price_range.max));
                prop_assert!(EXPERIENCE_DOMAIN.contains(spec.experience_range.max));
                prop_assert!(RADIUS_DOMAIN.contains(spec.radius));
                prop_assert!(RATING_DOMAIN.contains(spec.min_rating));
            }
        }

        #[test]
        fn add_twice_equals_add_once(item in "[A-Za-z][A-Za-z ]{0,12}") {
            let mut once = FilterSpec::default();
            once.add(SetField::Specialties, &item);
            let mut twice = once.clone();
            twice.add(SetField::Specialties, &item);
            prop_assert_eq!(once, twice);
        }
    }
}
