//! Provider records as delivered by the provider directory.

use serde::{Deserialize, Serialize};

/// Earth's mean radius in miles, used for great-circle distance.
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine distance to `other`, in miles.
    pub fn distance_miles(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_MILES * c
    }
}

/// One searchable healer.
///
/// Immutable for the lifetime of a search session; the collection is replaced
/// wholesale when a new fetch completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    pub id: String,
    pub name: String,
    /// Primary specialty shown on the card.
    #[serde(default)]
    pub specialty: String,
    /// Specialty tags; these drive the specialty filter and suggestions.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub bio: String,
    /// 0–5, one decimal.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Session price in the marketplace currency.
    #[serde(default, rename = "priceValue")]
    pub price: f64,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub session_types: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl ProviderRecord {
    /// Minimal record; remaining fields are filled with builder methods.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            specialty: String::new(),
            tags: Vec::new(),
            bio: String::new(),
            rating: 0.0,
            review_count: 0,
            location: String::new(),
            coordinates: None,
            price: 0.0,
            experience_years: 0,
            session_types: Vec::new(),
            languages: Vec::new(),
        }
    }

    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = specialty.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    pub fn with_rating(mut self, rating: f64, review_count: u32) -> Self {
        self.rating = rating;
        self.review_count = review_count;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>, coordinates: Option<Coordinates>) -> Self {
        self.location = location.into();
        self.coordinates = coordinates;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_experience(mut self, years: u32) -> Self {
        self.experience_years = years;
        self
    }

    pub fn with_session_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.session_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }
}
