//! Provider search: filter criteria, the synchronous filter engine, and the
//! shared manager plus REST routes around it.

pub mod engine;
pub mod filter;
pub mod manager;
pub mod model;
pub mod routes;

pub use engine::{FilterOptions, MAX_SUGGESTIONS, SearchFilterEngine};
pub use filter::{ClosedRange, FilterDefaults, FilterField, FilterSpec, FilterUpdate, SetField, SortKey};
pub use manager::{SearchManager, SearchResult, SearchResults, SetChange};
pub use model::{Coordinates, ProviderRecord};
pub use routes::{SearchRouteState, search_routes};
