//! Marketplace API collaborators: contracts, wire types and the HTTP client.

pub mod client;
pub mod traits;
pub mod types;

pub use client::HttpApiClient;
pub use traits::{ProfileSource, ProfileSubmitter, ProviderDirectory};
pub use types::{Pagination, ProfileEnvelope, ProviderPage, ProviderQuery};
