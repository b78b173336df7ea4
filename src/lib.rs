//! Healer Hub: provider search and onboarding engines for a
//! healer/seeker marketplace.

pub mod api;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod search;
pub mod server;
pub mod store;
