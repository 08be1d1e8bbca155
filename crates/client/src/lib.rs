//! Client code for userdeck.
//!
//! This crate provides the HTTP fetcher that feeds the core cache, cache key
//! derivation, and the user record type served by the remote endpoint.

pub mod fetch;
pub mod users;

pub use fetch::{FetchConfig, HttpFetcher, KeyError, cache_key};
pub use users::User;
