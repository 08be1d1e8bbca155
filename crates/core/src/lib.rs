//! Core types and shared functionality for userdeck.
//!
//! This crate provides:
//! - Stale-while-revalidate fetch cache with per-key dedup
//! - Page controller that windows the cached collection
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod pager;

pub use cache::{CacheEntry, CacheOptions, FetchCache, Fetcher, Status, Subscription, fetcher_fn};
pub use config::AppConfig;
pub use error::{Error, FetchFailure};
pub use pager::{PageController, PageView, PagedView, ViewState};
