//! Cache entry state shared by every subscriber of a key.

use crate::FetchFailure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Revalidation status of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Created, no fetch started yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Validating,
    /// The last fetch completed, successfully or not.
    Settled,
}

/// Snapshot of one cached resource.
///
/// `data` survives failed fetches, so a consumer keeps showing the last good
/// collection while `error` describes what went wrong.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub key: String,
    pub data: Option<Arc<Vec<T>>>,
    pub status: Status,
    pub error: Option<FetchFailure>,
    /// Time of the last successful fetch or local mutation.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            data: self.data.clone(),
            status: self.status,
            error: self.error.clone(),
            fetched_at: self.fetched_at,
        }
    }
}

impl<T> CacheEntry<T> {
    pub(crate) fn new(key: String) -> Self {
        Self { key, data: None, status: Status::Idle, error: None, fetched_at: None }
    }

    pub fn is_validating(&self) -> bool {
        self.status == Status::Validating
    }

    /// Cached records, or an empty slice when nothing was fetched yet.
    pub fn records(&self) -> &[T] {
        self.data.as_deref().map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn apply(&mut self, result: Result<Vec<T>, FetchFailure>) {
        match result {
            Ok(data) => {
                self.data = Some(Arc::new(data));
                self.error = None;
                self.fetched_at = Some(Utc::now());
            }
            Err(failure) => {
                self.error = Some(failure);
            }
        }
        self.status = Status::Settled;
    }
}
