//! Live handle on a cache entry.

use super::{CacheEntry, FetchCache, Status};
use crate::{Error, FetchFailure};
use std::sync::Arc;
use tokio::sync::watch;

/// A registered interest in one cache key.
///
/// Reads always reflect the latest published entry. Dropping the last
/// subscription of a key discards the entry.
pub struct Subscription<T>
where
    T: Send + Sync + 'static,
{
    cache: FetchCache<T>,
    key: String,
    generation: u64,
    rx: watch::Receiver<CacheEntry<T>>,
}

impl<T> Subscription<T>
where
    T: Send + Sync + 'static,
{
    pub(crate) fn new(cache: FetchCache<T>, key: String, generation: u64, rx: watch::Receiver<CacheEntry<T>>) -> Self {
        Self { cache, key, generation, rx }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Copy of the current entry.
    pub fn snapshot(&self) -> CacheEntry<T> {
        self.rx.borrow().clone()
    }

    pub fn data(&self) -> Option<Arc<Vec<T>>> {
        self.rx.borrow().data.clone()
    }

    pub fn status(&self) -> Status {
        self.rx.borrow().status
    }

    pub fn error(&self) -> Option<FetchFailure> {
        self.rx.borrow().error.clone()
    }

    pub fn is_validating(&self) -> bool {
        self.rx.borrow().is_validating()
    }

    /// See [`FetchCache::revalidate`].
    pub fn revalidate(&self) -> bool {
        self.cache.revalidate(&self.key)
    }

    /// See [`FetchCache::mutate`].
    pub fn mutate(&self) -> bool {
        self.cache.mutate(&self.key)
    }

    /// See [`FetchCache::mutate_with`].
    pub fn mutate_with(&self, data: Vec<T>) -> bool {
        self.cache.mutate_with(&self.key, data)
    }

    /// Wait for the next published change to the entry.
    ///
    /// # Errors
    ///
    /// Returns `Error::CacheClosed` if the entry's channel closed, which the
    /// subscription's own reference to the entry prevents.
    pub async fn changed(&mut self) -> Result<(), Error> {
        self.rx.changed().await.map_err(|_| Error::CacheClosed(self.key.clone()))
    }

    /// Wait until no fetch is in flight and return the settled entry.
    ///
    /// # Errors
    ///
    /// Returns `Error::CacheClosed` under the same condition as [`Self::changed`].
    pub async fn settled(&mut self) -> Result<CacheEntry<T>, Error> {
        let entry = self
            .rx
            .wait_for(|entry| entry.status == Status::Settled)
            .await
            .map_err(|_| Error::CacheClosed(self.key.clone()))?;
        Ok((*entry).clone())
    }
}

impl<T> Clone for Subscription<T>
where
    T: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        self.cache.retain(&self.key, self.generation);
        Self { cache: self.cache.clone(), key: self.key.clone(), generation: self.generation, rx: self.rx.clone() }
    }
}

impl<T> Drop for Subscription<T>
where
    T: Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.cache.release(&self.key, self.generation);
    }
}

impl<T> std::fmt::Debug for Subscription<T>
where
    T: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("generation", &self.generation)
            .field("status", &self.status())
            .finish()
    }
}
