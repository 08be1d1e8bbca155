//! In-memory stale-while-revalidate cache for remote collections.
//!
//! Every key owns one [`CacheEntry`] published through a `tokio::sync::watch`
//! channel, so all subscribers of a key observe the same state:
//!
//! - First subscription creates the entry and schedules a fetch
//! - At most one fetch per key is in flight; extra triggers are dropped
//! - A failed fetch keeps the previous data and records the error
//! - The entry is discarded once its last subscription is dropped

pub mod entry;
pub mod fetcher;
pub mod subscription;

pub use entry::{CacheEntry, Status};
pub use fetcher::{FnFetcher, Fetcher, fetcher_fn};
pub use subscription::Subscription;

use crate::FetchFailure;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Behaviour switches for a [`FetchCache`].
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Revalidate an existing entry whenever a new subscription attaches to it
    /// (default: true). The first subscription of a key always fetches.
    pub revalidate_on_mount: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { revalidate_on_mount: true }
    }
}

struct Slot<T> {
    /// Distinguishes this entry from a later one created for the same key.
    generation: u64,
    subscribers: usize,
    fetcher: Arc<dyn Fetcher<T>>,
    tx: watch::Sender<CacheEntry<T>>,
}

struct Inner<T> {
    slots: Mutex<HashMap<String, Slot<T>>>,
    options: CacheOptions,
    next_generation: AtomicU64,
    /// Runtime fetches are spawned on; falls back to the caller's runtime.
    runtime: Option<Handle>,
}

/// Shared cache handle.
///
/// Cloning is cheap; clones see the same entries. Fetches run on the runtime
/// captured at construction, or on the caller's runtime when none was. With
/// no runtime at all a fetch settles at once with a [`FetchFailure`], so
/// subscribing never panics.
pub struct FetchCache<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for FetchCache<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Default for FetchCache<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}

impl<T> FetchCache<T>
where
    T: Send + Sync + 'static,
{
    /// Create a cache bound to the current tokio runtime, if there is one.
    pub fn new(options: CacheOptions) -> Self {
        Self::build(options, Handle::try_current().ok())
    }

    /// Create a cache that spawns its fetches on `runtime`.
    ///
    /// Use this to subscribe from synchronous code.
    pub fn with_runtime(options: CacheOptions, runtime: Handle) -> Self {
        Self::build(options, Some(runtime))
    }

    fn build(options: CacheOptions, runtime: Option<Handle>) -> Self {
        Self {
            inner: Arc::new(Inner {
                slots: Mutex::new(HashMap::new()),
                options,
                next_generation: AtomicU64::new(1),
                runtime,
            }),
        }
    }

    pub fn options(&self) -> &CacheOptions {
        &self.inner.options
    }

    /// Register interest in `key`.
    ///
    /// Creates the entry and schedules its first fetch when the key is new. For
    /// an existing key the entry's original fetcher is kept and `fetcher` is
    /// dropped.
    pub fn subscribe<F>(&self, key: impl Into<String>, fetcher: F) -> Subscription<T>
    where
        F: Fetcher<T> + 'static,
    {
        let key = key.into();
        let (rx, generation, created) = {
            let mut slots = self.lock();
            match slots.get_mut(&key) {
                Some(slot) => {
                    slot.subscribers += 1;
                    (slot.tx.subscribe(), slot.generation, false)
                }
                None => {
                    let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
                    let (tx, rx) = watch::channel(CacheEntry::new(key.clone()));
                    slots.insert(key.clone(), Slot { generation, subscribers: 1, fetcher: Arc::new(fetcher), tx });
                    (rx, generation, true)
                }
            }
        };

        tracing::debug!(key = %key, created, "subscribed");

        if created || self.inner.options.revalidate_on_mount {
            self.revalidate(&key);
        }

        Subscription::new(self.clone(), key, generation, rx)
    }

    /// Start a fetch for `key` unless one is already in flight.
    ///
    /// Returns true when a fetch was started. The outcome is published to
    /// subscribers, never returned here. A fetcher that panics settles the
    /// entry with a [`FetchFailure`] like any other failed fetch.
    pub fn revalidate(&self, key: &str) -> bool {
        let (fetcher, generation) = {
            let slots = self.lock();
            let Some(slot) = slots.get(key) else {
                tracing::debug!(key, "revalidate on unknown key ignored");
                return false;
            };
            if slot.tx.borrow().is_validating() {
                tracing::debug!(key, "fetch already in flight, deduplicated");
                return false;
            }
            slot.tx.send_modify(|entry| entry.status = Status::Validating);
            (Arc::clone(&slot.fetcher), slot.generation)
        };

        let Some(runtime) = self.runtime() else {
            tracing::warn!(key, "no tokio runtime to run the fetch on");
            self.settle(key, generation, Err(FetchFailure::new("no async runtime available")));
            return true;
        };

        let cache = self.clone();
        let key = key.to_string();
        runtime.spawn(async move {
            tracing::debug!(key = %key, "fetch started");
            let fetch_key = key.clone();
            let result = match tokio::spawn(async move { fetcher.fetch(&fetch_key).await }).await {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!(key = %key, error = %err, "fetcher task aborted");
                    Err(FetchFailure::new(format!("fetcher aborted: {err}")))
                }
            };
            cache.settle(&key, generation, result);
        });

        true
    }

    /// Force a re-fetch; the pull-to-refresh entry point.
    pub fn mutate(&self, key: &str) -> bool {
        self.revalidate(key)
    }

    /// Replace the cached data locally without calling the fetcher.
    ///
    /// Ignored while a fetch is in flight. Returns true when applied.
    pub fn mutate_with(&self, key: &str, data: Vec<T>) -> bool {
        let slots = self.lock();
        let Some(slot) = slots.get(key) else {
            return false;
        };
        if slot.tx.borrow().is_validating() {
            tracing::debug!(key, "local mutation skipped while validating");
            return false;
        }
        slot.tx.send_modify(|entry| {
            entry.data = Some(Arc::new(data));
            entry.error = None;
            entry.status = Status::Settled;
            entry.fetched_at = Some(Utc::now());
        });
        true
    }

    /// Current state of `key`, if any subscription holds it.
    pub fn snapshot(&self, key: &str) -> Option<CacheEntry<T>> {
        self.lock().get(key).map(|slot| slot.tx.borrow().clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn runtime(&self) -> Option<Handle> {
        self.inner.runtime.clone().or_else(|| Handle::try_current().ok())
    }

    fn settle(&self, key: &str, generation: u64, result: Result<Vec<T>, FetchFailure>) {
        let slots = self.lock();
        let Some(slot) = slots.get(key).filter(|slot| slot.generation == generation) else {
            tracing::warn!(key, "fetch settled after its entry was discarded");
            return;
        };

        match &result {
            Ok(data) => tracing::debug!(key, records = data.len(), "fetch succeeded"),
            Err(failure) => tracing::warn!(key, error = %failure, "fetch failed"),
        }

        slot.tx.send_modify(|entry| entry.apply(result));
    }

    pub(crate) fn retain(&self, key: &str, generation: u64) {
        if let Some(slot) = self.lock().get_mut(key)
            && slot.generation == generation
        {
            slot.subscribers += 1;
        }
    }

    pub(crate) fn release(&self, key: &str, generation: u64) {
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(key).filter(|slot| slot.generation == generation) else {
            return;
        };
        slot.subscribers = slot.subscribers.saturating_sub(1);
        if slot.subscribers == 0 {
            slots.remove(key);
            tracing::debug!(key, "last subscriber gone, entry discarded");
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot<T>>> {
        self.inner.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
