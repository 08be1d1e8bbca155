//! Pluggable fetch contract consumed by the cache.

use crate::FetchFailure;
use std::future::Future;

/// Loads the full collection behind a cache key.
///
/// Implementations may be called any number of times for the same key and must
/// classify a given response the same way every time.
#[async_trait::async_trait]
pub trait Fetcher<T>: Send + Sync {
    /// Fetch and decode the records for `key`.
    async fn fetch(&self, key: &str) -> Result<Vec<T>, FetchFailure>;
}

/// Fetcher backed by an async closure.
pub struct FnFetcher<F> {
    f: F,
}

/// Wrap an async closure taking the key as an owned `String`.
pub fn fetcher_fn<F>(f: F) -> FnFetcher<F> {
    FnFetcher { f }
}

#[async_trait::async_trait]
impl<T, F, Fut> Fetcher<T> for FnFetcher<F>
where
    T: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, FetchFailure>> + Send + 'static,
{
    async fn fetch(&self, key: &str) -> Result<Vec<T>, FetchFailure> {
        (self.f)(key.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetcher_fn_passes_key() {
        let fetcher = fetcher_fn(|key: String| async move { Ok::<_, FetchFailure>(vec![key.len()]) });
        let result = fetcher.fetch("abcd").await.unwrap();
        assert_eq!(result, vec![4]);
    }

    #[tokio::test]
    async fn test_fetcher_fn_failure() {
        let fetcher = fetcher_fn(|_key: String| async move { Err::<Vec<u8>, _>(FetchFailure::new("offline")) });
        let err = fetcher.fetch("k").await.unwrap_err();
        assert_eq!(err.message(), "offline");
    }
}
