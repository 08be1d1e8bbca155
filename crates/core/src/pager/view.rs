//! Page controller bound to a live cache subscription.

use super::PageController;
use crate::cache::{CacheEntry, Status, Subscription};
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which screen a consumer should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    /// Nothing fetched yet.
    Loading,
    /// The last fetch failed and none is in flight; offer a retry.
    Failed,
    /// The last fetch returned no records.
    Empty,
    /// Records are available (possibly stale while revalidating).
    Ready,
}

impl ViewState {
    fn classify<T>(entry: &CacheEntry<T>) -> Self {
        let validating = entry.is_validating();
        match entry.data.as_deref() {
            _ if !validating && entry.error.is_some() => ViewState::Failed,
            None => ViewState::Loading,
            Some(data) if !validating && data.is_empty() => ViewState::Empty,
            Some(_) => ViewState::Ready,
        }
    }
}

/// Everything a view layer needs to draw one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub status: Status,
    pub state: ViewState,
    pub error: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Paged, navigable window over a subscribed collection.
///
/// Every read first reconciles the page index with the entry's current data,
/// so a shrinking refresh clamps the page before it is shown. An in-flight
/// revalidation leaves the window untouched because the stale data is kept.
#[derive(Debug)]
pub struct PagedView<T>
where
    T: Send + Sync + 'static,
{
    subscription: Subscription<T>,
    controller: PageController,
}

impl<T> PagedView<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `page_size` is 0.
    pub fn new(subscription: Subscription<T>, page_size: usize) -> Result<Self, Error> {
        Ok(Self { subscription, controller: PageController::new(page_size)? })
    }

    pub fn subscription(&self) -> &Subscription<T> {
        &self.subscription
    }

    pub fn current_page(&mut self) -> usize {
        self.reconcile();
        self.controller.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.controller.total_pages(self.subscription.snapshot().records())
    }

    /// Current page contents and status.
    pub fn view(&mut self) -> PageView<T> {
        let entry = self.subscription.snapshot();
        let records = entry.records();
        self.controller.data_changed(records);

        PageView {
            items: self.controller.visible_slice(records).to_vec(),
            current_page: self.controller.current_page(),
            total_pages: self.controller.total_pages(records),
            has_prev: self.controller.has_prev(),
            has_next: self.controller.has_next(records),
            status: entry.status,
            state: ViewState::classify(&entry),
            error: entry.error.as_ref().map(ToString::to_string),
            fetched_at: entry.fetched_at,
        }
    }

    pub fn next(&mut self) -> bool {
        let entry = self.subscription.snapshot();
        self.controller.data_changed(entry.records());
        self.controller.next(entry.records())
    }

    pub fn prev(&mut self) -> bool {
        self.reconcile();
        self.controller.prev()
    }

    /// Pull-to-refresh. Returns false when a fetch is already in flight.
    pub fn refresh(&self) -> bool {
        if self.subscription.is_validating() {
            return false;
        }
        self.subscription.mutate()
    }

    /// Wait for the next cache change and reconcile the page index.
    pub async fn changed(&mut self) -> Result<(), Error> {
        self.subscription.changed().await?;
        self.reconcile();
        Ok(())
    }

    /// Wait for any in-flight fetch to settle, then render the page.
    pub async fn settled(&mut self) -> Result<PageView<T>, Error> {
        self.subscription.settled().await?;
        Ok(self.view())
    }

    fn reconcile(&mut self) {
        let entry = self.subscription.snapshot();
        self.controller.data_changed(entry.records());
    }
}
