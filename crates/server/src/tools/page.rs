//! users_page, users_next and users_prev tool implementations.
//!
//! Render the current window of the cached user list and move between pages.

use chrono::SecondsFormat;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use userdeck_client::User;
use userdeck_core::{Error, PageView, PagedView, Status, ViewState};

/// One user as shown in the list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserCard {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
}

impl From<User> for UserCard {
    fn from(user: User) -> Self {
        Self { id: user.id, name: user.name, username: user.username, email: user.email }
    }
}

/// Output of the users_page tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageOutput {
    /// Users on the current page.
    pub users: Vec<UserCard>,
    /// 1-based page index.
    pub current_page: usize,
    pub total_pages: usize,
    /// Whether users_prev would move.
    pub has_prev: bool,
    /// Whether users_next would move.
    pub has_next: bool,
    /// Fetch status of the underlying cache entry.
    pub status: Status,
    /// Screen to render: loading, failed, empty or ready.
    pub state: ViewState,
    /// Message of the last failed fetch, if the last fetch failed.
    pub error: Option<String>,
    /// ISO8601 timestamp of the last successful fetch.
    pub fetched_at: Option<String>,
}

impl From<PageView<User>> for PageOutput {
    fn from(page: PageView<User>) -> Self {
        Self {
            users: page.items.into_iter().map(UserCard::from).collect(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            has_prev: page.has_prev,
            has_next: page.has_next,
            status: page.status,
            state: page.state,
            error: page.error,
            fetched_at: page.fetched_at.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

/// Output of the users_next and users_prev tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NavigateOutput {
    /// False when already on the first (prev) or last (next) page.
    pub moved: bool,
    pub page: PageOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Render the current page.
pub async fn current_page(view: &Mutex<PagedView<User>>) -> PageOutput {
    view.lock().await.view().into()
}

/// Move one page in `direction` and render the result.
pub async fn navigate(view: &Mutex<PagedView<User>>, direction: Direction) -> NavigateOutput {
    let mut view = view.lock().await;
    let moved = match direction {
        Direction::Next => view.next(),
        Direction::Prev => view.prev(),
    };
    let page: PageOutput = view.view().into();
    tracing::debug!(?direction, moved, page = page.current_page, "navigated");
    NavigateOutput { moved, page }
}

/// Implementation of the users_page tool.
pub async fn page_impl(view: &Mutex<PagedView<User>>) -> Result<CallToolResult, McpError> {
    to_result(&current_page(view).await)
}

/// Implementation of the users_next and users_prev tools.
pub async fn navigate_impl(view: &Mutex<PagedView<User>>, direction: Direction) -> Result<CallToolResult, McpError> {
    to_result(&navigate(view, direction).await)
}

pub(crate) fn to_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
