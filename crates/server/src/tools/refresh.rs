//! users_refresh tool implementation.
//!
//! Pull-to-refresh: re-fetches the user list unless a fetch is already running.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use userdeck_client::User;
use userdeck_core::{Error, PagedView};

use super::page::{PageOutput, to_result};

/// Parameters for the users_refresh tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RefreshParams {
    /// Wait for the fetch to finish before answering (default: false).
    #[serde(default)]
    pub wait: bool,
}

/// Output from the users_refresh tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RefreshOutput {
    /// False when a fetch was already in flight and this call joined it.
    pub started: bool,
    pub page: PageOutput,
}

/// Trigger a revalidation and render the page, optionally after it settles.
pub async fn refresh(view: &Mutex<PagedView<User>>, params: RefreshParams) -> Result<RefreshOutput, Error> {
    let (started, mut subscription) = {
        let view = view.lock().await;
        (view.refresh(), view.subscription().clone())
    };

    if params.wait {
        subscription.settled().await?;
    }
    drop(subscription);

    let page = view.lock().await.view().into();
    Ok(RefreshOutput { started, page })
}

/// Implementation of the users_refresh tool.
pub async fn refresh_impl(view: &Mutex<PagedView<User>>, params: RefreshParams) -> Result<CallToolResult, McpError> {
    let output = refresh(view, params).await?;
    to_result(&output)
}
