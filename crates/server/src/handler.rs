//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::page::{Direction, navigate_impl, page_impl};
use crate::tools::refresh::{RefreshParams, refresh_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use tokio::sync::Mutex;
use userdeck_client::User;
use userdeck_core::PagedView;

/// The main MCP server handler for userdeck.
#[derive(Clone)]
pub struct UserDeckServer {
    tool_router: ToolRouter<Self>,
    view: Arc<Mutex<PagedView<User>>>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl UserDeckServer {
    /// Create a new server handler over a paged user list.
    pub fn new(view: PagedView<User>) -> Self {
        Self { tool_router: Self::tool_router(), view: Arc::new(Mutex::new(view)) }
    }

    /// Show the current page of users.
    #[tool(description = "Show the current page of the user list with paging and fetch status.")]
    async fn users_page(&self) -> Result<CallToolResult, McpError> {
        page_impl(&self.view).await
    }

    /// Move to the next page.
    #[tool(description = "Move to the next page of users. Does nothing on the last page.")]
    async fn users_next(&self) -> Result<CallToolResult, McpError> {
        navigate_impl(&self.view, Direction::Next).await
    }

    /// Move to the previous page.
    #[tool(description = "Move to the previous page of users. Does nothing on the first page.")]
    async fn users_prev(&self) -> Result<CallToolResult, McpError> {
        navigate_impl(&self.view, Direction::Prev).await
    }

    /// Re-fetch the user list.
    #[tool(description = "Re-fetch the user list. Joins the running fetch if one is in flight; set wait to block until it finishes.")]
    async fn users_refresh(&self, params: Parameters<RefreshParams>) -> Result<CallToolResult, McpError> {
        refresh_impl(&self.view, params.0).await
    }
}

impl ServerHandler for UserDeckServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "userdeck".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::page::tests::loaded_view;

    #[tokio::test]
    async fn test_lists_all_tools() {
        let view = loaded_view(3, 4).await.into_inner();
        let server = UserDeckServer::new(view);
        let names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();

        for expected in ["users_page", "users_next", "users_prev", "users_refresh"] {
            assert!(names.iter().any(|n| n == expected), "missing tool {expected}");
        }
    }

    #[tokio::test]
    async fn test_server_info_name() {
        let view = loaded_view(0, 4).await.into_inner();
        let server = UserDeckServer::new(view);
        assert_eq!(server.get_info().server_info.name, "userdeck");
    }
}
