//! userdeck server entry point.
//!
//! Boots the MCP server on stdio transport over a paged, revalidating view of
//! the configured user endpoint. Logging goes to stderr to avoid interfering
//! with the JSON-RPC protocol on stdout.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;
use userdeck_client::{FetchConfig, HttpFetcher, User, cache_key};
use userdeck_core::{AppConfig, FetchCache, PagedView};

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let key = cache_key(&config.api_url)?;
    let fetcher = HttpFetcher::new(FetchConfig::from(&config))?;

    let cache: FetchCache<User> = FetchCache::new(config.cache_options());
    let subscription = cache.subscribe(key.clone(), fetcher);
    let view = PagedView::new(subscription, config.page_size)?;

    tracing::info!(key = %key, page_size = config.page_size, "Starting userdeck server on stdio transport");

    let handler = handler::UserDeckServer::new(view);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
