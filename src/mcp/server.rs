/// MCP Server setup using `rmcp` with stdio transport.
///
/// Provides `McpContext` (shared state) and `McpServer` (startup logic).
use crate::mcp::tools::AppTools;
use anyhow::{Context, Result};
use rmcp::{ServiceExt, handler::server::router::Router, transport::io::stdio};
use std::sync::Arc;
use tracing::info;

use crate::{config::Config, engine::QaEngine};
use tokio::sync::RwLock as TokioRwLock;

/// Shared application context available to all tool handlers.
///
/// Searches take the read lock and run side by side; a reload takes the
/// write lock, so no query sees a partially rebuilt index.
#[derive(Clone)]
pub struct McpContext {
    pub engine: Arc<TokioRwLock<QaEngine>>,
    pub config: Arc<Config>,
}

impl McpContext {
    pub fn new(engine: QaEngine, config: Config) -> Self {
        Self {
            engine: Arc::new(TokioRwLock::new(engine)),
            config: Arc::new(config),
        }
    }
}

/// MCP Server wrapping the context and serving via stdio.
#[derive(Clone)]
pub struct McpServer {
    pub ctx: McpContext,
}

impl McpServer {
    pub fn new(ctx: McpContext) -> Self {
        Self { ctx }
    }

    /// Start the MCP server on stdio transport (blocks until the client disconnects).
    pub async fn start(self) -> Result<()> {
        info!("Starting MCP server on stdio...");
        let (stdin, stdout) = stdio();

        let app_tools = AppTools::new(self.ctx.clone());
        let router = Router::new(app_tools.clone()).with_tools(app_tools.tool_router.clone());

        let service = router
            .serve((stdin, stdout))
            .await
            .context("MCP Server encountered an error during stdio transport")?;

        service
            .waiting()
            .await
            .context("MCP Server task terminated abnormally")?;

        Ok(())
    }
}
