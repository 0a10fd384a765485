/// MCP Tool handlers for kbqa.
///
/// 1. search         – rank evidences by TF-IDF similarity
/// 2. ask            – answer a question from the best-matching evidence
/// 3. stats          – corpus statistics
/// 4. load_knowledge – reload the knowledge base from a JSON file
use crate::engine::Snapshot;
use crate::kb::loader::KnowledgeSource;
use crate::mcp::server::McpContext;
use anyhow::Context;
use rmcp::handler::server::ServerHandler;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{ErrorData as McpError, handler::server::tool::ToolRouter, model::*, tool, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn};

// ── Parameter structs ────────────────────────────────────────────────

#[derive(Deserialize, JsonSchema)]
struct QueryParams {
    /// Question or keywords (natural language)
    query: String,
    /// Max results to consider (defaults from config)
    top_n: Option<usize>,
}

#[derive(Deserialize, JsonSchema)]
struct LoadParams {
    /// Path to the knowledge base JSON file (configured file if omitted)
    filepath: Option<String>,
}

// ── Response helpers ─────────────────────────────────────────────────

fn json_result(value: serde_json::Value) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&value).unwrap_or_default(),
    )]))
}

fn error_result(msg: &str) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg.to_string())]))
}

// ── Context operations (transport independent) ───────────────────────

pub(crate) async fn search_json(
    ctx: &McpContext,
    query: &str,
    top_n: Option<usize>,
) -> serde_json::Value {
    let top_n = top_n.unwrap_or(ctx.config.search_top_n);
    let engine = ctx.engine.read().await;
    let results = engine.search(query, top_n);
    serde_json::json!({ "results": results })
}

pub(crate) async fn ask_json(
    ctx: &McpContext,
    query: &str,
    top_n: Option<usize>,
) -> serde_json::Value {
    let top_n = top_n.unwrap_or(ctx.config.answer_top_n);
    let engine = ctx.engine.read().await;
    serde_json::json!(engine.generate_answer(query, top_n))
}

pub(crate) async fn stats_json(ctx: &McpContext) -> serde_json::Value {
    let engine = ctx.engine.read().await;
    serde_json::json!(engine.stats())
}

/// Parse and index on the blocking pool; the write lock is held only for
/// the swap.
pub(crate) async fn load_json(
    ctx: &McpContext,
    filepath: Option<&str>,
) -> anyhow::Result<serde_json::Value> {
    let path = filepath
        .map(PathBuf::from)
        .unwrap_or_else(|| ctx.config.knowledge_path());
    let tokenizer = ctx.engine.read().await.tokenizer();

    let source = KnowledgeSource::File(path.clone());
    let snapshot =
        tokio::task::spawn_blocking(move || Snapshot::build(&source, tokenizer.as_ref()))
            .await
            .context("knowledge base load task failed")??;

    let stats = ctx.engine.write().await.install(snapshot);
    info!("Reloaded knowledge base from {}: {stats:?}", path.display());
    Ok(serde_json::json!({ "success": true, "stats": stats }))
}

// ── Tool implementations ─────────────────────────────────────────────

#[derive(Clone)]
pub struct AppTools {
    pub ctx: McpContext,
    pub tool_router: ToolRouter<Self>,
}

impl ServerHandler for AppTools {}

#[tool_router]
impl AppTools {
    pub fn new(ctx: McpContext) -> Self {
        Self {
            ctx,
            tool_router: Self::tool_router(),
        }
    }

    // ── Tool 1: search ──────────────────────────────────────────────

    #[tool(
        description = "Search the knowledge base for evidence similar to the query. Returns matched questions, evidence texts, answers and similarity scores, best first."
    )]
    async fn search(&self, params: Parameters<QueryParams>) -> Result<CallToolResult, McpError> {
        let p = params.0;
        if p.query.trim().is_empty() {
            return error_result("query is required");
        }
        json_result(search_json(&self.ctx, &p.query, p.top_n).await)
    }

    // ── Tool 2: ask ─────────────────────────────────────────────────

    #[tool(
        description = "Answer a question from the knowledge base. Returns the answer plus the matched question, evidence and score as a reference."
    )]
    async fn ask(&self, params: Parameters<QueryParams>) -> Result<CallToolResult, McpError> {
        let p = params.0;
        if p.query.trim().is_empty() {
            return error_result("query is required");
        }
        json_result(ask_json(&self.ctx, &p.query, p.top_n).await)
    }

    // ── Tool 3: stats ───────────────────────────────────────────────

    #[tool(description = "Knowledge base statistics: question, evidence and indexed counts")]
    async fn stats(&self) -> Result<CallToolResult, McpError> {
        json_result(stats_json(&self.ctx).await)
    }

    // ── Tool 4: load_knowledge ──────────────────────────────────────

    #[tool(
        description = "Reload the knowledge base from a JSON file and rebuild the index. On failure the previous knowledge base stays active."
    )]
    async fn load_knowledge(
        &self,
        params: Parameters<LoadParams>,
    ) -> Result<CallToolResult, McpError> {
        match load_json(&self.ctx, params.0.filepath.as_deref()).await {
            Ok(value) => json_result(value),
            Err(e) => {
                warn!("load_knowledge failed: {e:#}");
                error_result(&format!("load failed: {e:#}"))
            }
        }
    }
}
