//! MCP stdio server exposing `search` and `inspect_asset` as tools over
//! [`KnowledgeApi`] (spec §6.3, §6.5 "transport: MCP over stdio").
//!
//! Unlike the rest of this crate, the `rmcp` tool-router wiring here has no
//! local precedent in the corpus this codebase was grown from — it follows
//! the published `rmcp` crate's own documented server shape rather than an
//! in-repo example.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;

use ue_knowledge_search::{InspectOptions, KnowledgeApi, SearchMode, SearchRequest};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// Free-text or structured query (e.g. `tag:Fortify`, a dotted C++ class name, a `/Game/...` path).
    pub query: String,
    /// Force a search mode instead of auto-routing: tags, inherits, trace, refs, name, semantic.
    #[serde(default)]
    pub mode: Option<String>,
    /// Restrict results to these asset types (e.g. `["Blueprint", "WidgetBlueprint"]`).
    #[serde(default)]
    pub asset_types: Option<Vec<String>>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InspectArgs {
    /// Asset path, e.g. `/Game/Blueprints/BP_Pistol`.
    pub path: String,
    #[serde(default)]
    pub summarize: bool,
    #[serde(default)]
    pub type_only: bool,
    /// Only recognized value is `"graph"`, which attaches the reference graph.
    #[serde(default)]
    pub detail: Option<String>,
}

fn parse_mode(mode: Option<&str>) -> Option<SearchMode> {
    match mode {
        Some("tags") => Some(SearchMode::Tags),
        Some("inherits") => Some(SearchMode::Inherits),
        Some("trace") => Some(SearchMode::Trace),
        Some("refs") => Some(SearchMode::Refs),
        Some("name") => Some(SearchMode::Name),
        Some("semantic") => Some(SearchMode::Semantic),
        _ => None,
    }
}

fn json_tool_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let body = serde_json::to_string(value)
        .map_err(|err| McpError::internal_error(format!("failed to serialize tool result: {err}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(body)]))
}

#[derive(Clone)]
pub struct KnowledgeMcpServer {
    api: Arc<KnowledgeApi>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl KnowledgeMcpServer {
    #[must_use]
    pub fn new(api: Arc<KnowledgeApi>) -> Self {
        Self { api, tool_router: Self::tool_router() }
    }

    #[tool(description = "Search the indexed Unreal Engine project: tags, C++ inheritance, system traces, level/asset references, name lookup, or free-text semantic search, auto-routed by query shape unless `mode` is given.")]
    async fn search(&self, Parameters(args): Parameters<SearchArgs>) -> Result<CallToolResult, McpError> {
        let request = SearchRequest {
            query: args.query,
            search_type: parse_mode(args.mode.as_deref()),
            asset_types: args.asset_types,
            limit: args.limit,
        };
        let response = self.api.search(&request);
        json_tool_result(&response)
    }

    #[tool(description = "Inspect a single indexed asset by its /Game/... path: full text and metadata, or just its type, or its reference graph.")]
    async fn inspect_asset(&self, Parameters(args): Parameters<InspectArgs>) -> Result<CallToolResult, McpError> {
        let opts = InspectOptions { summarize: args.summarize, type_only: args.type_only, detail: args.detail };
        let response = self.api.inspect_asset(&args.path, &opts);
        json_tool_result(&response)
    }
}

#[tool_handler]
impl ServerHandler for KnowledgeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Query the indexed Unreal Engine project via `search` (auto-routed across tags, inherits, \
                 trace, refs, name, and semantic modes) and `inspect_asset` (full detail on one asset path)."
                    .to_string(),
            ),
        }
    }
}
