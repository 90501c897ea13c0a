use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use ue_knowledge_search::KnowledgeApi;
use ue_knowledge_server::mcp_server::KnowledgeMcpServer;

#[derive(Parser, Debug)]
#[command(name = "ue-knowledge-mcp", version, about = "Unreal project knowledge index, served over MCP stdio")]
struct Args {
    /// Root of the Unreal project (contains `Content/`). Falls back to `UE_PROJECT_ROOT`, then the cwd.
    #[arg(long)]
    project_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let project_root = args
        .project_root
        .or_else(|| std::env::var_os("UE_PROJECT_ROOT").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    let setup = ue_knowledge_server::setup::bootstrap(&project_root)?;
    let api = Arc::new(KnowledgeApi::new(setup.store.clone(), setup.context.profile.clone()));

    tracing::info!(project_root = %project_root.display(), "starting MCP stdio server");
    let server = KnowledgeMcpServer::new(api);
    let running = server.serve(stdio()).await?;
    running.waiting().await?;
    Ok(())
}
