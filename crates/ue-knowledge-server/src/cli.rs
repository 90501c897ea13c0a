//! `ue-knowledge-cli`: one-shot indexing and search runs from a terminal,
//! mirroring `mcp-agent-mail-cli`'s `clap` derive + library `run()` shape.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ue_knowledge_indexer::IndexOptions;
use ue_knowledge_search::{InspectOptions, KnowledgeApi, SearchMode, SearchRequest};

use crate::error::Result;
use crate::indexing::run_index;
use crate::setup::bootstrap;

#[derive(Parser, Debug)]
#[command(name = "ue-knowledge-cli", version, about = "Unreal project knowledge index: build and query from a terminal")]
pub struct Cli {
    /// Root of the Unreal project (contains `Content/`).
    #[arg(long, global = true, default_value = ".")]
    pub project_root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run (or re-run) the indexing pipeline over the project.
    Index {
        /// Re-index every asset, ignoring the mtime/hash change-detection skip.
        #[arg(long)]
        force: bool,
        /// Only report what would be indexed; write nothing.
        #[arg(long)]
        dry_run: bool,
        /// Stop after this many discovered assets (useful for smoke-testing large projects).
        #[arg(long)]
        max_assets: Option<usize>,
    },
    /// Run one auto-routed search query against the existing index.
    Search {
        query: String,
        /// Force a specific search mode instead of auto-routing.
        #[arg(long, value_enum)]
        mode: Option<SearchModeArg>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Inspect a single asset by its `/Game/...` path.
    Inspect {
        path: String,
        #[arg(long)]
        summarize: bool,
        #[arg(long)]
        type_only: bool,
        /// Pass `graph` to attach the reference graph around this asset.
        #[arg(long)]
        detail: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SearchModeArg {
    Tags,
    Inherits,
    Trace,
    Refs,
    Name,
    Semantic,
}

impl From<SearchModeArg> for SearchMode {
    fn from(value: SearchModeArg) -> Self {
        match value {
            SearchModeArg::Tags => Self::Tags,
            SearchModeArg::Inherits => Self::Inherits,
            SearchModeArg::Trace => Self::Trace,
            SearchModeArg::Refs => Self::Refs,
            SearchModeArg::Name => Self::Name,
            SearchModeArg::Semantic => Self::Semantic,
        }
    }
}

pub fn run() -> i32 {
    let cli = Cli::parse();
    match run_command(&cli) {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!(error = %err, "ue-knowledge-cli failed");
            eprintln!("error: {err}");
            1
        }
    }
}

fn run_command(cli: &Cli) -> Result<()> {
    let setup = bootstrap(&cli.project_root)?;

    match &cli.command {
        Commands::Index { force, dry_run, max_assets } => {
            let options = IndexOptions { force: *force, dry_run: *dry_run, max_assets: *max_assets, ..IndexOptions::default() };
            let counters = run_index(&setup, &options)?;
            println!("{}", serde_json::to_string_pretty(&counters)?);
        }
        Commands::Search { query, mode, limit } => {
            let api = KnowledgeApi::new(setup.store.clone(), setup.context.profile.clone());
            let request = SearchRequest {
                query: query.clone(),
                search_type: mode.map(std::convert::Into::into),
                asset_types: None,
                limit: *limit,
            };
            let response = api.search(&request);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Inspect { path, summarize, type_only, detail } => {
            let api = KnowledgeApi::new(setup.store.clone(), setup.context.profile.clone());
            let opts = InspectOptions { summarize: *summarize, type_only: *type_only, detail: detail.clone() };
            let response = api.inspect_asset(path, &opts);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
