//! Runs one indexing pass over a bootstrapped project (spec §4.5, Phases
//! 0-7), the shared path behind the CLI's `index` subcommand.

use ue_knowledge_indexer::{IndexCounters, IndexOptions, Pipeline};

use crate::error::Result;
use crate::setup::ProjectSetup;

pub fn run_index(setup: &ProjectSetup, options: &IndexOptions) -> Result<IndexCounters> {
    let pipeline = Pipeline {
        context: &setup.context,
        store: &setup.store,
        adapter: &setup.adapter,
        registry: &setup.registry,
        embedder: None,
    };
    Ok(pipeline.run(options)?)
}
