//! Entry points over the knowledge store: an MCP stdio server and a
//! one-shot CLI, both built on the same [`setup::bootstrap`] and
//! [`ue_knowledge_search::KnowledgeApi`] (spec §6.3, §6.5).

pub mod cli;
pub mod db_path;
pub mod error;
pub mod indexing;
pub mod mcp_server;
pub mod setup;

pub use error::{Result, ServerError};
