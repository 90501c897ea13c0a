//! Thin subprocess adapter over the external Unreal asset-inspection
//! binary: binary resolution, command construction, timeouts, and
//! NDJSON/XML decoding. No business logic lives here.

pub mod adapter;
pub mod commands;
pub mod error;
pub mod protocol;
pub mod resolve;
pub mod testing;

pub use adapter::{BatchOutcome, ParserAdapter, SingleOutput, SubprocessParserAdapter};
pub use commands::{BatchCommand, SingleCommand};
pub use error::{Error, Result};
pub use protocol::ParsedReferences;
pub use resolve::resolve_binary;
