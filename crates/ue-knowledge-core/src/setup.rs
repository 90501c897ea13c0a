//! Process-wide logging setup, grounded on `mcp-agent-mail-core::setup`'s
//! one-shot init pattern.

use std::sync::OnceLock;

static INIT: OnceLock<()> = OnceLock::new();

/// Initialize `tracing` with an `EnvFilter` (`RUST_LOG`, default `info`).
/// Safe to call multiple times; only the first call takes effect.
pub fn init_tracing() {
    INIT.get_or_init(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .ok();
    });
}
