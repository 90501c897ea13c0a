//! Environment-variable configuration (spec §6.4).
//!
//! A single place that parses and clamps every `UE_INDEX_*` /
//! `UE_ASSETPARSER_*` environment variable, matching
//! `mcp-agent-mail-core::config`'s pattern of one `env_value` helper reused
//! by every field instead of ad hoc `std::env::var` calls scattered through
//! the codebase.

use std::env;
use std::time::Duration;

/// Read an environment variable and parse it, falling back to `default` on
/// absence or parse failure.
fn env_value<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    matches!(env::var(key).as_deref(), Ok("1") | Ok("true") | Ok("TRUE"))
}

/// Resolved environment configuration, loaded once per process.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// `UE_INDEX_BATCH_TIMEOUT`, default 600s, clamped to >= 1s.
    pub batch_timeout: Duration,
    /// `UE_INDEX_ASSET_TIMEOUT`, default 60s, clamped to >= 1s.
    pub asset_timeout: Duration,
    /// `UE_INDEX_TIMING`
    pub timing_enabled: bool,
    /// `UE_INDEX_BATCH_SIZE`, default 500, clamped to 1..=2000.
    pub batch_size: usize,
    /// `UE_INDEX_MAX_BATCH_MEMORY`, advisory MB cap. `None` = unbounded.
    pub max_batch_memory_mb: Option<u64>,
    /// `UE_ASSETPARSER_MAX_PARALLELISM`, default = available parallelism.
    pub max_parallelism: usize,
    /// `UE_AGENT_DEBUG`
    pub agent_debug: bool,
    /// `UNREAL_MCP_ENABLE_EMBEDDINGS`
    pub embeddings_enabled: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::load()
    }
}

impl EnvConfig {
    #[must_use]
    pub fn load() -> Self {
        let batch_timeout_secs: u64 = env_value("UE_INDEX_BATCH_TIMEOUT", 600).max(1);
        let asset_timeout_secs: u64 = env_value("UE_INDEX_ASSET_TIMEOUT", 60).max(1);
        let batch_size: usize = env_value("UE_INDEX_BATCH_SIZE", 500usize).clamp(1, 2000);
        let max_parallelism = env::var("UE_ASSETPARSER_MAX_PARALLELISM")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(std::num::NonZeroUsize::get)
                    .unwrap_or(4)
            });

        Self {
            batch_timeout: Duration::from_secs(batch_timeout_secs),
            asset_timeout: Duration::from_secs(asset_timeout_secs),
            timing_enabled: env_flag("UE_INDEX_TIMING"),
            batch_size,
            max_batch_memory_mb: env::var("UE_INDEX_MAX_BATCH_MEMORY")
                .ok()
                .and_then(|v| v.parse::<u64>().ok()),
            max_parallelism,
            agent_debug: env_flag("UE_AGENT_DEBUG"),
            embeddings_enabled: env_flag("UNREAL_MCP_ENABLE_EMBEDDINGS"),
        }
    }
}
