//! Shared config, error taxonomy, profile loading, and application context
//! for the UE knowledge agent.
//!
//! This crate provides:
//! - Environment-variable configuration (`config`)
//! - The project profile system (`profile`)
//! - Common error types (`error`)
//! - The explicit `Context` struct entry points are constructed with
//!   (`context`), replacing the source's module-level globals.

#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod error;
pub mod profile;
pub mod setup;

pub use config::EnvConfig;
pub use context::{Context, PluginRoot};
pub use error::{Error, Result};
pub use profile::Profile;
