//! Configuration and logging setup.

/// TOML configuration with environment overrides.
pub mod config;
/// Tracing subscriber initialization.
pub mod logging;
