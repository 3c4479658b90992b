// ABOUTME: Logging configuration and structured logging setup for the server
// ABOUTME: Configures tracing-subscriber with env-filter and pretty or JSON output
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! Structured logging setup
//!
//! stdout belongs to the stdio transport, so every log line goes to stderr.

use crate::config::LogLevel;
use tracing_subscriber::EnvFilter;

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Pretty format for development
    Pretty,
    /// JSON format for machine-read logs
    Json,
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level so operators can
/// raise verbosity per module without touching configuration. Safe to call
/// more than once; later calls are no-ops.
pub fn init(level: LogLevel, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = match format {
        LogFormat::Pretty => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    // A second init (tests, embedded use) is fine; the first subscriber wins.
    drop(result);
}
