// ABOUTME: Input sample types shared by the intelligence computations
// ABOUTME: Thin data carriers the server builds from store query results
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded tool invocation, as read back from a project store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSample {
    /// Registered tool name at the time of recording
    pub tool_name: String,
    /// Wall-clock timestamp of the invocation
    pub recorded_at: DateTime<Utc>,
}

impl UsageSample {
    /// Convenience constructor used heavily by tests
    #[must_use]
    pub fn new(tool_name: impl Into<String>, recorded_at: DateTime<Utc>) -> Self {
        Self {
            tool_name: tool_name.into(),
            recorded_at,
        }
    }
}

/// One enriched interaction row, reduced to the fields journey analytics read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionSample {
    /// When the interaction was recorded
    pub recorded_at: DateTime<Utc>,
    /// Primary domain classified by the interaction analyzer, if any
    pub domain: Option<String>,
    /// Technical sophistication score in [0, 1], if analyzed
    pub sophistication: Option<f64>,
}
