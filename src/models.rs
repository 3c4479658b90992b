// ABOUTME: Common data models for projects, sessions, usage, and interaction records
// ABOUTME: Row types read from the per-project store plus the on-disk project config
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// On-disk project configuration at `<project>/.srrd/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Human project name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Domain tag (e.g. "physics")
    #[serde(default)]
    pub domain: String,
    /// Methodology tag
    #[serde(default)]
    pub methodology: String,
    /// Whether novel-theory tooling is emphasized for this project
    #[serde(default)]
    pub novel_theory_mode: bool,
    /// Paradigm-focus string for novel-theory projects
    #[serde(default)]
    pub paradigm_focus: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Unnamed Research Project".to_owned(),
            description: String::new(),
            domain: String::new(),
            methodology: String::new(),
            novel_theory_mode: false,
            paradigm_focus: String::new(),
        }
    }
}

/// A project row in the store.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Project {
    /// Surrogate id
    pub id: i64,
    /// Human name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Filesystem path of the project root
    pub path: String,
    /// Domain tag
    pub domain: String,
    /// Methodology tag
    pub methodology: String,
    /// Novel-theory flag
    pub novel_theory_mode: bool,
    /// Paradigm-focus string
    pub paradigm_focus: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Session types recognized by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// Planning-phase work
    Planning,
    /// Execution-phase work
    Execution,
    /// Analysis-phase work
    Analysis,
    /// Publication-phase work
    Publication,
    /// Novel-theory development work
    NovelTheory,
}

impl SessionType {
    /// Stable string stored in the `sessions.session_type` column
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Execution => "execution",
            Self::Analysis => "analysis",
            Self::Publication => "publication",
            Self::NovelTheory => "novel_theory",
        }
    }

    /// Parse with an execution default for unknown input
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "planning" => Self::Planning,
            "analysis" => Self::Analysis,
            "publication" => Self::Publication,
            "novel_theory" => Self::NovelTheory,
            _ => Self::Execution,
        }
    }
}

/// A session row in the store.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Session {
    /// Surrogate id
    pub id: i64,
    /// Owning project id
    pub project_id: i64,
    /// Session type tag
    pub session_type: String,
    /// Paradigm-innovation flag
    pub paradigm_innovation_session: bool,
    /// Owning user identifier
    pub user_id: String,
    /// `active` or `closed`
    pub status: String,
    /// Start timestamp
    pub started_at: DateTime<Utc>,
    /// End timestamp; `None` while the session is open
    pub ended_at: Option<DateTime<Utc>>,
}

/// One recorded tool invocation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ToolUsage {
    /// Surrogate id
    pub id: i64,
    /// Owning session, when the invocation ran inside one
    pub session_id: Option<i64>,
    /// Tool name at the time of recording
    pub tool_name: String,
    /// Opaque free-text summary of the result
    pub result_summary: String,
    /// Wall-clock timestamp
    pub timestamp: DateTime<Utc>,
}

/// One enriched interaction record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Interaction {
    /// Surrogate id
    pub id: i64,
    /// Owning session
    pub session_id: i64,
    /// Type tag, e.g. `enhanced_tool_usage`
    pub interaction_type: String,
    /// JSON-encoded user inputs
    pub content: String,
    /// Optional model/assistant response
    pub response: Option<String>,
    /// Domain tag from the semantic analysis
    pub domain_context: Option<String>,
    /// Novel-theory context string
    pub novel_theory_context: Option<String>,
    /// JSON metadata blob (semantic + progression analyses)
    pub metadata: Option<String>,
    /// Wall-clock timestamp
    pub timestamp: DateTime<Utc>,
}

/// A persisted novel theory attached to a project.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct NovelTheory {
    /// Surrogate id
    pub id: i64,
    /// Owning project id
    pub project_id: i64,
    /// Theory name
    pub theory_name: String,
    /// Core principles text
    pub core_principles: String,
    /// Mainstream-comparison text
    pub mainstream_comparison: Option<String>,
    /// Validation-results blob (JSON)
    pub validation_results: Option<String>,
    /// Equal-treatment score in [0, 1]
    pub equal_treatment_score: Option<f64>,
    /// Development stage tag
    pub development_stage: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A persisted mainstream-vs-alternative paradigm comparison.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ParadigmComparison {
    /// Surrogate id
    pub id: i64,
    /// Owning project id
    pub project_id: i64,
    /// Mainstream framing
    pub mainstream_paradigm: String,
    /// Alternative framing
    pub alternative_paradigm: String,
    /// Comparison-results blob (JSON)
    pub comparison_results: Option<String>,
    /// Equal-treatment score in [0, 1]
    pub equal_treatment_score: Option<f64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A persisted document or bibliography reference.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Document {
    /// Surrogate id
    pub id: i64,
    /// Owning project id
    pub project_id: i64,
    /// Document title
    pub title: String,
    /// `document` or `bibliography_reference`
    pub doc_kind: String,
    /// Document body or reference payload (JSON for references)
    pub content: String,
    /// Path of a generated file, when one was written
    pub file_path: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A persisted quality-check result.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QualityCheck {
    /// Surrogate id
    pub id: i64,
    /// Owning project id
    pub project_id: i64,
    /// Checked document, when the check targeted one
    pub document_id: Option<i64>,
    /// Gate name, e.g. `publication_readiness`
    pub check_type: String,
    /// `pass`, `warn`, or `fail`
    pub result: String,
    /// JSON list of issues found
    pub issues: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
