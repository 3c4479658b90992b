// ABOUTME: Workflow intelligence engine computing research progress, guidance, and analytics
// ABOUTME: Pure computation over tool-usage history handed in by the server; no storage access
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # SRRD Intelligence
//!
//! The workflow-intelligence engine behind the SRRD MCP server. Everything in
//! this crate is deterministic computation over data the server reads from a
//! project store: tool-usage samples in, progress reports, recommendations,
//! milestones, and journey analytics out.
//!
//! The crate also owns the static research framework (the six research acts
//! and their category → tool taxonomy) and the heuristic interaction
//! analyzer. Keeping these next to the progress math means the act mapping
//! used for scoring and the one used for guidance can never drift apart.

/// Heuristic semantic analysis of user-supplied tool parameters
pub mod analyzer;

/// Static research-act taxonomy and tool-name constants
pub mod framework;

/// Experience-adapted guidance for a target research act
pub mod guidance;

/// Journey analytics over a bounded time period
pub mod journey;

/// Milestone detection from accumulated usage history
pub mod milestones;

/// Research-act progress computation and rendering
pub mod progress;

/// Contextual next-tool recommendations from recent usage
pub mod recommendations;

/// Shared input sample types
pub mod types;

/// Invocations-per-day velocity with sparkline rendering
pub mod velocity;

pub use framework::{ResearchAct, ResearchFramework};
pub use types::{InteractionSample, UsageSample};
