// ABOUTME: Project context resolution binding each dispatched call to a project scope
// ABOUTME: Explicit argument, connection override, env var, ancestor marker, then home project
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # Context Resolver
//!
//! Computes the project path a call runs against. Resolution order:
//!
//! 1. An explicit `project_path` argument inside the tool parameters.
//! 2. The connection's override set by `switch_project_context`.
//! 3. The `SRRD_PROJECT_PATH` environment variable.
//! 4. The nearest ancestor of the process working directory containing a
//!    `.srrd` marker directory.
//! 5. The configured global home project (neutral state; not used for
//!    context-required tools).
//!
//! The override is an explicit per-connection slot, never a process global:
//! each WebSocket connection starts with an empty slot, so context is never
//! silently inherited across connections.

use crate::config::ServerConfig;
use crate::constants::{env_config, project_layout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

/// Per-connection context override slot.
pub type ContextOverride = Arc<RwLock<Option<PathBuf>>>;

/// Create an empty override slot for a new connection.
#[must_use]
pub fn new_override_slot() -> ContextOverride {
    Arc::new(RwLock::new(None))
}

/// Whether a directory is a research project root.
#[must_use]
pub fn is_project_root(path: &Path) -> bool {
    path.join(project_layout::MARKER_DIR).is_dir()
}

/// Resolves `current_project_path` for dispatched calls.
#[derive(Debug, Clone)]
pub struct ContextResolver {
    config: Arc<ServerConfig>,
}

impl ContextResolver {
    /// Create a resolver over the loaded configuration.
    #[must_use]
    pub const fn new(config: Arc<ServerConfig>) -> Self {
        Self { config }
    }

    /// Resolve steps (1)–(4). Returns `None` when nothing resolves, which a
    /// context-required tool reports as `context_missing`.
    pub async fn resolve(
        &self,
        explicit: Option<&str>,
        override_slot: &ContextOverride,
    ) -> Option<PathBuf> {
        if let Some(raw) = explicit {
            let path = PathBuf::from(raw);
            if is_project_root(&path) {
                return Some(path);
            }
            warn!(
                path = %path.display(),
                "explicit project_path is not an initialized project; falling through"
            );
        }

        if let Some(path) = override_slot.read().await.clone() {
            if is_project_root(&path) {
                return Some(path);
            }
            warn!(
                path = %path.display(),
                "context override no longer points at a project; falling through"
            );
        }

        if let Ok(raw) = std::env::var(env_config::PROJECT_PATH) {
            let path = PathBuf::from(raw);
            if is_project_root(&path) {
                return Some(path);
            }
        }

        std::env::current_dir()
            .ok()
            .and_then(|cwd| nearest_ancestor_project(&cwd))
    }

    /// Resolve steps (1)–(5): like [`Self::resolve`], falling back to the
    /// global home project for tools that tolerate neutral state.
    pub async fn resolve_or_home(
        &self,
        explicit: Option<&str>,
        override_slot: &ContextOverride,
    ) -> PathBuf {
        match self.resolve(explicit, override_slot).await {
            Some(path) => path,
            None => self.home_project(),
        }
    }

    /// The configured neutral home project path.
    #[must_use]
    pub fn home_project(&self) -> PathBuf {
        self.config.global_home_project.clone()
    }
}

fn nearest_ancestor_project(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|candidate| is_project_root(candidate))
        .map(Path::to_path_buf)
}
