// ABOUTME: Per-project relational store with idempotent migration system for SQLite
// ABOUTME: Owns the connection pool, schema setup, locked-write retry, and store manager
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # Project Store
//!
//! Every research project owns a private SQLite store at
//! `<project>/.srrd/sessions.db`. The server holds at most one open store per
//! project; writes are serialized by a single-connection pool, so readers and
//! writers interleave at await points without a separate mutex.

/// Document and quality-check persistence
pub mod documents;
/// Interaction recording and samples for journey analytics
pub mod interactions;
/// Project row management
pub mod projects;
/// Session open/close and per-session queries
pub mod sessions;
/// Novel-theory and paradigm-comparison persistence
pub mod theories;
/// Tool-usage recording and query helpers
pub mod usage;

use crate::constants::{defaults, project_layout};
use crate::errors::{AppError, AppResult};
use crate::models::ProjectConfig;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A single project's relational store.
#[derive(Debug, Clone)]
pub struct ResearchStore {
    pool: Pool<Sqlite>,
    project_id: i64,
    project_root: PathBuf,
}

impl ResearchStore {
    /// Open (creating if necessary) the store for a project root.
    ///
    /// The `.srrd` marker directory is created when absent, the schema is
    /// migrated idempotently, and the project row is upserted from
    /// `.srrd/config.json` (defaults when the file is missing).
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` when the directory cannot be created, the
    /// database cannot be opened, or a migration fails. Schema errors are
    /// fatal at startup by design.
    pub async fn open(project_root: &Path) -> AppResult<Self> {
        let marker = project_root.join(project_layout::MARKER_DIR);
        tokio::fs::create_dir_all(&marker).await.map_err(|e| {
            AppError::store_unavailable(format!(
                "cannot create {}: {e}",
                marker.display()
            ))
        })?;

        let db_path = marker.join(project_layout::SESSIONS_DB);
        let url = format!("sqlite:{}?mode=rwc", db_path.display());
        // One connection per project serializes writers; readers observe
        // committed state between await points.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .map_err(|e| {
                AppError::store_unavailable(format!("cannot open {}: {e}", db_path.display()))
            })?;

        let mut store = Self {
            pool,
            project_id: 0,
            project_root: project_root.to_path_buf(),
        };
        store.initialize().await?;

        let config = read_project_config(project_root).await;
        store.project_id = store.upsert_project(&config).await?;
        debug!(
            project = %project_root.display(),
            project_id = store.project_id,
            "project store ready"
        );
        Ok(store)
    }

    /// Idempotently create the schema; safe to call on an existing store.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` when any migration statement fails.
    pub async fn initialize(&self) -> AppResult<()> {
        self.migrate_projects().await?;
        self.migrate_sessions().await?;
        self.migrate_interactions().await?;
        self.migrate_usage().await?;
        self.migrate_theories().await?;
        self.migrate_documents().await?;
        Ok(())
    }

    /// Surrogate id of the owning project row
    #[must_use]
    pub const fn project_id(&self) -> i64 {
        self.project_id
    }

    /// Project root directory this store belongs to
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Connection pool for the store's database
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Execute a write closure with bounded backoff while SQLite reports the
    /// database as locked or busy. Other errors surface immediately.
    pub(crate) async fn with_write_retry<T, F, Fut>(&self, mut op: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, sqlx::Error>>,
    {
        let mut last_err = None;
        for attempt in 0..defaults::STORE_WRITE_ATTEMPTS {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if is_locked(&e) => {
                    let delay = defaults::STORE_WRITE_BACKOFF_MS * u64::from(attempt + 1);
                    debug!(attempt, delay_ms = delay, "store locked, retrying write");
                    tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                    last_err = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(last_err.map_or_else(
            || AppError::store_unavailable("write retry exhausted"),
            |e| AppError::store_unavailable(format!("store stayed locked: {e}")),
        ))
    }
}

fn is_locked(error: &sqlx::Error) -> bool {
    let text = error.to_string().to_lowercase();
    text.contains("locked") || text.contains("busy")
}

/// Read `.srrd/config.json`, falling back to defaults when absent or invalid.
async fn read_project_config(project_root: &Path) -> ProjectConfig {
    let path = project_root
        .join(project_layout::MARKER_DIR)
        .join(project_layout::CONFIG_FILE);
    match tokio::fs::read_to_string(&path).await {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "invalid project config: {e}");
            ProjectConfig::default()
        }),
        Err(_) => ProjectConfig::default(),
    }
}

/// Holds at most one open store per project for the whole process.
#[derive(Debug, Default)]
pub struct StoreManager {
    stores: RwLock<HashMap<PathBuf, Arc<ResearchStore>>>,
}

impl StoreManager {
    /// Create an empty manager
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the open store for a project, opening it on first use.
    ///
    /// # Errors
    ///
    /// Propagates `store_unavailable` from [`ResearchStore::open`].
    pub async fn get_or_open(&self, project_root: &Path) -> AppResult<Arc<ResearchStore>> {
        if let Some(store) = self.stores.read().await.get(project_root) {
            return Ok(store.clone());
        }
        let store = Arc::new(ResearchStore::open(project_root).await?);
        self.stores
            .write()
            .await
            .insert(project_root.to_path_buf(), store.clone());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_creates_marker_and_store_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResearchStore::open(dir.path()).await.unwrap();
        assert!(dir.path().join(".srrd/sessions.db").exists());
        assert!(store.project_id() > 0);
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResearchStore::open(dir.path()).await.unwrap();
        store.initialize().await.unwrap();
        store.initialize().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(store.pool())
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        for expected in [
            "documents",
            "interactions",
            "novel_theories",
            "paradigm_comparisons",
            "projects",
            "quality_checks",
            "sessions",
            "tool_usage",
        ] {
            assert!(names.contains(&expected), "missing table {expected}");
        }
    }

    #[tokio::test]
    async fn manager_returns_the_same_store_per_project() {
        let dir = tempfile::tempdir().unwrap();
        let manager = StoreManager::new();
        let a = manager.get_or_open(dir.path()).await.unwrap();
        let b = manager.get_or_open(dir.path()).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
