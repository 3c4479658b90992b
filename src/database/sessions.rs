// ABOUTME: Session table migration, open/close operations, and per-session queries
// ABOUTME: Sessions group interactions within one project's activity span
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::ResearchStore;
use crate::errors::{AppError, AppResult};
use crate::models::{Session, SessionType};
use chrono::Utc;

impl ResearchStore {
    pub(super) async fn migrate_sessions(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                session_type TEXT NOT NULL,
                paradigm_innovation_session BOOLEAN NOT NULL DEFAULT 0,
                user_id TEXT NOT NULL DEFAULT 'local',
                status TEXT NOT NULL DEFAULT 'active',
                started_at DATETIME NOT NULL,
                ended_at DATETIME
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_project_id ON sessions(project_id)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Open a new session and return its id.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on write failure.
    pub async fn session_open(
        &self,
        session_type: SessionType,
        user_id: &str,
        paradigm_innovation: bool,
    ) -> AppResult<i64> {
        let now = Utc::now();
        let result = self
            .with_write_retry(|| {
                sqlx::query(
                    r"
                    INSERT INTO sessions (
                        project_id, session_type, paradigm_innovation_session,
                        user_id, status, started_at
                    ) VALUES ($1, $2, $3, $4, 'active', $5)
                    ",
                )
                .bind(self.project_id)
                .bind(session_type.as_str())
                .bind(paradigm_innovation)
                .bind(user_id)
                .bind(now)
                .execute(&self.pool)
            })
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Close a session, setting its end timestamp.
    ///
    /// The end timestamp is clamped to the session's start so that
    /// `ended_at >= started_at` holds even across clock adjustments.
    ///
    /// # Errors
    ///
    /// Returns `validation_failed` for an unknown session id, or
    /// `store_unavailable` on write failure.
    pub async fn session_close(&self, session_id: i64) -> AppResult<()> {
        let session = self
            .session_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::validation(format!("unknown session {session_id}")))?;

        let ended_at = Utc::now().max(session.started_at);
        self.with_write_retry(|| {
            sqlx::query("UPDATE sessions SET status = 'closed', ended_at = $1 WHERE id = $2")
                .bind(ended_at)
                .bind(session_id)
                .execute(&self.pool)
        })
        .await?;
        Ok(())
    }

    /// Fetch a session by id.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn session_by_id(&self, session_id: i64) -> AppResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(session)
    }

    /// Most recently opened session still marked active, if any.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn latest_active_session(&self) -> AppResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE status = 'active' ORDER BY started_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    /// Last `limit` tool names recorded for a session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn recent_tools_for_session(
        &self,
        session_id: i64,
        limit: i64,
    ) -> AppResult<Vec<String>> {
        let mut names: Vec<(String,)> = sqlx::query_as(
            r"
            SELECT tool_name FROM tool_usage
            WHERE session_id = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        names.reverse();
        Ok(names.into_iter().map(|(n,)| n).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_lifecycle_preserves_timestamp_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResearchStore::open(dir.path()).await.unwrap();

        let id = store
            .session_open(SessionType::Planning, "local", false)
            .await
            .unwrap();
        let open = store.session_by_id(id).await.unwrap().unwrap();
        assert_eq!(open.status, "active");
        assert!(open.ended_at.is_none());

        store.session_close(id).await.unwrap();
        let closed = store.session_by_id(id).await.unwrap().unwrap();
        assert_eq!(closed.status, "closed");
        assert!(closed.ended_at.unwrap() >= closed.started_at);
    }

    #[tokio::test]
    async fn closing_unknown_session_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResearchStore::open(dir.path()).await.unwrap();
        let err = store.session_close(9999).await.unwrap_err();
        assert_eq!(err.kind, crate::errors::ErrorKind::ValidationFailed);
    }

    #[tokio::test]
    async fn latest_active_session_skips_closed_ones() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResearchStore::open(dir.path()).await.unwrap();
        let first = store
            .session_open(SessionType::Execution, "local", false)
            .await
            .unwrap();
        let second = store
            .session_open(SessionType::Analysis, "local", false)
            .await
            .unwrap();
        store.session_close(second).await.unwrap();

        let active = store.latest_active_session().await.unwrap().unwrap();
        assert_eq!(active.id, first);
    }
}
