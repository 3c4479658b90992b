// ABOUTME: Document, bibliography-reference, and quality-check persistence
// ABOUTME: Publication tool outputs stored per project with a doc_kind discriminator
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::ResearchStore;
use crate::errors::AppResult;
use crate::models::{Document, QualityCheck};
use chrono::Utc;

/// `doc_kind` value for generated documents
pub const KIND_DOCUMENT: &str = "document";
/// `doc_kind` value for bibliography references
pub const KIND_REFERENCE: &str = "bibliography_reference";

impl ResearchStore {
    pub(super) async fn migrate_documents(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                doc_kind TEXT NOT NULL DEFAULT 'document',
                content TEXT NOT NULL DEFAULT '',
                file_path TEXT,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_documents_project_id ON documents(project_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS quality_checks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                document_id INTEGER REFERENCES documents(id),
                check_type TEXT NOT NULL,
                result TEXT NOT NULL,
                issues TEXT,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Persist a document row and return its id.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` when retries are exhausted.
    pub async fn insert_document(
        &self,
        title: &str,
        doc_kind: &str,
        content: &str,
        file_path: Option<&str>,
    ) -> AppResult<i64> {
        let now = Utc::now();
        let result = self
            .with_write_retry(|| {
                sqlx::query(
                    r"
                    INSERT INTO documents (project_id, title, doc_kind, content, file_path, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    ",
                )
                .bind(self.project_id)
                .bind(title)
                .bind(doc_kind)
                .bind(content)
                .bind(file_path)
                .bind(now)
                .execute(&self.pool)
            })
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Documents of one kind for this project, newest first.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn list_documents(&self, doc_kind: &str) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, Document>(
            r"
            SELECT * FROM documents
            WHERE project_id = $1 AND doc_kind = $2
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(self.project_id)
        .bind(doc_kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Persist a quality-check result and return its id.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` when retries are exhausted.
    pub async fn insert_quality_check(
        &self,
        document_id: Option<i64>,
        check_type: &str,
        result: &str,
        issues: Option<&str>,
    ) -> AppResult<i64> {
        let now = Utc::now();
        let outcome = self
            .with_write_retry(|| {
                sqlx::query(
                    r"
                    INSERT INTO quality_checks (project_id, document_id, check_type, result, issues, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    ",
                )
                .bind(self.project_id)
                .bind(document_id)
                .bind(check_type)
                .bind(result)
                .bind(issues)
                .bind(now)
                .execute(&self.pool)
            })
            .await?;
        Ok(outcome.last_insert_rowid())
    }

    /// Quality checks for this project, newest first.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn list_quality_checks(&self) -> AppResult<Vec<QualityCheck>> {
        let rows = sqlx::query_as::<_, QualityCheck>(
            "SELECT * FROM quality_checks WHERE project_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(self.project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn references_and_documents_are_kept_apart_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResearchStore::open(dir.path()).await.unwrap();

        store
            .insert_document("Draft", KIND_DOCUMENT, "\\documentclass{article}", None)
            .await
            .unwrap();
        store
            .insert_document(
                "Shor 1997",
                KIND_REFERENCE,
                r#"{"author":"Shor","year":1997}"#,
                None,
            )
            .await
            .unwrap();

        assert_eq!(store.list_documents(KIND_DOCUMENT).await.unwrap().len(), 1);
        assert_eq!(store.list_documents(KIND_REFERENCE).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn quality_checks_record_their_result() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResearchStore::open(dir.path()).await.unwrap();
        let doc = store
            .insert_document("Draft", KIND_DOCUMENT, "body", None)
            .await
            .unwrap();
        store
            .insert_quality_check(Some(doc), "publication_readiness", "warn", Some("[]"))
            .await
            .unwrap();
        let checks = store.list_quality_checks().await.unwrap();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].result, "warn");
        assert_eq!(checks[0].document_id, Some(doc));
    }
}
