// ABOUTME: Vector-index collaborator seam with an embedded in-process implementation
// ABOUTME: Keyword-scored search over knowledge.db, gated behind the vector_db capability
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # Knowledge Index
//!
//! Only the interface is contractual: an index ingests documents and answers
//! ranked queries. This embedded implementation runs in-process over
//! `<project>/.srrd/knowledge.db` and scores by term overlap; a heavier
//! embedding backend can replace it behind the same trait without touching
//! the tools it serves.

use crate::constants::project_layout;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// One ranked search result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SearchHit {
    /// Document id in the index
    pub document_id: i64,
    /// Document title
    pub title: String,
    /// Leading snippet of the document body
    pub snippet: String,
    /// Relevance score; higher is better
    pub score: f64,
}

/// A stored knowledge document.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct KnowledgeDocument {
    /// Document id in the index
    pub id: i64,
    /// Document title
    pub title: String,
    /// Full document body
    pub content: String,
}

/// The vector-collaborator contract consumed by knowledge tools.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Ingest a document; returns its index id.
    async fn add_document(&self, title: &str, content: &str) -> AppResult<i64>;

    /// Ranked search over ingested documents.
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<SearchHit>>;

    /// All ingested documents, for pattern and graph tools.
    async fn list_documents(&self) -> AppResult<Vec<KnowledgeDocument>>;
}

/// Embedded SQLite-backed index with term-overlap scoring.
#[derive(Debug)]
pub struct EmbeddedVectorIndex {
    pool: Pool<Sqlite>,
    embedding_model: String,
}

impl EmbeddedVectorIndex {
    /// Open (creating if necessary) the index for a project root.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` when the database cannot be opened.
    pub async fn open(project_root: &Path, embedding_model: &str) -> AppResult<Self> {
        let marker = project_root.join(project_layout::MARKER_DIR);
        tokio::fs::create_dir_all(&marker).await.map_err(|e| {
            AppError::store_unavailable(format!("cannot create {}: {e}", marker.display()))
        })?;
        let db_path = marker.join(project_layout::KNOWLEDGE_DB);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&format!("sqlite:{}?mode=rwc", db_path.display()))
            .await
            .map_err(|e| {
                AppError::store_unavailable(format!("cannot open {}: {e}", db_path.display()))
            })?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS knowledge_documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                embedding_model TEXT NOT NULL,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&pool)
        .await?;

        Ok(Self {
            pool,
            embedding_model: embedding_model.to_owned(),
        })
    }
}

#[async_trait]
impl VectorIndex for EmbeddedVectorIndex {
    async fn add_document(&self, title: &str, content: &str) -> AppResult<i64> {
        let result = sqlx::query(
            r"
            INSERT INTO knowledge_documents (title, content, embedding_model, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(title)
        .bind(content)
        .bind(&self.embedding_model)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<SearchHit>> {
        let documents = self.list_documents().await?;
        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_owned)
            .collect();

        let mut hits: Vec<SearchHit> = documents
            .into_iter()
            .filter_map(|doc| {
                let score = overlap_score(&terms, &doc.title, &doc.content);
                (score > 0.0).then(|| SearchHit {
                    document_id: doc.id,
                    snippet: doc.content.chars().take(200).collect(),
                    title: doc.title,
                    score,
                })
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn list_documents(&self) -> AppResult<Vec<KnowledgeDocument>> {
        let rows = sqlx::query_as::<_, KnowledgeDocument>(
            "SELECT id, title, content FROM knowledge_documents ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

fn overlap_score(terms: &[String], title: &str, content: &str) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }
    let title_lower = title.to_lowercase();
    let content_lower = content.to_lowercase();
    let mut score = 0.0;
    for term in terms {
        // Title hits weigh more than body hits.
        score += 2.0 * title_lower.matches(term.as_str()).count() as f64;
        score += content_lower.matches(term.as_str()).count() as f64;
    }
    score / terms.len() as f64
}

/// One open index per project, mirroring the store manager.
#[derive(Debug, Default)]
pub struct VectorIndexManager {
    embedding_model: String,
    indexes: RwLock<HashMap<PathBuf, Arc<EmbeddedVectorIndex>>>,
}

impl VectorIndexManager {
    /// Create a manager that opens indexes with the configured model id.
    #[must_use]
    pub fn new(embedding_model: &str) -> Self {
        Self {
            embedding_model: embedding_model.to_owned(),
            indexes: RwLock::new(HashMap::new()),
        }
    }

    /// Get the open index for a project, opening it on first use.
    ///
    /// # Errors
    ///
    /// Propagates `store_unavailable` from [`EmbeddedVectorIndex::open`].
    pub async fn get_or_open(&self, project_root: &Path) -> AppResult<Arc<EmbeddedVectorIndex>> {
        if let Some(index) = self.indexes.read().await.get(project_root) {
            return Ok(index.clone());
        }
        let index = Arc::new(EmbeddedVectorIndex::open(project_root, &self.embedding_model).await?);
        self.indexes
            .write()
            .await
            .insert(project_root.to_path_buf(), index.clone());
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_ranks_title_matches_above_body_matches() {
        let dir = tempfile::tempdir().unwrap();
        let index = EmbeddedVectorIndex::open(dir.path(), "all-MiniLM-L6-v2")
            .await
            .unwrap();

        index
            .add_document("Quantum error correction", "surface codes and thresholds")
            .await
            .unwrap();
        index
            .add_document("Classical coding theory", "mentions quantum once in passing")
            .await
            .unwrap();

        let hits = index.search("quantum", 10).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Quantum error correction");
        assert!(hits[0].score > hits[1].score);
        assert!(dir.path().join(".srrd/knowledge.db").exists());
    }

    #[tokio::test]
    async fn unmatched_query_returns_no_hits() {
        let dir = tempfile::tempdir().unwrap();
        let index = EmbeddedVectorIndex::open(dir.path(), "all-MiniLM-L6-v2")
            .await
            .unwrap();
        index.add_document("Title", "body text").await.unwrap();
        assert!(index.search("zebra", 10).await.unwrap().is_empty());
    }
}
