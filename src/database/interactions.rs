// ABOUTME: Interaction recording with semantic and progression analysis metadata
// ABOUTME: Append-only enriched records grouped by session for journey analytics
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::ResearchStore;
use crate::errors::AppResult;
use crate::models::Interaction;
use chrono::{DateTime, Utc};
use srrd_intelligence::InteractionSample;

/// Arguments for one interaction row.
#[derive(Debug, Clone)]
pub struct NewInteraction<'a> {
    /// Owning session
    pub session_id: i64,
    /// Type tag, e.g. `enhanced_tool_usage`
    pub interaction_type: &'a str,
    /// JSON-encoded user inputs
    pub content: &'a str,
    /// Optional assistant response
    pub response: Option<&'a str>,
    /// Domain tag from semantic analysis
    pub domain: Option<&'a str>,
    /// Novel-theory context string
    pub novel_theory_context: Option<&'a str>,
    /// JSON metadata blob (semantic + progression analyses)
    pub metadata: Option<&'a str>,
}

impl ResearchStore {
    pub(super) async fn migrate_interactions(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS interactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
                interaction_type TEXT NOT NULL,
                content TEXT NOT NULL,
                response TEXT,
                domain_context TEXT,
                novel_theory_context TEXT,
                metadata TEXT,
                timestamp DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_interactions_session_id ON interactions(session_id)",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Append one interaction row.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` when retries are exhausted.
    pub async fn record_interaction(&self, interaction: NewInteraction<'_>) -> AppResult<i64> {
        let now = Utc::now();
        let result = self
            .with_write_retry(|| {
                sqlx::query(
                    r"
                    INSERT INTO interactions (
                        session_id, interaction_type, content, response,
                        domain_context, novel_theory_context, metadata, timestamp
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    ",
                )
                .bind(interaction.session_id)
                .bind(interaction.interaction_type)
                .bind(interaction.content)
                .bind(interaction.response)
                .bind(interaction.domain)
                .bind(interaction.novel_theory_context)
                .bind(interaction.metadata)
                .bind(now)
                .execute(&self.pool)
            })
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Interactions for a session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn interactions_for_session(&self, session_id: i64) -> AppResult<Vec<Interaction>> {
        let rows = sqlx::query_as::<_, Interaction>(
            "SELECT * FROM interactions WHERE session_id = $1 ORDER BY timestamp ASC, id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// All interactions reduced to journey-analytics samples, oldest first.
    ///
    /// Sophistication is pulled out of the stored metadata blob; rows with
    /// unparseable metadata still contribute their domain tag.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn interaction_samples(&self) -> AppResult<Vec<InteractionSample>> {
        let rows: Vec<(Option<String>, Option<String>, DateTime<Utc>)> = sqlx::query_as(
            "SELECT domain_context, metadata, timestamp FROM interactions ORDER BY timestamp ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(domain, metadata, recorded_at)| InteractionSample {
                recorded_at,
                domain,
                sophistication: metadata.as_deref().and_then(extract_sophistication),
            })
            .collect())
    }
}

fn extract_sophistication(metadata: &str) -> Option<f64> {
    let value: serde_json::Value = serde_json::from_str(metadata).ok()?;
    value
        .get("semantic_analysis")?
        .get("sophistication_score")?
        .as_f64()
}
