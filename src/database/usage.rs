// ABOUTME: Tool-usage recording and the query helpers behind workflow intelligence
// ABOUTME: Append-only usage rows with window, recency, and calendar-date grouping queries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::ResearchStore;
use crate::errors::AppResult;
use crate::models::ToolUsage;
use chrono::{DateTime, NaiveDate, Utc};
use srrd_intelligence::UsageSample;
use std::collections::HashSet;

impl ResearchStore {
    pub(super) async fn migrate_usage(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS tool_usage (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id INTEGER REFERENCES sessions(id),
                tool_name TEXT NOT NULL,
                result_summary TEXT NOT NULL DEFAULT '',
                timestamp DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tool_usage_timestamp ON tool_usage(timestamp)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Append one tool-usage row. Retried with bounded backoff while the
    /// database is locked.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` when retries are exhausted.
    pub async fn record_tool_usage(
        &self,
        tool_name: &str,
        result_summary: &str,
        session_id: Option<i64>,
    ) -> AppResult<i64> {
        let now = Utc::now();
        let result = self
            .with_write_retry(|| {
                sqlx::query(
                    r"
                    INSERT INTO tool_usage (session_id, tool_name, result_summary, timestamp)
                    VALUES ($1, $2, $3, $4)
                    ",
                )
                .bind(session_id)
                .bind(tool_name)
                .bind(result_summary)
                .bind(now)
                .execute(&self.pool)
            })
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Every usage row, oldest first, as intelligence input samples.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn usage_samples(&self) -> AppResult<Vec<UsageSample>> {
        let rows: Vec<(String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT tool_name, timestamp FROM tool_usage ORDER BY timestamp ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(tool_name, recorded_at)| UsageSample {
                tool_name,
                recorded_at,
            })
            .collect())
    }

    /// Usage rows within `[start, end)`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn usage_within(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<ToolUsage>> {
        let rows = sqlx::query_as::<_, ToolUsage>(
            r"
            SELECT * FROM tool_usage
            WHERE timestamp >= $1 AND timestamp < $2
            ORDER BY timestamp ASC, id ASC
            ",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Most recent `limit` usage rows, newest first.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn recent_usage(&self, limit: i64) -> AppResult<Vec<ToolUsage>> {
        let rows = sqlx::query_as::<_, ToolUsage>(
            "SELECT * FROM tool_usage ORDER BY timestamp DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Total invocation count.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn total_invocations(&self) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tool_usage")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Distinct tool names invoked at least once.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn distinct_tool_names(&self) -> AppResult<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT tool_name FROM tool_usage ORDER BY tool_name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(n,)| n).collect())
    }

    /// Count how many tools from `set` have been invoked at least once.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn count_distinct_from_set(&self, set: &HashSet<String>) -> AppResult<usize> {
        let distinct = self.distinct_tool_names().await?;
        Ok(distinct.iter().filter(|name| set.contains(*name)).count())
    }

    /// Invocation counts grouped by calendar date, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn usage_by_date(&self) -> AppResult<Vec<(NaiveDate, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r"
            SELECT date(timestamp) AS day, COUNT(*) AS invocations
            FROM tool_usage
            GROUP BY date(timestamp)
            ORDER BY day ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(day, count)| {
                NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                    .ok()
                    .map(|d| (d, count))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn usage_rows_are_append_only_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResearchStore::open(dir.path()).await.unwrap();

        store
            .record_tool_usage("clarify_research_goals", "goals clarified", None)
            .await
            .unwrap();
        store
            .record_tool_usage("suggest_methodology", "methodology suggested", None)
            .await
            .unwrap();

        assert_eq!(store.total_invocations().await.unwrap(), 2);

        let recent = store.recent_usage(1).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].tool_name, "suggest_methodology");

        let samples = store.usage_samples().await.unwrap();
        assert_eq!(samples[0].tool_name, "clarify_research_goals");
    }

    #[tokio::test]
    async fn distinct_counting_intersects_with_a_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResearchStore::open(dir.path()).await.unwrap();
        for _ in 0..3 {
            store
                .record_tool_usage("clarify_research_goals", "", None)
                .await
                .unwrap();
        }
        store
            .record_tool_usage("suggest_methodology", "", None)
            .await
            .unwrap();

        let set: HashSet<String> = [
            "clarify_research_goals".to_owned(),
            "generate_critical_questions".to_owned(),
        ]
        .into();
        assert_eq!(store.count_distinct_from_set(&set).await.unwrap(), 1);
        assert_eq!(store.distinct_tool_names().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn usage_by_date_groups_same_day_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResearchStore::open(dir.path()).await.unwrap();
        for _ in 0..4 {
            store
                .record_tool_usage("semantic_search", "", None)
                .await
                .unwrap();
        }
        let by_date = store.usage_by_date().await.unwrap();
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[0].1, 4);
        assert_eq!(by_date[0].0, Utc::now().date_naive());
    }
}
