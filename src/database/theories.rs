// ABOUTME: Novel-theory and paradigm-comparison persistence for novel-theory tooling
// ABOUTME: Rows attached to the project and written by the paradigm-validation tools
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::ResearchStore;
use crate::errors::AppResult;
use crate::models::{NovelTheory, ParadigmComparison};
use chrono::Utc;

/// Arguments for one novel-theory row.
#[derive(Debug, Clone)]
pub struct NewNovelTheory<'a> {
    /// Theory name
    pub theory_name: &'a str,
    /// Core principles text
    pub core_principles: &'a str,
    /// Mainstream-comparison text
    pub mainstream_comparison: Option<&'a str>,
    /// Validation-results blob (JSON)
    pub validation_results: Option<&'a str>,
    /// Equal-treatment score in [0, 1]
    pub equal_treatment_score: Option<f64>,
    /// Development stage tag
    pub development_stage: &'a str,
}

impl ResearchStore {
    pub(super) async fn migrate_theories(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS novel_theories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                theory_name TEXT NOT NULL,
                core_principles TEXT NOT NULL,
                mainstream_comparison TEXT,
                validation_results TEXT,
                equal_treatment_score REAL,
                development_stage TEXT NOT NULL DEFAULT 'initial',
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_novel_theories_project_id ON novel_theories(project_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS paradigm_comparisons (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                mainstream_paradigm TEXT NOT NULL,
                alternative_paradigm TEXT NOT NULL,
                comparison_results TEXT,
                equal_treatment_score REAL,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Persist a novel theory and return its id.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` when retries are exhausted.
    pub async fn insert_novel_theory(&self, theory: NewNovelTheory<'_>) -> AppResult<i64> {
        let now = Utc::now();
        let result = self
            .with_write_retry(|| {
                sqlx::query(
                    r"
                    INSERT INTO novel_theories (
                        project_id, theory_name, core_principles, mainstream_comparison,
                        validation_results, equal_treatment_score, development_stage, created_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    ",
                )
                .bind(self.project_id)
                .bind(theory.theory_name)
                .bind(theory.core_principles)
                .bind(theory.mainstream_comparison)
                .bind(theory.validation_results)
                .bind(theory.equal_treatment_score)
                .bind(theory.development_stage)
                .bind(now)
                .execute(&self.pool)
            })
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Persist a paradigm comparison and return its id.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` when retries are exhausted.
    pub async fn insert_paradigm_comparison(
        &self,
        mainstream: &str,
        alternative: &str,
        comparison_results: Option<&str>,
        equal_treatment_score: Option<f64>,
    ) -> AppResult<i64> {
        let now = Utc::now();
        let result = self
            .with_write_retry(|| {
                sqlx::query(
                    r"
                    INSERT INTO paradigm_comparisons (
                        project_id, mainstream_paradigm, alternative_paradigm,
                        comparison_results, equal_treatment_score, created_at
                    ) VALUES ($1, $2, $3, $4, $5, $6)
                    ",
                )
                .bind(self.project_id)
                .bind(mainstream)
                .bind(alternative)
                .bind(comparison_results)
                .bind(equal_treatment_score)
                .bind(now)
                .execute(&self.pool)
            })
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Theories for this project, newest first.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn list_novel_theories(&self) -> AppResult<Vec<NovelTheory>> {
        let rows = sqlx::query_as::<_, NovelTheory>(
            "SELECT * FROM novel_theories WHERE project_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(self.project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Paradigm comparisons for this project, newest first.
    ///
    /// # Errors
    ///
    /// Returns `store_unavailable` on read failure.
    pub async fn list_paradigm_comparisons(&self) -> AppResult<Vec<ParadigmComparison>> {
        let rows = sqlx::query_as::<_, ParadigmComparison>(
            "SELECT * FROM paradigm_comparisons WHERE project_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(self.project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
