// ABOUTME: Knowledge-acquisition tools for search, concepts, and source management
// ABOUTME: Vector-gated semantic search plus bibliography storage in the project store
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::{optional_str, optional_usize, required_str, ToolContext, ToolDefinition, ToolOutput, ToolRegistry};
use crate::capabilities::Capability;
use crate::database::documents::KIND_REFERENCE;
use crate::errors::{AppError, AppResult};
use crate::mcp::schema::JsonSchema;
use crate::vector::VectorIndex;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use srrd_intelligence::framework::tool_names as tn;
use std::collections::HashMap;
use std::sync::Arc;

/// Register the knowledge-acquisition tools.
///
/// # Errors
///
/// Propagates duplicate-name registration errors.
pub fn register(registry: &mut ToolRegistry) -> AppResult<()> {
    registry.register(ToolDefinition::new(
        tn::SEMANTIC_SEARCH,
        "Search the project knowledge base semantically",
        JsonSchema::object(
            &[
                ("query", "string", "Search query"),
                ("limit", "integer", "Maximum results (default 5)"),
            ],
            &["query"],
        ),
        Capability::VectorDb,
        true,
        Arc::new(SemanticSearch),
    ))?;

    registry.register(ToolDefinition::new(
        tn::EXTRACT_KEY_CONCEPTS,
        "Extract key concepts from supplied text by salience",
        JsonSchema::object(
            &[
                ("content", "string", "Text to extract concepts from"),
                ("limit", "integer", "Maximum concepts (default 10)"),
            ],
            &["content"],
        ),
        Capability::None,
        false,
        Arc::new(ExtractKeyConcepts),
    ))?;

    registry.register(ToolDefinition::new(
        tn::STORE_BIBLIOGRAPHY_REFERENCE,
        "Store a bibliography reference in the project store",
        JsonSchema::object(
            &[
                ("title", "string", "Reference title"),
                ("authors", "string", "Author list"),
                ("year", "integer", "Publication year"),
                ("venue", "string", "Journal or venue"),
                ("abstract_text", "string", "Abstract, indexed for search"),
            ],
            &["title", "authors"],
        ),
        Capability::None,
        true,
        Arc::new(StoreBibliographyReference),
    ))?;

    registry.register(ToolDefinition::new(
        tn::RETRIEVE_BIBLIOGRAPHY_REFERENCES,
        "Retrieve stored bibliography references, optionally filtered",
        JsonSchema::object(
            &[("filter", "string", "Substring filter over title and authors")],
            &[],
        ),
        Capability::None,
        true,
        Arc::new(RetrieveBibliographyReferences),
    ))?;

    registry.register(ToolDefinition::new(
        tn::EXTRACT_DOCUMENT_SECTIONS,
        "Split a document into labeled sections by heading structure",
        JsonSchema::object(
            &[("content", "string", "Document text to split")],
            &["content"],
        ),
        Capability::None,
        false,
        Arc::new(ExtractDocumentSections),
    ))?;

    Ok(())
}

struct SemanticSearch;

#[async_trait]
impl super::ToolHandler for SemanticSearch {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let query = required_str(args, "query")?;
        let limit = optional_usize(args, "limit", 5);

        let index = ctx.resources.vector_index(&ctx.project.root).await?;
        let hits = index.search(query, limit).await?;

        Ok(ToolOutput::Json(json!({
            "query": query,
            "result_count": hits.len(),
            "results": hits,
        })))
    }
}

struct ExtractKeyConcepts;

#[async_trait]
impl super::ToolHandler for ExtractKeyConcepts {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let content = required_str(args, "content")?;
        let limit = optional_usize(args, "limit", 10);

        let mut frequency: HashMap<String, usize> = HashMap::new();
        for word in content.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
            if word.len() > 4 && !STOPWORDS.contains(&word) {
                *frequency.entry(word.to_owned()).or_insert(0) += 1;
            }
        }
        let mut ranked: Vec<(String, usize)> = frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);

        let concepts: Vec<Value> = ranked
            .into_iter()
            .map(|(term, occurrences)| json!({ "concept": term, "occurrences": occurrences }))
            .collect();

        Ok(ToolOutput::Json(json!({ "concepts": concepts })))
    }
}

const STOPWORDS: &[&str] = &[
    "about", "after", "although", "because", "before", "between", "could", "during", "however",
    "should", "their", "there", "these", "thing", "those", "through", "under", "where", "which",
    "while", "within", "would",
];

struct StoreBibliographyReference;

#[async_trait]
impl super::ToolHandler for StoreBibliographyReference {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let title = required_str(args, "title")?;
        let authors = required_str(args, "authors")?;
        let year = args.get("year").and_then(Value::as_i64);
        let venue = optional_str(args, "venue");
        let abstract_text = optional_str(args, "abstract_text");

        let payload = json!({
            "title": title,
            "authors": authors,
            "year": year,
            "venue": venue,
            "abstract": abstract_text,
        });

        let id = ctx
            .project
            .store
            .insert_document(title, KIND_REFERENCE, &payload.to_string(), None)
            .await?;

        // Index the abstract when vector search is installed, so the
        // reference shows up in semantic queries; absence of the index is
        // not an error here.
        if let Ok(index) = ctx.resources.vector_index(&ctx.project.root).await {
            let body = abstract_text.unwrap_or(title);
            if let Err(e) = index.add_document(title, body).await {
                tracing::debug!("reference not indexed: {e}");
            }
        }

        Ok(ToolOutput::Json(json!({
            "reference_id": id,
            "stored": true,
            "title": title,
        })))
    }
}

struct RetrieveBibliographyReferences;

#[async_trait]
impl super::ToolHandler for RetrieveBibliographyReferences {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let filter = optional_str(args, "filter").map(str::to_lowercase);

        let rows = ctx.project.store.list_documents(KIND_REFERENCE).await?;
        let references: Vec<Value> = rows
            .into_iter()
            .filter(|doc| {
                filter.as_ref().map_or(true, |f| {
                    doc.title.to_lowercase().contains(f)
                        || doc.content.to_lowercase().contains(f)
                })
            })
            .map(|doc| {
                serde_json::from_str::<Value>(&doc.content)
                    .unwrap_or_else(|_| json!({ "title": doc.title }))
            })
            .collect();

        Ok(ToolOutput::Json(json!({
            "reference_count": references.len(),
            "references": references,
        })))
    }
}

struct ExtractDocumentSections;

#[async_trait]
impl super::ToolHandler for ExtractDocumentSections {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let content = required_str(args, "content")?;
        if content.trim().is_empty() {
            return Err(AppError::validation("content is empty"));
        }

        let mut sections: Vec<(String, Vec<&str>)> = Vec::new();
        let mut current = "preamble".to_owned();
        let mut body: Vec<&str> = Vec::new();

        for line in content.lines() {
            let heading = line
                .trim()
                .strip_prefix('#')
                .map(|h| h.trim_start_matches('#').trim())
                .or_else(|| {
                    line.trim()
                        .strip_prefix("\\section{")
                        .and_then(|rest| rest.strip_suffix('}'))
                });
            if let Some(title) = heading {
                if !body.is_empty() || current != "preamble" {
                    sections.push((current.clone(), std::mem::take(&mut body)));
                }
                current = title.to_owned();
            } else {
                body.push(line);
            }
        }
        sections.push((current, body));

        let out: Vec<Value> = sections
            .into_iter()
            .filter(|(name, lines)| name != "preamble" || !lines.join("").trim().is_empty())
            .map(|(name, lines)| {
                json!({
                    "section": name,
                    "line_count": lines.len(),
                    "text": lines.join("\n"),
                })
            })
            .collect();

        Ok(ToolOutput::Json(json!({ "sections": out })))
    }
}
