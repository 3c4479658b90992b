// ABOUTME: Analysis and synthesis tools over the project knowledge base
// ABOUTME: Pattern discovery, document similarity, concept graphs, and research summaries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::{optional_usize, ToolContext, ToolDefinition, ToolOutput, ToolRegistry};
use crate::capabilities::Capability;
use crate::database::documents::KIND_REFERENCE;
use crate::errors::{AppError, AppResult};
use crate::mcp::schema::JsonSchema;
use crate::vector::VectorIndex;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use srrd_intelligence::framework::tool_names as tn;
use srrd_intelligence::progress;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Register the analysis-synthesis tools.
///
/// # Errors
///
/// Propagates duplicate-name registration errors.
pub fn register(registry: &mut ToolRegistry) -> AppResult<()> {
    registry.register(ToolDefinition::new(
        tn::DISCOVER_PATTERNS,
        "Discover recurring terms across the project knowledge base",
        JsonSchema::object(
            &[("limit", "integer", "Maximum patterns (default 10)")],
            &[],
        ),
        Capability::VectorDb,
        true,
        Arc::new(DiscoverPatterns),
    ))?;

    registry.register(ToolDefinition::new(
        tn::FIND_SIMILAR_DOCUMENTS,
        "Find knowledge-base documents similar to a given one",
        JsonSchema::object(
            &[
                ("document_id", "integer", "Id of the anchor document"),
                ("limit", "integer", "Maximum results (default 5)"),
            ],
            &["document_id"],
        ),
        Capability::VectorDb,
        true,
        Arc::new(FindSimilarDocuments),
    ))?;

    registry.register(ToolDefinition::new(
        tn::BUILD_KNOWLEDGE_GRAPH,
        "Build a concept co-occurrence graph over the knowledge base",
        JsonSchema::object(
            &[("limit", "integer", "Maximum nodes (default 15)")],
            &[],
        ),
        Capability::VectorDb,
        true,
        Arc::new(BuildKnowledgeGraph),
    ))?;

    registry.register(ToolDefinition::new(
        tn::GENERATE_RESEARCH_SUMMARY,
        "Summarize accumulated project material and progress",
        JsonSchema::object(
            &[("focus", "string", "Optional aspect to emphasize")],
            &[],
        ),
        Capability::None,
        true,
        Arc::new(GenerateResearchSummary),
    ))?;

    Ok(())
}

fn significant_terms(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 4)
        .map(str::to_owned)
        .collect()
}

struct DiscoverPatterns;

#[async_trait]
impl super::ToolHandler for DiscoverPatterns {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let limit = optional_usize(args, "limit", 10);
        let index = ctx.resources.vector_index(&ctx.project.root).await?;
        let documents = index.list_documents().await?;

        // A pattern is a term recurring in more than one document.
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for doc in &documents {
            let terms: HashSet<String> =
                significant_terms(&format!("{} {}", doc.title, doc.content))
                    .into_iter()
                    .collect();
            for term in terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let mut recurring: Vec<(String, usize)> = document_frequency
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .collect();
        recurring.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        recurring.truncate(limit);

        let patterns: Vec<Value> = recurring
            .into_iter()
            .map(|(term, documents)| json!({ "pattern": term, "document_count": documents }))
            .collect();

        Ok(ToolOutput::Json(json!({
            "corpus_size": documents.len(),
            "patterns": patterns,
        })))
    }
}

struct FindSimilarDocuments;

#[async_trait]
impl super::ToolHandler for FindSimilarDocuments {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let document_id = args
            .get("document_id")
            .and_then(Value::as_i64)
            .ok_or_else(|| AppError::invalid_params("missing required parameter 'document_id'"))?;
        let limit = optional_usize(args, "limit", 5);

        let index = ctx.resources.vector_index(&ctx.project.root).await?;
        let documents = index.list_documents().await?;
        let anchor = documents
            .iter()
            .find(|d| d.id == document_id)
            .ok_or_else(|| AppError::validation(format!("no document with id {document_id}")))?;

        let anchor_terms: HashSet<String> =
            significant_terms(&format!("{} {}", anchor.title, anchor.content))
                .into_iter()
                .collect();

        let mut scored: Vec<(f64, &crate::vector::KnowledgeDocument)> = documents
            .iter()
            .filter(|d| d.id != document_id)
            .map(|doc| {
                let terms: HashSet<String> =
                    significant_terms(&format!("{} {}", doc.title, doc.content))
                        .into_iter()
                        .collect();
                let intersection = anchor_terms.intersection(&terms).count();
                let union = anchor_terms.union(&terms).count().max(1);
                (intersection as f64 / union as f64, doc)
            })
            .filter(|(score, _)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        let similar: Vec<Value> = scored
            .into_iter()
            .map(|(score, doc)| {
                json!({
                    "document_id": doc.id,
                    "title": doc.title,
                    "similarity": (score * 1000.0).round() / 1000.0,
                })
            })
            .collect();

        Ok(ToolOutput::Json(json!({
            "anchor": { "document_id": anchor.id, "title": anchor.title },
            "similar_documents": similar,
        })))
    }
}

struct BuildKnowledgeGraph;

#[async_trait]
impl super::ToolHandler for BuildKnowledgeGraph {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let limit = optional_usize(args, "limit", 15);
        let index = ctx.resources.vector_index(&ctx.project.root).await?;
        let documents = index.list_documents().await?;

        let mut term_documents: HashMap<String, HashSet<i64>> = HashMap::new();
        for doc in &documents {
            for term in significant_terms(&format!("{} {}", doc.title, doc.content)) {
                term_documents.entry(term).or_default().insert(doc.id);
            }
        }

        let mut nodes: Vec<(String, usize)> = term_documents
            .iter()
            .map(|(term, docs)| (term.clone(), docs.len()))
            .filter(|(_, count)| *count > 1)
            .collect();
        nodes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        nodes.truncate(limit);

        // Edge weight = number of documents where both terms co-occur.
        let mut edges = Vec::new();
        for (i, (term_a, _)) in nodes.iter().enumerate() {
            for (term_b, _) in nodes.iter().skip(i + 1) {
                let docs_a = &term_documents[term_a];
                let docs_b = &term_documents[term_b];
                let weight = docs_a.intersection(docs_b).count();
                if weight > 0 {
                    edges.push(json!({
                        "source": term_a,
                        "target": term_b,
                        "weight": weight,
                    }));
                }
            }
        }

        Ok(ToolOutput::Json(json!({
            "nodes": nodes
                .into_iter()
                .map(|(term, count)| json!({ "concept": term, "document_count": count }))
                .collect::<Vec<_>>(),
            "edges": edges,
        })))
    }
}

struct GenerateResearchSummary;

#[async_trait]
impl super::ToolHandler for GenerateResearchSummary {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let focus = super::optional_str(args, "focus");

        let usage = ctx.project.store.usage_samples().await?;
        let references = ctx.project.store.list_documents(KIND_REFERENCE).await?;
        let report = progress::compute_progress(&ctx.resources.framework, &usage);

        let mut lines = vec![format!(
            "Research summary: {} tool invocations across {} distinct tools; {} stored references.",
            report.total_invocations,
            report.unique_tools,
            references.len()
        )];
        for act in &report.acts {
            if !act.used_tools.is_empty() {
                lines.push(format!(
                    "- {}: {:.0}% covered via {}",
                    act.act.display_name(),
                    act.completion_percent,
                    act.used_tools.join(", ")
                ));
            }
        }
        if let Some(focus) = focus {
            lines.push(format!("Focus requested: {focus}."));
        }

        Ok(ToolOutput::Text(lines.join("\n")))
    }
}
