// ABOUTME: Communication tools for document generation, formatting, and bibliographies
// ABOUTME: LaTeX-gated tools write into publications/ and persist document rows
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::{optional_str, required_str, ToolContext, ToolDefinition, ToolOutput, ToolRegistry};
use crate::capabilities::Capability;
use crate::constants::project_layout;
use crate::database::documents::{KIND_DOCUMENT, KIND_REFERENCE};
use crate::errors::{AppError, AppResult};
use crate::latex;
use crate::mcp::schema::JsonSchema;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use srrd_intelligence::framework::tool_names as tn;
use std::sync::Arc;

/// Register the communication tools.
///
/// # Errors
///
/// Propagates duplicate-name registration errors.
pub fn register(registry: &mut ToolRegistry) -> AppResult<()> {
    registry.register(ToolDefinition::new(
        tn::GENERATE_LATEX_DOCUMENT,
        "Generate a LaTeX document skeleton into the project's publications directory",
        JsonSchema::object(
            &[
                ("title", "string", "Document title"),
                ("template", "string", "Template name (default article)"),
                ("author", "string", "Author line (default local researcher)"),
            ],
            &["title"],
        ),
        Capability::Latex,
        true,
        Arc::new(GenerateLatexDocument),
    ))?;

    registry.register(ToolDefinition::new(
        tn::COMPILE_LATEX,
        "Compile a LaTeX source file in the project to PDF",
        JsonSchema::object(
            &[("tex_path", "string", "Path of the .tex file, relative to the project root")],
            &["tex_path"],
        ),
        Capability::Latex,
        true,
        Arc::new(CompileLatex),
    ))?;

    registry.register(ToolDefinition::new(
        tn::LIST_LATEX_TEMPLATES,
        "List the LaTeX templates available to this project",
        JsonSchema::object(&[], &[]),
        Capability::Latex,
        false,
        Arc::new(ListLatexTemplates),
    ))?;

    registry.register(ToolDefinition::new(
        tn::FORMAT_RESEARCH_CONTENT,
        "Normalize research content formatting (headings, spacing, lists)",
        JsonSchema::object(
            &[("content", "string", "Content to normalize")],
            &["content"],
        ),
        Capability::None,
        false,
        Arc::new(FormatResearchContent),
    ))?;

    registry.register(ToolDefinition::new(
        tn::GENERATE_BIBLIOGRAPHY,
        "Render the project's stored references as a bibliography",
        JsonSchema::object(
            &[("style", "string", "bibtex or plain (default plain)")],
            &[],
        ),
        Capability::None,
        true,
        Arc::new(GenerateBibliography),
    ))?;

    Ok(())
}

struct GenerateLatexDocument;

#[async_trait]
impl super::ToolHandler for GenerateLatexDocument {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let title = required_str(args, "title")?;
        let template = optional_str(args, "template").unwrap_or("article");
        let author = optional_str(args, "author").unwrap_or("Local Researcher");

        let body = latex::render_template(template, title, author)?;

        let publications = ctx.project.root.join(project_layout::PUBLICATIONS_DIR);
        tokio::fs::create_dir_all(&publications).await?;
        let file_name = format!("{}.tex", slugify(title));
        let path = publications.join(&file_name);
        tokio::fs::write(&path, &body).await?;

        let document_id = ctx
            .project
            .store
            .insert_document(title, KIND_DOCUMENT, &body, Some(&path.display().to_string()))
            .await?;

        Ok(ToolOutput::Json(json!({
            "document_id": document_id,
            "template": template,
            "tex_path": path.display().to_string(),
        })))
    }
}

fn slugify(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    slug.trim_matches('_').chars().take(60).collect()
}

struct CompileLatex;

#[async_trait]
impl super::ToolHandler for CompileLatex {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let tex_path = required_str(args, "tex_path")?;
        let resolved = ctx.project.root.join(tex_path);

        // Compiles must stay inside the project tree.
        if tex_path.contains("..") {
            return Err(AppError::validation("tex_path may not traverse out of the project"));
        }

        let pdf = ctx.resources.latex.compile(&resolved).await?;
        Ok(ToolOutput::Json(json!({
            "compiled": true,
            "pdf_path": pdf.display().to_string(),
        })))
    }
}

struct ListLatexTemplates;

#[async_trait]
impl super::ToolHandler for ListLatexTemplates {
    async fn call(&self, ctx: &ToolContext, _args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let templates = latex::list_templates(&ctx.project.root).await;
        Ok(ToolOutput::Json(json!({ "templates": templates })))
    }
}

struct FormatResearchContent;

#[async_trait]
impl super::ToolHandler for FormatResearchContent {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let content = required_str(args, "content")?;

        let mut formatted = Vec::new();
        let mut previous_blank = false;
        for raw in content.lines() {
            let line = raw.trim_end();
            let is_blank = line.trim().is_empty();
            if is_blank && previous_blank {
                continue;
            }
            if let Some(rest) = line.trim_start().strip_prefix("* ") {
                formatted.push(format!("- {rest}"));
            } else {
                formatted.push(line.to_owned());
            }
            previous_blank = is_blank;
        }

        Ok(ToolOutput::Text(formatted.join("\n")))
    }
}

struct GenerateBibliography;

#[async_trait]
impl super::ToolHandler for GenerateBibliography {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let style = optional_str(args, "style").unwrap_or("plain");
        let references = ctx.project.store.list_documents(KIND_REFERENCE).await?;

        if references.is_empty() {
            return Ok(ToolOutput::Text(
                "No stored references. Use store_bibliography_reference first.".to_owned(),
            ));
        }

        let mut entries = Vec::new();
        for doc in &references {
            let payload: Value =
                serde_json::from_str(&doc.content).unwrap_or_else(|_| json!({ "title": doc.title }));
            let authors = payload["authors"].as_str().unwrap_or("Unknown");
            let year = payload["year"].as_i64().map_or(String::new(), |y| y.to_string());
            let venue = payload["venue"].as_str().unwrap_or("");

            let entry = match style {
                "bibtex" => format!(
                    "@misc{{{},\n  title = {{{}}},\n  author = {{{}}},\n  year = {{{}}},\n  howpublished = {{{}}}\n}}",
                    slugify(&doc.title),
                    doc.title,
                    authors,
                    year,
                    venue
                ),
                _ => {
                    let mut line = format!("{authors}. {}.", doc.title);
                    if !venue.is_empty() {
                        line.push_str(&format!(" {venue}."));
                    }
                    if !year.is_empty() {
                        line.push_str(&format!(" {year}."));
                    }
                    line
                }
            };
            entries.push(entry);
        }

        Ok(ToolOutput::Text(entries.join("\n\n")))
    }
}
