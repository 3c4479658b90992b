// ABOUTME: LaTeX collaborator seam invoking pdflatex as a bounded subprocess
// ABOUTME: Document skeleton generation, template listing, and compilation with timeout
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # LaTeX Collaborator
//!
//! The compiler itself is external; this module owns the subprocess
//! boundary. Non-zero exits surface as `external_failure` carrying the tail
//! of the compiler log, and every compile runs under a timeout so a
//! wedged toolchain cannot hold the event loop's task hostage.

use crate::constants::{defaults, project_layout};
use crate::errors::{AppError, AppResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Built-in document templates available without a templates/ subtree.
pub const BUILTIN_TEMPLATES: [&str; 3] = ["article", "report", "proposal"];

/// How much of the compiler log to carry in diagnostics.
const LOG_TAIL_CHARS: usize = 2000;

/// Wraps `pdflatex` invocation with a bounded timeout.
#[derive(Debug, Clone)]
pub struct LatexCompiler {
    timeout: Duration,
}

impl Default for LatexCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl LatexCompiler {
    /// Compiler with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(defaults::LATEX_TIMEOUT_SECS),
        }
    }

    /// Compile `tex_path` into its directory; returns the PDF path.
    ///
    /// # Errors
    ///
    /// Returns `validation_failed` when the source file is missing and
    /// `external_failure` (with the log tail) when the compiler fails,
    /// times out, or is not installed.
    pub async fn compile(&self, tex_path: &Path) -> AppResult<PathBuf> {
        if !tex_path.exists() {
            return Err(AppError::validation(format!(
                "LaTeX source not found: {}",
                tex_path.display()
            )));
        }
        let out_dir = tex_path.parent().unwrap_or_else(|| Path::new("."));

        debug!(source = %tex_path.display(), "invoking pdflatex");
        let run = Command::new("pdflatex")
            .arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg("-output-directory")
            .arg(out_dir)
            .arg(tex_path)
            .output();

        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| {
                AppError::external(
                    "pdflatex",
                    format!("timed out after {}s", self.timeout.as_secs()),
                )
            })?
            .map_err(|e| AppError::external("pdflatex", format!("failed to start: {e}")))?;

        if !output.status.success() {
            let log = String::from_utf8_lossy(&output.stdout);
            let tail: String = log
                .chars()
                .rev()
                .take(LOG_TAIL_CHARS)
                .collect::<String>()
                .chars()
                .rev()
                .collect();
            return Err(AppError::external("pdflatex", tail));
        }

        let pdf = tex_path.with_extension("pdf");
        info!(pdf = %pdf.display(), "LaTeX compilation finished");
        Ok(pdf)
    }
}

/// Render a document skeleton from a named template.
///
/// # Errors
///
/// Returns `validation_failed` for an unknown template name.
pub fn render_template(template: &str, title: &str, author: &str) -> AppResult<String> {
    let (class, sections): (&str, &[&str]) = match template {
        "article" => ("article", &["Introduction", "Methods", "Results", "Discussion"]),
        "report" => ("report", &["Background", "Progress", "Next Steps"]),
        "proposal" => (
            "article",
            &["Motivation", "Research Questions", "Methodology", "Timeline"],
        ),
        other => {
            return Err(AppError::validation(format!(
                "unknown template '{other}'; available: {}",
                BUILTIN_TEMPLATES.join(", ")
            )))
        }
    };

    let mut body = format!(
        "\\documentclass{{{class}}}\n\\usepackage[utf8]{{inputenc}}\n\n\\title{{{title}}}\n\\author{{{author}}}\n\\date{{\\today}}\n\n\\begin{{document}}\n\\maketitle\n\n"
    );
    for section in sections {
        body.push_str(&format!("\\section{{{section}}}\n\n"));
    }
    body.push_str("\\end{document}\n");
    Ok(body)
}

/// Template names available for a project: built-ins plus any `.tex` files
/// under `<project>/.srrd/templates/`.
pub async fn list_templates(project_root: &Path) -> Vec<String> {
    let mut names: Vec<String> = BUILTIN_TEMPLATES.iter().map(|t| (*t).to_owned()).collect();
    let dir = project_root
        .join(project_layout::MARKER_DIR)
        .join(project_layout::TEMPLATES_DIR);
    if let Ok(mut entries) = tokio::fs::read_dir(&dir).await {
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "tex") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_owned());
                }
            }
        }
    }
    names.sort();
    names.dedup();
    names
}
