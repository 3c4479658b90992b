// ABOUTME: Centralized resource container for dependency injection in the MCP server
// ABOUTME: Holds configuration, registries, store manager, and collaborator seams
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # Server Resources Module
//!
//! One container for the expensive shared state, built once at startup and
//! shared by every transport connection behind an `Arc`. Everything here is
//! read-only after construction except the store and vector-index managers,
//! which cache per-project handles internally.

use crate::capabilities::CapabilityRegistry;
use crate::config::ServerConfig;
use crate::context::ContextResolver;
use crate::database::StoreManager;
use crate::errors::{AppError, AppResult};
use crate::latex::LatexCompiler;
use crate::tools::ToolRegistry;
use crate::vector::{EmbeddedVectorIndex, VectorIndexManager};
use srrd_intelligence::ResearchFramework;
use std::path::Path;
use std::sync::Arc;

/// Centralized resource container for dependency injection.
pub struct ServerResources {
    /// Server configuration loaded at startup
    pub config: Arc<ServerConfig>,
    /// Installed-capability snapshot
    pub capabilities: CapabilityRegistry,
    /// The tool catalog
    pub registry: ToolRegistry,
    /// Static research-act taxonomy
    pub framework: ResearchFramework,
    /// Per-project store manager
    pub stores: StoreManager,
    /// Context resolver for dispatched calls
    pub resolver: ContextResolver,
    /// LaTeX collaborator
    pub latex: LatexCompiler,
    vector_indexes: Option<VectorIndexManager>,
}

impl ServerResources {
    /// Build the resource container: resolve capabilities, register the
    /// tool catalog, and verify taxonomy coverage.
    ///
    /// # Errors
    ///
    /// Returns an error when tool registration fails (duplicate names).
    pub fn new(config: ServerConfig) -> AppResult<Arc<Self>> {
        let config = Arc::new(config);
        let capabilities = CapabilityRegistry::from_config(&config);
        let registry = ToolRegistry::build(capabilities)?;

        let framework = ResearchFramework::new();
        framework.verify_registry(&registry.all_names());

        let vector_indexes = capabilities
            .has_vector_db()
            .then(|| VectorIndexManager::new(&config.embedding_model));

        Ok(Arc::new(Self {
            resolver: ContextResolver::new(config.clone()),
            config,
            capabilities,
            registry,
            framework,
            stores: StoreManager::new(),
            latex: LatexCompiler::new(),
            vector_indexes,
        }))
    }

    /// The vector index for a project.
    ///
    /// # Errors
    ///
    /// Returns `internal_error` when the vector capability is not installed
    /// (vector-gated tools cannot execute in that state, so reaching this is
    /// a dispatch bug) and `store_unavailable` when the index cannot open.
    pub async fn vector_index(&self, project_root: &Path) -> AppResult<Arc<EmbeddedVectorIndex>> {
        let manager = self
            .vector_indexes
            .as_ref()
            .ok_or_else(|| AppError::internal("vector index requested without vector_db capability"))?;
        manager.get_or_open(project_root).await
    }
}
