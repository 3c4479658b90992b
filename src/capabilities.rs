// ABOUTME: Capability registry recording which optional feature groups are installed
// ABOUTME: Resolved once from configuration before tool registration, then read-only
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # Capability Registry
//!
//! Optional feature groups (LaTeX compilation, vector search) are decided at
//! install time. The registry snapshots the decision once, after
//! configuration load and before tool registration; tool bodies never read
//! capability state directly. Registration is the only consumer of the
//! predicates, which keeps capability checks out of import-time paths.

use crate::config::ServerConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A capability a tool may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// No optional capability required
    None,
    /// Requires an installed LaTeX toolchain
    Latex,
    /// Requires an installed vector database
    VectorDb,
}

impl Capability {
    /// Stable name used in error messages and the frontend catalog
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Latex => "latex",
            Self::VectorDb => "vector_db",
        }
    }
}

/// Snapshot of installed feature groups, taken at startup.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityRegistry {
    has_latex: bool,
    has_vector_db: bool,
}

impl CapabilityRegistry {
    /// Resolve capabilities from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let registry = Self {
            has_latex: config.features.latex,
            has_vector_db: config.features.vector_db,
        };
        registry.log_enabled();
        registry
    }

    /// Registry with every capability installed (test fixture)
    #[must_use]
    pub const fn all_enabled() -> Self {
        Self {
            has_latex: true,
            has_vector_db: true,
        }
    }

    /// Whether the LaTeX toolchain is installed
    #[must_use]
    pub const fn has_latex(&self) -> bool {
        self.has_latex
    }

    /// Whether the vector database is installed
    #[must_use]
    pub const fn has_vector_db(&self) -> bool {
        self.has_vector_db
    }

    /// Whether a given capability requirement is satisfied
    #[must_use]
    pub const fn satisfies(&self, capability: Capability) -> bool {
        match capability {
            Capability::None => true,
            Capability::Latex => self.has_latex,
            Capability::VectorDb => self.has_vector_db,
        }
    }

    fn log_enabled(&self) {
        let enabled: Vec<&str> = [
            (self.has_latex, Capability::Latex.as_str()),
            (self.has_vector_db, Capability::VectorDb.as_str()),
        ]
        .iter()
        .filter_map(|(on, name)| on.then_some(*name))
        .collect();

        if enabled.is_empty() {
            info!("Capabilities: none (core tools only)");
        } else {
            info!("Capabilities: {}", enabled.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureFlags;

    #[test]
    fn registry_reflects_config_flags() {
        let config = ServerConfig {
            features: FeatureFlags {
                latex: true,
                vector_db: false,
            },
            ..ServerConfig::default()
        };
        let registry = CapabilityRegistry::from_config(&config);
        assert!(registry.has_latex());
        assert!(!registry.has_vector_db());
        assert!(registry.satisfies(Capability::None));
        assert!(registry.satisfies(Capability::Latex));
        assert!(!registry.satisfies(Capability::VectorDb));
    }
}
