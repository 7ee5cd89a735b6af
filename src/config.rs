//! Deployment configuration.
//!
//! The generation id and precache manifest are produced by the build
//! pipeline and shipped alongside the application as a small JSON file.
//! This module only moves them from disk into the manager's constructor;
//! both values are opaque to the cache layer itself.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::Manifest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Opaque generation tag, changed by the deployer whenever the served
    /// assets change.
    pub generation: String,

    /// Ordered resource identifiers to precache at install time.
    pub precache_manifest: Vec<String>,

    /// Origin that relative manifest paths resolve against.
    #[serde(default)]
    pub origin: Option<String>,
}

impl DeploymentConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read deployment config: {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse deployment config: {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn manifest(&self) -> Manifest {
        Manifest::new(self.precache_manifest.clone())
    }
}
