//! Pipeline configuration.

use anyhow::{Context, Result};
use lingograph_model::{LanguageSource, TerritoryScope};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Knobs for one pipeline run. Every field has a default, so a config file
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Recursion limit for every hierarchy walk; deeper means a cycle.
    pub max_depth: usize,
    /// Authority whose tree drives family-locale synthesis.
    pub family_source: LanguageSource,
    /// Authority whose tree drives descendant population sums.
    pub descendant_source: LanguageSource,
    pub synthesize_regional: bool,
    pub synthesize_family: bool,
    /// Territory scopes whose locales seed regional rollups.
    pub regional_seed_scopes: Vec<TerritoryScope>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_depth: 30,
            family_source: LanguageSource::Iso,
            descendant_source: LanguageSource::Combined,
            synthesize_regional: true,
            synthesize_family: true,
            regional_seed_scopes: vec![TerritoryScope::Country],
        }
    }
}

impl PipelineConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse pipeline config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text)
    }
}
