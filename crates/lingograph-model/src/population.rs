//! Population provenance.

use serde::{Deserialize, Serialize};

/// Which candidate of the precedence cascade produced a resolved figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PopulationSource {
    /// A number entered directly for this entity by a source catalog.
    Citation,
    /// The largest estimate among the census citations attached to a locale.
    Census,
    /// A deterministic rollup performed by locale synthesis (regional/family).
    Synthesized,
    /// Sum of the language's resolved locale populations.
    Locales,
    /// Sum of resolved child populations (plus one per child node).
    Descendants,
    /// Sum of the citations of the languages/locales using a writing system.
    UpperBound,
}

impl PopulationSource {
    /// Whether figures from this source count as attested rather than estimated.
    pub fn is_attested(self) -> bool {
        matches!(
            self,
            PopulationSource::Citation | PopulationSource::Census | PopulationSource::Synthesized
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            PopulationSource::Citation => "citation",
            PopulationSource::Census => "census",
            PopulationSource::Synthesized => "synthesized",
            PopulationSource::Locales => "locales",
            PopulationSource::Descendants => "descendants",
            PopulationSource::UpperBound => "upper bound",
        }
    }
}

/// A resolved population with the candidate it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationResolution {
    pub value: u64,
    pub source: PopulationSource,
}

impl PopulationResolution {
    pub fn new(value: u64, source: PopulationSource) -> Self {
        Self { value, source }
    }
}

/// Percentage of `part` in `whole`, clamped to `[0, 100]`.
///
/// Returns `None` when the denominator is zero (unknown).
pub fn percent_of(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(clamp_percent(part as f64 * 100.0 / whole as f64))
}

pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}
