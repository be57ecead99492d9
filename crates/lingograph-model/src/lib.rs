//! Lingograph entity model
//!
//! Shared types for the language/territory graph:
//!
//! ```text
//!   Language ──┬── per-source views (Combined, ISO, Glottolog, CLDR, UNESCO, BCP)
//!              │        each: { code, name, parent, children }
//!              │
//!   Locale ────┼── (language, territory, script?, variants*)
//!              │        population citations + census citations
//!              │
//!   Territory ─┼── containment (world > continent > region > … > dependency)
//!   WritingSystem  parent/child descent, upper-bound population
//!   Census ────┴── territory-scoped survey, language → estimate
//!   VariantTag     registry variant subtags
//! ```
//!
//! Entities reference each other by typed IDs; the graph crate owns the single
//! arena that maps IDs to entity records.

pub mod census;
pub mod ids;
pub mod language;
pub mod locale;
pub mod population;
pub mod territory;
pub mod variant;
pub mod writing_system;

pub use census::{Census, CensusCitation, CollectorType};
pub use ids::{CensusId, LanguageId, LocaleId, TerritoryId, VariantTagId, WritingSystemId};
pub use language::{Language, LanguageSource, LanguageSourceRecord, Modality, SourceViews};
pub use locale::{Locale, LocaleCode, LocaleOrigin, OfficialStatus, PopulationSourceCategory};
pub use population::{PopulationResolution, PopulationSource};
pub use territory::{Territory, TerritoryScope};
pub use variant::VariantTag;
pub use writing_system::WritingSystem;

use serde::{Deserialize, Serialize};

/// Type tag shared by every entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Language,
    Locale,
    Territory,
    WritingSystem,
    Census,
    VariantTag,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Language => "language",
            EntityKind::Locale => "locale",
            EntityKind::Territory => "territory",
            EntityKind::WritingSystem => "writing_system",
            EntityKind::Census => "census",
            EntityKind::VariantTag => "variant_tag",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing one of the closed vocabularies from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {vocabulary} value `{value}`")]
pub struct UnknownValue {
    pub vocabulary: &'static str,
    pub value: String,
}

impl UnknownValue {
    pub(crate) fn new(vocabulary: &'static str, value: &str) -> Self {
        Self {
            vocabulary,
            value: value.to_string(),
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "language" | "lang" => Ok(EntityKind::Language),
            "locale" => Ok(EntityKind::Locale),
            "territory" => Ok(EntityKind::Territory),
            "writing_system" | "script" => Ok(EntityKind::WritingSystem),
            "census" => Ok(EntityKind::Census),
            "variant_tag" | "variant" => Ok(EntityKind::VariantTag),
            _ => Err(UnknownValue::new("entity kind", s)),
        }
    }
}

/// Fields every entity exposes regardless of kind.
pub trait Entity {
    const KIND: EntityKind;

    fn id(&self) -> &str;
    fn name_display(&self) -> &str;
    fn names(&self) -> &[String];

    fn kind(&self) -> EntityKind {
        Self::KIND
    }
}

/// Append `name` to `names` unless an equal entry is already present.
///
/// Name lists are append-only; existing entries are never removed or reordered.
pub fn push_unique_name(names: &mut Vec<String>, name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() || names.iter().any(|n| n == name) {
        return false;
    }
    names.push(name.to_string());
    true
}
