//! Languages and their per-source hierarchy views.
//!
//! Each authority catalog groups languages differently. Rather than picking
//! one tree, a [`Language`] carries one [`LanguageSourceRecord`] per
//! authority, and every record holds its own parent/children adjacency. The
//! result is several independent forests over the same node set.

use crate::ids::{LanguageId, LocaleId, WritingSystemId};
use crate::population::{PopulationResolution, PopulationSource};
use crate::{Entity, EntityKind, UnknownValue};
use serde::{Deserialize, Serialize};

/// The closed set of authorities a language sub-record can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LanguageSource {
    /// Canonical merged view.
    Combined,
    /// ISO-style code registry.
    Iso,
    /// Genealogical catalog.
    Glottolog,
    /// Locale-data consortium.
    Cldr,
    /// International-heritage body.
    Unesco,
    /// Best-practices tag registry.
    Bcp,
}

impl LanguageSource {
    pub const ALL: [LanguageSource; 6] = [
        LanguageSource::Combined,
        LanguageSource::Iso,
        LanguageSource::Glottolog,
        LanguageSource::Cldr,
        LanguageSource::Unesco,
        LanguageSource::Bcp,
    ];

    /// Every source other than the merged view.
    pub const AUTHORITIES: [LanguageSource; 5] = [
        LanguageSource::Iso,
        LanguageSource::Glottolog,
        LanguageSource::Cldr,
        LanguageSource::Unesco,
        LanguageSource::Bcp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageSource::Combined => "Combined",
            LanguageSource::Iso => "ISO",
            LanguageSource::Glottolog => "Glottolog",
            LanguageSource::Cldr => "CLDR",
            LanguageSource::Unesco => "UNESCO",
            LanguageSource::Bcp => "BCP",
        }
    }
}

impl std::fmt::Display for LanguageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LanguageSource {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageSource::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownValue::new("language source", s))
    }
}

/// One authority's view of a language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageSourceRecord {
    pub code: Option<String>,
    pub name: Option<String>,
    /// Parent code as published; resolved into `parent` by the linker.
    pub parent_code: Option<String>,
    pub parent: Option<LanguageId>,
    pub children: Vec<LanguageId>,
}

impl LanguageSourceRecord {
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    pub fn is_present(&self) -> bool {
        self.code.is_some()
    }
}

/// The per-source records of a language, one field per authority.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceViews {
    pub combined: LanguageSourceRecord,
    pub iso: LanguageSourceRecord,
    pub glottolog: LanguageSourceRecord,
    pub cldr: LanguageSourceRecord,
    pub unesco: LanguageSourceRecord,
    pub bcp: LanguageSourceRecord,
}

impl SourceViews {
    pub fn get(&self, source: LanguageSource) -> &LanguageSourceRecord {
        match source {
            LanguageSource::Combined => &self.combined,
            LanguageSource::Iso => &self.iso,
            LanguageSource::Glottolog => &self.glottolog,
            LanguageSource::Cldr => &self.cldr,
            LanguageSource::Unesco => &self.unesco,
            LanguageSource::Bcp => &self.bcp,
        }
    }

    pub fn get_mut(&mut self, source: LanguageSource) -> &mut LanguageSourceRecord {
        match source {
            LanguageSource::Combined => &mut self.combined,
            LanguageSource::Iso => &mut self.iso,
            LanguageSource::Glottolog => &mut self.glottolog,
            LanguageSource::Cldr => &mut self.cldr,
            LanguageSource::Unesco => &mut self.unesco,
            LanguageSource::Bcp => &mut self.bcp,
        }
    }
}

/// Position of a language on the spoken/written/signed continuum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    Spoken,
    MostlySpoken,
    SpokenAndWritten,
    MostlyWritten,
    Written,
    Sign,
}

impl std::str::FromStr for Modality {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || *c == '&')
            .collect();
        match normalized.as_str() {
            "spoken" => Ok(Modality::Spoken),
            "mostlyspoken" => Ok(Modality::MostlySpoken),
            "spoken&written" | "spokenandwritten" => Ok(Modality::SpokenAndWritten),
            "mostlywritten" => Ok(Modality::MostlyWritten),
            "written" => Ok(Modality::Written),
            "sign" | "signed" => Ok(Modality::Sign),
            _ => Err(UnknownValue::new("modality", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub id: LanguageId,
    pub name_display: String,
    pub names: Vec<String>,
    /// Parenthetical qualifier split off the published name.
    pub name_subtitle: Option<String>,
    pub name_endonym: Option<String>,
    pub modality: Option<Modality>,
    pub primary_script_code: Option<String>,
    pub primary_writing_system: Option<WritingSystemId>,
    pub vitality_iso: Option<String>,
    pub vitality_eth2013: Option<String>,
    pub vitality_eth2025: Option<String>,
    pub digital_support: Option<String>,

    /// Curated figure that supersedes `population_cited` when present.
    pub population_adjusted: Option<u64>,
    pub population_cited: Option<u64>,
    pub population_from_locales: Option<u64>,
    pub population_of_descendants: Option<u64>,
    pub population_estimate: Option<PopulationResolution>,
    pub population_attested: Option<u64>,

    pub sources: SourceViews,
    pub locales: Vec<LocaleId>,
    pub writing_systems: Vec<WritingSystemId>,
}

impl Language {
    pub fn new(id: impl Into<LanguageId>, name: impl Into<String>) -> Self {
        let id = id.into();
        let name = name.into();
        let mut sources = SourceViews::default();
        sources.combined = LanguageSourceRecord {
            code: Some(id.to_string()),
            name: Some(name.clone()),
            ..LanguageSourceRecord::default()
        };
        Self {
            id,
            names: vec![name.clone()],
            name_display: name,
            sources,
            ..Self::default()
        }
    }

    pub fn source(&self, source: LanguageSource) -> &LanguageSourceRecord {
        self.sources.get(source)
    }

    pub fn source_mut(&mut self, source: LanguageSource) -> &mut LanguageSourceRecord {
        self.sources.get_mut(source)
    }

    pub fn parent(&self, source: LanguageSource) -> Option<&LanguageId> {
        self.sources.get(source).parent.as_ref()
    }

    pub fn children(&self, source: LanguageSource) -> &[LanguageId] {
        &self.sources.get(source).children
    }

    /// Candidate 1 of the precedence cascade.
    pub fn direct_citation(&self) -> Option<u64> {
        self.population_adjusted.or(self.population_cited)
    }

    pub fn population(&self) -> Option<u64> {
        self.population_estimate.map(|p| p.value)
    }

    pub fn population_source(&self) -> Option<PopulationSource> {
        self.population_estimate.map(|p| p.source)
    }
}

impl Entity for Language {
    const KIND: EntityKind = EntityKind::Language;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn name_display(&self) -> &str {
        &self.name_display
    }

    fn names(&self) -> &[String] {
        &self.names
    }
}
