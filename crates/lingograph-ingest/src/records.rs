//! Flat record shapes handed over by the file-parsing collaborator.
//!
//! One record per entity row. Everything is optional except the identifying
//! code, since the upstream catalogs leave most columns blank for most rows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageRecord {
    pub code: String,
    /// Genealogical catalog code (glottocode).
    pub alt_code: Option<String>,
    /// Published name, possibly carrying a parenthetical subtitle.
    pub name: String,
    pub endonym: Option<String>,
    pub modality: Option<String>,
    pub primary_script: Option<String>,
    pub vitality_iso: Option<String>,
    pub vitality_eth2013: Option<String>,
    pub vitality_eth2025: Option<String>,
    pub digital_support: Option<String>,
    pub population_adjusted: Option<u64>,
    pub population_cited: Option<u64>,
    pub iso_parent: Option<String>,
    pub glottolog_parent: Option<String>,
}

/// Field layout of a locale row.
pub const LOCALE_ROW_FIELDS: [&str; 6] = [
    "code",
    "name",
    "endonym",
    "population_source",
    "population_speaking",
    "official_status",
];

/// Locale rows arrive as raw field lists; see [`LOCALE_ROW_FIELDS`].
pub type LocaleRow = Vec<String>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WritingSystemRecord {
    pub code: String,
    pub name: String,
    pub name_full: Option<String>,
    pub endonym: Option<String>,
    pub unicode_version: Option<f64>,
    pub sample: Option<String>,
    pub right_to_left: bool,
    pub primary_language: Option<String>,
    pub territory_of_origin: Option<String>,
    pub parent: Option<String>,
    pub contains: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TerritoryRecord {
    pub code: String,
    pub name: String,
    pub names: Vec<String>,
    pub scope: String,
    pub population: Option<u64>,
    pub literacy_percent: Option<f64>,
    pub contains: Vec<String>,
    pub sovereign: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantTagRecord {
    pub code: String,
    pub name: String,
    pub prefixes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CensusRecord {
    pub id: String,
    pub name: String,
    pub territory: String,
    pub languages: BTreeMap<String, u64>,
    pub eligible_population: Option<u64>,
    pub responding_population: Option<u64>,
    pub collector_type: Option<String>,
    pub collector_name: Option<String>,
    pub year: Option<i32>,
    pub url: Option<String>,
}

/// Census records published together, plus language names discovered while
/// reading them (`code -> "Name A / Name B"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CensusBatch {
    pub censuses: Vec<CensusRecord>,
    pub language_names: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndigeneityRecord {
    pub language: String,
    pub territory: String,
    pub indigenous: Option<bool>,
    pub historic_presence: Option<bool>,
}

impl IndigeneityRecord {
    pub fn is_empty(&self) -> bool {
        self.indigenous.is_none() && self.historic_presence.is_none()
    }
}

/// Everything one load consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDataset {
    pub languages: Vec<LanguageRecord>,
    pub locales: Vec<LocaleRow>,
    pub writing_systems: Vec<WritingSystemRecord>,
    pub territories: Vec<TerritoryRecord>,
    pub variant_tags: Vec<VariantTagRecord>,
    pub census_batches: Vec<CensusBatch>,
    pub indigeneity: Vec<IndigeneityRecord>,
}
