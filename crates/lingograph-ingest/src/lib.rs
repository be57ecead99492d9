//! Input boundary for Lingograph
//!
//! The file-parsing collaborator hands over one flat record per row
//! ([`records`]). This crate validates row shape, converts records into
//! unlinked entities ([`convert`]), and reports every dropped or degraded row
//! as an [`IngestIssue`]. Loading never fails because of bad data: a row that
//! cannot be used is dropped and the load continues.

use anyhow::{Context, Result};
use lingograph_model::{Language, Locale, Territory, UnknownValue, VariantTag, WritingSystem};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

pub mod convert;
pub mod records;

pub use convert::{
    census_from_record, language_from_record, locale_from_row, parse_population, split_subtitle,
    territory_from_record, variant_tag_from_record, writing_system_from_record,
};
pub use records::*;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IngestError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid number in `{field}`: `{value}`")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid code `{value}`")]
    InvalidCode { value: String },

    #[error("duplicate id `{id}`")]
    DuplicateId { id: String },

    #[error(transparent)]
    UnknownValue(#[from] UnknownValue),
}

/// Which record list a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordKind {
    Language,
    Locale,
    Territory,
    WritingSystem,
    VariantTag,
    Census,
}

/// A problem with one input row.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestIssue {
    pub record: RecordKind,
    /// Position of the row within its list.
    pub index: usize,
    pub error: IngestError,
    /// Whether the row was dropped (otherwise it was kept with defaults).
    pub dropped: bool,
}

/// Unlinked entities converted from a [`RawDataset`].
#[derive(Debug, Clone, Default)]
pub struct EntitySet {
    pub languages: Vec<Language>,
    pub locales: Vec<Locale>,
    pub territories: Vec<Territory>,
    pub writing_systems: Vec<WritingSystem>,
    pub variant_tags: Vec<VariantTag>,
    pub issues: Vec<IngestIssue>,
}

impl EntitySet {
    fn record_issue(&mut self, record: RecordKind, index: usize, error: IngestError, dropped: bool) {
        if dropped {
            tracing::warn!(?record, index, error = %error, "dropping input row");
        } else {
            tracing::debug!(?record, index, error = %error, "input row kept with defaults");
        }
        self.issues.push(IngestIssue {
            record,
            index,
            error,
            dropped,
        });
    }

    fn convert_all<R, T>(
        &mut self,
        record: RecordKind,
        rows: &[R],
        convert: impl Fn(&R) -> Result<(T, Vec<IngestError>), IngestError>,
        id_of: impl Fn(&T) -> String,
    ) -> Vec<T> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match convert(row) {
                Ok((entity, warnings)) => {
                    for warning in warnings {
                        self.record_issue(record, index, warning, false);
                    }
                    let id = id_of(&entity);
                    if !seen.insert(id.clone()) {
                        self.record_issue(record, index, IngestError::DuplicateId { id }, true);
                        continue;
                    }
                    out.push(entity);
                }
                Err(err) => self.record_issue(record, index, err, true),
            }
        }
        out
    }
}

fn no_warnings<T>(result: Result<T, IngestError>) -> Result<(T, Vec<IngestError>), IngestError> {
    result.map(|entity| (entity, Vec::new()))
}

/// Convert every row of `dataset` into an entity. Census batches and
/// indigeneity rows are consumed later by the graph pipeline.
pub fn build_entities(dataset: &RawDataset) -> EntitySet {
    let mut set = EntitySet::default();
    set.languages = set.convert_all(
        RecordKind::Language,
        &dataset.languages,
        language_from_record,
        |l| l.id.to_string(),
    );
    set.locales = set.convert_all(
        RecordKind::Locale,
        &dataset.locales,
        locale_from_row,
        |l| l.id.to_string(),
    );
    set.territories = set.convert_all(
        RecordKind::Territory,
        &dataset.territories,
        |r| no_warnings(territory_from_record(r)),
        |t| t.id.to_string(),
    );
    set.writing_systems = set.convert_all(
        RecordKind::WritingSystem,
        &dataset.writing_systems,
        |r| no_warnings(writing_system_from_record(r)),
        |w| w.id.to_string(),
    );
    set.variant_tags = set.convert_all(
        RecordKind::VariantTag,
        &dataset.variant_tags,
        |r| no_warnings(variant_tag_from_record(r)),
        |v| v.id.to_string(),
    );
    tracing::info!(
        languages = set.languages.len(),
        locales = set.locales.len(),
        territories = set.territories.len(),
        writing_systems = set.writing_systems.len(),
        variant_tags = set.variant_tags.len(),
        issues = set.issues.len(),
        "converted input records"
    );
    set
}

pub fn dataset_from_json(text: &str) -> Result<RawDataset> {
    serde_json::from_str(text).context("failed to parse dataset JSON")
}

pub fn load_dataset(path: &Path) -> Result<RawDataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    dataset_from_json(&text).with_context(|| format!("in {}", path.display()))
}
