//! Census reconciliation.
//!
//! Each census names a territory and a map of language codes to speaker
//! estimates. Estimates become [`CensusCitation`]s on the matching plain locale
//! `language_territory`. Existing citations are never replaced: a census whose
//! ID is already loaded is skipped as a whole.

use crate::diagnostics::{DiagnosticKind, Diagnostics, Stage};
use crate::store::EntityGraph;
use lingograph_ingest::{census_from_record, CensusBatch, IngestIssue, RecordKind};
use lingograph_model::population::percent_of;
use lingograph_model::{push_unique_name, Census, CensusCitation, LocaleCode, TerritoryId};

/// Totals for one reconciliation run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReconcileStats {
    pub censuses: usize,
    pub citations: usize,
    pub unmatched: usize,
    pub names_added: usize,
}

pub(crate) fn reconcile(
    graph: &mut EntityGraph,
    batches: &[CensusBatch],
    diagnostics: &mut Diagnostics,
) -> ReconcileStats {
    let mut stats = ReconcileStats::default();
    for batch in batches {
        for (index, record) in batch.censuses.iter().enumerate() {
            let census = match census_from_record(record) {
                Ok((census, warnings)) => {
                    let issues: Vec<IngestIssue> = warnings
                        .into_iter()
                        .map(|error| IngestIssue {
                            record: RecordKind::Census,
                            index,
                            error,
                            dropped: false,
                        })
                        .collect();
                    diagnostics.absorb_ingest(&issues);
                    census
                }
                Err(error) => {
                    diagnostics.absorb_ingest(&[IngestIssue {
                        record: RecordKind::Census,
                        index,
                        error,
                        dropped: true,
                    }]);
                    continue;
                }
            };
            if graph.censuses.contains_key(&census.id) {
                diagnostics.report(
                    Stage::Reconcile,
                    DiagnosticKind::DuplicateInput,
                    Some(census.id.as_str()),
                    "census already loaded; keeping the first",
                );
                continue;
            }
            attach_census(graph, census, diagnostics, &mut stats);
        }
        stats.names_added += merge_language_names(graph, batch, diagnostics);
    }
    tracing::info!(
        censuses = stats.censuses,
        citations = stats.citations,
        unmatched = stats.unmatched,
        names_added = stats.names_added,
        "reconciled census batches"
    );
    stats
}

fn attach_census(
    graph: &mut EntityGraph,
    mut census: Census,
    diagnostics: &mut Diagnostics,
    stats: &mut ReconcileStats,
) {
    let territory_id = TerritoryId::from(census.territory_code.as_str());
    match graph.territories.get_mut(&territory_id) {
        Some(territory) => {
            territory.censuses.push(census.id.clone());
            census.territory = Some(territory_id);
        }
        None => diagnostics.report(
            Stage::Reconcile,
            DiagnosticKind::UnresolvedReference,
            Some(census.id.as_str()),
            format!("census territory `{}` not found", census.territory_code),
        ),
    }

    let denominator = census.denominator();
    for (language, estimate) in &census.languages {
        let locale_id = LocaleCode::plain(language, &census.territory_code).to_id();
        let Some(locale) = graph.locales.get_mut(&locale_id) else {
            stats.unmatched += 1;
            diagnostics.report(
                Stage::Reconcile,
                DiagnosticKind::UnresolvedReference,
                Some(census.id.as_str()),
                format!("no locale `{}` for census estimate", locale_id),
            );
            continue;
        };
        locale.census_records.push(CensusCitation {
            census: census.id.clone(),
            population_estimate: *estimate,
            population_percent: denominator.and_then(|d| percent_of(*estimate, d)),
        });
        stats.citations += 1;
    }

    stats.censuses += 1;
    graph.censuses.insert(census.id.clone(), census);
}

/// Fold `code -> "Name A / Name B"` hints into the languages' alternate names.
fn merge_language_names(
    graph: &mut EntityGraph,
    batch: &CensusBatch,
    diagnostics: &mut Diagnostics,
) -> usize {
    let mut added = 0;
    for (code, names) in &batch.language_names {
        let Some(language) = graph.languages.get_mut(code.trim()) else {
            diagnostics.report(
                Stage::Reconcile,
                DiagnosticKind::UnresolvedReference,
                Some(code),
                "language named by census not found",
            );
            continue;
        };
        for name in names.split('/') {
            if push_unique_name(&mut language.names, name) {
                added += 1;
            }
        }
    }
    added
}
