//! Indigeneity overlay, applied to a finished graph.

use crate::diagnostics::{DiagnosticKind, Diagnostics, Stage};
use crate::store::EntityGraph;
use lingograph_ingest::IndigeneityRecord;
use lingograph_model::LocaleId;

/// Set the indigeneity flags on the locales of `record.language` at
/// `record.territory`. Returns how many locales changed.
pub(crate) fn apply(
    graph: &mut EntityGraph,
    records: &[IndigeneityRecord],
    diagnostics: &mut Diagnostics,
) -> usize {
    let mut applied = 0;
    for record in records {
        let subject = format!("{}_{}", record.language.trim(), record.territory.trim());
        if record.is_empty() {
            diagnostics.report(
                Stage::Indigeneity,
                DiagnosticKind::EmptyRecord,
                Some(&subject),
                "indigeneity row sets no flags",
            );
            continue;
        }
        let Some(language) = graph.languages.get(record.language.trim()) else {
            diagnostics.report(
                Stage::Indigeneity,
                DiagnosticKind::UnresolvedReference,
                Some(&subject),
                format!("language `{}` not found", record.language.trim()),
            );
            continue;
        };

        let territory = record.territory.trim();
        let targets: Vec<LocaleId> = language
            .locales
            .iter()
            .filter(|id| {
                graph
                    .locales
                    .get(*id)
                    .and_then(|l| l.territory.as_ref())
                    .is_some_and(|t| t.as_str() == territory)
            })
            .cloned()
            .collect();
        if targets.is_empty() {
            diagnostics.report(
                Stage::Indigeneity,
                DiagnosticKind::UnresolvedReference,
                Some(&subject),
                "no locale for language in territory",
            );
            continue;
        }
        let already_set = targets.iter().any(|id| {
            graph
                .locales
                .get(id)
                .is_some_and(|l| l.indigenous.is_some() || l.historic_presence.is_some())
        });
        if already_set {
            diagnostics.report(
                Stage::Indigeneity,
                DiagnosticKind::DuplicateInput,
                Some(&subject),
                "indigeneity already recorded; keeping the first",
            );
            continue;
        }

        for id in &targets {
            if let Some(locale) = graph.locales.get_mut(id) {
                locale.indigenous = record.indigenous;
                locale.historic_presence = record.historic_presence;
                applied += 1;
            }
        }
    }
    tracing::debug!(rows = records.len(), applied, "applied indigeneity overlay");
    applied
}
