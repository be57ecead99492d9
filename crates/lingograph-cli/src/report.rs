//! Tabular helpers for the `load`, `top` and `diagnostics` commands.

use anyhow::{bail, Result};
use lingograph_graph::{DiagnosticKind, EntityGraph};
use lingograph_model::{EntityKind, PopulationResolution, PopulationSource};

pub const KINDS: [EntityKind; 6] = [
    EntityKind::Language,
    EntityKind::Locale,
    EntityKind::Territory,
    EntityKind::WritingSystem,
    EntityKind::Census,
    EntityKind::VariantTag,
];

pub struct Row {
    pub id: String,
    pub name: String,
    pub population: u64,
    /// `None` for territories, whose figure comes from containment.
    pub source: Option<PopulationSource>,
}

impl Row {
    fn resolved(id: &str, name: &str, estimate: Option<PopulationResolution>) -> Option<Self> {
        estimate.map(|resolution| Row {
            id: id.to_string(),
            name: name.to_string(),
            population: resolution.value,
            source: Some(resolution.source),
        })
    }
}

/// Entities of one kind by descending population, ties broken by ID.
pub fn ranked(graph: &EntityGraph, kind: EntityKind) -> Result<Vec<Row>> {
    let mut rows: Vec<Row> = match kind {
        EntityKind::Language => graph
            .languages()
            .filter_map(|l| Row::resolved(l.id.as_str(), &l.name_display, l.population_estimate))
            .collect(),
        EntityKind::Locale => graph
            .locales()
            .filter_map(|l| Row::resolved(l.id.as_str(), &l.name_display, l.population_estimate))
            .collect(),
        EntityKind::WritingSystem => graph
            .writing_systems()
            .filter_map(|w| Row::resolved(w.id.as_str(), &w.name_display, w.population_estimate))
            .collect(),
        EntityKind::Territory => graph
            .territories()
            .filter(|t| t.population > 0)
            .map(|t| Row {
                id: t.id.to_string(),
                name: t.name_display.clone(),
                population: t.population,
                source: None,
            })
            .collect(),
        EntityKind::Census | EntityKind::VariantTag => {
            bail!("{} entities carry no population to rank", kind)
        }
    };
    rows.sort_by(|a, b| b.population.cmp(&a.population).then_with(|| a.id.cmp(&b.id)));
    Ok(rows)
}

/// Kinds that point at broken structure rather than a bad value.
pub fn is_structural(kind: DiagnosticKind) -> bool {
    matches!(
        kind,
        DiagnosticKind::CycleDetected
            | DiagnosticKind::DepthExceeded
            | DiagnosticKind::IllegalContainment
    )
}

pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
