//! Population resolution.
//!
//! Every locale, language, and writing system gets one resolved figure and
//! the candidate it came from. Candidates in order of precedence:
//!
//! 1. a direct citation for the entity (for synthesized locales, their rollup);
//! 2. locales only: the largest census estimate, when it beats the citation;
//! 3. languages only: the sum of their verbatim country-level locales;
//! 4. the sum over children of `resolved + 1`, walked to a bounded depth.
//!
//! Attested figures come from candidates 1 and 2 alone. Territories are left
//! to the territory rollup.

use crate::diagnostics::{Diagnostics, Stage};
use crate::store::EntityGraph;
use crate::traversal::PathGuard;
use crate::PipelineConfig;
use ahash::AHashMap;
use lingograph_model::population::percent_of;
use lingograph_model::{
    LanguageId, LocaleId, LocaleOrigin, PopulationResolution, PopulationSource, WritingSystemId,
};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::hash::Hash;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AggregateStats {
    pub locales: usize,
    pub census_wins: usize,
    pub languages: usize,
    pub writing_systems: usize,
}

pub(crate) fn aggregate(
    graph: &mut EntityGraph,
    config: &PipelineConfig,
    diagnostics: &mut Diagnostics,
) -> AggregateStats {
    let mut stats = AggregateStats::default();
    resolve_locales(graph, &mut stats);
    resolve_languages(graph, config, diagnostics, &mut stats);
    resolve_writing_systems(graph, config, diagnostics, &mut stats);
    tracing::info!(
        locales = stats.locales,
        census_wins = stats.census_wins,
        languages = stats.languages,
        writing_systems = stats.writing_systems,
        "resolved populations"
    );
    stats
}

// ============================================================================
// Locales
// ============================================================================

fn resolve_locales(graph: &mut EntityGraph, stats: &mut AggregateStats) {
    let limits: BTreeMap<LocaleId, Option<u64>> = graph
        .locales
        .values()
        .map(|l| {
            let limit = l.territory.as_ref().and_then(|t| graph.territory_population(t));
            (l.id.clone(), limit)
        })
        .collect();

    for locale in graph.locales.values_mut() {
        let limit = limits.get(&locale.id).copied().flatten();
        let direct = locale.population_speaking.map(|value| {
            let source = if locale.origin.is_synthesized() {
                PopulationSource::Synthesized
            } else {
                PopulationSource::Citation
            };
            PopulationResolution::new(value, source)
        });
        let census = locale
            .max_census_estimate()
            .filter(|c| direct.map_or(true, |d| c.population_estimate > d.value))
            .cloned();

        let resolution = match &census {
            Some(citation) => {
                stats.census_wins += 1;
                Some(PopulationResolution::new(
                    citation.population_estimate,
                    PopulationSource::Census,
                ))
            }
            None => direct,
        };
        let Some(mut resolution) = resolution else {
            locale.population_estimate = None;
            locale.population_attested = None;
            continue;
        };
        if let Some(limit) = limit {
            resolution.value = resolution.value.min(limit);
        }

        if let Some(citation) = census {
            locale.census = Some(citation.census.clone());
            locale.population_speaking_percent = limit
                .and_then(|limit| percent_of(resolution.value, limit))
                .or(citation.population_percent);
        }
        locale.population_speaking = Some(resolution.value);
        locale.population_estimate = Some(resolution);
        locale.population_attested = Some(resolution.value);
        stats.locales += 1;
    }
}

// ============================================================================
// Languages
// ============================================================================

fn resolve_languages(
    graph: &mut EntityGraph,
    config: &PipelineConfig,
    diagnostics: &mut Diagnostics,
    stats: &mut AggregateStats,
) {
    let from_locales: BTreeMap<LanguageId, u64> = graph
        .languages
        .values()
        .filter_map(|language| Some((language.id.clone(), sum_of_locales(graph, &language.id)?)))
        .collect();
    let attested_synthesized: BTreeMap<LanguageId, u64> = graph
        .languages
        .values()
        .filter_map(|language| {
            let best = language
                .locales
                .iter()
                .filter_map(|id| graph.locales.get(id))
                .filter(|l| l.origin.is_synthesized())
                .filter_map(|l| l.population_attested)
                .max()?;
            Some((language.id.clone(), best))
        })
        .collect();

    let source = config.descendant_source;
    let graph_ref: &EntityGraph = graph;
    let mut walk = DescendantSum {
        children: |id: &LanguageId| {
            graph_ref
                .languages
                .get(id)
                .map(|l| l.children(source).to_vec())
                .unwrap_or_default()
        },
        base: |id: &LanguageId| {
            let language = graph_ref.languages.get(id)?;
            language.direct_citation().or_else(|| from_locales.get(id).copied())
        },
        guard: PathGuard::new(config.max_depth),
        resolved: AHashMap::new(),
        sums: AHashMap::new(),
        refusals: 0,
        diagnostics,
        what: "language tree",
    };

    let ids: Vec<LanguageId> = graph_ref.languages.keys().cloned().collect();
    let mut descendants: BTreeMap<LanguageId, Option<u64>> = BTreeMap::new();
    for id in &ids {
        descendants.insert(id.clone(), walk.descendants_from(id));
    }

    for language in graph.languages.values_mut() {
        let of_descendants = descendants.get(&language.id).copied().flatten();
        let locales = from_locales.get(&language.id).copied();
        language.population_from_locales = locales;
        language.population_of_descendants = of_descendants;
        language.population_estimate = language
            .direct_citation()
            .map(|v| PopulationResolution::new(v, PopulationSource::Citation))
            .or_else(|| locales.map(|v| PopulationResolution::new(v, PopulationSource::Locales)))
            .or_else(|| {
                of_descendants.map(|v| PopulationResolution::new(v, PopulationSource::Descendants))
            });
        language.population_attested = language
            .direct_citation()
            .or_else(|| attested_synthesized.get(&language.id).copied());
        if language.population_estimate.is_some() {
            stats.languages += 1;
        }
    }
}

/// Verbatim plain locales at country or dependency scope, so nothing is
/// counted twice through a regional rollup.
fn sum_of_locales(graph: &EntityGraph, language: &LanguageId) -> Option<u64> {
    let figures: Vec<u64> = graph
        .languages
        .get(language)?
        .locales
        .iter()
        .filter_map(|id| graph.locales.get(id))
        .filter(|l| l.origin == LocaleOrigin::Source && l.is_plain())
        .filter(|l| {
            l.territory
                .as_ref()
                .and_then(|t| graph.territories.get(t))
                .is_some_and(|t| t.scope.is_leaf_scope())
        })
        .filter_map(|l| l.population())
        .collect();
    if figures.is_empty() {
        None
    } else {
        Some(figures.iter().sum())
    }
}

// ============================================================================
// Writing systems
// ============================================================================

fn resolve_writing_systems(
    graph: &mut EntityGraph,
    config: &PipelineConfig,
    diagnostics: &mut Diagnostics,
    stats: &mut AggregateStats,
) {
    let graph_ref: &EntityGraph = graph;
    let mut walk = DescendantSum {
        children: |id: &WritingSystemId| {
            graph_ref
                .writing_systems
                .get(id)
                .map(|w| w.children.clone())
                .unwrap_or_default()
        },
        base: |id: &WritingSystemId| {
            graph_ref
                .writing_systems
                .get(id)
                .map(|w| w.population_upper_bound)
                .filter(|bound| *bound > 0)
        },
        guard: PathGuard::new(config.max_depth),
        resolved: AHashMap::new(),
        sums: AHashMap::new(),
        refusals: 0,
        diagnostics,
        what: "writing system tree",
    };
    let ids: Vec<WritingSystemId> = graph_ref.writing_systems.keys().cloned().collect();
    let mut descendants: BTreeMap<WritingSystemId, Option<u64>> = BTreeMap::new();
    for id in &ids {
        descendants.insert(id.clone(), walk.descendants_from(id));
    }

    for system in graph.writing_systems.values_mut() {
        let of_descendants = descendants.get(&system.id).copied().flatten();
        system.population_of_descendants = of_descendants;
        system.population_estimate = if system.population_upper_bound > 0 {
            Some(PopulationResolution::new(
                system.population_upper_bound,
                PopulationSource::UpperBound,
            ))
        } else {
            of_descendants.map(|v| PopulationResolution::new(v, PopulationSource::Descendants))
        };
        if system.population_estimate.is_some() {
            stats.writing_systems += 1;
        }
    }
}

// ============================================================================
// Descendant sums
// ============================================================================

/// Memoized `Σ (resolved(child) + 1)` over one hierarchy. A child that would
/// close a cycle or pass the depth limit contributes nothing.
///
/// Only figures whose whole subtree was walked without a refusal are
/// memoized; anything cut short depends on the path it was reached by and is
/// recomputed under each root.
struct DescendantSum<'d, K, C, B> {
    children: C,
    /// Figure that takes precedence over descendants, if any.
    base: B,
    guard: PathGuard<K>,
    resolved: AHashMap<K, u64>,
    sums: AHashMap<K, Option<u64>>,
    /// Refusals seen so far, across all roots.
    refusals: usize,
    diagnostics: &'d mut Diagnostics,
    what: &'static str,
}

impl<K, C, B> DescendantSum<'_, K, C, B>
where
    K: Clone + Eq + Hash + Display,
    C: Fn(&K) -> Vec<K>,
    B: Fn(&K) -> Option<u64>,
{
    /// Descendant sum of `root`, `None` when it has no children.
    fn descendants_from(&mut self, root: &K) -> Option<u64> {
        if self.guard.enter(root).is_err() {
            return None;
        }
        let sum = self.descendants(root);
        self.guard.leave();
        sum
    }

    fn resolved(&mut self, id: &K) -> u64 {
        if let Some(value) = self.resolved.get(id) {
            return *value;
        }
        let before = self.refusals;
        let value = (self.base)(id)
            .or_else(|| self.descendants(id))
            .unwrap_or(0);
        if self.refusals == before {
            self.resolved.insert(id.clone(), value);
        }
        value
    }

    fn descendants(&mut self, id: &K) -> Option<u64> {
        if let Some(sum) = self.sums.get(id) {
            return *sum;
        }
        let children = (self.children)(id);
        if children.is_empty() {
            self.sums.insert(id.clone(), None);
            return None;
        }
        let before = self.refusals;
        let mut total: u64 = 0;
        for child in &children {
            if let Err(refusal) = self.guard.enter(child) {
                self.refusals += 1;
                self.guard
                    .report(self.diagnostics, Stage::Aggregate, refusal, child, self.what);
                continue;
            }
            total = total.saturating_add(self.resolved(child).saturating_add(1));
            self.guard.leave();
        }
        if self.refusals == before {
            self.sums.insert(id.clone(), Some(total));
        }
        Some(total)
    }
}
