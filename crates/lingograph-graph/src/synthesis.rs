//! Locale synthesis: locales the data implies but never publishes.
//!
//! - **Regional** locales roll a language's country-level presence up the
//!   territory containment chain (`sjn_BE` + `sjn_ER` → `sjn_ME` → `sjn_001`).
//! - **Family** locales roll member languages up the designated authority's
//!   language tree within one territory (`sjn_BE` + `qya_BE` → `elv_BE`).
//!
//! Both passes compute their totals from scratch and assign them, so running
//! a pass again over its own output yields the same figures. A pass only ever
//! updates locales carrying its own origin tag.

use crate::diagnostics::{Diagnostics, Stage};
use crate::linker::compose_locale_name;
use crate::store::EntityGraph;
use crate::traversal::PathGuard;
use crate::PipelineConfig;
use lingograph_model::population::percent_of;
use lingograph_model::{
    LanguageId, Locale, LocaleCode, LocaleOrigin, PopulationSourceCategory, TerritoryId,
};
use std::collections::BTreeMap;

pub(crate) fn synthesize(graph: &mut EntityGraph, config: &PipelineConfig, diagnostics: &mut Diagnostics) {
    if config.synthesize_regional {
        synthesize_regional(graph, config, diagnostics);
    }
    if config.synthesize_family {
        synthesize_family(graph, config, diagnostics);
    }
}

/// Counts of synthesized locales touched by one pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SynthesisStats {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

pub(crate) fn synthesize_regional(
    graph: &mut EntityGraph,
    config: &PipelineConfig,
    diagnostics: &mut Diagnostics,
) -> SynthesisStats {
    let mut sums: BTreeMap<(LanguageId, TerritoryId), u64> = BTreeMap::new();

    for locale in graph.locales.values() {
        if locale.origin != LocaleOrigin::Source || !locale.is_plain() {
            continue;
        }
        let (Some(language), Some(territory_id)) = (&locale.language, &locale.territory) else {
            continue;
        };
        let Some(territory) = graph.territories.get(territory_id) else {
            continue;
        };
        if !config.regional_seed_scopes.contains(&territory.scope) {
            continue;
        }
        let population = locale.population_speaking.unwrap_or(0);

        let mut guard = PathGuard::new(config.max_depth);
        if guard.enter(territory_id).is_err() {
            continue;
        }
        let mut ancestor = territory.parent.clone();
        while let Some(id) = ancestor {
            if let Err(refusal) = guard.enter(&id) {
                guard.report(diagnostics, Stage::Synthesize, refusal, &id, "territory containment");
                break;
            }
            *sums.entry((language.clone(), id.clone())).or_insert(0) += population;
            ancestor = graph.territories.get(&id).and_then(|t| t.parent.clone());
        }
    }

    let mut stats = SynthesisStats::default();
    for ((language, territory), sum) in sums {
        upsert(graph, &language, &territory, sum, LocaleOrigin::Regional, &mut stats);
    }
    tracing::info!(
        created = stats.created,
        updated = stats.updated,
        skipped = stats.skipped,
        "synthesized regional locales"
    );
    stats
}

pub(crate) fn synthesize_family(
    graph: &mut EntityGraph,
    config: &PipelineConfig,
    diagnostics: &mut Diagnostics,
) -> SynthesisStats {
    let source = config.family_source;
    let roots: Vec<LanguageId> = graph
        .languages
        .values()
        .filter(|l| l.parent(source).is_none() && !l.children(source).is_empty())
        .map(|l| l.id.clone())
        .collect();

    let mut planned: BTreeMap<(LanguageId, TerritoryId), u64> = BTreeMap::new();
    for root in &roots {
        let mut guard = PathGuard::new(config.max_depth);
        let mut walk = FamilyWalk {
            graph,
            config,
            guard: &mut guard,
            planned: &mut planned,
            diagnostics: &mut *diagnostics,
        };
        walk.visit(root);
    }

    let mut stats = SynthesisStats::default();
    for ((language, territory), sum) in planned {
        upsert(graph, &language, &territory, sum, LocaleOrigin::Family, &mut stats);
    }
    tracing::info!(
        source = %source,
        roots = roots.len(),
        created = stats.created,
        updated = stats.updated,
        skipped = stats.skipped,
        "synthesized family locales"
    );
    stats
}

struct FamilyWalk<'a> {
    graph: &'a EntityGraph,
    config: &'a PipelineConfig,
    guard: &'a mut PathGuard<LanguageId>,
    planned: &'a mut BTreeMap<(LanguageId, TerritoryId), u64>,
    diagnostics: &'a mut Diagnostics,
}

impl FamilyWalk<'_> {
    /// Population per territory that `id` and its descendants account for.
    fn visit(&mut self, id: &LanguageId) -> BTreeMap<TerritoryId, u64> {
        let Some(language) = self.graph.languages.get(id) else {
            return BTreeMap::new();
        };
        if let Err(refusal) = self.guard.enter(id) {
            self.guard
                .report(self.diagnostics, Stage::Synthesize, refusal, id, "language family tree");
            return BTreeMap::new();
        }

        let mut from_children: BTreeMap<TerritoryId, u64> = BTreeMap::new();
        for child in language.children(self.config.family_source) {
            for (territory, population) in self.visit(child) {
                *from_children.entry(territory).or_insert(0) += population;
            }
        }

        let own = self.own_presence(id);
        let mut presence = own.clone();
        for (territory, sum) in from_children {
            let sum = self.clamp_to(&territory, sum);
            if !own.contains_key(&territory) {
                self.planned.insert((id.clone(), territory.clone()), sum);
            }
            let entry = presence.entry(territory).or_insert(0);
            *entry = (*entry).max(sum);
        }

        self.guard.leave();
        presence
    }

    /// The language's own plain locales that are not family rollups.
    fn own_presence(&self, id: &LanguageId) -> BTreeMap<TerritoryId, u64> {
        let Some(language) = self.graph.languages.get(id) else {
            return BTreeMap::new();
        };
        language
            .locales
            .iter()
            .filter_map(|locale_id| self.graph.locales.get(locale_id))
            .filter(|locale| locale.origin != LocaleOrigin::Family && locale.is_plain())
            .filter_map(|locale| {
                Some((locale.territory.clone()?, locale.population_speaking.unwrap_or(0)))
            })
            .collect()
    }

    fn clamp_to(&self, territory: &TerritoryId, population: u64) -> u64 {
        match self.graph.territory_population(territory) {
            Some(limit) => population.min(limit),
            None => population,
        }
    }
}

/// Create the synthesized locale `language_territory`, or reset its total if
/// this pass created it earlier. Locales of any other origin are left alone.
fn upsert(
    graph: &mut EntityGraph,
    language: &LanguageId,
    territory: &TerritoryId,
    sum: u64,
    origin: LocaleOrigin,
    stats: &mut SynthesisStats,
) {
    let limit = graph.territory_population(territory);
    let population = limit.map_or(sum, |limit| sum.min(limit));
    let percent = limit.and_then(|limit| percent_of(population, limit));
    let id = LocaleCode::plain(language.as_str(), territory.as_str()).to_id();

    match graph.locales.get_mut(&id) {
        Some(existing) if existing.origin == origin => {
            existing.population_speaking = Some(population);
            existing.population_speaking_percent = percent;
            stats.updated += 1;
        }
        Some(_) => stats.skipped += 1,
        None => {
            let code = LocaleCode::plain(language.as_str(), territory.as_str());
            let mut locale = Locale::from_code(&code, "");
            locale.language = Some(language.clone());
            locale.territory = Some(territory.clone());
            locale.origin = origin;
            locale.population_source = PopulationSourceCategory::Aggregated;
            locale.population_speaking = Some(population);
            locale.population_speaking_percent = percent;
            locale.name_display = compose_locale_name(graph, &locale);
            locale.names = vec![locale.name_display.clone()];
            graph.attach_locale(locale);
            stats.created += 1;
        }
    }
}
