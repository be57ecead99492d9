//! Territory statistics rollup.
//!
//! A territory that contains others takes the sum of their recomputed
//! populations and their population-weighted literacy. Dependencies are left
//! out of every container's totals, whether listed under their sovereign or
//! under a geographic region; the sovereign's own figure already speaks for
//! them. Once territories are settled, locales are clamped again against
//! the new populations.

use crate::diagnostics::{DiagnosticKind, Diagnostics, Stage};
use crate::store::EntityGraph;
use crate::traversal::PathGuard;
use crate::PipelineConfig;
use ahash::AHashMap;
use lingograph_model::population::clamp_percent;
use lingograph_model::TerritoryId;

#[derive(Debug, Clone, Copy, PartialEq)]
struct TerritoryFigures {
    population: u64,
    literacy_percent: Option<f64>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RollupStats {
    pub recomputed: usize,
    pub clamped_locales: usize,
}

pub(crate) fn roll_up(
    graph: &mut EntityGraph,
    config: &PipelineConfig,
    diagnostics: &mut Diagnostics,
) -> RollupStats {
    let mut roller = Roller {
        graph,
        guard: PathGuard::new(config.max_depth),
        memo: AHashMap::new(),
        refusals: 0,
        diagnostics: &mut *diagnostics,
    };
    let ids: Vec<TerritoryId> = roller.graph.territories.keys().cloned().collect();
    let figures: Vec<(TerritoryId, TerritoryFigures)> = ids
        .into_iter()
        .map(|id| {
            let figures = roller.figures_from(&id);
            (id, figures)
        })
        .collect();

    let mut stats = RollupStats::default();
    for (id, figures) in figures {
        let Some(territory) = graph.territories.get_mut(&id) else {
            continue;
        };
        if territory.population != figures.population {
            stats.recomputed += 1;
        }
        territory.population = figures.population;
        territory.literacy_percent = figures.literacy_percent;
    }
    stats.clamped_locales = clamp_locales(graph, diagnostics);
    tracing::info!(
        recomputed = stats.recomputed,
        clamped_locales = stats.clamped_locales,
        "rolled up territory statistics"
    );
    stats
}

struct Roller<'a> {
    graph: &'a EntityGraph,
    guard: PathGuard<TerritoryId>,
    /// Only figures rolled up without a refusal below them.
    memo: AHashMap<TerritoryId, TerritoryFigures>,
    refusals: usize,
    diagnostics: &'a mut Diagnostics,
}

impl Roller<'_> {
    fn figures_from(&mut self, root: &TerritoryId) -> TerritoryFigures {
        if let Some(figures) = self.memo.get(root) {
            return *figures;
        }
        match self.guard.enter(root) {
            Ok(()) => {
                let figures = self.figures(root);
                self.guard.leave();
                figures
            }
            Err(_) => self.own_figures(root),
        }
    }

    /// Figures as loaded, ignoring anything contained.
    fn own_figures(&self, id: &TerritoryId) -> TerritoryFigures {
        self.graph
            .territories
            .get(id)
            .map(|t| TerritoryFigures {
                population: t.population_from_source,
                literacy_percent: t.literacy_percent,
            })
            .unwrap_or(TerritoryFigures {
                population: 0,
                literacy_percent: None,
            })
    }

    /// Caller has entered `id` on the guard.
    fn figures(&mut self, id: &TerritoryId) -> TerritoryFigures {
        if let Some(figures) = self.memo.get(id) {
            return *figures;
        }
        let own = self.own_figures(id);
        let Some(territory) = self.graph.territories.get(id) else {
            return own;
        };
        let children: Vec<TerritoryId> = territory
            .contains
            .iter()
            .filter(|child| {
                self.graph
                    .territories
                    .get(*child)
                    .map_or(true, |c| !c.is_dependency())
            })
            .cloned()
            .collect();
        if children.is_empty() {
            self.memo.insert(id.clone(), own);
            return own;
        }

        let before = self.refusals;
        let mut population: u64 = 0;
        let mut literate: f64 = 0.0;
        let mut weight: u64 = 0;
        for child in &children {
            if let Err(refusal) = self.guard.enter(child) {
                self.refusals += 1;
                self.guard.report(
                    self.diagnostics,
                    Stage::TerritoryRollup,
                    refusal,
                    child,
                    "territory containment",
                );
                continue;
            }
            let figures = self.figures(child);
            self.guard.leave();

            population = population.saturating_add(figures.population);
            if let Some(literacy) = figures.literacy_percent {
                if figures.population > 0 {
                    literate += literacy * figures.population as f64;
                    weight += figures.population;
                }
            }
        }

        let figures = TerritoryFigures {
            population: if population > 0 { population } else { own.population },
            literacy_percent: if weight > 0 {
                Some(clamp_percent(literate / weight as f64))
            } else {
                own.literacy_percent
            },
        };
        if self.refusals == before {
            self.memo.insert(id.clone(), figures);
        }
        figures
    }
}

/// Lower any locale population above its territory's recomputed population.
fn clamp_locales(graph: &mut EntityGraph, diagnostics: &mut Diagnostics) -> usize {
    let mut clamped = 0;
    for locale in graph.locales.values_mut() {
        let Some(limit) = locale
            .territory
            .as_ref()
            .and_then(|t| graph.territories.get(t))
            .map(|t| t.population)
            .filter(|p| *p > 0)
        else {
            continue;
        };
        let Some(speaking) = locale.population_speaking.filter(|s| *s > limit) else {
            continue;
        };
        locale.population_speaking = Some(limit);
        if let Some(estimate) = locale.population_estimate.as_mut() {
            estimate.value = estimate.value.min(limit);
        }
        if let Some(attested) = locale.population_attested.as_mut() {
            *attested = (*attested).min(limit);
        }
        locale.population_speaking_percent = Some(100.0);
        diagnostics.report(
            Stage::TerritoryRollup,
            DiagnosticKind::ValueClamped,
            Some(locale.id.as_str()),
            format!("population {} above territory population {}", speaking, limit),
        );
        clamped += 1;
    }
    clamped
}
