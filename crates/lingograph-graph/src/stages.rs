//! Typestate handles for the pipeline.
//!
//! Each handle owns the graph between two stages and can only be built by the
//! stage before it, so the order
//! `RawGraph → LinkedGraph → SynthesizedGraph → ReconciledGraph →
//! AggregatedGraph → CompleteGraph` is checked by the compiler.

use crate::diagnostics::Diagnostics;
use crate::store::EntityGraph;
use crate::{aggregate, census, indigeneity, linker, synthesis, territory_stats, PipelineConfig};
use lingograph_ingest::{build_entities, CensusBatch, IndigeneityRecord, RawDataset};

#[derive(Debug, Clone)]
struct Pipeline {
    graph: EntityGraph,
    diagnostics: Diagnostics,
    config: PipelineConfig,
}

macro_rules! stage_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(Pipeline);

        impl $name {
            pub fn graph(&self) -> &EntityGraph {
                &self.0.graph
            }

            pub fn diagnostics(&self) -> &Diagnostics {
                &self.0.diagnostics
            }

            pub fn config(&self) -> &PipelineConfig {
                &self.0.config
            }

            pub fn into_parts(self) -> (EntityGraph, Diagnostics) {
                (self.0.graph, self.0.diagnostics)
            }
        }
    };
}

stage_handle!(
    /// Entities converted from input records, no references resolved.
    RawGraph
);
stage_handle!(
    /// References resolved; per-source hierarchies built.
    LinkedGraph
);
stage_handle!(
    /// Regional and family locales added.
    SynthesizedGraph
);
stage_handle!(
    /// Census citations attached to locales.
    ReconciledGraph
);
stage_handle!(
    /// Population estimates resolved for locales, languages, writing systems.
    AggregatedGraph
);
stage_handle!(
    /// Territory statistics rolled up; the graph is ready for lookups.
    CompleteGraph
);

impl RawGraph {
    pub fn from_dataset(dataset: &RawDataset, config: PipelineConfig) -> Self {
        let entities = build_entities(dataset);
        let mut diagnostics = Diagnostics::new();
        diagnostics.absorb_ingest(&entities.issues);
        Self(Pipeline {
            graph: EntityGraph::from_entities(entities),
            diagnostics,
            config,
        })
    }

    /// Start from an already assembled graph.
    pub fn from_graph(graph: EntityGraph, config: PipelineConfig) -> Self {
        Self(Pipeline {
            graph,
            diagnostics: Diagnostics::new(),
            config,
        })
    }

    pub fn link(mut self) -> LinkedGraph {
        let p = &mut self.0;
        linker::link(&mut p.graph, &mut p.diagnostics);
        LinkedGraph(self.0)
    }
}

impl LinkedGraph {
    pub fn synthesize(mut self) -> SynthesizedGraph {
        let p = &mut self.0;
        synthesis::synthesize(&mut p.graph, &p.config, &mut p.diagnostics);
        SynthesizedGraph(self.0)
    }
}

impl SynthesizedGraph {
    pub fn reconcile(mut self, batches: &[CensusBatch]) -> ReconciledGraph {
        let p = &mut self.0;
        census::reconcile(&mut p.graph, batches, &mut p.diagnostics);
        ReconciledGraph(self.0)
    }
}

impl ReconciledGraph {
    pub fn aggregate(mut self) -> AggregatedGraph {
        let p = &mut self.0;
        aggregate::aggregate(&mut p.graph, &p.config, &mut p.diagnostics);
        AggregatedGraph(self.0)
    }
}

impl AggregatedGraph {
    pub fn roll_up_territories(mut self) -> CompleteGraph {
        let p = &mut self.0;
        territory_stats::roll_up(&mut p.graph, &p.config, &mut p.diagnostics);
        CompleteGraph(self.0)
    }
}

impl CompleteGraph {
    /// Returns how many locales took flags from `records`.
    pub fn apply_indigeneity(&mut self, records: &[IndigeneityRecord]) -> usize {
        let p = &mut self.0;
        indigeneity::apply(&mut p.graph, records, &mut p.diagnostics)
    }
}

/// Run every stage over `dataset`, including its census batches and
/// indigeneity rows.
pub fn build(dataset: &RawDataset, config: PipelineConfig) -> CompleteGraph {
    let mut complete = RawGraph::from_dataset(dataset, config)
        .link()
        .synthesize()
        .reconcile(&dataset.census_batches)
        .aggregate()
        .roll_up_territories();
    complete.apply_indigeneity(&dataset.indigeneity);
    tracing::info!(
        languages = complete.graph().languages().count(),
        locales = complete.graph().locales().count(),
        territories = complete.graph().territories().count(),
        diagnostics = complete.diagnostics().len(),
        "graph built"
    );
    complete
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::middle_earth;

    #[test]
    fn stages_run_in_order() {
        let complete = RawGraph::from_graph(middle_earth(), PipelineConfig::default())
            .link()
            .synthesize()
            .reconcile(&[])
            .aggregate()
            .roll_up_territories();
        let graph = complete.graph();
        assert_eq!(graph.territory("001").unwrap().population, 50000);
        assert!(graph.locale("elv_BE").is_some());
        assert!(graph.language("sjn").unwrap().population().is_some());
    }

    #[test]
    fn empty_dataset_builds() {
        let complete = build(&RawDataset::default(), PipelineConfig::default());
        assert!(complete.diagnostics().is_empty());
        let (graph, _) = complete.into_parts();
        assert_eq!(graph.languages().count(), 0);
    }
}
