//! # Lingograph graph engine
//!
//! Builds one linked entity graph out of catalogs that disagree with each
//! other, then derives the population figures none of them publish.
//!
//! The pipeline runs once per load, in a fixed order:
//!
//! 1. **link**: per-source language trees, territory containment, writing
//!    system descent, and locale references;
//! 2. **synthesize**: regional and family locales;
//! 3. **reconcile**: census citations on locales;
//! 4. **aggregate**: resolved and attested populations;
//! 5. **roll up**: territory population and literacy.
//!
//! Each stage hands over a typestate handle ([`stages`]), so the order cannot
//! be broken. Bad data never fails a load; it becomes a [`Diagnostic`].
//!
//! ```no_run
//! use lingograph_graph::{build, PipelineConfig};
//! use lingograph_ingest::load_dataset;
//!
//! let dataset = load_dataset("world.json".as_ref())?;
//! let complete = build(&dataset, PipelineConfig::default());
//! if let Some(language) = complete.graph().language("sjn") {
//!     println!("{}: {:?}", language.name_display, language.population());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod diagnostics;
pub mod hierarchy;
pub mod stages;
pub mod store;

mod aggregate;
mod census;
mod indigeneity;
mod linker;
mod synthesis;
mod territory_stats;
mod traversal;

#[cfg(test)]
mod testing;

pub use config::PipelineConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity, Stage};
pub use hierarchy::{DescendantCounts, Hierarchy};
pub use stages::{
    build, AggregatedGraph, CompleteGraph, LinkedGraph, RawGraph, ReconciledGraph,
    SynthesizedGraph,
};
pub use store::EntityGraph;
