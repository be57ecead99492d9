//! Integration tests for the complete Lingograph pipeline
//!
//! These tests drive the crates together:
//! - JSON dataset → ingest → entity graph
//! - Stage-by-stage typestate handles
//! - Hierarchy reporting and entity lookups on the finished graph
//!
//! Run with: cargo test --test integration_tests

use approx::assert_relative_eq;
use lingograph_graph::{build, DiagnosticKind, Hierarchy, PipelineConfig, RawGraph, Stage};
use lingograph_ingest::{dataset_from_json, load_dataset, IndigeneityRecord, RawDataset};
use lingograph_model::{EntityKind, LanguageSource, LocaleOrigin, PopulationSource};
use std::io::Write;

const MIDDLE_EARTH: &str = include_str!("../crates/lingograph-graph/tests/fixtures/middle_earth.json");

fn dataset() -> RawDataset {
    dataset_from_json(MIDDLE_EARTH).expect("fixture parses")
}

// ============================================================================
// Stage-by-stage
// ============================================================================

#[test]
fn test_stages_hand_over_in_order() {
    let dataset = dataset();

    let linked = RawGraph::from_dataset(&dataset, PipelineConfig::default()).link();
    assert_eq!(
        linked.graph().language("dor").unwrap().parent(LanguageSource::Iso).map(|p| p.as_str()),
        Some("sjn")
    );
    assert!(linked.graph().locale("sjn_ME").is_none());

    let synthesized = linked.synthesize();
    let regional = synthesized.graph().locale("sjn_ME").expect("regional locale");
    assert_eq!(regional.origin, LocaleOrigin::Regional);
    assert_eq!(synthesized.graph().locale("sjn_BE").unwrap().population_estimate, None);

    let reconciled = synthesized.reconcile(&dataset.census_batches);
    let sindarin = reconciled.graph().locale("sjn_BE").unwrap();
    assert_eq!(sindarin.census_records.len(), 1);
    assert_eq!(sindarin.census, None, "census wins are decided by aggregation");

    let aggregated = reconciled.aggregate();
    assert_eq!(aggregated.graph().locale("sjn_BE").unwrap().population(), Some(9300));
    assert_eq!(aggregated.graph().territory("ME").unwrap().population, 29000);

    let complete = aggregated.roll_up_territories();
    assert_eq!(complete.graph().territory("ME").unwrap().population, 30000);
    assert_eq!(complete.config().max_depth, 30);
}

#[test]
fn test_stage_run_matches_build() {
    let dataset = dataset();
    let mut staged = RawGraph::from_dataset(&dataset, PipelineConfig::default())
        .link()
        .synthesize()
        .reconcile(&dataset.census_batches)
        .aggregate()
        .roll_up_territories();
    staged.apply_indigeneity(&dataset.indigeneity);
    let built = build(&dataset, PipelineConfig::default());

    assert_eq!(
        serde_json::to_value(staged.graph()).unwrap(),
        serde_json::to_value(built.graph()).unwrap()
    );
    assert_eq!(staged.diagnostics().len(), built.diagnostics().len());
}

// ============================================================================
// Loading from disk
// ============================================================================

#[test]
fn test_load_from_file_and_build() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("middle_earth.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(MIDDLE_EARTH.as_bytes()).unwrap();
    drop(file);

    let dataset = load_dataset(&path).expect("dataset loads");
    let complete = build(&dataset, PipelineConfig::default());
    assert_eq!(complete.graph().territory("001").unwrap().population, 50000);
}

#[test]
fn test_config_file_drives_the_pipeline() {
    let config = PipelineConfig::from_json(r#"{ "synthesize_family": false }"#).unwrap();
    assert!(config.synthesize_regional);
    assert_eq!(config.max_depth, 30);

    let complete = build(&dataset(), config);
    let graph = complete.graph();
    assert!(graph.locale("sjn_ME").is_some());
    assert!(graph.locales().all(|l| l.origin != LocaleOrigin::Family));
}

// ============================================================================
// Finished graph
// ============================================================================

#[test]
fn test_population_figures_end_to_end() {
    let complete = build(&dataset(), PipelineConfig::default());
    let graph = complete.graph();

    let locale = graph.locale("sjn_BE").unwrap();
    assert_eq!(
        locale.population_estimate.map(|p| p.source),
        Some(PopulationSource::Census)
    );
    assert_relative_eq!(locale.population_speaking_percent.unwrap(), 77.5);

    let elvish = graph.language("elv").unwrap();
    assert_eq!(elvish.population_source(), Some(PopulationSource::Descendants));
    assert!(elvish.population_of_descendants.is_some());

    let sarati = graph.writing_system("Sart").unwrap();
    assert_eq!(sarati.population(), Some(401));
}

#[test]
fn test_entity_lookup_by_kind() {
    let complete = build(&dataset(), PipelineConfig::default());
    let graph = complete.graph();

    let json = graph.entity_json(EntityKind::Territory, "BE").unwrap();
    assert_eq!(json["name_display"], "Beleriand");
    assert!(graph.entity_json(EntityKind::Census, "be-fa-500").is_some());
    assert!(graph.entity_json(EntityKind::Language, "zzz").is_none());
    assert_eq!(graph.count(EntityKind::Census), 1);
}

#[test]
fn test_hierarchy_reporting() {
    let complete = build(&dataset(), PipelineConfig::default());
    let graph = complete.graph();

    assert_eq!(
        graph.ancestors(Hierarchy::Territory, "BE", 30),
        vec!["ME".to_string(), "001".to_string()]
    );
    assert_eq!(graph.depth_of(Hierarchy::Territory, "TE", 30), 2);
    assert_eq!(
        graph.parent_in(Hierarchy::WritingSystem, "Teng").as_deref(),
        Some("Sart")
    );

    let iso = Hierarchy::Language(LanguageSource::Iso);
    assert_eq!(graph.children_in(iso, "sjn"), vec!["dor".to_string()]);
    let counts = graph.descendant_counts(iso, "elv", 30);
    assert_eq!(counts.descendants, 3);
    assert_eq!(counts.depth, 2);

    // The looping pair terminates and reports only the other member.
    let looping = graph.descendant_counts(iso, "aaa", 30);
    assert_eq!(looping.descendants, 1);
}

#[test]
fn test_indigeneity_overlay_after_build() {
    let mut complete = build(&dataset(), PipelineConfig::default());

    let repeat = complete.apply_indigeneity(&dataset().indigeneity[..1]);
    assert_eq!(repeat, 0);
    assert!(complete
        .diagnostics()
        .of_kind(DiagnosticKind::DuplicateInput)
        .any(|d| d.stage == Stage::Indigeneity));

    let quenya = IndigeneityRecord {
        language: "qya".into(),
        territory: "AM".into(),
        indigenous: Some(true),
        historic_presence: None,
    };
    assert_eq!(complete.apply_indigeneity(&[quenya]), 2);
    assert_eq!(complete.graph().locale("qya_Teng_AM").unwrap().indigenous, Some(true));
    assert_eq!(complete.graph().locale("qya_AM").unwrap().historic_presence, None);
}

#[test]
fn test_diagnostics_are_advisory() {
    let complete = build(&dataset(), PipelineConfig::default());
    let (graph, diagnostics) = complete.into_parts();

    assert!(!diagnostics.is_empty());
    assert!(diagnostics.counts_by_kind()[&DiagnosticKind::UnresolvedReference] >= 2);
    assert!(graph.language("sjn").is_some());
    assert!(graph.locale("bad_row").is_none());
}
