//! End-to-end runs of the pipeline over the Middle-earth dataset.

use approx::assert_relative_eq;
use lingograph_graph::{build, CompleteGraph, DiagnosticKind, Hierarchy, PipelineConfig, Stage};
use lingograph_ingest::{dataset_from_json, LanguageRecord, RawDataset};
use lingograph_model::{LanguageSource, LocaleOrigin, PopulationResolution, PopulationSource};

fn dataset() -> RawDataset {
    dataset_from_json(include_str!("fixtures/middle_earth.json")).expect("fixture parses")
}

fn complete() -> CompleteGraph {
    build(&dataset(), PipelineConfig::default())
}

#[test]
fn territory_populations_sum_transitively() {
    let complete = complete();
    let graph = complete.graph();
    assert_eq!(graph.territory("ME").unwrap().population, 30000);
    assert_eq!(graph.territory("001").unwrap().population, 50000);
    assert_eq!(graph.territory("001").unwrap().population_from_source, 48000);
    assert_eq!(graph.territory("AM").unwrap().population, 20000);
    assert_relative_eq!(
        graph.territory("ME").unwrap().literacy_percent.unwrap(),
        1_200_000.0 / 14_400.0,
        epsilon = 1e-9
    );
}

#[test]
fn census_estimate_beats_lower_citation() {
    let complete = complete();
    let locale = complete.graph().locale("sjn_BE").unwrap();
    assert_eq!(
        locale.population_estimate,
        Some(PopulationResolution::new(9300, PopulationSource::Census))
    );
    assert_eq!(locale.population_cited, Some(9000));
    assert_relative_eq!(locale.population_speaking_percent.unwrap(), 77.5);
    assert_eq!(locale.census.as_ref().map(|c| c.as_str()), Some("be-fa-500"));
    assert_eq!(locale.census_records.len(), 1, "duplicate census ignored");

    let quenya = complete.graph().locale("qya_BE").unwrap();
    assert_eq!(quenya.population(), Some(1000));
    assert_eq!(quenya.census, None);
}

#[test]
fn language_citation_beats_locale_sum() {
    let complete = complete();
    let doriathrin = complete.graph().language("dor").unwrap();
    assert_eq!(doriathrin.population(), Some(2500));
    assert_eq!(doriathrin.population_source(), Some(PopulationSource::Citation));
    assert_eq!(doriathrin.population_from_locales, Some(1800));
}

#[test]
fn languages_resolve_by_precedence() {
    let complete = complete();
    let graph = complete.graph();

    let sindarin = graph.language("sjn").unwrap();
    assert_eq!(
        sindarin.population_estimate,
        Some(PopulationResolution::new(9900, PopulationSource::Locales))
    );

    let elvish = graph.language("elv").unwrap();
    assert_eq!(elvish.population_source(), Some(PopulationSource::Descendants));
    assert_eq!(elvish.population(), Some(9901 + 16001));
    assert_eq!(elvish.population_attested, Some(25600));

    let avarin = graph.language("avr").unwrap();
    assert_eq!(avarin.population(), Some(701));
    assert_eq!(avarin.population_attested, None);
}

#[test]
fn synthesized_locales_are_tagged_and_named() {
    let complete = complete();
    let graph = complete.graph();

    let regional = graph.locale("sjn_ME").unwrap();
    assert_eq!(regional.origin, LocaleOrigin::Regional);
    assert_eq!(regional.population_speaking, Some(9600));
    assert_eq!(regional.name_display, "Sindarin (Middle-earth)");

    let family = graph.locale("elv_BE").unwrap();
    assert_eq!(family.origin, LocaleOrigin::Family);
    assert_eq!(family.population_speaking, Some(10000));
    assert!(graph.locale("sjn_BE").unwrap().origin == LocaleOrigin::Source);
    assert!(graph.locale("avr_BE").is_none());
}

#[test]
fn every_locale_respects_its_territory() {
    let complete = complete();
    let graph = complete.graph();
    for locale in graph.locales() {
        let Some(territory) = locale.territory.as_ref().and_then(|t| graph.territory(t.as_str()))
        else {
            continue;
        };
        if territory.population > 0 {
            assert!(
                locale.population_speaking.unwrap_or(0) <= territory.population,
                "{} exceeds {}",
                locale.id,
                territory.id
            );
        }
        if let Some(percent) = locale.population_speaking_percent {
            assert!((0.0..=100.0).contains(&percent), "{} percent {}", locale.id, percent);
        }
    }
}

#[test]
fn writing_systems_resolve() {
    let complete = complete();
    let graph = complete.graph();
    assert_eq!(
        graph.writing_system("Cirt").unwrap().population_estimate,
        Some(PopulationResolution::new(2500, PopulationSource::UpperBound))
    );
    assert_eq!(graph.writing_system("Teng").unwrap().population(), Some(400));
    assert_eq!(
        graph.writing_system("Sart").unwrap().population_estimate,
        Some(PopulationResolution::new(401, PopulationSource::Descendants))
    );
    assert_eq!(
        graph.language("qya").unwrap().primary_writing_system.as_ref().map(|w| w.as_str()),
        Some("Sart")
    );
}

#[test]
fn bad_input_becomes_diagnostics() {
    let complete = complete();
    let diagnostics = complete.diagnostics();
    assert!(diagnostics.has(DiagnosticKind::MalformedRow));
    assert!(diagnostics.has(DiagnosticKind::DuplicateInput));
    assert!(diagnostics
        .of_kind(DiagnosticKind::CycleDetected)
        .any(|d| d.stage == Stage::Aggregate));
    assert!(diagnostics
        .of_kind(DiagnosticKind::UnresolvedReference)
        .any(|d| d.message.contains("nan_BE")));
    assert!(diagnostics
        .of_kind(DiagnosticKind::UnresolvedReference)
        .any(|d| d.stage == Stage::Indigeneity));
}

#[test]
fn overlays_and_names_are_applied() {
    let complete = complete();
    let graph = complete.graph();
    assert_eq!(graph.locale("sjn_BE").unwrap().indigenous, Some(true));
    assert_eq!(graph.locale("sjn_BE").unwrap().historic_presence, Some(true));
    let names = &graph.language("sjn").unwrap().names;
    assert!(names.iter().any(|n| n == "Noldorin"));
    assert_eq!(names.iter().filter(|n| *n == "Sindarin").count(), 1);
    assert_eq!(
        graph.language("sjn").unwrap().name_subtitle.as_deref(),
        Some("Grey-elven")
    );
}

#[test]
fn source_trees_stay_separate() {
    let complete = complete();
    let graph = complete.graph();
    let dor = graph.language("dor").unwrap();
    assert_eq!(dor.parent(LanguageSource::Iso).map(|p| p.as_str()), Some("sjn"));
    assert_eq!(dor.parent(LanguageSource::Glottolog), None);
    assert_eq!(
        graph
            .descendant_counts(Hierarchy::Language(LanguageSource::Iso), "elv", 30)
            .descendants,
        3
    );
    assert_eq!(
        graph
            .descendant_counts(Hierarchy::Language(LanguageSource::Glottolog), "elv", 30)
            .descendants,
        2
    );
}

#[test]
fn disabling_synthesis_skips_it() {
    let config = PipelineConfig {
        synthesize_regional: false,
        synthesize_family: false,
        ..PipelineConfig::default()
    };
    let complete = build(&dataset(), config);
    assert!(complete
        .graph()
        .locales()
        .all(|l| l.origin == LocaleOrigin::Source));
}

#[test]
fn genealogy_only_languages_join_the_combined_tree() {
    let mut dataset = dataset();
    dataset.languages.push(LanguageRecord {
        code: "tel".into(),
        name: "Telerin".into(),
        glottolog_parent: Some("elvi1234".into()),
        population_cited: Some(300),
        ..LanguageRecord::default()
    });
    let complete = build(&dataset, PipelineConfig::default());
    let graph = complete.graph();

    let telerin = graph.language("tel").unwrap();
    assert_eq!(telerin.parent(LanguageSource::Combined).map(|p| p.as_str()), Some("elv"));
    assert_eq!(telerin.parent(LanguageSource::Glottolog).map(|p| p.as_str()), Some("elv"));
    assert!(!complete
        .diagnostics()
        .of_kind(DiagnosticKind::UnresolvedReference)
        .any(|d| d.subject.as_deref() == Some("tel")));
    assert_eq!(graph.language("elv").unwrap().population(), Some(9901 + 16001 + 301));
}
