//! Property-based tests for the graph pipeline
//!
//! 1. Locale populations never exceed their territory
//! 2. Containers hold the sum of their contents
//! 3. Arbitrary (cyclic) language trees terminate
//! 4. Builds are deterministic

use lingograph_graph::{build, PipelineConfig};
use lingograph_model::LanguageSource;
use lingograph_ingest::{CensusBatch, CensusRecord, LanguageRecord, RawDataset, TerritoryRecord};
use proptest::prelude::*;
use std::collections::BTreeMap;

const LANGUAGES: [&str; 4] = ["aaa", "bbb", "ccc", "ddd"];
const COUNTRIES: [&str; 4] = ["AA", "BB", "CC", "DD"];

// ============================================================================
// Strategies
// ============================================================================

/// Populations including zero, which means unknown.
fn population_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), 1u64..100_000]
}

/// Parent index per language; `None` for a root. Cycles are allowed.
fn parents_strategy() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec(prop::option::of(0usize..LANGUAGES.len()), LANGUAGES.len())
}

/// Speakers per (language, country), sometimes above any population.
fn speakers_strategy() -> impl Strategy<Value = Vec<Option<u64>>> {
    prop::collection::vec(
        prop::option::of(0u64..150_000),
        LANGUAGES.len() * COUNTRIES.len(),
    )
}

fn dataset(
    countries: &[u64],
    parents: &[Option<usize>],
    speakers: &[Option<u64>],
    census: &[u64],
) -> RawDataset {
    let mut territories = vec![
        TerritoryRecord {
            code: "001".into(),
            name: "World".into(),
            scope: "world".into(),
            contains: vec!["NO".into(), "SO".into()],
            ..TerritoryRecord::default()
        },
        TerritoryRecord {
            code: "NO".into(),
            name: "North".into(),
            scope: "continent".into(),
            contains: vec!["AA".into(), "BB".into()],
            ..TerritoryRecord::default()
        },
        TerritoryRecord {
            code: "SO".into(),
            name: "South".into(),
            scope: "continent".into(),
            contains: vec!["CC".into(), "DD".into()],
            ..TerritoryRecord::default()
        },
    ];
    for (code, population) in COUNTRIES.iter().zip(countries) {
        territories.push(TerritoryRecord {
            code: code.to_string(),
            name: code.to_string(),
            scope: "country".into(),
            population: Some(*population),
            ..TerritoryRecord::default()
        });
    }

    let languages = LANGUAGES
        .iter()
        .zip(parents)
        .map(|(code, parent)| LanguageRecord {
            code: code.to_string(),
            name: code.to_uppercase(),
            iso_parent: parent.map(|p| LANGUAGES[p].to_string()),
            ..LanguageRecord::default()
        })
        .collect();

    let mut locales = Vec::new();
    for (i, language) in LANGUAGES.iter().enumerate() {
        for (j, country) in COUNTRIES.iter().enumerate() {
            if let Some(count) = speakers[i * COUNTRIES.len() + j] {
                locales.push(vec![
                    format!("{language}_{country}"),
                    String::new(),
                    String::new(),
                    String::new(),
                    count.to_string(),
                    String::new(),
                ]);
            }
        }
    }

    let census_batches = vec![CensusBatch {
        censuses: COUNTRIES
            .iter()
            .zip(census)
            .map(|(country, estimate)| CensusRecord {
                id: format!("census-{country}"),
                territory: country.to_string(),
                languages: BTreeMap::from([("aaa".to_string(), *estimate)]),
                eligible_population: Some(100_000),
                ..CensusRecord::default()
            })
            .collect(),
        language_names: BTreeMap::new(),
    }];

    RawDataset {
        languages,
        locales,
        territories,
        census_batches,
        ..RawDataset::default()
    }
}

fn inputs() -> impl Strategy<Value = RawDataset> {
    (
        prop::collection::vec(population_strategy(), COUNTRIES.len()),
        parents_strategy(),
        speakers_strategy(),
        prop::collection::vec(0u64..200_000, COUNTRIES.len()),
    )
        .prop_map(|(countries, parents, speakers, census)| {
            dataset(&countries, &parents, &speakers, &census)
        })
}

// ============================================================================
// Invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn locales_never_exceed_their_territory(dataset in inputs()) {
        let complete = build(&dataset, PipelineConfig::default());
        let graph = complete.graph();
        for locale in graph.locales() {
            if let Some(percent) = locale.population_speaking_percent {
                prop_assert!((0.0..=100.0).contains(&percent));
            }
            let Some(territory) = locale.territory.as_ref().and_then(|t| graph.territory(t.as_str())) else {
                continue;
            };
            if territory.population == 0 {
                continue;
            }
            prop_assert!(locale.population_speaking.unwrap_or(0) <= territory.population);
            prop_assert!(locale.population().unwrap_or(0) <= territory.population);
        }
    }

    #[test]
    fn containers_hold_the_sum_of_their_contents(dataset in inputs()) {
        let complete = build(&dataset, PipelineConfig::default());
        let graph = complete.graph();
        for territory in graph.territories() {
            if territory.contains.is_empty() {
                continue;
            }
            let sum: u64 = territory
                .contains
                .iter()
                .filter_map(|id| graph.territory(id.as_str()))
                .map(|t| t.population)
                .sum();
            let expected = if sum > 0 { sum } else { territory.population_from_source };
            prop_assert_eq!(territory.population, expected);
        }
    }

    #[test]
    fn any_language_tree_resolves(dataset in inputs()) {
        let complete = build(&dataset, PipelineConfig::default());
        for language in complete.graph().languages() {
            if language.population_attested.is_some() {
                prop_assert!(language.population().is_some());
            }
            let has_children = !language.children(LanguageSource::Combined).is_empty();
            prop_assert_eq!(language.population_of_descendants.is_some(), has_children);
        }
    }

    #[test]
    fn builds_are_deterministic(dataset in inputs()) {
        let first = build(&dataset, PipelineConfig::default());
        let second = build(&dataset, PipelineConfig::default());
        prop_assert_eq!(
            serde_json::to_string(first.graph()).unwrap(),
            serde_json::to_string(second.graph()).unwrap()
        );
        prop_assert_eq!(first.diagnostics().len(), second.diagnostics().len());
    }
}
