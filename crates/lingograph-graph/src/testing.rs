//! Fixture builders shared by the unit tests.

use crate::diagnostics::Diagnostics;
use crate::store::EntityGraph;
use lingograph_model::{
    Language, Locale, LocaleCode, Territory, TerritoryScope, WritingSystem,
};

pub(crate) fn language(id: &str, name: &str) -> Language {
    Language::new(id, name)
}

pub(crate) fn territory(id: &str, name: &str, scope: TerritoryScope, population: u64) -> Territory {
    Territory::new(id, name, scope, population)
}

pub(crate) fn writing_system(id: &str, name: &str) -> WritingSystem {
    WritingSystem::new(id, name)
}

pub(crate) fn locale(code: &str, population: Option<u64>) -> Locale {
    let parsed = LocaleCode::parse(code).expect("fixture locale code");
    let mut locale = Locale::from_code(&parsed, "");
    locale.population_cited = population;
    locale.population_speaking = population;
    locale
}

/// Beleriand/Eriador/Harad under Middle-earth, Aman beside it, both under
/// the world; Sindarin and Quenya spoken across them.
pub(crate) fn middle_earth() -> EntityGraph {
    let mut graph = EntityGraph::default();

    let mut world = territory("001", "World", TerritoryScope::World, 50000);
    world.contains_codes = vec!["ME".into(), "AM".into()];
    let mut middle_earth = territory("ME", "Middle-earth", TerritoryScope::Continent, 30000);
    middle_earth.contains_codes = vec!["BE".into(), "ER".into(), "HA".into()];
    for t in [
        world,
        middle_earth,
        territory("AM", "Aman", TerritoryScope::Country, 20000),
        territory("BE", "Beleriand", TerritoryScope::Country, 12000),
        territory("ER", "Eriador", TerritoryScope::Country, 2400),
        territory("HA", "Harad", TerritoryScope::Country, 15600),
    ] {
        graph.territories.insert(t.id.clone(), t);
    }

    let mut elvish = language("elv", "Elvish");
    elvish.sources.iso.code = Some("elv".into());
    let mut sindarin = language("sjn", "Sindarin");
    sindarin.sources.combined.parent_code = Some("elv".into());
    sindarin.sources.iso.code = Some("sjn".into());
    sindarin.sources.iso.parent_code = Some("elv".into());
    let mut quenya = language("qya", "Quenya");
    quenya.sources.combined.parent_code = Some("elv".into());
    quenya.sources.iso.code = Some("qya".into());
    quenya.sources.iso.parent_code = Some("elv".into());
    for l in [elvish, sindarin, quenya] {
        graph.languages.insert(l.id.clone(), l);
    }

    for l in [
        locale("sjn_BE", Some(9000)),
        locale("sjn_ER", Some(600)),
        locale("qya_BE", Some(1000)),
        locale("qya_AM", Some(15000)),
    ] {
        graph.locales.insert(l.id.clone(), l);
    }
    graph
}

pub(crate) fn linked_middle_earth() -> (EntityGraph, Diagnostics) {
    let mut graph = middle_earth();
    let mut diagnostics = Diagnostics::new();
    crate::linker::link(&mut graph, &mut diagnostics);
    (graph, diagnostics)
}
