//! Source linking: turn raw codes into bidirectional references.
//!
//! Languages get one parent/children adjacency per authority; territories get
//! containment and sovereignty edges; writing systems get descent edges; and
//! locales get attached to their language, territory, script and variants.
//! No cycle checks happen here. Cycles are tolerated and caught by the
//! guarded walks of later stages.

use crate::diagnostics::{DiagnosticKind, Diagnostics, Stage};
use crate::store::EntityGraph;
use ahash::AHashMap;
use lingograph_model::population::percent_of;
use lingograph_model::{
    LanguageId, LanguageSource, Locale, LocaleId, TerritoryId, VariantTagId, WritingSystemId,
};

pub(crate) fn link(graph: &mut EntityGraph, diagnostics: &mut Diagnostics) {
    link_languages(graph, diagnostics);
    link_territories(graph, diagnostics);
    link_writing_systems(graph, diagnostics);
    link_locales(graph, diagnostics);
    refresh_locale_names(graph);
    tracing::info!(
        languages = graph.languages.len(),
        locales = graph.locales.len(),
        territories = graph.territories.len(),
        writing_systems = graph.writing_systems.len(),
        "linked source hierarchies"
    );
}

/// `code -> language` for one authority. Combined is keyed by ID.
fn source_dictionary(graph: &EntityGraph, source: LanguageSource) -> AHashMap<String, LanguageId> {
    graph
        .languages
        .values()
        .filter_map(|language| {
            let code = match source {
                LanguageSource::Combined => Some(language.id.to_string()),
                _ => language.source(source).code.clone(),
            }?;
            Some((code, language.id.clone()))
        })
        .collect()
}

/// Combined parents are copied from whichever authority placed the language,
/// so they may carry that authority's code rather than a language ID.
fn authority_lookup(
    dictionaries: &[(LanguageSource, AHashMap<String, LanguageId>)],
    code: &str,
) -> Option<LanguageId> {
    dictionaries
        .iter()
        .filter(|(source, _)| *source != LanguageSource::Combined)
        .find_map(|(_, dictionary)| dictionary.get(code).cloned())
}

fn link_languages(graph: &mut EntityGraph, diagnostics: &mut Diagnostics) {
    let dictionaries: Vec<(LanguageSource, AHashMap<String, LanguageId>)> = LanguageSource::ALL
        .into_iter()
        .map(|source| (source, source_dictionary(graph, source)))
        .collect();
    for (source, dictionary) in &dictionaries {
        let source = *source;
        let mut edges: Vec<(LanguageId, LanguageId)> = Vec::new();
        for language in graph.languages.values() {
            let Some(parent_code) = language.source(source).parent_code.as_deref() else {
                continue;
            };
            let parent = dictionary
                .get(parent_code)
                .cloned()
                .or_else(|| graph.languages.contains_key(parent_code).then(|| parent_code.into()))
                .or_else(|| match source {
                    LanguageSource::Combined => authority_lookup(&dictionaries, parent_code),
                    _ => None,
                });
            match parent {
                Some(parent) => edges.push((language.id.clone(), parent)),
                None => diagnostics.report(
                    Stage::Link,
                    DiagnosticKind::UnresolvedReference,
                    Some(language.id.as_str()),
                    format!("{} parent `{}` not found", source, parent_code),
                ),
            }
        }

        for (child, parent) in edges {
            if let Some(language) = graph.languages.get_mut(&child) {
                language.source_mut(source).parent = Some(parent.clone());
            }
            if let Some(language) = graph.languages.get_mut(&parent) {
                let children = &mut language.source_mut(source).children;
                if !children.contains(&child) {
                    children.push(child);
                }
            }
        }
    }
}

fn link_territories(graph: &mut EntityGraph, diagnostics: &mut Diagnostics) {
    let mut containment: Vec<(TerritoryId, TerritoryId)> = Vec::new();
    let mut sovereignty: Vec<(TerritoryId, TerritoryId)> = Vec::new();

    for territory in graph.territories.values() {
        for code in &territory.contains_codes {
            let Some(child) = graph.territories.get(code.as_str()) else {
                diagnostics.report(
                    Stage::Link,
                    DiagnosticKind::UnresolvedReference,
                    Some(territory.id.as_str()),
                    format!("contained territory `{}` not found", code),
                );
                continue;
            };
            if child.id == territory.id {
                diagnostics.report(
                    Stage::Link,
                    DiagnosticKind::CycleDetected,
                    Some(territory.id.as_str()),
                    "territory lists itself as contained",
                );
                continue;
            }
            if !territory.scope.may_contain(child.scope) {
                diagnostics.report(
                    Stage::Link,
                    DiagnosticKind::IllegalContainment,
                    Some(territory.id.as_str()),
                    format!(
                        "{:?} cannot contain {:?} `{}`",
                        territory.scope, child.scope, child.id
                    ),
                );
                continue;
            }
            containment.push((territory.id.clone(), child.id.clone()));
        }

        if let Some(code) = territory.sovereign_code.as_deref() {
            match graph.territories.get(code) {
                Some(sovereign) if sovereign.id != territory.id => {
                    sovereignty.push((territory.id.clone(), sovereign.id.clone()))
                }
                Some(_) => diagnostics.report(
                    Stage::Link,
                    DiagnosticKind::CycleDetected,
                    Some(territory.id.as_str()),
                    "territory is its own sovereign",
                ),
                None => diagnostics.report(
                    Stage::Link,
                    DiagnosticKind::UnresolvedReference,
                    Some(territory.id.as_str()),
                    format!("sovereign `{}` not found", code),
                ),
            }
        }
    }

    for (parent, child) in containment {
        let parent_rank = graph.territories[&parent].scope.rank();
        if let Some(container) = graph.territories.get_mut(&parent) {
            if !container.contains.contains(&child) {
                container.contains.push(child.clone());
            }
        }
        // The narrowest container becomes the parent region.
        let current_rank = graph.territories[&child]
            .parent
            .as_ref()
            .and_then(|id| graph.territories.get(id))
            .map(|t| t.scope.rank());
        if let Some(territory) = graph.territories.get_mut(&child) {
            if current_rank.map_or(true, |rank| parent_rank > rank) {
                territory.parent = Some(parent);
            }
        }
    }

    for (dependency, sovereign) in sovereignty {
        if let Some(territory) = graph.territories.get_mut(&dependency) {
            territory.sovereign = Some(sovereign.clone());
        }
        if let Some(territory) = graph.territories.get_mut(&sovereign) {
            if !territory.dependents.contains(&dependency) {
                territory.dependents.push(dependency);
            }
        }
    }
}

fn link_writing_systems(graph: &mut EntityGraph, diagnostics: &mut Diagnostics) {
    let mut descent: Vec<(WritingSystemId, WritingSystemId)> = Vec::new();
    let ids: Vec<WritingSystemId> = graph.writing_systems.keys().cloned().collect();

    for id in &ids {
        let system = &graph.writing_systems[id];
        let primary_language = match system.primary_language_code.as_deref() {
            Some(code) if graph.languages.contains_key(code) => Some(LanguageId::from(code)),
            Some(code) => {
                diagnostics.report(
                    Stage::Link,
                    DiagnosticKind::UnresolvedReference,
                    Some(id.as_str()),
                    format!("primary language `{}` not found", code),
                );
                None
            }
            None => None,
        };
        let origin = match system.territory_of_origin_code.as_deref() {
            Some(code) if graph.territories.contains_key(code) => Some(TerritoryId::from(code)),
            Some(code) => {
                diagnostics.report(
                    Stage::Link,
                    DiagnosticKind::UnresolvedReference,
                    Some(id.as_str()),
                    format!("territory of origin `{}` not found", code),
                );
                None
            }
            None => None,
        };
        if let Some(code) = system.parent_code.as_deref() {
            if graph.writing_systems.contains_key(code) {
                descent.push((WritingSystemId::from(code), id.clone()));
            } else {
                diagnostics.report(
                    Stage::Link,
                    DiagnosticKind::UnresolvedReference,
                    Some(id.as_str()),
                    format!("parent writing system `{}` not found", code),
                );
            }
        }
        let contains: Vec<WritingSystemId> = system
            .contains_codes
            .iter()
            .filter(|code| graph.writing_systems.contains_key(code.as_str()))
            .map(|code| WritingSystemId::from(code.as_str()))
            .collect();

        if let Some(system) = graph.writing_systems.get_mut(id) {
            system.primary_language = primary_language;
            system.territory_of_origin = origin;
            system.contains = contains;
        }
    }

    for (parent, child) in descent {
        if let Some(system) = graph.writing_systems.get_mut(&child) {
            system.parent = Some(parent.clone());
        }
        if let Some(system) = graph.writing_systems.get_mut(&parent) {
            if !system.children.contains(&child) {
                system.children.push(child);
            }
        }
    }

    // Declared primary scripts, which also bound the script's population.
    let scripts: Vec<(LanguageId, String, u64)> = graph
        .languages
        .values()
        .filter_map(|language| {
            let code = language.primary_script_code.clone()?;
            Some((language.id.clone(), code, language.direct_citation().unwrap_or(0)))
        })
        .collect();
    for (language_id, code, population) in scripts {
        let Some(system) = graph.writing_systems.get_mut(code.as_str()) else {
            diagnostics.report(
                Stage::Link,
                DiagnosticKind::UnresolvedReference,
                Some(language_id.as_str()),
                format!("primary script `{}` not found", code),
            );
            continue;
        };
        if !system.languages.contains(&language_id) {
            system.languages.push(language_id.clone());
        }
        system.population_upper_bound += population;
        let system_id = system.id.clone();
        if let Some(language) = graph.languages.get_mut(&language_id) {
            language.primary_writing_system = Some(system_id.clone());
            if !language.writing_systems.contains(&system_id) {
                language.writing_systems.push(system_id);
            }
        }
    }
}

struct LocaleLinks {
    id: LocaleId,
    language: Option<LanguageId>,
    territory: Option<TerritoryId>,
    writing_system: Option<WritingSystemId>,
    variant_tags: Vec<VariantTagId>,
    speaking: Option<u64>,
    percent: Option<f64>,
    /// Population to add to the script's upper bound.
    script_population: u64,
}

fn resolve_locale(graph: &EntityGraph, locale: &Locale, diagnostics: &mut Diagnostics) -> LocaleLinks {
    let subject = Some(locale.id.as_str());
    let language = if graph.languages.contains_key(locale.language_code.as_str()) {
        Some(LanguageId::from(locale.language_code.as_str()))
    } else {
        diagnostics.report(
            Stage::Link,
            DiagnosticKind::UnresolvedReference,
            subject,
            format!("language `{}` not found", locale.language_code),
        );
        None
    };
    let territory = locale.territory_code.as_deref().and_then(|code| {
        if graph.territories.contains_key(code) {
            Some(TerritoryId::from(code))
        } else {
            diagnostics.report(
                Stage::Link,
                DiagnosticKind::UnresolvedReference,
                subject,
                format!("territory `{}` not found", code),
            );
            None
        }
    });
    let writing_system = locale.script_code.as_deref().and_then(|code| {
        if graph.writing_systems.contains_key(code) {
            Some(WritingSystemId::from(code))
        } else {
            diagnostics.report(
                Stage::Link,
                DiagnosticKind::UnresolvedReference,
                subject,
                format!("writing system `{}` not found", code),
            );
            None
        }
    });
    let mut variant_tags = Vec::new();
    for code in &locale.variant_codes {
        match graph.variant_tags.get(code.as_str()) {
            Some(tag) => {
                if !tag.applies_to(&locale.language_code) {
                    diagnostics.report(
                        Stage::Link,
                        DiagnosticKind::UnknownValue,
                        subject,
                        format!("variant `{}` is not registered for `{}`", code, locale.language_code),
                    );
                }
                variant_tags.push(tag.id.clone());
            }
            None => diagnostics.report(
                Stage::Link,
                DiagnosticKind::UnresolvedReference,
                subject,
                format!("variant tag `{}` not found", code),
            ),
        }
    }

    // Every locale with a speaking figure gets a percent here, census or not:
    // censuses attach later, at reconciliation, and a census win overwrites
    // this figure during aggregation.
    let territory_population = territory
        .as_ref()
        .and_then(|id| graph.territory_population(id));
    let (speaking, percent) = match (locale.population_speaking, territory_population) {
        (Some(speaking), Some(population)) => {
            if speaking > population {
                diagnostics.report(
                    Stage::Link,
                    DiagnosticKind::ValueClamped,
                    subject,
                    format!("{} speakers exceed territory population {}", speaking, population),
                );
            }
            let speaking = speaking.min(population);
            (Some(speaking), percent_of(speaking, population))
        }
        (speaking, _) => (speaking, locale.population_speaking_percent),
    };

    // Counted once per language already when the script is its primary one.
    let primary_script = language
        .as_ref()
        .and_then(|id| graph.languages.get(id))
        .and_then(|l| l.primary_writing_system.as_ref());
    let script_population = match (&writing_system, locale.population_cited) {
        (Some(system), Some(population)) if primary_script != Some(system) => population,
        _ => 0,
    };

    LocaleLinks {
        id: locale.id.clone(),
        language,
        territory,
        writing_system,
        variant_tags,
        speaking,
        percent,
        script_population,
    }
}

fn link_locales(graph: &mut EntityGraph, diagnostics: &mut Diagnostics) {
    let links: Vec<LocaleLinks> = graph
        .locales
        .values()
        .map(|locale| resolve_locale(graph, locale, diagnostics))
        .collect();

    for link in links {
        if let Some(language) = link.language.as_ref().and_then(|id| graph.languages.get_mut(id)) {
            if !language.locales.contains(&link.id) {
                language.locales.push(link.id.clone());
            }
        }
        if let Some(territory) = link.territory.as_ref().and_then(|id| graph.territories.get_mut(id)) {
            if !territory.locales.contains(&link.id) {
                territory.locales.push(link.id.clone());
            }
        }
        if let Some(system) = link
            .writing_system
            .as_ref()
            .and_then(|id| graph.writing_systems.get_mut(id))
        {
            if !system.locales.contains(&link.id) {
                system.locales.push(link.id.clone());
            }
            system.population_upper_bound += link.script_population;
        }
        for tag in &link.variant_tags {
            if let Some(tag) = graph.variant_tags.get_mut(tag) {
                if !tag.locales.contains(&link.id) {
                    tag.locales.push(link.id.clone());
                }
            }
        }
        if let Some(locale) = graph.locales.get_mut(&link.id) {
            locale.language = link.language;
            locale.territory = link.territory;
            locale.writing_system = link.writing_system;
            locale.variant_tags = link.variant_tags;
            locale.population_speaking = link.speaking;
            locale.population_speaking_percent = link.percent;
        }
    }
}

/// Display name composed from the resolved parts.
pub(crate) fn compose_locale_name(graph: &EntityGraph, locale: &Locale) -> String {
    let language = locale
        .language
        .as_ref()
        .and_then(|id| graph.languages.get(id))
        .map(|l| l.name_display.as_str())
        .unwrap_or(locale.language_code.as_str());
    let script = locale
        .writing_system
        .as_ref()
        .and_then(|id| graph.writing_systems.get(id))
        .map(|w| w.name_display.as_str())
        .or(locale.script_code.as_deref());
    let territory = locale
        .territory
        .as_ref()
        .and_then(|id| graph.territories.get(id))
        .map(|t| t.name_display.as_str())
        .or(locale.territory_code.as_deref());
    let variants: Vec<String> = locale
        .variant_codes
        .iter()
        .map(|code| {
            graph
                .variant_tags
                .get(code.as_str())
                .map(|tag| tag.name_display.clone())
                .unwrap_or_else(|| code.clone())
        })
        .collect();
    Locale::compose_display_name(language, script, territory, &variants)
}

fn refresh_locale_names(graph: &mut EntityGraph) {
    let names: Vec<(LocaleId, String)> = graph
        .locales
        .values()
        .filter(|locale| locale.language.is_some())
        .map(|locale| (locale.id.clone(), compose_locale_name(graph, locale)))
        .collect();
    for (id, name) in names {
        if let Some(locale) = graph.locales.get_mut(&id) {
            lingograph_model::push_unique_name(&mut locale.names, &name);
            locale.name_display = name;
        }
    }
    for locale in graph.locales.values_mut() {
        if locale.name_display.is_empty() {
            locale.name_display = locale.id.to_string();
        }
    }
}
