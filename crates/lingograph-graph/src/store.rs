//! The entity arena.
//!
//! One ordered map per entity kind, keyed by typed ID. Every reference between
//! entities is an ID into these maps, so stages mutate records in place and
//! nothing is ever deep-copied. Ordered maps keep every pass deterministic.

use lingograph_ingest::EntitySet;
use lingograph_model::{
    Census, CensusId, EntityKind, Language, LanguageId, Locale, LocaleId, Territory, TerritoryId,
    VariantTag, VariantTagId, WritingSystem, WritingSystemId,
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityGraph {
    pub(crate) languages: BTreeMap<LanguageId, Language>,
    pub(crate) locales: BTreeMap<LocaleId, Locale>,
    pub(crate) territories: BTreeMap<TerritoryId, Territory>,
    pub(crate) writing_systems: BTreeMap<WritingSystemId, WritingSystem>,
    pub(crate) censuses: BTreeMap<CensusId, Census>,
    pub(crate) variant_tags: BTreeMap<VariantTagId, VariantTag>,
}

impl EntityGraph {
    pub fn from_entities(set: EntitySet) -> Self {
        let mut graph = Self::default();
        for language in set.languages {
            graph.languages.insert(language.id.clone(), language);
        }
        for locale in set.locales {
            graph.locales.insert(locale.id.clone(), locale);
        }
        for territory in set.territories {
            graph.territories.insert(territory.id.clone(), territory);
        }
        for system in set.writing_systems {
            graph.writing_systems.insert(system.id.clone(), system);
        }
        for tag in set.variant_tags {
            graph.variant_tags.insert(tag.id.clone(), tag);
        }
        graph
    }

    pub fn language(&self, id: &str) -> Option<&Language> {
        self.languages.get(id)
    }

    pub fn locale(&self, id: &str) -> Option<&Locale> {
        self.locales.get(id)
    }

    pub fn territory(&self, id: &str) -> Option<&Territory> {
        self.territories.get(id)
    }

    pub fn writing_system(&self, id: &str) -> Option<&WritingSystem> {
        self.writing_systems.get(id)
    }

    pub fn census(&self, id: &str) -> Option<&Census> {
        self.censuses.get(id)
    }

    pub fn variant_tag(&self, id: &str) -> Option<&VariantTag> {
        self.variant_tags.get(id)
    }

    pub fn languages(&self) -> impl Iterator<Item = &Language> {
        self.languages.values()
    }

    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.locales.values()
    }

    pub fn territories(&self) -> impl Iterator<Item = &Territory> {
        self.territories.values()
    }

    pub fn writing_systems(&self) -> impl Iterator<Item = &WritingSystem> {
        self.writing_systems.values()
    }

    pub fn censuses(&self) -> impl Iterator<Item = &Census> {
        self.censuses.values()
    }

    pub fn variant_tags(&self) -> impl Iterator<Item = &VariantTag> {
        self.variant_tags.values()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Language => self.languages.len(),
            EntityKind::Locale => self.locales.len(),
            EntityKind::Territory => self.territories.len(),
            EntityKind::WritingSystem => self.writing_systems.len(),
            EntityKind::Census => self.censuses.len(),
            EntityKind::VariantTag => self.variant_tags.len(),
        }
    }

    /// Entity of any kind as JSON, for display collaborators.
    pub fn entity_json(&self, kind: EntityKind, id: &str) -> Option<serde_json::Value> {
        let value = match kind {
            EntityKind::Language => serde_json::to_value(self.language(id)?),
            EntityKind::Locale => serde_json::to_value(self.locale(id)?),
            EntityKind::Territory => serde_json::to_value(self.territory(id)?),
            EntityKind::WritingSystem => serde_json::to_value(self.writing_system(id)?),
            EntityKind::Census => serde_json::to_value(self.census(id)?),
            EntityKind::VariantTag => serde_json::to_value(self.variant_tag(id)?),
        };
        value.ok()
    }

    /// Current population of a territory, `None` when unknown.
    pub(crate) fn territory_population(&self, id: &TerritoryId) -> Option<u64> {
        self.territories
            .get(id)
            .map(|t| t.population)
            .filter(|p| *p > 0)
    }

    /// Insert a locale and register it with its language and territory.
    pub(crate) fn attach_locale(&mut self, locale: Locale) {
        if let Some(language) = locale
            .language
            .as_ref()
            .and_then(|id| self.languages.get_mut(id))
        {
            if !language.locales.contains(&locale.id) {
                language.locales.push(locale.id.clone());
            }
        }
        if let Some(territory) = locale
            .territory
            .as_ref()
            .and_then(|id| self.territories.get_mut(id))
        {
            if !territory.locales.contains(&locale.id) {
                territory.locales.push(locale.id.clone());
            }
        }
        self.locales.insert(locale.id.clone(), locale);
    }
}
