//! Writing systems (scripts) and their descent hierarchy.

use crate::ids::{LanguageId, LocaleId, TerritoryId, WritingSystemId};
use crate::population::PopulationResolution;
use crate::{Entity, EntityKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WritingSystem {
    pub id: WritingSystemId,
    pub name_display: String,
    pub names: Vec<String>,
    pub name_full: Option<String>,
    pub name_endonym: Option<String>,
    pub unicode_version: Option<f64>,
    pub sample: Option<String>,
    pub right_to_left: bool,

    pub primary_language_code: Option<String>,
    pub territory_of_origin_code: Option<String>,
    pub parent_code: Option<String>,
    pub contains_codes: Vec<String>,

    pub primary_language: Option<LanguageId>,
    pub territory_of_origin: Option<TerritoryId>,
    pub parent: Option<WritingSystemId>,
    pub children: Vec<WritingSystemId>,
    pub contains: Vec<WritingSystemId>,
    pub languages: Vec<LanguageId>,
    pub locales: Vec<LocaleId>,

    /// Sum of the citations of languages and locales that name this system.
    pub population_upper_bound: u64,
    pub population_of_descendants: Option<u64>,
    pub population_estimate: Option<PopulationResolution>,
}

impl WritingSystem {
    pub fn new(id: impl Into<WritingSystemId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            names: vec![name.clone()],
            name_display: name,
            ..Self::default()
        }
    }

    pub fn population(&self) -> Option<u64> {
        self.population_estimate.map(|p| p.value)
    }
}

impl Entity for WritingSystem {
    const KIND: EntityKind = EntityKind::WritingSystem;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn name_display(&self) -> &str {
        &self.name_display
    }

    fn names(&self) -> &[String] {
        &self.names
    }
}
