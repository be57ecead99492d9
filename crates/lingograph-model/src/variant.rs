//! Registry variant subtags (`valencia`, `1901`, ...).

use crate::ids::{LocaleId, VariantTagId};
use crate::{Entity, EntityKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantTag {
    pub id: VariantTagId,
    pub name_display: String,
    pub names: Vec<String>,
    /// Language codes this variant may qualify.
    pub prefixes: Vec<String>,
    pub locales: Vec<LocaleId>,
}

impl VariantTag {
    pub fn new(id: impl Into<VariantTagId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            names: vec![name.clone()],
            name_display: name,
            ..Self::default()
        }
    }

    /// Whether the tag may qualify `language_code`. An empty prefix list
    /// places no restriction.
    pub fn applies_to(&self, language_code: &str) -> bool {
        self.prefixes.is_empty()
            || self
                .prefixes
                .iter()
                .any(|prefix| prefix.split(['-', '_']).next() == Some(language_code))
    }
}

impl Entity for VariantTag {
    const KIND: EntityKind = EntityKind::VariantTag;

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
