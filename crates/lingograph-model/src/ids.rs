//! Typed entity identifiers.
//!
//! Every cross-entity reference in the graph is one of these newtypes, so a
//! territory code can never be passed where a language ID is expected.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

entity_id!(
    /// Language ID (the Combined code, e.g. `sjn`).
    LanguageId
);
entity_id!(
    /// Locale ID composed from its parts, e.g. `sjn_BE` or `sjn_Teng_BE`.
    LocaleId
);
entity_id!(
    /// Territory code (`001`, `150`, `BE`, ...).
    TerritoryId
);
entity_id!(
    /// Writing system code (`Teng`, `Latn`, ...).
    WritingSystemId
);
entity_id!(CensusId);
entity_id!(VariantTagId);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn ids_look_up_by_str() {
        let mut map = BTreeMap::new();
        map.insert(LanguageId::from("sjn"), 1);
        assert_eq!(map.get("sjn"), Some(&1));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = TerritoryId::from("BE");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"BE\"");
    }

    #[test]
    fn entities_default_to_empty_ids() {
        assert_eq!(LanguageId::default().as_str(), "");
        assert!(crate::Territory::default().id.as_str().is_empty());
        assert!(crate::Census::default().id.as_str().is_empty());
    }
}
