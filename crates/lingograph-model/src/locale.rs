//! Locales: a language in a place, optionally qualified by script and variants.

use crate::census::CensusCitation;
use crate::ids::{CensusId, LanguageId, LocaleId, TerritoryId, VariantTagId, WritingSystemId};
use crate::population::PopulationResolution;
use crate::{Entity, EntityKind, UnknownValue};
use serde::{Deserialize, Serialize};

/// How a locale came to exist in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocaleOrigin {
    /// Loaded verbatim from a source row.
    #[default]
    Source,
    /// Rolled up from country locales to a containing region.
    Regional,
    /// Rolled up from member languages to a family label in one territory.
    Family,
}

impl LocaleOrigin {
    pub fn is_synthesized(self) -> bool {
        !matches!(self, LocaleOrigin::Source)
    }
}

/// Where a locale's raw population figure was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PopulationSourceCategory {
    Official,
    Census,
    Study,
    Ethnologue,
    EducatedGuess,
    Aggregated,
    #[default]
    Unknown,
}

impl std::str::FromStr for PopulationSourceCategory {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "unknown" => Ok(Self::Unknown),
            "official" => Ok(Self::Official),
            "census" => Ok(Self::Census),
            "study" | "survey" => Ok(Self::Study),
            "ethnologue" => Ok(Self::Ethnologue),
            "guess" | "educated guess" | "educated_guess" => Ok(Self::EducatedGuess),
            "aggregated" => Ok(Self::Aggregated),
            _ => Err(UnknownValue::new("population source", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfficialStatus {
    Official,
    DeFactoOfficial,
    Recognized,
    OfficialRegional,
    RecognizedRegional,
}

impl std::str::FromStr for OfficialStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "official" => Ok(Self::Official),
            "de_facto_official" => Ok(Self::DeFactoOfficial),
            "recognized" => Ok(Self::Recognized),
            "official_regional" => Ok(Self::OfficialRegional),
            "recognized_regional" => Ok(Self::RecognizedRegional),
            _ => Err(UnknownValue::new("official status", s)),
        }
    }
}

/// The parts of a composite locale code (`lang[_Script][_TERR][_variant…]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleCode {
    pub language: String,
    pub script: Option<String>,
    pub territory: Option<String>,
    pub variants: Vec<String>,
}

impl LocaleCode {
    /// Split a composite code. Both `_` and `-` are accepted as separators.
    ///
    /// Returns `None` for an empty language part.
    pub fn parse(code: &str) -> Option<Self> {
        let mut parts = code.trim().split(['_', '-']).filter(|p| !p.is_empty());
        let language = parts.next()?.to_string();
        let mut parsed = LocaleCode {
            language,
            script: None,
            territory: None,
            variants: Vec::new(),
        };
        for part in parts {
            if parsed.script.is_none() && parsed.territory.is_none() && is_script_subtag(part) {
                parsed.script = Some(part.to_string());
            } else if parsed.territory.is_none() && is_territory_subtag(part) {
                parsed.territory = Some(part.to_string());
            } else {
                parsed.variants.push(part.to_ascii_lowercase());
            }
        }
        Some(parsed)
    }

    pub fn plain(language: &str, territory: &str) -> Self {
        Self {
            language: language.to_string(),
            script: None,
            territory: Some(territory.to_string()),
            variants: Vec::new(),
        }
    }

    /// Canonical locale ID for these parts.
    pub fn to_id(&self) -> LocaleId {
        let mut id = self.language.clone();
        for part in self
            .script
            .iter()
            .chain(self.territory.iter())
            .chain(self.variants.iter())
        {
            id.push('_');
            id.push_str(part);
        }
        LocaleId::new(id)
    }

    pub fn is_plain(&self) -> bool {
        self.script.is_none() && self.variants.is_empty()
    }
}

fn is_script_subtag(part: &str) -> bool {
    let mut chars = part.chars();
    part.len() == 4
        && chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_lowercase())
}

fn is_territory_subtag(part: &str) -> bool {
    (part.len() == 2 && part.chars().all(|c| c.is_ascii_uppercase()))
        || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Locale {
    pub id: LocaleId,
    pub name_display: String,
    pub names: Vec<String>,
    pub name_endonym: Option<String>,

    pub language_code: String,
    pub territory_code: Option<String>,
    pub script_code: Option<String>,
    pub variant_codes: Vec<String>,

    pub language: Option<LanguageId>,
    pub territory: Option<TerritoryId>,
    pub writing_system: Option<WritingSystemId>,
    pub variant_tags: Vec<VariantTagId>,

    pub official_status: Option<OfficialStatus>,
    pub population_source: PopulationSourceCategory,
    /// Figure as published, never modified after load.
    pub population_cited: Option<u64>,
    /// Working figure: raw at load, then synthesized or resolved.
    pub population_speaking: Option<u64>,
    pub population_speaking_percent: Option<f64>,
    pub population_estimate: Option<PopulationResolution>,
    pub population_attested: Option<u64>,

    pub census: Option<CensusId>,
    pub census_records: Vec<CensusCitation>,
    pub origin: LocaleOrigin,

    pub indigenous: Option<bool>,
    pub historic_presence: Option<bool>,
}

impl Locale {
    pub fn from_code(code: &LocaleCode, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: code.to_id(),
            names: if name.is_empty() { Vec::new() } else { vec![name.clone()] },
            name_display: name,
            language_code: code.language.clone(),
            territory_code: code.territory.clone(),
            script_code: code.script.clone(),
            variant_codes: code.variants.clone(),
            ..Self::default()
        }
    }

    /// A locale with neither script nor variant qualifiers.
    pub fn is_plain(&self) -> bool {
        self.script_code.is_none() && self.variant_codes.is_empty()
    }

    pub fn population(&self) -> Option<u64> {
        self.population_estimate
            .map(|p| p.value)
            .or(self.population_speaking)
    }

    /// Largest estimate among attached census citations.
    pub fn max_census_estimate(&self) -> Option<&CensusCitation> {
        self.census_records
            .iter()
            .max_by_key(|citation| citation.population_estimate)
    }

    /// `Language (Script, Territory, variant)` from the resolved part names.
    pub fn compose_display_name(
        language: &str,
        script: Option<&str>,
        territory: Option<&str>,
        variants: &[String],
    ) -> String {
        let qualifiers: Vec<&str> = script
            .into_iter()
            .chain(territory)
            .chain(variants.iter().map(String::as_str))
            .collect();
        if qualifiers.is_empty() {
            language.to_string()
        } else {
            format!("{} ({})", language, qualifiers.join(", "))
        }
    }
}

impl Entity for Locale {
    const KIND: EntityKind = EntityKind::Locale;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_composite_codes() {
        let code = LocaleCode::parse("sjn_Teng_BE_archaic").unwrap();
        assert_eq!(code.language, "sjn");
        assert_eq!(code.script.as_deref(), Some("Teng"));
        assert_eq!(code.territory.as_deref(), Some("BE"));
        assert_eq!(code.variants, vec!["archaic"]);
        assert_eq!(code.to_id().as_str(), "sjn_Teng_BE_archaic");
    }

    #[test]
    fn numeric_regions_are_territories() {
        let code = LocaleCode::parse("sjn-150").unwrap();
        assert_eq!(code.territory.as_deref(), Some("150"));
        assert!(code.is_plain());
        assert_eq!(code.to_id().as_str(), "sjn_150");
    }

    #[test]
    fn empty_code_is_rejected() {
        assert!(LocaleCode::parse("").is_none());
        assert!(LocaleCode::parse("__").is_none());
    }

    #[test]
    fn display_name_lists_qualifiers() {
        assert_eq!(
            Locale::compose_display_name("Sindarin", Some("Tengwar"), Some("Beleriand"), &[]),
            "Sindarin (Tengwar, Beleriand)"
        );
        assert_eq!(Locale::compose_display_name("Sindarin", None, None, &[]), "Sindarin");
    }
}
