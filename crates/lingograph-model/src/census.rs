//! Census surveys and the citations they attach to locales.

use crate::ids::{CensusId, TerritoryId};
use crate::{Entity, EntityKind, UnknownValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollectorType {
    Government,
    Study,
    Cldr,
    #[default]
    Other,
}

impl std::str::FromStr for CollectorType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "government" | "census" => Ok(Self::Government),
            "study" | "survey" => Ok(Self::Study),
            "cldr" => Ok(Self::Cldr),
            "" | "other" => Ok(Self::Other),
            _ => Err(UnknownValue::new("collector type", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Census {
    pub id: CensusId,
    pub name_display: String,
    pub names: Vec<String>,

    pub territory_code: String,
    pub territory: Option<TerritoryId>,
    /// Language code to estimated speaker count.
    pub languages: BTreeMap<String, u64>,
    pub eligible_population: Option<u64>,
    pub responding_population: Option<u64>,

    pub collector_type: CollectorType,
    pub collector_name: Option<String>,
    pub year: Option<i32>,
    pub url: Option<String>,
}

impl Census {
    /// Population the per-language estimates are measured against.
    pub fn denominator(&self) -> Option<u64> {
        self.responding_population
            .filter(|population| *population > 0)
            .or(self.eligible_population.filter(|population| *population > 0))
    }
}

impl Entity for Census {
    const KIND: EntityKind = EntityKind::Census;

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

/// One census's figure for one locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusCitation {
    pub census: CensusId,
    pub population_estimate: u64,
    pub population_percent: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responding_population_is_preferred_denominator() {
        let mut census = Census {
            eligible_population: Some(15000),
            responding_population: Some(12000),
            ..Census::default()
        };
        assert_eq!(census.denominator(), Some(12000));
        census.responding_population = Some(0);
        assert_eq!(census.denominator(), Some(15000));
        census.eligible_population = None;
        assert_eq!(census.denominator(), None);
    }
}
