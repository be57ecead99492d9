//! Territories and their containment scopes.

use crate::ids::{CensusId, LocaleId, TerritoryId};
use crate::{Entity, EntityKind, UnknownValue};
use serde::{Deserialize, Serialize};

/// Geographic scope, ordered from broadest to narrowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerritoryScope {
    World,
    Continent,
    Region,
    Subcontinent,
    #[default]
    Country,
    Dependency,
}

impl TerritoryScope {
    /// 0 for the world, increasing toward narrower scopes.
    pub fn rank(self) -> u8 {
        match self {
            TerritoryScope::World => 0,
            TerritoryScope::Continent => 1,
            TerritoryScope::Region => 2,
            TerritoryScope::Subcontinent => 3,
            TerritoryScope::Country => 4,
            TerritoryScope::Dependency => 5,
        }
    }

    /// Whether a territory of this scope may contain one of `child` scope.
    pub fn may_contain(self, child: TerritoryScope) -> bool {
        child.rank() >= self.rank()
    }

    /// Countries and dependencies: territories whose population is counted
    /// directly rather than summed from contained territories.
    pub fn is_leaf_scope(self) -> bool {
        matches!(self, TerritoryScope::Country | TerritoryScope::Dependency)
    }
}

impl std::str::FromStr for TerritoryScope {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "world" => Ok(Self::World),
            "continent" => Ok(Self::Continent),
            "region" => Ok(Self::Region),
            "subcontinent" => Ok(Self::Subcontinent),
            "country" => Ok(Self::Country),
            "dependency" => Ok(Self::Dependency),
            _ => Err(UnknownValue::new("territory scope", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    pub id: TerritoryId,
    pub name_display: String,
    pub names: Vec<String>,
    pub scope: TerritoryScope,

    /// Recomputed by the territory rollup; 0 means unknown.
    pub population: u64,
    pub population_from_source: u64,
    pub literacy_percent: Option<f64>,

    pub contains_codes: Vec<String>,
    pub sovereign_code: Option<String>,

    pub parent: Option<TerritoryId>,
    pub sovereign: Option<TerritoryId>,
    pub contains: Vec<TerritoryId>,
    pub dependents: Vec<TerritoryId>,
    pub locales: Vec<LocaleId>,
    pub censuses: Vec<CensusId>,
}

impl Territory {
    pub fn new(
        id: impl Into<TerritoryId>,
        name: impl Into<String>,
        scope: TerritoryScope,
        population: u64,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            names: vec![name.clone()],
            name_display: name,
            scope,
            population,
            population_from_source: population,
            ..Self::default()
        }
    }

    /// Governed by another territory, whose population already counts it.
    pub fn is_dependency(&self) -> bool {
        self.sovereign.is_some() || self.scope == TerritoryScope::Dependency
    }
}

impl Entity for Territory {
    const KIND: EntityKind = EntityKind::Territory;

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
    fn containment_follows_scope_order() {
        assert!(TerritoryScope::World.may_contain(TerritoryScope::Continent));
        assert!(TerritoryScope::Region.may_contain(TerritoryScope::Region));
        assert!(TerritoryScope::Country.may_contain(TerritoryScope::Dependency));
        assert!(!TerritoryScope::Country.may_contain(TerritoryScope::Region));
    }

    #[test]
    fn dependencies_by_scope_or_sovereign() {
        assert!(Territory::new("TE", "Tol Eressea", TerritoryScope::Dependency, 500).is_dependency());

        let mut governed = Territory::new("HA", "Harad", TerritoryScope::Country, 15600);
        assert!(!governed.is_dependency());
        governed.sovereign = Some("AM".into());
        assert!(governed.is_dependency());
    }
}
