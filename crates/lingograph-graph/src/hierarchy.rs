//! Descendant counts and depth queries over any of the graph's hierarchies.
//!
//! These walks are for reporting, so they never record diagnostics: a node is
//! visited at most once and expansion stops at the depth limit.

use crate::store::EntityGraph;
use ahash::AHashSet;
use lingograph_model::{CensusId, LanguageSource, LocaleId};
use serde::Serialize;
use std::collections::BTreeSet;

/// Which parent/child tree to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hierarchy {
    Language(LanguageSource),
    Territory,
    WritingSystem,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DescendantCounts {
    /// Distinct nodes below the starting node.
    pub descendants: usize,
    /// Longest path from the starting node down to a descendant.
    pub depth: usize,
    /// Distinct locales attached to the node or any descendant.
    pub locales: usize,
    /// Distinct censuses covering the node or any descendant.
    pub censuses: usize,
}

impl EntityGraph {
    pub fn children_in(&self, hierarchy: Hierarchy, id: &str) -> Vec<String> {
        match hierarchy {
            Hierarchy::Language(source) => self
                .language(id)
                .map(|l| l.children(source).iter().map(|c| c.to_string()).collect())
                .unwrap_or_default(),
            Hierarchy::Territory => self
                .territory(id)
                .map(|t| t.contains.iter().map(|c| c.to_string()).collect())
                .unwrap_or_default(),
            Hierarchy::WritingSystem => self
                .writing_system(id)
                .map(|w| w.children.iter().map(|c| c.to_string()).collect())
                .unwrap_or_default(),
        }
    }

    pub fn parent_in(&self, hierarchy: Hierarchy, id: &str) -> Option<String> {
        match hierarchy {
            Hierarchy::Language(source) => self.language(id)?.parent(source).map(|p| p.to_string()),
            Hierarchy::Territory => self.territory(id)?.parent.as_ref().map(|p| p.to_string()),
            Hierarchy::WritingSystem => {
                self.writing_system(id)?.parent.as_ref().map(|p| p.to_string())
            }
        }
    }

    /// Parent chain of `id`, nearest first.
    pub fn ancestors(&self, hierarchy: Hierarchy, id: &str, max_depth: usize) -> Vec<String> {
        let mut seen: AHashSet<String> = AHashSet::new();
        seen.insert(id.to_string());
        let mut chain = Vec::new();
        let mut current = self.parent_in(hierarchy, id);
        while let Some(parent) = current {
            if chain.len() >= max_depth || !seen.insert(parent.clone()) {
                break;
            }
            current = self.parent_in(hierarchy, &parent);
            chain.push(parent);
        }
        chain
    }

    /// Number of ancestors above `id`.
    pub fn depth_of(&self, hierarchy: Hierarchy, id: &str, max_depth: usize) -> usize {
        self.ancestors(hierarchy, id, max_depth).len()
    }

    pub fn descendant_counts(
        &self,
        hierarchy: Hierarchy,
        id: &str,
        max_depth: usize,
    ) -> DescendantCounts {
        let mut seen: AHashSet<String> = AHashSet::new();
        seen.insert(id.to_string());
        let mut locales: BTreeSet<&LocaleId> = BTreeSet::new();
        let mut censuses: BTreeSet<&CensusId> = BTreeSet::new();
        let mut counts = DescendantCounts::default();

        let mut stack = vec![(id.to_string(), 0usize)];
        while let Some((node, depth)) = stack.pop() {
            counts.depth = counts.depth.max(depth);
            self.collect_attachments(hierarchy, &node, &mut locales, &mut censuses);
            if depth >= max_depth {
                continue;
            }
            for child in self.children_in(hierarchy, &node) {
                if seen.insert(child.clone()) {
                    counts.descendants += 1;
                    stack.push((child, depth + 1));
                }
            }
        }
        counts.locales = locales.len();
        counts.censuses = censuses.len();
        counts
    }

    fn collect_attachments<'g>(
        &'g self,
        hierarchy: Hierarchy,
        id: &str,
        locales: &mut BTreeSet<&'g LocaleId>,
        censuses: &mut BTreeSet<&'g CensusId>,
    ) {
        let none: &'g [LocaleId] = &[];
        let attached = match hierarchy {
            Hierarchy::Language(_) => self.language(id).map_or(none, |l| l.locales.as_slice()),
            Hierarchy::Territory => match self.territory(id) {
                Some(territory) => {
                    censuses.extend(territory.censuses.iter());
                    territory.locales.as_slice()
                }
                None => none,
            },
            Hierarchy::WritingSystem => {
                self.writing_system(id).map_or(none, |w| w.locales.as_slice())
            }
        };
        for locale_id in attached {
            locales.insert(locale_id);
            if matches!(hierarchy, Hierarchy::Language(_)) {
                if let Some(locale) = self.locale(locale_id.as_str()) {
                    censuses.extend(locale.census_records.iter().map(|c| &c.census));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::linked_middle_earth;

    #[test]
    fn territory_counts() {
        let (graph, _) = linked_middle_earth();
        let counts = graph.descendant_counts(Hierarchy::Territory, "001", 30);
        assert_eq!(counts.descendants, 5);
        assert_eq!(counts.depth, 2);
        assert_eq!(counts.locales, 4);
        assert_eq!(graph.depth_of(Hierarchy::Territory, "BE", 30), 2);
        assert_eq!(
            graph.ancestors(Hierarchy::Territory, "BE", 30),
            vec!["ME".to_string(), "001".to_string()]
        );
    }

    #[test]
    fn language_counts_follow_the_chosen_source() {
        let (graph, _) = linked_middle_earth();
        let iso = graph.descendant_counts(Hierarchy::Language(LanguageSource::Iso), "elv", 30);
        assert_eq!(iso.descendants, 2);
        assert_eq!(iso.locales, 4);
        let glottolog =
            graph.descendant_counts(Hierarchy::Language(LanguageSource::Glottolog), "elv", 30);
        assert_eq!(glottolog.descendants, 0);
    }

    #[test]
    fn cyclic_parents_stop() {
        let (mut graph, _) = linked_middle_earth();
        graph.territories.get_mut("001").unwrap().parent = Some("BE".into());
        assert_eq!(graph.depth_of(Hierarchy::Territory, "BE", 30), 2);
        assert_eq!(graph.depth_of(Hierarchy::Territory, "BE", 1), 1);
    }
}
