//! Depth-bounded walks over untrusted hierarchies.
//!
//! Each walk owns its own path set. A node shared by two branches of a DAG is
//! visited once per branch and never mistaken for a cycle; only a node that is
//! already on the current path is a back-edge.

use crate::diagnostics::{DiagnosticKind, Diagnostics, Stage};
use ahash::AHashSet;
use std::fmt::Display;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Refusal {
    Cycle,
    TooDeep,
}

pub(crate) struct PathGuard<K> {
    path: Vec<K>,
    on_path: AHashSet<K>,
    max_depth: usize,
}

impl<K: Clone + Eq + Hash + Display> PathGuard<K> {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            path: Vec::new(),
            on_path: AHashSet::new(),
            max_depth,
        }
    }

    /// Push `id` onto the path, unless that would close a cycle or pass the
    /// depth limit. Every successful `enter` must be paired with `leave`.
    pub(crate) fn enter(&mut self, id: &K) -> Result<(), Refusal> {
        if self.on_path.contains(id) {
            return Err(Refusal::Cycle);
        }
        if self.path.len() > self.max_depth {
            return Err(Refusal::TooDeep);
        }
        self.on_path.insert(id.clone());
        self.path.push(id.clone());
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        if let Some(id) = self.path.pop() {
            self.on_path.remove(&id);
        }
    }

    /// `a -> b -> c -> next`
    fn describe(&self, next: &K) -> String {
        let mut parts: Vec<String> = self.path.iter().map(|k| k.to_string()).collect();
        parts.push(next.to_string());
        parts.join(" -> ")
    }

    /// Record why `id` was refused.
    pub(crate) fn report(
        &self,
        diagnostics: &mut Diagnostics,
        stage: Stage,
        refusal: Refusal,
        id: &K,
        what: &str,
    ) {
        let subject = id.to_string();
        match refusal {
            Refusal::Cycle => diagnostics.report(
                stage,
                DiagnosticKind::CycleDetected,
                Some(&subject),
                format!("cycle in {}: {}", what, self.describe(id)),
            ),
            Refusal::TooDeep => diagnostics.report(
                stage,
                DiagnosticKind::DepthExceeded,
                Some(&subject),
                format!(
                    "{} deeper than {} levels; stopping at {}",
                    what, self.max_depth, subject
                ),
            ),
        }
    }
}
