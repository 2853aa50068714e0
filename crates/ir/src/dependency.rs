//! Creation-order dependencies between entities
//!
//! Maps each entity to the set of entities that must be created before it.
//! Both levels are ordered collections so iteration is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Entity name → prerequisite entity names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyMap {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity with no prerequisites (no-op if already present)
    pub fn register(&mut self, name: impl Into<String>) {
        self.edges.entry(name.into()).or_default();
    }

    /// Record that `from` must be created after `to`.
    ///
    /// `from` is registered if needed; `to` is not, so an edge to an
    /// unknown entity stays visible to the ordering check.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.edges.entry(from.into()).or_default().insert(to.into());
    }

    /// Prerequisites of an entity
    pub fn prerequisites(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Registered entity names in lexicographic order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// Entities whose prerequisites are all satisfied, in lexicographic order
    pub fn ready(&self) -> Vec<String> {
        self.edges
            .iter()
            .filter(|(_, prereqs)| prereqs.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Remove an entity from the map
    pub fn remove(&mut self, name: &str) -> Option<BTreeSet<String>> {
        self.edges.remove(name)
    }

    /// Drop the emitted entities from every remaining prerequisite set
    pub fn resolve(&mut self, emitted: &[String]) {
        for prereqs in self.edges.values_mut() {
            for name in emitted {
                prereqs.remove(name);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.edges.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
