//! User intent that outlives individual item ids.
//!
//! `StoreAssignments` remembers which store an ingredient is bought at,
//! keyed by name so the preference survives the list being regenerated.
//! `RemovedIds` remembers which items the user took off the list so that
//! regeneration does not bring them back.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::normalize_name;

/// Normalized item name -> store label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreAssignments {
    entries: BTreeMap<String, String>,
}

impl StoreAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `name` to `store`, replacing any earlier assignment.
    pub fn set(&mut self, name: &str, store: impl Into<String>) {
        self.entries.insert(normalize_name(name), store.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&normalize_name(name)).map(String::as_str)
    }

    /// Removes the assignment for `name`. Returns the old store, if any.
    pub fn delete(&mut self, name: &str) -> Option<String> {
        self.entries.remove(&normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Ids of items the user explicitly removed from the active list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemovedIds {
    ids: BTreeSet<String>,
}

impl RemovedIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the id was not already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
