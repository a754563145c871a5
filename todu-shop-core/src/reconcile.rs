//! Merges freshly derived candidates into the active list.
//!
//! The merge is additive: a candidate is only appended when no active item
//! has its id, so edits the user made to an existing item always survive.
//! Items the user removed are filtered both before and after the merge,
//! which keeps a toggle or archive made in the same cycle from being undone.

use std::collections::HashSet;

use crate::assignments::{RemovedIds, StoreAssignments};
use crate::models::{GroceryItem, UNASSIGNED};

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Ids appended to the active list, in order
    pub added: Vec<String>,
    /// Active items removed because they were checked or removed
    pub dropped: Vec<GroceryItem>,
}

impl Reconciliation {
    /// True if the pass left the active list untouched.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.dropped.is_empty()
    }
}

/// Reconciles `candidates` into `active`.
///
/// Running this twice with the same candidates, assignments and removed
/// set changes nothing on the second pass.
pub fn reconcile(
    active: &mut Vec<GroceryItem>,
    candidates: Vec<GroceryItem>,
    assignments: &StoreAssignments,
    removed: &RemovedIds,
) -> Reconciliation {
    let mut present: HashSet<String> = active.iter().map(|item| item.id.clone()).collect();
    let mut added = Vec::new();

    for mut candidate in candidates {
        if candidate.checked || removed.contains(&candidate.id) {
            continue;
        }
        if present.contains(&candidate.id) {
            continue;
        }

        let store = assignments
            .get(&candidate.name)
            .unwrap_or(UNASSIGNED)
            .to_string();
        candidate.store = Some(store);

        present.insert(candidate.id.clone());
        added.push(candidate.id.clone());
        active.push(candidate);
    }

    let (kept, dropped): (Vec<GroceryItem>, Vec<GroceryItem>) = active
        .drain(..)
        .partition(|item| !item.checked && !removed.contains(&item.id));
    *active = kept;

    if !added.is_empty() || !dropped.is_empty() {
        tracing::debug!(
            "Reconciled shopping list: {} added, {} dropped, {} active",
            added.len(),
            dropped.len(),
            active.len()
        );
    }

    Reconciliation { added, dropped }
}
