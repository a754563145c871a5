//! The authoritative shopping list state.
//!
//! `ItemStore` owns the active, manual and archived collections, the store
//! catalog, the store-assignment index and the removed-id set. Every
//! mutation writes the affected collections straight through to durable
//! storage. Write failures are logged and otherwise ignored; the in-memory
//! state stays authoritative for the rest of the session.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::assignments::{RemovedIds, StoreAssignments};
use crate::models::{is_real_store, Category, GroceryItem, NewItem, UNASSIGNED};
use crate::reconcile::{reconcile, Reconciliation};
use crate::storage::KeyValueStore;

/// Storage keys for persisted collections.
pub mod keys {
    /// Active and manual items
    pub const ITEMS: &str = "shopping.items";
    pub const ARCHIVED: &str = "shopping.archived";
    pub const STORES: &str = "shopping.stores";
    pub const ASSIGNMENTS: &str = "shopping.assignments";
    pub const REMOVED: &str = "shopping.removed";
}

#[derive(Debug, Default, Deserialize)]
struct PersistedItems {
    #[serde(default)]
    items: Vec<GroceryItem>,
    #[serde(default)]
    manual_items: Vec<GroceryItem>,
}

#[derive(Serialize)]
struct PersistedItemsRef<'a> {
    items: &'a [GroceryItem],
    manual_items: &'a [GroceryItem],
}

/// Result of `ItemStore::reset_list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Nothing was active; nothing changed.
    AlreadyEmpty,
    /// This many items were moved to the archive.
    Archived(usize),
}

pub struct ItemStore<S: KeyValueStore> {
    storage: S,
    active: Vec<GroceryItem>,
    manual: Vec<GroceryItem>,
    archived: Vec<GroceryItem>,
    stores: Vec<String>,
    assignments: StoreAssignments,
    removed: RemovedIds,
}

impl<S: KeyValueStore> ItemStore<S> {
    /// Creates an empty store without reading anything from `storage`.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            active: Vec::new(),
            manual: Vec::new(),
            archived: Vec::new(),
            stores: Vec::new(),
            assignments: StoreAssignments::new(),
            removed: RemovedIds::new(),
        }
    }

    /// Creates a store from whatever `storage` holds.
    pub fn load(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.reload();
        store
    }

    /// Replaces the in-memory state with what durable storage holds.
    ///
    /// Each collection is read independently. A key that is missing or
    /// fails to parse yields an empty collection.
    pub fn reload(&mut self) {
        let persisted: PersistedItems = read_value(&self.storage, keys::ITEMS);
        let mut archived: Vec<GroceryItem> = read_value(&self.storage, keys::ARCHIVED);

        let mut seen = HashSet::new();
        let active: Vec<GroceryItem> = persisted
            .items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        let manual: Vec<GroceryItem> = persisted
            .manual_items
            .into_iter()
            .filter_map(|m| active.iter().find(|a| a.id == m.id).cloned())
            .collect();
        for item in &mut archived {
            item.checked = true;
        }

        self.active = active;
        self.manual = manual;
        self.archived = archived;
        self.stores = read_value(&self.storage, keys::STORES);
        self.assignments = read_value(&self.storage, keys::ASSIGNMENTS);
        self.removed = read_value(&self.storage, keys::REMOVED);

        tracing::info!(
            "Loaded shopping list: {} active ({} manual), {} archived, {} stores",
            self.active.len(),
            self.manual.len(),
            self.archived.len(),
            self.stores.len()
        );
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    pub fn active(&self) -> &[GroceryItem] {
        &self.active
    }

    pub fn manual(&self) -> &[GroceryItem] {
        &self.manual
    }

    pub fn archived(&self) -> &[GroceryItem] {
        &self.archived
    }

    pub fn stores(&self) -> &[String] {
        &self.stores
    }

    pub fn assignments(&self) -> &StoreAssignments {
        &self.assignments
    }

    pub fn removed(&self) -> &RemovedIds {
        &self.removed
    }

    /// Finds an active item by id.
    pub fn get(&self, id: &str) -> Option<&GroceryItem> {
        self.active.iter().find(|item| item.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Flips the checked flag of an active item.
    ///
    /// The item stays in the active list; the next reconciliation archives
    /// it if it is still checked. Returns the new flag, or `None` if no
    /// active item has `id`.
    pub fn toggle_item(&mut self, id: &str) -> Option<bool> {
        let item = self.active.iter_mut().find(|item| item.id == id)?;
        item.checked = !item.checked;
        item.revision += 1;
        let updated = item.clone();

        if updated.checked {
            self.removed.insert(id);
        } else {
            self.removed.remove(id);
        }
        self.sync_manual_copy(&updated);

        tracing::debug!("Toggled '{}' (checked: {})", updated.name, updated.checked);
        self.flush_items();
        self.flush_removed();
        Some(updated.checked)
    }

    /// Moves an active item to the archive and remembers it as removed.
    ///
    /// Returns the archived item, or `None` if no active item has `id`.
    pub fn archive_item(&mut self, id: &str) -> Option<GroceryItem> {
        let index = self.active.iter().position(|item| item.id == id)?;
        let mut item = self.active.remove(index);
        item.checked = true;
        item.revision += 1;

        self.manual.retain(|m| m.id != id);
        self.removed.insert(id);
        self.archived.push(item.clone());

        tracing::debug!("Archived '{}'", item.name);
        self.flush_items();
        self.flush_archived();
        self.flush_removed();
        Some(item)
    }

    /// Adds a user-entered item to the active and manual lists.
    ///
    /// Duplicate names are allowed; every call creates a distinct item.
    pub fn add_item(&mut self, new_item: NewItem) -> GroceryItem {
        let name = new_item.name.trim().to_string();
        let id = self.manual_id(&name);
        let category = new_item
            .category
            .unwrap_or_else(|| Category::infer(&name));
        let store = new_item
            .store
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| UNASSIGNED.to_string());

        let item = GroceryItem {
            id,
            name,
            category,
            quantity: new_item.quantity,
            checked: false,
            meal: None,
            store: Some(store),
            department: new_item.department,
            revision: 0,
        };

        self.active.push(item.clone());
        self.manual.push(item.clone());

        tracing::debug!("Added manual item '{}' ({})", item.name, item.id);
        self.flush_items();
        item
    }

    /// Replaces the active item with the same id.
    ///
    /// The removed-id set follows the new `checked` flag. A real store on `item` becomes the remembered store for its name;
    /// an unassigned one clears it. Returns the previous item, or `None`
    /// (and changes nothing) if no active item has that id.
    pub fn update_item(&mut self, mut item: GroceryItem) -> Option<GroceryItem> {
        let slot = self.active.iter_mut().find(|a| a.id == item.id)?;
        item.revision = slot.revision.max(item.revision) + 1;
        let previous = std::mem::replace(slot, item.clone());

        self.sync_manual_copy(&item);

        if item.checked {
            self.removed.insert(item.id.as_str());
        } else {
            self.removed.remove(&item.id);
        }

        if is_real_store(item.store.as_deref()) {
            self.assignments.set(&item.name, item.store_label());
        } else {
            self.assignments.delete(&item.name);
        }

        tracing::debug!("Updated '{}' (store: {})", item.name, item.store_label());
        self.flush_items();
        self.flush_assignments();
        self.flush_removed();
        Some(previous)
    }

    /// Replaces the store catalog.
    ///
    /// Active items assigned to a store that is no longer listed fall back
    /// to `UNASSIGNED`, and remembered assignments to such stores are
    /// forgotten. Returns the number of items demoted.
    pub fn update_stores<I, T>(&mut self, stores: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut catalog: Vec<String> = Vec::new();
        for store in stores {
            let store = store.as_ref().trim();
            if store.is_empty() || store == UNASSIGNED {
                continue;
            }
            if !catalog.iter().any(|s| s == store) {
                catalog.push(store.to_string());
            }
        }

        let is_stale = |store: Option<&str>| {
            is_real_store(store) && !catalog.iter().any(|s| Some(s.as_str()) == store)
        };

        let mut demoted = 0;
        for item in self.active.iter_mut() {
            if is_stale(item.store.as_deref()) {
                item.store = Some(UNASSIGNED.to_string());
                item.revision += 1;
                demoted += 1;
            }
        }
        for item in self.manual.iter_mut() {
            if is_stale(item.store.as_deref()) {
                item.store = Some(UNASSIGNED.to_string());
                item.revision += 1;
            }
        }

        let stale_names: Vec<String> = self
            .assignments
            .iter()
            .filter(|(_, store)| is_stale(Some(*store)))
            .map(|(name, _)| name.to_string())
            .collect();
        for name in &stale_names {
            self.assignments.delete(name);
        }

        tracing::debug!(
            "Updated stores to {:?}: {} items demoted, {} assignments dropped",
            catalog,
            demoted,
            stale_names.len()
        );
        self.stores = catalog;
        self.flush_stores();
        self.flush_items();
        self.flush_assignments();
        demoted
    }

    /// Archives everything on the list and starts over.
    ///
    /// Moved items are re-keyed `archived-<millis>-<id>` so later
    /// regenerations can reuse their ids. Archived entries still carrying a
    /// live id are re-keyed the same way, since the removed-id set that kept
    /// those ids out of the list is cleared here.
    pub fn reset_list(&mut self) -> ResetOutcome {
        if self.active.is_empty() {
            return ResetOutcome::AlreadyEmpty;
        }

        let stamp = Utc::now().timestamp_millis();
        let mut seen = HashSet::new();
        let moved: Vec<GroceryItem> = self
            .active
            .drain(..)
            .chain(self.manual.drain(..))
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        let count = moved.len();

        for item in self.archived.iter_mut() {
            if !item.id.starts_with("archived-") {
                item.id = format!("archived-{}-{}", stamp, item.id);
            }
        }
        for mut item in moved {
            item.id = format!("archived-{}-{}", stamp, item.id);
            item.checked = true;
            self.archived.push(item);
        }
        self.removed.clear();

        tracing::info!("Reset shopping list: {} items archived", count);
        self.flush_items();
        self.flush_archived();
        self.flush_removed();
        ResetOutcome::Archived(count)
    }

    /// Merges derived candidates into the active list.
    ///
    /// Items the pass drops (checked, or removed in the same cycle) are
    /// archived rather than discarded.
    pub fn reconcile(&mut self, candidates: Vec<GroceryItem>) -> Reconciliation {
        let result = reconcile(
            &mut self.active,
            candidates,
            &self.assignments,
            &self.removed,
        );
        if result.is_noop() {
            return result;
        }

        for item in &result.dropped {
            let mut archived = item.clone();
            archived.checked = true;
            self.removed.insert(archived.id.clone());
            self.manual.retain(|m| m.id != archived.id);
            self.archived.push(archived);
        }

        self.flush_items();
        if !result.dropped.is_empty() {
            self.flush_archived();
            self.flush_removed();
        }
        result
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn sync_manual_copy(&mut self, item: &GroceryItem) {
        if let Some(manual) = self.manual.iter_mut().find(|m| m.id == item.id) {
            *manual = item.clone();
        }
    }

    /// Builds a `manual-<slug>-<millis>` id not used by any item.
    fn manual_id(&self, name: &str) -> String {
        let base = format!("manual-{}-{}", slugify(name), Utc::now().timestamp_millis());
        let taken = |id: &str| {
            self.active.iter().any(|i| i.id == id) || self.archived.iter().any(|i| i.id == id)
        };

        if !taken(&base) {
            return base;
        }
        let mut n = 2u32;
        loop {
            let id = format!("{}-{}", base, n);
            if !taken(&id) {
                return id;
            }
            n += 1;
        }
    }

    fn flush_items(&mut self) {
        let items = PersistedItemsRef {
            items: &self.active,
            manual_items: &self.manual,
        };
        write_value(&mut self.storage, keys::ITEMS, &items);
    }

    fn flush_archived(&mut self) {
        write_value(&mut self.storage, keys::ARCHIVED, &self.archived);
    }

    fn flush_stores(&mut self) {
        write_value(&mut self.storage, keys::STORES, &self.stores);
    }

    fn flush_assignments(&mut self) {
        write_value(&mut self.storage, keys::ASSIGNMENTS, &self.assignments);
    }

    fn flush_removed(&mut self) {
        write_value(&mut self.storage, keys::REMOVED, &self.removed);
    }
}

/// Lowercase alphanumeric slug with single dashes; "item" if nothing is left.
fn slugify(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "item".to_string()
    } else {
        slug
    }
}

fn read_value<S: KeyValueStore, T: DeserializeOwned + Default>(storage: &S, key: &str) -> T {
    match storage.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring malformed value for '{}': {}", key, e);
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!("Failed to read '{}': {}", key, e);
            T::default()
        }
    }
}

fn write_value<S: KeyValueStore, T: Serialize + ?Sized>(storage: &mut S, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Failed to serialize '{}': {}", key, e);
            return;
        }
    };
    if let Err(e) = storage.set(key, &raw) {
        tracing::warn!("Failed to persist '{}': {}", key, e);
    }
}
