//! Shopping list session.
//!
//! `ShoppingList` ties the pieces together: it holds the current meals and
//! pantry, regenerates the derived items whenever they change, routes user
//! edits to the item store, records undoable actions and reports outcomes
//! through a `Notifier`.
//!
//! Nothing is regenerated or mutated until `load` has read persisted
//! state. Regenerating against an unloaded list would derive items from an
//! empty state and overwrite what is on disk.

use std::collections::BTreeSet;

use crate::aggregate::aggregate;
use crate::assignments::StoreAssignments;
use crate::history::{Action, ActionData, ActionKind, ActionLog};
use crate::item_store::{ItemStore, ResetOutcome};
use crate::models::{normalize_name, GroceryItem, Meal, NewItem};
use crate::notify::{Notice, Notifier};
use crate::reconcile::Reconciliation;
use crate::storage::KeyValueStore;

/// Result of `undo` or `redo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutcome {
    /// There was nothing to undo or redo.
    Nothing,
    /// The action's effect was reverted or reapplied.
    Applied(ActionKind),
    /// The action is in the history but its effect cannot be replayed.
    Unsupported(ActionKind),
    /// The item the action touched is no longer on the list.
    Stale(ActionKind),
}

pub struct ShoppingList<S: KeyValueStore> {
    items: ItemStore<S>,
    history: ActionLog,
    meals: Vec<Meal>,
    pantry: BTreeSet<String>,
    initialized: bool,
    notifier: Box<dyn Notifier>,
}

impl<S: KeyValueStore> ShoppingList<S> {
    /// Creates an unloaded list over `storage`. Call `load` before use.
    pub fn new(storage: S, notifier: Box<dyn Notifier>) -> Self {
        Self {
            items: ItemStore::new(storage),
            history: ActionLog::default(),
            meals: Vec::new(),
            pantry: BTreeSet::new(),
            initialized: false,
            notifier,
        }
    }

    /// Creates a list over `storage` and loads it.
    pub fn open(storage: S, notifier: Box<dyn Notifier>) -> Self {
        let mut list = Self::new(storage, notifier);
        list.load();
        list
    }

    /// Replaces the undo history with one holding at most `limit` actions.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = ActionLog::new(limit);
        self
    }

    /// Reads persisted state and regenerates from the current inputs.
    pub fn load(&mut self) -> Option<Reconciliation> {
        self.items.reload();
        self.initialized = true;
        self.regenerate()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // -------------------------------------------------------------------------
    // Inputs
    // -------------------------------------------------------------------------

    /// Replaces the planned meals and regenerates.
    pub fn set_meals(&mut self, meals: Vec<Meal>) -> Option<Reconciliation> {
        self.meals = meals;
        self.regenerate()
    }

    /// Replaces the pantry inventory and regenerates.
    pub fn set_pantry<I, T>(&mut self, pantry: I) -> Option<Reconciliation>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.pantry = pantry
            .into_iter()
            .map(|p| normalize_name(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        self.regenerate()
    }

    /// Derives items from the current meals and pantry and merges them in.
    ///
    /// Returns `None` without touching anything if the list isn't loaded.
    pub fn regenerate(&mut self) -> Option<Reconciliation> {
        if !self.initialized {
            tracing::debug!("Skipping regeneration until the shopping list is loaded");
            return None;
        }

        let candidates = aggregate(&self.meals, &self.pantry);
        Some(self.items.reconcile(candidates))
    }

    // -------------------------------------------------------------------------
    // Recorded edits
    // -------------------------------------------------------------------------

    /// Flips an item's checked flag. Recorded for undo.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        if !self.ready("toggle") {
            return None;
        }
        let checked = self.items.toggle_item(id)?;
        self.history.record(Action::toggle(id, checked));
        Some(checked)
    }

    /// Replaces an item in place. Recorded for undo.
    ///
    /// Returns the item as stored, with its new revision.
    pub fn update(&mut self, item: GroceryItem) -> Option<GroceryItem> {
        if !self.ready("update") {
            return None;
        }
        let id = item.id.clone();
        let previous = self.items.update_item(item)?;
        let stored = self.items.get(&id)?.clone();
        self.history.record(Action::update(previous, stored.clone()));
        Some(stored)
    }

    /// Adds a manual item. Recorded for undo.
    pub fn add(&mut self, new_item: NewItem) -> Option<GroceryItem> {
        if !self.ready("add") {
            return None;
        }
        let item = self.items.add_item(new_item);
        self.history.record(Action::add(item.clone()));
        self.notifier.notify(Notice::success(
            "Item added",
            format!("{} was added to your list", item.name),
        ));
        Some(item)
    }

    /// Assigns an item to `store`. Shorthand for `update` with a new store.
    pub fn assign_store(&mut self, id: &str, store: &str) -> Option<GroceryItem> {
        let item = self.items.get(id)?.clone().with_store(store.trim());
        self.update(item)
    }

    // -------------------------------------------------------------------------
    // Unrecorded edits
    // -------------------------------------------------------------------------

    /// Moves an item to the archive.
    pub fn archive(&mut self, id: &str) -> Option<GroceryItem> {
        if !self.ready("archive") {
            return None;
        }
        let item = self.items.archive_item(id)?;
        self.notifier
            .notify(Notice::info("Item archived", item.name.clone()));
        Some(item)
    }

    /// Replaces the store catalog. Returns the number of items demoted.
    pub fn update_stores<I, T>(&mut self, stores: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        if !self.ready("update stores") {
            return 0;
        }
        let demoted = self.items.update_stores(stores);
        let description = match demoted {
            0 => "Store list saved".to_string(),
            1 => "1 item moved to Unassigned".to_string(),
            n => format!("{} items moved to Unassigned", n),
        };
        self.notifier
            .notify(Notice::info("Stores updated", description));
        demoted
    }

    /// Archives everything on the list.
    pub fn reset(&mut self) -> ResetOutcome {
        if !self.ready("reset") {
            return ResetOutcome::AlreadyEmpty;
        }
        let outcome = self.items.reset_list();
        let notice = match outcome {
            ResetOutcome::AlreadyEmpty => {
                Notice::info("List already empty", "There are no items to reset")
            }
            ResetOutcome::Archived(count) => Notice::success(
                "List reset",
                format!("{} item(s) moved to the archive", count),
            ),
        };
        self.notifier.notify(notice);
        outcome
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// Reverts the most recent recorded edit.
    ///
    /// Only updates can be reverted. Adds and toggles are moved to the redo
    /// stack like any other action, but their effect stays in place and a
    /// warning is reported.
    pub fn undo(&mut self) -> HistoryOutcome {
        let action = match self.history.undo() {
            Some(action) => action,
            None => {
                self.notifier
                    .notify(Notice::info("Nothing to undo", ""));
                return HistoryOutcome::Nothing;
            }
        };

        match action.data {
            ActionData::Update { before, .. } => self.restore(before, "Undone"),
            _ => self.unsupported("undo", action.kind()),
        }
    }

    /// Reapplies the most recently undone edit.
    pub fn redo(&mut self) -> HistoryOutcome {
        let action = match self.history.redo() {
            Some(action) => action,
            None => {
                self.notifier
                    .notify(Notice::info("Nothing to redo", ""));
                return HistoryOutcome::Nothing;
            }
        };

        match action.data {
            ActionData::Update { after, .. } => self.restore(after, "Redone"),
            _ => self.unsupported("redo", action.kind()),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    pub fn active(&self) -> &[GroceryItem] {
        self.items.active()
    }

    pub fn manual(&self) -> &[GroceryItem] {
        self.items.manual()
    }

    pub fn archived(&self) -> &[GroceryItem] {
        self.items.archived()
    }

    pub fn stores(&self) -> &[String] {
        self.items.stores()
    }

    pub fn assignments(&self) -> &StoreAssignments {
        self.items.assignments()
    }

    pub fn get(&self, id: &str) -> Option<&GroceryItem> {
        self.items.get(id)
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn pantry(&self) -> &BTreeSet<String> {
        &self.pantry
    }

    pub fn item_store(&self) -> &ItemStore<S> {
        &self.items
    }

    pub fn into_storage(self) -> S {
        self.items.into_storage()
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn ready(&self, operation: &str) -> bool {
        if !self.initialized {
            tracing::warn!("Ignoring {} before the shopping list is loaded", operation);
        }
        self.initialized
    }

    fn restore(&mut self, item: GroceryItem, title: &str) -> HistoryOutcome {
        let name = item.name.clone();
        if self.items.update_item(item).is_none() {
            self.notifier.notify(Notice::info(
                "Nothing to restore",
                format!("{} is no longer on the list", name),
            ));
            return HistoryOutcome::Stale(ActionKind::Update);
        }
        self.notifier
            .notify(Notice::info(title, format!("Restored {}", name)));
        HistoryOutcome::Applied(ActionKind::Update)
    }

    fn unsupported(&self, verb: &str, kind: ActionKind) -> HistoryOutcome {
        self.notifier.notify(Notice::warning(
            format!("Cannot {}", verb),
            format!("{} actions can't be replayed; the list was left as is", kind),
        ));
        HistoryOutcome::Unsupported(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::candidate_id;
    use crate::models::{Ingredient, UNASSIGNED};
    use crate::notify::{LogNotifier, RecordingNotifier, Severity};
    use crate::storage::{DocumentStore, MemoryStore};
    use tempfile::TempDir;

    fn meals() -> Vec<Meal> {
        vec![
            Meal::new("Pancakes").with_ingredients(vec![
                Ingredient::new("Milk", 1.0, "cup"),
                Ingredient::new("Eggs", 2.0, ""),
                Ingredient::new("Flour", 2.0, "cups"),
            ]),
            Meal::new("Omelette").with_ingredients(vec![
                Ingredient::new("eggs", 3.0, ""),
                Ingredient::new("Cheddar", 50.0, "g"),
            ]),
        ]
    }

    fn loaded() -> (ShoppingList<MemoryStore>, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let mut list = ShoppingList::open(MemoryStore::new(), Box::new(notifier.clone()));
        list.set_meals(meals());
        (list, notifier)
    }

    fn ids(items: &[GroceryItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    fn stores(items: &[GroceryItem]) -> Vec<Option<String>> {
        items.iter().map(|i| i.store.clone()).collect()
    }

    #[test]
    fn test_regeneration_is_suppressed_until_loaded() {
        let mut storage = MemoryStore::new();
        storage
            .set("shopping.stores", r#"["Store A"]"#)
            .unwrap();
        let mut list = ShoppingList::new(storage, Box::new(RecordingNotifier::new()));

        assert_eq!(list.set_meals(meals()), None);
        assert_eq!(list.set_pantry(["flour"]), None);
        assert!(list.active().is_empty());
        assert_eq!(list.add(NewItem::new("Soap")), None);
        assert_eq!(list.item_store().storage().len(), 1);

        let result = list.load().unwrap();
        assert_eq!(result.added.len(), 3);
        assert_eq!(list.stores(), &["Store A".to_string()]);
    }

    #[test]
    fn test_regeneration_is_idempotent() {
        let (mut list, _) = loaded();
        list.update_stores(["Store A"]);
        let eggs = list.get(&candidate_id("eggs")).unwrap().clone();
        list.update(eggs.with_store("Store A"));

        list.regenerate();
        let first_ids = ids(list.active());
        let first_stores = stores(list.active());

        let second = list.regenerate().unwrap();

        assert!(second.is_noop());
        assert_eq!(ids(list.active()), first_ids);
        assert_eq!(stores(list.active()), first_stores);
    }

    #[test]
    fn test_pantry_filters_candidates() {
        let (mut list, _) = loaded();
        assert_eq!(list.active().len(), 4);

        list.set_pantry(["FLOUR", "cheddar"]);

        // Regeneration is additive, so existing items stay
        assert_eq!(list.active().len(), 4);

        list.reset();
        list.regenerate();
        let names: Vec<&str> = list.active().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Eggs"]);
        assert_eq!(list.active()[1].quantity, "5");
    }

    #[test]
    fn test_archived_item_is_not_resurrected() {
        let (mut list, _) = loaded();
        let milk = candidate_id("milk");
        list.archive(&milk).unwrap();

        list.set_meals(meals());
        list.regenerate();

        assert!(list.get(&milk).is_none());
        assert_eq!(list.active().len(), 3);
    }

    #[test]
    fn test_toggled_item_is_archived_on_regeneration() {
        let (mut list, _) = loaded();
        let milk = candidate_id("milk");

        assert_eq!(list.toggle(&milk), Some(true));
        assert!(list.get(&milk).unwrap().checked);

        list.set_meals(meals());

        assert!(list.get(&milk).is_none());
        assert_eq!(list.archived()[0].name, "Milk");
    }

    #[test]
    fn test_unchecking_through_update_survives_regeneration() {
        let (mut list, _) = loaded();
        let milk = candidate_id("milk");
        list.toggle(&milk);

        let mut item = list.get(&milk).unwrap().clone();
        item.checked = false;
        list.update(item).unwrap();
        assert!(!list.item_store().removed().contains(&milk));

        list.set_meals(meals());

        assert!(!list.get(&milk).unwrap().checked);
        assert!(list.archived().is_empty());
    }

    #[test]
    fn test_checking_through_update_archives_on_regeneration() {
        let (mut list, _) = loaded();
        let milk = candidate_id("milk");

        let mut item = list.get(&milk).unwrap().clone();
        item.checked = true;
        list.update(item).unwrap();
        assert!(list.item_store().removed().contains(&milk));

        list.set_meals(meals());
        assert!(list.get(&milk).is_none());
    }

    #[test]
    fn test_store_assignment_persists_across_regeneration() {
        let (mut list, _) = loaded();
        let milk = candidate_id("milk");
        list.update_stores(["Store A", "Store B"]);
        list.assign_store(&milk, "Store A").unwrap();

        list.reset();
        list.set_meals(meals());

        assert_eq!(list.get(&milk).unwrap().store.as_deref(), Some("Store A"));
        assert_eq!(
            list.get(&candidate_id("eggs")).unwrap().store.as_deref(),
            Some(UNASSIGNED)
        );
    }

    #[test]
    fn test_reset_completeness() {
        let (mut list, notifier) = loaded();
        list.set_meals(vec![Meal::new("Stew").with_ingredients(vec![
            Ingredient::new("beef", 1.0, "lb"),
        ])]);
        assert_eq!(list.active().len(), 5);
        // Swap two derived items for two manual ones
        list.archive(&candidate_id("beef"));
        list.archive(&candidate_id("cheddar"));
        list.add(NewItem::new("Soap"));
        list.add(NewItem::new("Paper towels"));
        assert_eq!(list.active().len(), 5);
        assert_eq!(list.manual().len(), 2);
        let archived_before = list.archived().len();
        let active_ids = ids(list.active());

        assert_eq!(list.reset(), ResetOutcome::Archived(5));

        assert!(list.active().is_empty());
        assert!(list.manual().is_empty());
        let moved = &list.archived()[archived_before..];
        assert_eq!(moved.len(), 5);
        assert!(moved.iter().all(|i| i.checked));
        for (item, id) in moved.iter().zip(&active_ids) {
            assert!(item.id.ends_with(id.as_str()));
        }
        assert_eq!(notifier.last().unwrap().title, "List reset");
    }

    #[test]
    fn test_empty_reset_reports_and_does_not_touch_archive() {
        let (mut list, notifier) = loaded();
        list.reset();
        let archived = list.archived().to_vec();

        assert_eq!(list.reset(), ResetOutcome::AlreadyEmpty);

        assert_eq!(list.archived(), archived.as_slice());
        let notice = notifier.last().unwrap();
        assert_eq!(notice.title, "List already empty");
        assert_eq!(notice.severity, Severity::Info);
    }

    #[test]
    fn test_stale_store_demotion() {
        let (mut list, notifier) = loaded();
        list.update_stores(["Store A", "Store B"]);
        list.assign_store(&candidate_id("milk"), "Store B").unwrap();

        assert_eq!(list.update_stores(["Store A"]), 1);

        assert_eq!(
            list.get(&candidate_id("milk")).unwrap().store.as_deref(),
            Some(UNASSIGNED)
        );
        assert_eq!(
            notifier.last().unwrap().description,
            "1 item moved to Unassigned"
        );
    }

    #[test]
    fn test_undo_update_restores_prior_state() {
        let (mut list, _) = loaded();
        let id = candidate_id("milk");
        let s0 = list.get(&id).unwrap().clone();

        let mut edited = s0.clone();
        edited.quantity = "2 gallons".to_string();
        edited.store = Some("Store A".to_string());
        edited.department = Some("Dairy case".to_string());
        let s1 = list.update(edited).unwrap();

        assert_eq!(list.undo(), HistoryOutcome::Applied(ActionKind::Update));

        let restored = list.get(&id).unwrap().clone();
        let mut expected = s0.clone();
        expected.revision = restored.revision;
        assert_eq!(restored, expected);
        assert!(restored.revision > s1.revision);
        assert_eq!(list.assignments().get("milk"), None);
    }

    #[test]
    fn test_redo_update_reapplies() {
        let (mut list, _) = loaded();
        let id = candidate_id("milk");
        list.assign_store(&id, "Store A").unwrap();

        list.undo();
        assert_eq!(list.get(&id).unwrap().store.as_deref(), Some(UNASSIGNED));

        assert_eq!(list.redo(), HistoryOutcome::Applied(ActionKind::Update));
        assert_eq!(list.get(&id).unwrap().store.as_deref(), Some("Store A"));
        assert_eq!(list.assignments().get("milk"), Some("Store A"));
    }

    #[test]
    fn test_undo_toggle_and_add_are_reported_not_replayed() {
        let (mut list, notifier) = loaded();
        let item = list.add(NewItem::new("Soap")).unwrap();
        list.toggle(&item.id);

        assert_eq!(list.undo(), HistoryOutcome::Unsupported(ActionKind::Toggle));
        assert!(list.get(&item.id).unwrap().checked);
        let notice = notifier.last().unwrap();
        assert_eq!(notice.severity, Severity::Warning);
        assert_eq!(notice.title, "Cannot undo");

        assert_eq!(list.undo(), HistoryOutcome::Unsupported(ActionKind::Add));
        assert!(list.get(&item.id).is_some());

        assert_eq!(list.undo(), HistoryOutcome::Nothing);
        assert!(list.can_redo());
    }

    #[test]
    fn test_undo_of_archived_item_is_stale() {
        let (mut list, _) = loaded();
        let id = candidate_id("milk");
        list.assign_store(&id, "Store A").unwrap();
        list.archive(&id);

        assert_eq!(list.undo(), HistoryOutcome::Stale(ActionKind::Update));
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let (mut list, _) = loaded();
        let id = candidate_id("milk");
        list.assign_store(&id, "Store A").unwrap();
        list.undo();

        list.toggle(&candidate_id("eggs"));

        assert!(!list.can_redo());
        assert_eq!(list.redo(), HistoryOutcome::Nothing);
    }

    #[test]
    fn test_state_survives_restart() {
        let temp = TempDir::new().unwrap();
        let milk = candidate_id("milk");
        let soap_id;
        {
            let storage = DocumentStore::open(temp.path().to_path_buf()).unwrap();
            let mut list = ShoppingList::open(storage, Box::new(LogNotifier));
            list.set_meals(meals());
            list.update_stores(["Store A"]);
            list.assign_store(&milk, "Store A").unwrap();
            list.archive(&candidate_id("cheddar"));
            soap_id = list.add(NewItem::new("Soap")).unwrap().id;
        }

        let storage = DocumentStore::open(temp.path().to_path_buf()).unwrap();
        let mut list = ShoppingList::open(storage, Box::new(RecordingNotifier::new()));
        list.set_meals(meals());

        assert_eq!(list.stores(), &["Store A".to_string()]);
        assert_eq!(list.get(&milk).unwrap().store.as_deref(), Some("Store A"));
        assert!(list.get(&candidate_id("cheddar")).is_none());
        assert_eq!(list.archived().len(), 1);
        assert_eq!(ids(list.manual()), vec![soap_id]);
        assert_eq!(list.active().len(), 4);
    }
}
