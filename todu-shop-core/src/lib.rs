//! Todu Shop Core Library
//!
//! Keeps a shopping list derived from planned meals and a pantry in sync
//! with the edits a user makes to it.

pub mod aggregate;
pub mod assignments;
pub mod history;
pub mod item_store;
pub mod list;
pub mod models;
pub mod notify;
pub mod reconcile;
pub mod storage;

pub use aggregate::{aggregate, candidate_id};
pub use assignments::{RemovedIds, StoreAssignments};
pub use history::{Action, ActionData, ActionKind, ActionLog, DEFAULT_HISTORY_LIMIT};
pub use item_store::{ItemStore, ResetOutcome};
pub use list::{HistoryOutcome, ShoppingList};
pub use models::{Category, GroceryItem, Ingredient, Meal, NewItem, UNASSIGNED};
pub use notify::{LogNotifier, Notice, Notifier, RecordingNotifier, Severity};
pub use reconcile::{reconcile, Reconciliation};
pub use storage::{DocumentStore, KeyValueStore, MemoryStore, StoreError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
