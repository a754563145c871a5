//! Undo/redo history for user actions on the shopping list.
//!
//! History is strictly linear: recording a new action discards anything
//! that could have been redone. Only `Update` entries carry enough state
//! for a true inverse; `Add` and `Toggle` are recorded so they show up in
//! history, but replaying them is left to the caller.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

use crate::models::GroceryItem;

/// Default number of actions kept for undo.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Kind of a recorded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Add,
    Toggle,
    Update,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Add => write!(f, "add"),
            ActionKind::Toggle => write!(f, "toggle"),
            ActionKind::Update => write!(f, "update"),
        }
    }
}

/// State captured for an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionData {
    /// A manual item was added.
    Add { item: GroceryItem },
    /// An item's checked flag was flipped; `checked` is the new value.
    Toggle { item_id: String, checked: bool },
    /// An item was replaced in place.
    Update {
        before: GroceryItem,
        after: GroceryItem,
    },
}

/// One entry in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: Uuid,
    pub data: ActionData,
}

impl Action {
    pub fn new(data: ActionData) -> Self {
        Self {
            id: Uuid::new_v4(),
            data,
        }
    }

    pub fn add(item: GroceryItem) -> Self {
        Self::new(ActionData::Add { item })
    }

    pub fn toggle(item_id: impl Into<String>, checked: bool) -> Self {
        Self::new(ActionData::Toggle {
            item_id: item_id.into(),
            checked,
        })
    }

    pub fn update(before: GroceryItem, after: GroceryItem) -> Self {
        Self::new(ActionData::Update { before, after })
    }

    pub fn kind(&self) -> ActionKind {
        match self.data {
            ActionData::Add { .. } => ActionKind::Add,
            ActionData::Toggle { .. } => ActionKind::Toggle,
            ActionData::Update { .. } => ActionKind::Update,
        }
    }
}

/// Two-stack undo/redo log.
#[derive(Debug, Clone)]
pub struct ActionLog {
    past: VecDeque<Action>,
    future: Vec<Action>,
    limit: usize,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl ActionLog {
    /// Creates a log that keeps at most `limit` undoable actions.
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Records a new action. Clears the redo history.
    pub fn record(&mut self, action: Action) {
        self.past.push_back(action);
        self.future.clear();

        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }

    /// Moves the most recent action to the redo stack and returns it.
    pub fn undo(&mut self) -> Option<Action> {
        let action = self.past.pop_back()?;
        self.future.push(action.clone());
        Some(action)
    }

    /// Moves the most recently undone action back and returns it.
    pub fn redo(&mut self) -> Option<Action> {
        let action = self.future.pop()?;
        self.past.push_back(action.clone());
        Some(action)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn len(&self) -> usize {
        self.past.len()
    }

    pub fn is_empty(&self) -> bool {
        self.past.is_empty()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle(id: &str) -> Action {
        Action::toggle(id, true)
    }

    #[test]
    fn test_undo_redo_order() {
        let mut log = ActionLog::default();
        let first = toggle("a");
        let second = toggle("b");
        log.record(first.clone());
        log.record(second.clone());

        assert_eq!(log.undo(), Some(second.clone()));
        assert_eq!(log.undo(), Some(first.clone()));
        assert_eq!(log.undo(), None);

        assert_eq!(log.redo(), Some(first));
        assert_eq!(log.redo(), Some(second));
        assert_eq!(log.redo(), None);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut log = ActionLog::default();
        log.record(toggle("a"));
        log.undo();
        assert!(log.can_redo());

        log.record(toggle("b"));
        assert!(!log.can_redo());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut log = ActionLog::new(2);
        log.record(toggle("a"));
        log.record(toggle("b"));
        log.record(toggle("c"));

        assert_eq!(log.len(), 2);
        let ids: Vec<String> = std::iter::from_fn(|| log.undo())
            .map(|a| match a.data {
                ActionData::Toggle { item_id, .. } => item_id,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[test]
    fn test_action_kind() {
        let item = GroceryItem::new("a", "Milk");
        assert_eq!(Action::add(item.clone()).kind(), ActionKind::Add);
        assert_eq!(toggle("a").kind(), ActionKind::Toggle);
        assert_eq!(Action::update(item.clone(), item).kind(), ActionKind::Update);
    }

    #[test]
    fn test_action_json_is_tagged() {
        let action = toggle("a");
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["data"]["type"], "toggle");
        assert_eq!(json["data"]["item_id"], "a");
    }

    #[test]
    fn test_clear() {
        let mut log = ActionLog::default();
        log.record(toggle("a"));
        log.record(toggle("b"));
        log.undo();

        log.clear();
        assert!(!log.can_undo());
        assert!(!log.can_redo());
    }
}
