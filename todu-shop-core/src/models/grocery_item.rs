//! Items on the shopping list.
//!
//! Items are either derived from planned meals by the aggregator or added
//! directly by the user. Both kinds share the same shape; manual items are
//! tracked separately by the item store so a reset can purge them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Category;

/// Store label for items that have not been assigned to a store.
pub const UNASSIGNED: &str = "Unassigned";

/// Normalizes an item name for case-insensitive matching.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Returns true if `store` names a real store rather than the unassigned
/// placeholder.
pub fn is_real_store(store: Option<&str>) -> bool {
    match store.map(str::trim) {
        Some(s) => !s.is_empty() && s != UNASSIGNED,
        None => false,
    }
}

/// A single entry on the shopping list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroceryItem {
    /// Stable identity, unique across active and archived items
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Category,
    /// Free-text quantity, e.g. "2 cups + 100 g"
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub checked: bool,
    /// Meal that caused this item to be on the list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal: Option<String>,
    /// Store the item is bought at, or `UNASSIGNED`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Bumped on every in-place change so observers can tell revisions apart
    #[serde(default)]
    pub revision: u64,
}

impl GroceryItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            category: Category::infer(&name),
            name,
            quantity: String::new(),
            checked: false,
            meal: None,
            store: None,
            department: None,
            revision: 0,
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = quantity.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_meal(mut self, meal: impl Into<String>) -> Self {
        self.meal = Some(meal.into());
        self
    }

    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Name used as the key in the store-assignment index.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Store label for display; missing stores read as `UNASSIGNED`.
    pub fn store_label(&self) -> &str {
        self.store.as_deref().unwrap_or(UNASSIGNED)
    }

    /// True if the item is assigned to a real store.
    pub fn has_store(&self) -> bool {
        is_real_store(self.store.as_deref())
    }
}

impl fmt::Display for GroceryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.checked { "[x]" } else { "[ ]" };
        if self.quantity.is_empty() {
            write!(f, "{} {:<25} ({})", check, self.name, self.store_label())
        } else {
            write!(
                f,
                "{} {:<25} {} ({})",
                check,
                self.name,
                self.quantity,
                self.store_label()
            )
        }
    }
}

/// A user-entered item, before the item store assigns it an id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub quantity: String,
    /// Inferred from the name when not given
    pub category: Option<Category>,
    pub store: Option<String>,
    pub department: Option<String>,
}

impl NewItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = quantity.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }
}
