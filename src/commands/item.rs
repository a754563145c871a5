//! Commands that edit a single list item.

use clap::Args;

use todu_shop_core::{Category, GroceryItem, KeyValueStore, NewItem, ShoppingList};

#[derive(Args)]
pub struct AddCommand {
    /// Item name
    pub name: String,

    /// Quantity (free text, e.g. "2 bags")
    #[arg(long, short)]
    pub qty: Option<String>,

    /// Category (inferred from the name when omitted)
    #[arg(long, short = 't')]
    pub category: Option<Category>,

    /// Store to buy it at
    #[arg(long, short)]
    pub store: Option<String>,
}

impl AddCommand {
    pub fn run<S: KeyValueStore>(
        &self,
        list: &mut ShoppingList<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.name.trim().is_empty() {
            return Err("Item name cannot be empty".into());
        }

        let mut new_item = NewItem::new(self.name.trim());
        if let Some(qty) = &self.qty {
            new_item = new_item.with_quantity(qty.trim());
        }
        if let Some(category) = self.category {
            new_item = new_item.with_category(category);
        }
        if let Some(store) = &self.store {
            new_item = new_item.with_store(store.trim());
        }

        let item = list.add(new_item).ok_or("Shopping list is not loaded")?;
        println!("{}", item);
        println!("  id: {}", item.id);
        Ok(())
    }
}

#[derive(Args)]
pub struct ToggleCommand {
    /// Item id, id prefix, or name
    pub item: String,
}

impl ToggleCommand {
    pub fn run<S: KeyValueStore>(
        &self,
        list: &mut ShoppingList<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let id = resolve_id(list.active(), &self.item)?;
        let checked = list.toggle(&id).ok_or("Shopping list is not loaded")?;
        if let Some(item) = list.get(&id) {
            let state = if checked { "Checked" } else { "Unchecked" };
            println!("{} {}", state, item.name);
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct ArchiveCommand {
    /// Item id, id prefix, or name
    pub item: String,
}

impl ArchiveCommand {
    pub fn run<S: KeyValueStore>(
        &self,
        list: &mut ShoppingList<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let id = resolve_id(list.active(), &self.item)?;
        list.archive(&id).ok_or("Shopping list is not loaded")?;
        Ok(())
    }
}

#[derive(Args)]
pub struct AssignCommand {
    /// Item id, id prefix, or name
    pub item: String,

    /// Store name, or "Unassigned" to clear
    pub store: String,
}

impl AssignCommand {
    pub fn run<S: KeyValueStore>(
        &self,
        list: &mut ShoppingList<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let id = resolve_id(list.active(), &self.item)?;
        let store = self.store.trim();
        let known = list.stores().iter().any(|s| s == store);
        if !known && store != todu_shop_core::UNASSIGNED {
            println!(
                "Warning: '{}' is not in the store list; add it with 'todushop stores set'",
                store
            );
        }

        let item = list
            .assign_store(&id, store)
            .ok_or("Shopping list is not loaded")?;
        println!("{} -> {}", item.name, item.store_label());
        Ok(())
    }
}

/// Finds the id of the item `query` refers to.
///
/// Tries, in order: exact id, unique id prefix, unique name (case-insensitive).
pub fn resolve_id(items: &[GroceryItem], query: &str) -> Result<String, String> {
    let query = query.trim();
    if query.is_empty() {
        return Err("Item cannot be empty".to_string());
    }

    if let Some(item) = items.iter().find(|i| i.id == query) {
        return Ok(item.id.clone());
    }

    let by_prefix: Vec<&GroceryItem> = items.iter().filter(|i| i.id.starts_with(query)).collect();
    match by_prefix.as_slice() {
        [only] => return Ok(only.id.clone()),
        [] => {}
        many => return Err(ambiguous(query, many)),
    }

    let wanted = query.to_lowercase();
    let by_name: Vec<&GroceryItem> = items
        .iter()
        .filter(|i| i.name.to_lowercase() == wanted)
        .collect();
    match by_name.as_slice() {
        [only] => Ok(only.id.clone()),
        [] => Err(format!("No item matching '{}'", query)),
        many => Err(ambiguous(query, many)),
    }
}

fn ambiguous(query: &str, items: &[&GroceryItem]) -> String {
    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    format!("'{}' matches several items: {}", query, ids.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<GroceryItem> {
        vec![
            GroceryItem::new("ing-a1b2c3d4e5f6", "Milk"),
            GroceryItem::new("ing-a1ffffffffff", "Eggs"),
            GroceryItem::new("manual-milk-1700000000000", "Milk"),
        ]
    }

    #[test]
    fn test_resolve_exact_id() {
        assert_eq!(
            resolve_id(&items(), "ing-a1b2c3d4e5f6").unwrap(),
            "ing-a1b2c3d4e5f6"
        );
    }

    #[test]
    fn test_resolve_unique_prefix() {
        assert_eq!(resolve_id(&items(), "ing-a1f").unwrap(), "ing-a1ffffffffff");
        assert_eq!(
            resolve_id(&items(), "manual").unwrap(),
            "manual-milk-1700000000000"
        );
    }

    #[test]
    fn test_resolve_ambiguous_prefix() {
        let err = resolve_id(&items(), "ing-a1").unwrap_err();
        assert!(err.contains("several items"));
    }

    #[test]
    fn test_resolve_by_name() {
        assert_eq!(resolve_id(&items(), "eggs").unwrap(), "ing-a1ffffffffff");
        assert!(resolve_id(&items(), "milk").is_err());
        assert!(resolve_id(&items(), "bread")
            .unwrap_err()
            .contains("No item matching"));
    }
}
