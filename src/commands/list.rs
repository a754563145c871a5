use clap::Args;

use todu_shop_core::{GroceryItem, KeyValueStore, ShoppingList, UNASSIGNED};

use super::OutputFormat;

#[derive(Args)]
pub struct ListCommand {
    /// Show archived items instead of the active list
    #[arg(long, short)]
    pub archived: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl ListCommand {
    pub fn run<S: KeyValueStore>(
        &self,
        list: &ShoppingList<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let items = if self.archived {
            list.archived()
        } else {
            list.active()
        };

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(items)?);
            }
            OutputFormat::Table => {
                let title = if self.archived {
                    "Archived Items"
                } else {
                    "Shopping List"
                };
                println!("{}", title);
                println!("{}", "=".repeat(44));

                if items.is_empty() {
                    println!("No items.");
                    if !self.archived && list.meals().is_empty() {
                        println!("\nAdd a meal with 'todushop meal add' or an item with 'todushop add'.");
                    }
                    return Ok(());
                }

                if self.archived {
                    for item in items {
                        print_item(item);
                    }
                } else {
                    for (store, group) in group_by_store(items, list.stores()) {
                        println!("{}", store);
                        println!("{}", "-".repeat(44));
                        for item in group {
                            print_item(item);
                        }
                        println!();
                    }

                    let checked = items.iter().filter(|i| i.checked).count();
                    println!("{}", "-".repeat(44));
                    println!("{} of {} items checked", checked, items.len());
                }
            }
        }
        Ok(())
    }
}

fn print_item(item: &GroceryItem) {
    let check = if item.checked { "[x]" } else { "[ ]" };
    let meal = item
        .meal
        .as_deref()
        .map(|m| format!("  ({})", m))
        .unwrap_or_default();
    println!(
        "{} {:<25} {:<12} {}{}",
        check, item.name, item.quantity, item.id, meal
    );
}

/// Groups items by store: catalog order first, then stores no longer in the
/// catalog, then Unassigned. Within a group unchecked items come first.
fn group_by_store<'a>(
    items: &'a [GroceryItem],
    catalog: &[String],
) -> Vec<(String, Vec<&'a GroceryItem>)> {
    let mut order: Vec<String> = catalog.to_vec();
    for item in items {
        let label = item.store_label();
        if label != UNASSIGNED && !order.iter().any(|s| s == label) {
            order.push(label.to_string());
        }
    }
    order.push(UNASSIGNED.to_string());

    order
        .into_iter()
        .filter_map(|store| {
            let mut group: Vec<&GroceryItem> = items
                .iter()
                .filter(|i| i.store_label() == store)
                .collect();
            if group.is_empty() {
                return None;
            }
            group.sort_by_key(|i| i.checked);
            Some((store, group))
        })
        .collect()
}
