use clap::{Args, Subcommand};

use todu_shop_core::{KeyValueStore, ShoppingList};

#[derive(Args)]
pub struct StoresCommand {
    #[command(subcommand)]
    pub command: Option<StoresSubcommand>,
}

#[derive(Subcommand)]
pub enum StoresSubcommand {
    /// Show the store list
    List,

    /// Replace the store list; items at removed stores become Unassigned
    Set {
        /// Store names, in display order
        names: Vec<String>,
    },
}

impl StoresCommand {
    pub fn run<S: KeyValueStore>(
        &self,
        list: &mut ShoppingList<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            None | Some(StoresSubcommand::List) => {
                if list.stores().is_empty() {
                    println!("No stores configured.");
                } else {
                    for store in list.stores() {
                        let count = list
                            .active()
                            .iter()
                            .filter(|i| i.store_label() == store)
                            .count();
                        println!("{:<25} {} item(s)", store, count);
                    }
                }
                Ok(())
            }
            Some(StoresSubcommand::Set { names }) => {
                list.update_stores(names);
                Ok(())
            }
        }
    }
}
