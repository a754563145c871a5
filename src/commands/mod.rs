mod config_cmd;
mod item;
mod list;
mod meal;
mod pantry;
mod stores;

use clap::ValueEnum;

pub use config_cmd::ConfigCommand;
pub use item::{AddCommand, ArchiveCommand, AssignCommand, ToggleCommand};
pub use list::ListCommand;
pub use meal::MealCommand;
pub use pantry::PantryCommand;
pub use stores::StoresCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
