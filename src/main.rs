use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod console;
mod plan;
mod session;

use commands::{
    AddCommand, ArchiveCommand, AssignCommand, ConfigCommand, ListCommand, MealCommand,
    PantryCommand, StoresCommand, ToggleCommand,
};
use config::Config;
use session::Session;

#[derive(Parser)]
#[command(name = "todushop")]
#[command(version)]
#[command(about = "A shopping list kept in sync with your meal plan", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the shopping list
    List(ListCommand),

    /// Add an item by hand
    Add(AddCommand),

    /// Check or uncheck an item
    Toggle(ToggleCommand),

    /// Move an item to the archive
    Archive(ArchiveCommand),

    /// Assign an item to a store
    Assign(AssignCommand),

    /// Show or replace the store list
    Stores(StoresCommand),

    /// Archive every item and start a fresh list
    Reset,

    /// Manage planned meals
    Meal(MealCommand),

    /// Manage items already on hand
    Pantry(PantryCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todushop=warn,todu_shop_core=warn".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    match command {
        Commands::Config(cmd) => cmd.run(&config),
        Commands::Meal(cmd) => {
            let mut session = Session::open(&config)?;
            if cmd.run(&mut session)? {
                session.into_list(&config);
            }
            Ok(())
        }
        Commands::Pantry(cmd) => {
            let mut session = Session::open(&config)?;
            if cmd.run(&mut session)? {
                session.into_list(&config);
            }
            Ok(())
        }
        command => {
            let mut list = Session::open(&config)?.into_list(&config);
            match command {
                Commands::List(cmd) => cmd.run(&list),
                Commands::Add(cmd) => cmd.run(&mut list),
                Commands::Toggle(cmd) => cmd.run(&mut list),
                Commands::Archive(cmd) => cmd.run(&mut list),
                Commands::Assign(cmd) => cmd.run(&mut list),
                Commands::Stores(cmd) => cmd.run(&mut list),
                Commands::Reset => {
                    list.reset();
                    Ok(())
                }
                Commands::Config(_) | Commands::Meal(_) | Commands::Pantry(_) => Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_accepts_category_with_global_config() {
        let cli = Cli::try_parse_from([
            "todushop", "-c", "shop.yaml", "add", "Soap", "-t", "other", "-s", "Costco",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("shop.yaml")));
        match cli.command {
            Some(Commands::Add(cmd)) => {
                assert_eq!(cmd.name, "Soap");
                assert_eq!(cmd.category, Some(todu_shop_core::Category::Other));
                assert_eq!(cmd.store.as_deref(), Some("Costco"));
            }
            _ => panic!("expected add command"),
        }
    }
}
