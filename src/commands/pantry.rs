use clap::{Args, Subcommand};

use crate::session::Session;

#[derive(Args)]
pub struct PantryCommand {
    #[command(subcommand)]
    pub command: PantrySubcommand,
}

#[derive(Subcommand)]
pub enum PantrySubcommand {
    /// Mark items as on hand; they are left off the derived list
    Add {
        /// Item names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Mark items as no longer on hand
    Remove {
        /// Item names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List pantry items
    List,
}

impl PantryCommand {
    /// Returns true when the pantry changed and the list should be regenerated.
    pub fn run(&self, session: &mut Session) -> Result<bool, Box<dyn std::error::Error>> {
        match &self.command {
            PantrySubcommand::Add { names } => {
                let added = session.update_plan(|plan| {
                    names.iter().filter(|n| plan.add_pantry(n)).count()
                })?;
                println!("Added {} pantry item(s)", added);
                Ok(added > 0)
            }

            PantrySubcommand::Remove { names } => {
                let removed = session.update_plan(|plan| {
                    names.iter().filter(|n| plan.remove_pantry(n)).count()
                })?;
                println!("Removed {} pantry item(s)", removed);
                Ok(removed > 0)
            }

            PantrySubcommand::List => {
                let pantry = &session.plan().pantry;
                if pantry.is_empty() {
                    println!("Pantry is empty");
                } else {
                    for name in pantry {
                        println!("{}", name);
                    }
                }
                Ok(false)
            }
        }
    }
}
