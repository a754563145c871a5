use clap::{Args, Subcommand};

use todu_shop_core::{Ingredient, Meal};

use super::OutputFormat;
use crate::session::Session;

#[derive(Args)]
pub struct MealCommand {
    #[command(subcommand)]
    pub command: MealSubcommand,
}

#[derive(Subcommand)]
pub enum MealSubcommand {
    /// Plan a meal (replaces a planned meal with the same name)
    Add {
        /// Meal name
        name: String,

        /// Ingredient as NAME[:QTY[:UNIT]] (can be repeated)
        #[arg(long = "ingredient", short, value_name = "INGREDIENT")]
        ingredients: Vec<String>,
    },

    /// Remove a planned meal
    Remove {
        /// Meal name
        name: String,
    },

    /// List planned meals
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

impl MealCommand {
    /// Returns true when the plan changed and the list should be regenerated.
    pub fn run(&self, session: &mut Session) -> Result<bool, Box<dyn std::error::Error>> {
        match &self.command {
            MealSubcommand::Add { name, ingredients } => {
                if name.trim().is_empty() {
                    return Err("Meal name cannot be empty".into());
                }
                let ingredients = ingredients
                    .iter()
                    .map(|s| parse_ingredient(s))
                    .collect::<Result<Vec<_>, _>>()?;
                let meal = Meal::new(name.trim()).with_ingredients(ingredients);
                let count = meal.ingredients.len();

                let replaced = session.update_plan(|plan| plan.add_meal(meal))?;
                let verb = if replaced.is_some() { "Updated" } else { "Added" };
                println!("{} meal '{}' ({} ingredient(s))", verb, name.trim(), count);
                Ok(true)
            }

            MealSubcommand::Remove { name } => {
                match session.update_plan(|plan| plan.remove_meal(name))? {
                    Some(meal) => {
                        println!("Removed meal '{}'", meal.name);
                        Ok(true)
                    }
                    None => Err(format!("No planned meal named '{}'", name).into()),
                }
            }

            MealSubcommand::List { format } => {
                let meals = &session.plan().meals;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(meals)?);
                    }
                    OutputFormat::Table => {
                        if meals.is_empty() {
                            println!("No meals planned");
                        } else {
                            for meal in meals {
                                println!("{}", meal.name);
                                println!("{}", "-".repeat(meal.name.len()));
                                for ingredient in &meal.ingredients {
                                    println!("  {}", ingredient);
                                }
                                println!();
                            }
                            println!("Total: {} meal(s)", meals.len());
                        }
                    }
                }
                Ok(false)
            }
        }
    }
}

/// Parses `NAME[:QTY[:UNIT]]`. Quantity defaults to 1.
fn parse_ingredient(spec: &str) -> Result<Ingredient, String> {
    let mut parts = spec.splitn(3, ':').map(str::trim);
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err(format!("Invalid ingredient '{}': missing name", spec));
    }

    let quantity = match parts.next() {
        Some(q) if !q.is_empty() => q
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .ok_or_else(|| format!("Invalid quantity '{}' for ingredient '{}'", q, name))?,
        _ => 1.0,
    };
    let unit = parts.next().unwrap_or_default();

    Ok(Ingredient::new(name, quantity, unit))
}
