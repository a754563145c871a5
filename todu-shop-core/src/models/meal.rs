use serde::{Deserialize, Serialize};
use std::fmt;

/// An ingredient referenced by a planned meal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{} {}", self.quantity, self.name)
        } else {
            write!(f, "{} {} {}", self.quantity, self.unit, self.name)
        }
    }
}

/// A planned meal. The shopping list is derived from the ingredients of
/// every planned meal, minus whatever is already in the pantry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl Meal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ingredients: Vec::new(),
        }
    }

    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn add_ingredient(&mut self, ingredient: Ingredient) {
        self.ingredients.push(ingredient);
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for ingredient in &self.ingredients {
            writeln!(f, "  - {}", ingredient)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_display() {
        assert_eq!(format!("{}", Ingredient::new("flour", 2.5, "cups")), "2.5 cups flour");
        assert_eq!(format!("{}", Ingredient::new("eggs", 3.0, "")), "3 eggs");
    }

    #[test]
    fn test_meal_builder() {
        let mut meal = Meal::new("Tacos").with_ingredients(vec![
            Ingredient::new("tortillas", 8.0, ""),
            Ingredient::new("ground beef", 1.0, "lb"),
        ]);
        meal.add_ingredient(Ingredient::new("salsa", 1.0, "jar"));

        assert_eq!(meal.ingredients.len(), 3);
        let output = format!("{}", meal);
        assert!(output.starts_with("Tacos\n"));
        assert!(output.contains("  - 1 lb ground beef"));
    }

    #[test]
    fn test_meal_json_missing_unit_defaults_empty() {
        let json = r#"{"name":"Omelette","ingredients":[{"name":"eggs","quantity":3}]}"#;
        let meal: Meal = serde_json::from_str(json).unwrap();
        assert_eq!(meal.ingredients[0].unit, "");
    }
}
