//! Meal plan and pantry kept alongside the shopping list.
//!
//! Both live in the same document as the list so one data directory holds
//! everything the list is derived from.

use std::collections::BTreeSet;

use todu_shop_core::models::normalize_name;
use todu_shop_core::{KeyValueStore, Meal, StoreError};

pub mod keys {
    pub const MEALS: &str = "plan.meals";
    pub const PANTRY: &str = "plan.pantry";
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub meals: Vec<Meal>,
    pub pantry: BTreeSet<String>,
}

impl Plan {
    pub fn load<S: KeyValueStore>(storage: &S) -> Result<Self, PlanError> {
        let meals = match storage.get(keys::MEALS)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| PlanError::Parse(keys::MEALS, e))?,
            None => Vec::new(),
        };
        let pantry = match storage.get(keys::PANTRY)? {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| PlanError::Parse(keys::PANTRY, e))?
            }
            None => BTreeSet::new(),
        };
        Ok(Self { meals, pantry })
    }

    pub fn save<S: KeyValueStore>(&self, storage: &mut S) -> Result<(), PlanError> {
        let meals = serde_json::to_string(&self.meals).map_err(PlanError::Encode)?;
        let pantry = serde_json::to_string(&self.pantry).map_err(PlanError::Encode)?;
        storage.set(keys::MEALS, &meals)?;
        storage.set(keys::PANTRY, &pantry)?;
        Ok(())
    }

    /// Adds a meal, replacing one with the same name. Returns the replaced meal.
    pub fn add_meal(&mut self, meal: Meal) -> Option<Meal> {
        let wanted = normalize_name(&meal.name);
        match self
            .meals
            .iter_mut()
            .find(|m| normalize_name(&m.name) == wanted)
        {
            Some(existing) => Some(std::mem::replace(existing, meal)),
            None => {
                self.meals.push(meal);
                None
            }
        }
    }

    pub fn remove_meal(&mut self, name: &str) -> Option<Meal> {
        let wanted = normalize_name(name);
        let pos = self
            .meals
            .iter()
            .position(|m| normalize_name(&m.name) == wanted)?;
        Some(self.meals.remove(pos))
    }

    /// Pantry names are stored normalized. Returns false for blanks and duplicates.
    pub fn add_pantry(&mut self, name: &str) -> bool {
        let name = normalize_name(name);
        !name.is_empty() && self.pantry.insert(name)
    }

    pub fn remove_pantry(&mut self, name: &str) -> bool {
        self.pantry.remove(&normalize_name(name))
    }
}

#[derive(Debug)]
pub enum PlanError {
    Store(StoreError),
    Parse(&'static str, serde_json::Error),
    Encode(serde_json::Error),
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::Store(e) => write!(f, "{}", e),
            PlanError::Parse(key, e) => write!(f, "Failed to parse '{}': {}", key, e),
            PlanError::Encode(e) => write!(f, "Failed to encode plan: {}", e),
        }
    }
}

impl std::error::Error for PlanError {}

impl From<StoreError> for PlanError {
    fn from(e: StoreError) -> Self {
        PlanError::Store(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todu_shop_core::{Ingredient, MemoryStore};

    fn tacos() -> Meal {
        Meal::new("Tacos").with_ingredients(vec![
            Ingredient::new("Tortillas", 8.0, ""),
            Ingredient::new("Ground Beef", 1.0, "lb"),
        ])
    }

    #[test]
    fn test_empty_store_loads_empty_plan() {
        let store = MemoryStore::new();
        assert_eq!(Plan::load(&store).unwrap(), Plan::default());
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut plan = Plan::default();
        plan.add_meal(tacos());
        plan.add_pantry("  Salt ");
        plan.save(&mut store).unwrap();

        let loaded = Plan::load(&store).unwrap();
        assert_eq!(loaded.meals.len(), 1);
        assert_eq!(loaded.meals[0].ingredients.len(), 2);
        assert!(loaded.pantry.contains("salt"));
    }

    #[test]
    fn test_add_meal_replaces_same_name() {
        let mut plan = Plan::default();
        assert!(plan.add_meal(tacos()).is_none());

        let replaced = plan.add_meal(Meal::new("tacos"));
        assert_eq!(replaced.unwrap().ingredients.len(), 2);
        assert_eq!(plan.meals.len(), 1);
        assert!(plan.meals[0].ingredients.is_empty());
    }

    #[test]
    fn test_remove_meal() {
        let mut plan = Plan::default();
        plan.add_meal(tacos());

        assert!(plan.remove_meal("Pizza").is_none());
        assert_eq!(plan.remove_meal("tacos").unwrap().name, "Tacos");
        assert!(plan.meals.is_empty());
    }

    #[test]
    fn test_pantry_rejects_blank_and_duplicate() {
        let mut plan = Plan::default();
        assert!(plan.add_pantry("Olive Oil"));
        assert!(!plan.add_pantry("olive oil"));
        assert!(!plan.add_pantry("   "));
        assert!(plan.remove_pantry("OLIVE OIL"));
        assert!(!plan.remove_pantry("olive oil"));
    }

    #[test]
    fn test_malformed_plan_is_an_error() {
        let mut store = MemoryStore::new();
        store.set(keys::MEALS, "not json").unwrap();

        let err = Plan::load(&store).unwrap_err();
        assert!(err.to_string().contains("plan.meals"));
    }
}
