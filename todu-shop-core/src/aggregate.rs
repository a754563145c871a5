//! Derives candidate shopping items from planned meals.
//!
//! Every ingredient referenced by a meal becomes one candidate unless the
//! pantry already has it. Repeated ingredients are merged by name
//! (case-insensitive). Candidate ids are derived from the ingredient name,
//! so the same inputs always produce the same ids.

use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};

use crate::models::{normalize_name, GroceryItem, Meal};

/// Number of hash bytes used in a derived id.
const ID_HASH_BYTES: usize = 6;

/// Returns the deterministic id for a candidate derived from `name`.
pub fn candidate_id(name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_name(name).as_bytes());
    let hash = hasher.finalize();
    let code: String = hash
        .iter()
        .take(ID_HASH_BYTES)
        .map(|b| format!("{:02x}", b))
        .collect();
    format!("ing-{code}")
}

/// Format a quantity, removing unnecessary decimal places.
pub fn format_quantity(qty: f64) -> String {
    // Larger whole numbers would saturate the integer cast.
    if qty.fract() == 0.0 && qty.abs() < 1e15 {
        format!("{}", qty as i64)
    } else {
        format!("{:.1}", qty)
    }
}

struct Group {
    name: String,
    meal: String,
    /// (lowercased unit, unit as first written, summed quantity)
    amounts: Vec<(String, String, f64)>,
}

impl Group {
    fn add(&mut self, quantity: f64, unit: &str) {
        let quantity = if quantity.is_finite() { quantity } else { 0.0 };
        let unit = unit.trim();
        let unit_key = unit.to_lowercase();
        match self.amounts.iter_mut().find(|(key, _, _)| *key == unit_key) {
            Some((_, _, total)) => *total += quantity,
            None => self.amounts.push((unit_key, unit.to_string(), quantity)),
        }
    }

    fn quantity(&self) -> String {
        self.amounts
            .iter()
            .filter_map(|(_, unit, qty)| match (unit.is_empty(), *qty == 0.0) {
                (true, true) => None,
                (true, false) => Some(format_quantity(*qty)),
                (false, true) => Some(unit.clone()),
                (false, false) => Some(format!("{} {}", format_quantity(*qty), unit)),
            })
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

/// Builds the candidate list for `meals`, skipping anything in `pantry`.
///
/// Candidates come out in first-seen order, unchecked and without a store.
/// Store assignment is left to reconciliation.
pub fn aggregate<I, S>(meals: &[Meal], pantry: I) -> Vec<GroceryItem>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let pantry: HashSet<String> = pantry
        .into_iter()
        .map(|p| normalize_name(p.as_ref()))
        .filter(|p| !p.is_empty())
        .collect();

    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for meal in meals {
        for ingredient in &meal.ingredients {
            let key = normalize_name(&ingredient.name);
            if key.is_empty() || pantry.contains(&key) {
                continue;
            }

            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Group {
                    name: ingredient.name.trim().to_string(),
                    meal: meal.name.clone(),
                    amounts: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].add(ingredient.quantity, &ingredient.unit);
        }
    }

    groups
        .into_iter()
        .map(|group| {
            let quantity = group.quantity();
            GroceryItem::new(candidate_id(&group.name), group.name)
                .with_quantity(quantity)
                .with_meal(group.meal)
        })
        .collect()
}
