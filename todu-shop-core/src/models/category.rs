use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grocery aisle a shopping item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Produce,
    Dairy,
    Meat,
    Grains,
    Frozen,
    Pantry,
    Spices,
    #[default]
    Other,
}

/// Keyword table used to infer a category from an ingredient name.
///
/// Checked in order against the normalized name; the first keyword that
/// appears as a substring wins. More specific keywords come first so that
/// "black pepper" lands in spices before "pepper" matches produce.
const KEYWORDS: &[(&str, Category)] = &[
    ("frozen", Category::Frozen),
    ("ice cream", Category::Frozen),
    ("black pepper", Category::Spices),
    ("pepper flakes", Category::Spices),
    ("chili powder", Category::Spices),
    ("garlic powder", Category::Spices),
    ("onion powder", Category::Spices),
    ("peanut butter", Category::Pantry),
    ("coconut milk", Category::Pantry),
    ("eggplant", Category::Produce),
    ("milk", Category::Dairy),
    ("cheese", Category::Dairy),
    ("butter", Category::Dairy),
    ("yogurt", Category::Dairy),
    ("cream", Category::Dairy),
    ("egg", Category::Dairy),
    ("salt", Category::Spices),
    ("cumin", Category::Spices),
    ("paprika", Category::Spices),
    ("cinnamon", Category::Spices),
    ("oregano", Category::Spices),
    ("thyme", Category::Spices),
    ("nutmeg", Category::Spices),
    ("turmeric", Category::Spices),
    ("curry", Category::Spices),
    ("chicken", Category::Meat),
    ("beef", Category::Meat),
    ("pork", Category::Meat),
    ("turkey", Category::Meat),
    ("bacon", Category::Meat),
    ("sausage", Category::Meat),
    ("ham", Category::Meat),
    ("lamb", Category::Meat),
    ("salmon", Category::Meat),
    ("tuna", Category::Meat),
    ("shrimp", Category::Meat),
    ("fish", Category::Meat),
    ("rice", Category::Grains),
    ("pasta", Category::Grains),
    ("spaghetti", Category::Grains),
    ("noodle", Category::Grains),
    ("bread", Category::Grains),
    ("tortilla", Category::Grains),
    ("flour", Category::Grains),
    ("oat", Category::Grains),
    ("quinoa", Category::Grains),
    ("cereal", Category::Grains),
    ("oil", Category::Pantry),
    ("vinegar", Category::Pantry),
    ("sugar", Category::Pantry),
    ("honey", Category::Pantry),
    ("sauce", Category::Pantry),
    ("broth", Category::Pantry),
    ("stock", Category::Pantry),
    ("beans", Category::Pantry),
    ("lentil", Category::Pantry),
    ("canned", Category::Pantry),
    ("apple", Category::Produce),
    ("banana", Category::Produce),
    ("lemon", Category::Produce),
    ("lime", Category::Produce),
    ("avocado", Category::Produce),
    ("lettuce", Category::Produce),
    ("spinach", Category::Produce),
    ("tomato", Category::Produce),
    ("onion", Category::Produce),
    ("garlic", Category::Produce),
    ("potato", Category::Produce),
    ("carrot", Category::Produce),
    ("pepper", Category::Produce),
    ("cucumber", Category::Produce),
    ("broccoli", Category::Produce),
    ("mushroom", Category::Produce),
    ("celery", Category::Produce),
    ("cilantro", Category::Produce),
    ("parsley", Category::Produce),
    ("basil", Category::Produce),
];

impl Category {
    /// Infers a category from an ingredient name. Unmatched names are `Other`.
    pub fn infer(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| name.contains(keyword))
            .map(|(_, category)| *category)
            .unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Produce => write!(f, "produce"),
            Category::Dairy => write!(f, "dairy"),
            Category::Meat => write!(f, "meat"),
            Category::Grains => write!(f, "grains"),
            Category::Frozen => write!(f, "frozen"),
            Category::Pantry => write!(f, "pantry"),
            Category::Spices => write!(f, "spices"),
            Category::Other => write!(f, "other"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "produce" => Ok(Category::Produce),
            "dairy" => Ok(Category::Dairy),
            "meat" => Ok(Category::Meat),
            "grains" => Ok(Category::Grains),
            "frozen" => Ok(Category::Frozen),
            "pantry" => Ok(Category::Pantry),
            "spices" => Ok(Category::Spices),
            "other" => Ok(Category::Other),
            _ => Err(format!(
                "Invalid category '{}'. Valid options: produce, dairy, meat, grains, frozen, pantry, spices, other",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_simple_keywords() {
        assert_eq!(Category::infer("Whole Milk"), Category::Dairy);
        assert_eq!(Category::infer("chicken thighs"), Category::Meat);
        assert_eq!(Category::infer("Basmati rice"), Category::Grains);
        assert_eq!(Category::infer("  Tomatoes "), Category::Produce);
    }

    #[test]
    fn test_infer_prefers_specific_keywords() {
        assert_eq!(Category::infer("black pepper"), Category::Spices);
        assert_eq!(Category::infer("red bell pepper"), Category::Produce);
        assert_eq!(Category::infer("frozen peas"), Category::Frozen);
        assert_eq!(Category::infer("peanut butter"), Category::Pantry);
        assert_eq!(Category::infer("unsalted butter"), Category::Dairy);
        assert_eq!(Category::infer("eggplant"), Category::Produce);
    }

    #[test]
    fn test_infer_unmatched_is_other() {
        assert_eq!(Category::infer("paper towels"), Category::Other);
        assert_eq!(Category::infer(""), Category::Other);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(Category::from_str("DAIRY").unwrap(), Category::Dairy);
        assert_eq!(Category::from_str("spices").unwrap(), Category::Spices);
        assert!(Category::from_str("snacks").is_err());
    }

    #[test]
    fn test_category_json() {
        let json = serde_json::to_string(&Category::Frozen).unwrap();
        assert_eq!(json, "\"frozen\"");
    }
}
