mod category;
mod grocery_item;
mod meal;

pub use category::Category;
pub use grocery_item::{is_real_store, normalize_name, GroceryItem, NewItem, UNASSIGNED};
pub use meal::{Ingredient, Meal};
