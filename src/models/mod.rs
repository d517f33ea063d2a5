mod category;
mod menu;
mod selection;

pub use category::{Category, MealKind};
pub use menu::{Dish, Ingredient, MenuItem, Quantity};
pub use selection::{CommittedSelection, PoolEntry, UndoRecord};
