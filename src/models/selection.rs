use serde::{Deserialize, Serialize};

use crate::models::{Category, Dish, MenuItem};

/// A working copy of a catalog menu inside a category pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolEntry {
    /// `<category-key>-<position>-<menu name without whitespace>`.
    pub unique_id: String,
    pub menu: MenuItem,
}

impl PoolEntry {
    pub fn new(category: Category, position: usize, menu: MenuItem) -> Self {
        let compact: String = menu
            .menu_name
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        Self {
            unique_id: format!("{}-{}-{}", category.key(), position, compact),
            menu,
        }
    }
}

/// A finalized menu + day count recorded against a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommittedSelection {
    pub menu_name: String,
    pub days_used: u8,
    pub dishes: Vec<Dish>,
    /// `unique_id` of the pool entry this was committed from. Empty when the
    /// selection came from a source without pool ids.
    #[serde(default)]
    pub source_id: String,
}

impl CommittedSelection {
    pub fn from_entry(entry: &PoolEntry, days_used: u8) -> Self {
        Self {
            menu_name: entry.menu.menu_name.clone(),
            days_used,
            dishes: entry.menu.dishes.clone(),
            source_id: entry.unique_id.clone(),
        }
    }
}

/// Inverse record pushed by every commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoRecord {
    pub category: Category,
    pub selection: CommittedSelection,
    pub previous_category_index: usize,
    pub previous_candidate_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_id_strips_whitespace() {
        let menu = MenuItem {
            menu_name: "Green  Power Bowl".to_string(),
            dishes: vec![],
        };
        let entry = PoolEntry::new(Category::Snack2, 3, menu);
        assert_eq!(entry.unique_id, "snack2-3-GreenPowerBowl");
    }
}
