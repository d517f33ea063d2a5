use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five meal slots scheduled across the week, in wizard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Breakfast,
    Snack1,
    Lunch,
    Snack2,
    Dinner,
}

impl Category {
    /// Wizard order. The complete state is `ALL.len()`.
    pub const ALL: [Category; 5] = [
        Category::Breakfast,
        Category::Snack1,
        Category::Lunch,
        Category::Snack2,
        Category::Dinner,
    ];

    /// Position of this category in [`Category::ALL`].
    pub fn index(self) -> usize {
        match self {
            Category::Breakfast => 0,
            Category::Snack1 => 1,
            Category::Lunch => 2,
            Category::Snack2 => 3,
            Category::Dinner => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Category> {
        Self::ALL.get(index).copied()
    }

    /// Storage key, also used as the `unique_id` prefix of pool entries.
    pub fn key(self) -> &'static str {
        match self {
            Category::Breakfast => "breakfast",
            Category::Snack1 => "snack1",
            Category::Lunch => "lunch",
            Category::Snack2 => "snack2",
            Category::Dinner => "dinner",
        }
    }

    /// Human-facing label. Both snack slots share one label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::Snack1 | Category::Snack2 => "Snack",
            Category::Lunch => "Lunch",
            Category::Dinner => "Dinner",
        }
    }

    /// The catalog bucket this slot draws its pool from.
    pub fn meal_kind(self) -> MealKind {
        match self {
            Category::Breakfast => MealKind::Breakfast,
            Category::Snack1 | Category::Snack2 => MealKind::Snack,
            Category::Lunch => MealKind::Lunch,
            Category::Dinner => MealKind::Dinner,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog bucket. Both snack slots share the `Snack` bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealKind {
    Breakfast,
    Snack,
    Lunch,
    Dinner,
}

impl MealKind {
    pub const ALL: [MealKind; 4] = [
        MealKind::Breakfast,
        MealKind::Snack,
        MealKind::Lunch,
        MealKind::Dinner,
    ];

    /// Map a menu-file key onto a bucket.
    ///
    /// Matching is case-insensitive and any key starting with `snack` folds
    /// into the shared snack bucket.
    pub fn from_document_key(key: &str) -> Option<MealKind> {
        let key = key.to_lowercase();
        if key.starts_with("snack") {
            return Some(MealKind::Snack);
        }
        match key.as_str() {
            "breakfast" => Some(MealKind::Breakfast),
            "lunch" => Some(MealKind::Lunch),
            "dinner" => Some(MealKind::Dinner),
            _ => None,
        }
    }
}
