mod loader;
mod validation;

pub use loader::{LoadReport, load_file, load_files, load_manifest};
pub use validation::parse_menu_document;

use serde::{Deserialize, Serialize};

use crate::models::{MealKind, MenuItem};

/// Menus grouped into the four catalog buckets.
///
/// Serializes as `{"breakfast": [...], "snack": [...], "lunch": [...], "dinner": [...]}`,
/// which is also the stored format of manually loaded menus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub breakfast: Vec<MenuItem>,

    #[serde(default)]
    pub snack: Vec<MenuItem>,

    #[serde(default)]
    pub lunch: Vec<MenuItem>,

    #[serde(default)]
    pub dinner: Vec<MenuItem>,
}

impl Catalog {
    pub fn bucket(&self, kind: MealKind) -> &[MenuItem] {
        match kind {
            MealKind::Breakfast => &self.breakfast,
            MealKind::Snack => &self.snack,
            MealKind::Lunch => &self.lunch,
            MealKind::Dinner => &self.dinner,
        }
    }

    fn bucket_mut(&mut self, kind: MealKind) -> &mut Vec<MenuItem> {
        match kind {
            MealKind::Breakfast => &mut self.breakfast,
            MealKind::Snack => &mut self.snack,
            MealKind::Lunch => &mut self.lunch,
            MealKind::Dinner => &mut self.dinner,
        }
    }

    pub fn push(&mut self, kind: MealKind, menu: MenuItem) {
        self.bucket_mut(kind).push(menu);
    }

    /// Total number of menus across all buckets.
    pub fn len(&self) -> usize {
        MealKind::ALL.iter().map(|k| self.bucket(*k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A catalog this small leaves nothing to choose, so the wizard offers
    /// to fill the whole week in one step.
    pub fn should_offer_autofill(&self) -> bool {
        !self.is_empty()
            && self.breakfast.len() <= 1
            && self.lunch.len() <= 1
            && self.dinner.len() <= 1
            && self.snack.len() <= 2
    }
}

impl Extend<(MealKind, MenuItem)> for Catalog {
    fn extend<T: IntoIterator<Item = (MealKind, MenuItem)>>(&mut self, iter: T) {
        for (kind, menu) in iter {
            self.push(kind, menu);
        }
    }
}
