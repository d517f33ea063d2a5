//! Versioned on-disk layout of [`SelectionState`].
//!
//! Documents are decoded once at load time into either a validated state or
//! an explicit reset decision. Version-less documents in the legacy browser
//! layout (`completedCategories`, `globalUndoHistory`, `shuffledMenus`, ...)
//! are migrated with explicit defaults.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{Category, CommittedSelection, Dish, MenuItem, PoolEntry, UndoRecord};
use crate::planner::{SCHEMA_VERSION, SelectionState, TOTAL_DAYS};

/// Decision taken when loading persisted state.
#[derive(Debug, Clone, PartialEq)]
pub enum Restored {
    /// Nothing was stored.
    Fresh,
    Restored(SelectionState),
    /// Something was stored but could not be used; start over.
    Reset { reason: String },
}

/// Decode a stored JSON document.
pub fn restore(raw: &str) -> Restored {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            return Restored::Reset {
                reason: format!("stored state is not valid JSON: {}", e),
            };
        }
    };

    match decode_state(value) {
        Ok(state) => Restored::Restored(state),
        Err(reason) => Restored::Reset { reason },
    }
}

/// Decode and validate a parsed state document of any supported version.
pub fn decode_state(value: Value) -> Result<SelectionState, String> {
    let version = value
        .as_object()
        .ok_or_else(|| "state is not a JSON object".to_string())?
        .get("version")
        .cloned();

    let mut state = match version {
        Some(version) if version.as_u64() == Some(SCHEMA_VERSION as u64) => {
            serde_json::from_value::<SelectionState>(value)
                .map_err(|e| format!("malformed state: {}", e))?
        }
        Some(version) => return Err(format!("unsupported state version {}", version)),
        None if is_legacy(&value) => migrate_legacy(value)?,
        None => return Err("unrecognized state layout".to_string()),
    };

    state.validate()?;
    state.normalize();
    Ok(state)
}

fn is_legacy(value: &Value) -> bool {
    ["completedCategories", "globalUndoHistory", "shuffledMenus"]
        .iter()
        .chain(Category::ALL.map(Category::key).iter())
        .any(|key| value.get(*key).is_some())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyState {
    #[serde(deserialize_with = "null_as_default")]
    breakfast: Vec<LegacySelection>,
    #[serde(deserialize_with = "null_as_default")]
    snack1: Vec<LegacySelection>,
    #[serde(deserialize_with = "null_as_default")]
    lunch: Vec<LegacySelection>,
    #[serde(deserialize_with = "null_as_default")]
    snack2: Vec<LegacySelection>,
    #[serde(deserialize_with = "null_as_default")]
    dinner: Vec<LegacySelection>,
    current_category_index: Option<usize>,
    current_menu_index: Option<usize>,
    temp_days_selection: Option<u8>,
    shuffled_menus: Option<LegacyPools>,
    #[serde(deserialize_with = "null_as_default")]
    global_undo_history: Vec<LegacyUndo>,
}

impl LegacyState {
    fn selections(&self, category: Category) -> &[LegacySelection] {
        match category {
            Category::Breakfast => &self.breakfast,
            Category::Snack1 => &self.snack1,
            Category::Lunch => &self.lunch,
            Category::Snack2 => &self.snack2,
            Category::Dinner => &self.dinner,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySelection {
    menu_name: String,
    days_used: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    dishes: Vec<Dish>,
    #[serde(default)]
    unique_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyPools {
    #[serde(deserialize_with = "null_as_default")]
    breakfast: Vec<LegacyMenu>,
    #[serde(deserialize_with = "null_as_default")]
    snack1: Vec<LegacyMenu>,
    #[serde(deserialize_with = "null_as_default")]
    lunch: Vec<LegacyMenu>,
    #[serde(deserialize_with = "null_as_default")]
    snack2: Vec<LegacyMenu>,
    #[serde(deserialize_with = "null_as_default")]
    dinner: Vec<LegacyMenu>,
}

impl LegacyPools {
    fn take(&mut self, category: Category) -> Vec<LegacyMenu> {
        std::mem::take(match category {
            Category::Breakfast => &mut self.breakfast,
            Category::Snack1 => &mut self.snack1,
            Category::Lunch => &mut self.lunch,
            Category::Snack2 => &mut self.snack2,
            Category::Dinner => &mut self.dinner,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyMenu {
    menu_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    dishes: Vec<Dish>,
    #[serde(default)]
    unique_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyUndo {
    category: Category,
    days_used: u8,
    #[serde(default)]
    previous_category_index: Option<usize>,
    #[serde(default)]
    previous_menu_index: Option<usize>,
    #[serde(default)]
    unique_id: Option<String>,
    #[serde(default)]
    menu: Option<LegacyMenu>,
}

fn migrate_legacy(value: Value) -> Result<SelectionState, String> {
    let mut legacy: LegacyState =
        serde_json::from_value(value).map_err(|e| format!("malformed legacy state: {}", e))?;
    let mut pools = legacy.shuffled_menus.take().unwrap_or_default();
    let mut state = SelectionState::new();

    for category in Category::ALL {
        let slot = &mut state.slots[category.index()];

        slot.selections = legacy
            .selections(category)
            .iter()
            .map(|sel| CommittedSelection {
                menu_name: sel.menu_name.clone(),
                days_used: sel.days_used,
                dishes: sel.dishes.clone(),
                source_id: sel.unique_id.clone().unwrap_or_default(),
            })
            .collect();

        // Recomputed rather than trusting completedCategories.
        let sum: u32 = slot.selections.iter().map(|s| s.days_used as u32).sum();
        if sum > TOTAL_DAYS as u32 {
            return Err(format!("{} has {} days selected", category.key(), sum));
        }
        slot.days_allocated = sum as u8;

        slot.pool = pools
            .take(category)
            .into_iter()
            .enumerate()
            .map(|(position, menu)| {
                let item = MenuItem {
                    menu_name: menu.menu_name,
                    dishes: menu.dishes,
                };
                match menu.unique_id {
                    Some(unique_id) => PoolEntry {
                        unique_id,
                        menu: item,
                    },
                    None => PoolEntry::new(category, position, item),
                }
            })
            .collect();
    }

    state.history = legacy
        .global_undo_history
        .into_iter()
        .map(|record| {
            let (menu_name, dishes) = record
                .menu
                .map(|m| (m.menu_name, m.dishes))
                .unwrap_or_default();
            UndoRecord {
                category: record.category,
                selection: CommittedSelection {
                    menu_name,
                    days_used: record.days_used,
                    dishes,
                    source_id: record.unique_id.unwrap_or_default(),
                },
                previous_category_index: record
                    .previous_category_index
                    .unwrap_or(record.category.index()),
                previous_candidate_index: record.previous_menu_index.unwrap_or(0),
            }
        })
        .collect();

    state.current_category_index = legacy.current_category_index.unwrap_or(0);
    state.active_candidate_index = legacy.current_menu_index.unwrap_or(0);
    state.pending_days = legacy.temp_days_selection;

    tracing::info!("Migrated legacy selection state");
    Ok(state)
}
