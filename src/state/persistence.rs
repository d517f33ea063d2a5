use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::planner::SelectionState;
use crate::state::schema::{self, Restored};
use crate::state::store::KeyValueStore;

/// Full selection state, including pools and undo history.
pub const STATE_KEY: &str = "nutri_selection_state";

/// Menus loaded by hand, in [`Catalog`] layout.
pub const MANUAL_MENUS_KEY: &str = "nutri_manual_menus";

/// Which source the active catalog came from.
pub const MENU_SOURCE_KEY: &str = "nutri_menu_source";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuSource {
    /// Files listed in the manifest.
    Directory,
    /// Files the user loaded explicitly.
    Manual,
}

/// Saves and restores planner data in a [`KeyValueStore`].
///
/// Writes are best effort: failures are logged and never returned, since
/// losing a save must not interrupt planning.
#[derive(Debug)]
pub struct Persistence<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Overwrite the stored state wholesale.
    pub fn save(&mut self, state: &SelectionState) {
        match serde_json::to_string(state) {
            Ok(json) => self.write(STATE_KEY, &json),
            Err(e) => tracing::warn!("Failed to serialize selection state: {}", e),
        }
    }

    pub fn load(&self) -> Restored {
        match self.store.get(STATE_KEY) {
            Ok(None) => Restored::Fresh,
            Ok(Some(raw)) => schema::restore(&raw),
            Err(e) => Restored::Reset {
                reason: format!("cannot read stored state: {}", e),
            },
        }
    }

    /// Stored menu source; unreadable or unknown values count as unset.
    pub fn menu_source(&self) -> Option<MenuSource> {
        let raw = match self.store.get(MENU_SOURCE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Cannot read menu source: {}", e);
                return None;
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|e| tracing::warn!("Ignoring stored menu source {:?}: {}", raw, e))
            .ok()
    }

    pub fn set_menu_source(&mut self, source: MenuSource) {
        match serde_json::to_string(&source) {
            Ok(json) => self.write(MENU_SOURCE_KEY, &json),
            Err(e) => tracing::warn!("Failed to serialize menu source: {}", e),
        }
    }

    /// Manually loaded menus, if any were stored.
    pub fn manual_menus(&self) -> Result<Option<Catalog>> {
        match self.store.get(MANUAL_MENUS_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_manual_menus(&mut self, catalog: &Catalog) {
        match serde_json::to_string(catalog) {
            Ok(json) => self.write(MANUAL_MENUS_KEY, &json),
            Err(e) => tracing::warn!("Failed to serialize manual menus: {}", e),
        }
    }

    pub fn clear_manual_menus(&mut self) {
        self.delete(MANUAL_MENUS_KEY);
    }

    /// Forget everything: selection, manual menus and menu source.
    pub fn clear(&mut self) {
        for key in [STATE_KEY, MANUAL_MENUS_KEY, MENU_SOURCE_KEY] {
            self.delete(key);
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!("Failed to save {}: {}", key, e);
        }
    }

    fn delete(&mut self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!("Failed to remove {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dish, MealKind, MenuItem};
    use crate::state::store::{FileStore, MemoryStore};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::TempDir;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        for (kind, name) in [
            (MealKind::Breakfast, "Oats"),
            (MealKind::Breakfast, "Eggs"),
            (MealKind::Snack, "Apple"),
        ] {
            catalog.push(
                kind,
                MenuItem {
                    menu_name: name.to_string(),
                    dishes: vec![Dish {
                        name: name.to_string(),
                        ingredients: vec![],
                    }],
                },
            );
        }
        catalog
    }

    #[test]
    fn test_save_then_load_reproduces_state() {
        let dir = TempDir::new().unwrap();
        let mut state = SelectionState::new();
        state.initialize(&catalog(), &mut StdRng::seed_from_u64(9));
        state.select_candidate(1).unwrap();
        state.choose_day_count(3).unwrap();
        state.commit().unwrap();
        state.choose_day_count(2).unwrap();

        let mut persistence = Persistence::new(FileStore::new(dir.path()));
        persistence.save(&state);

        let reopened = Persistence::new(FileStore::new(dir.path()));
        assert_eq!(reopened.load(), Restored::Restored(state));
    }

    #[test]
    fn test_load_without_data_is_fresh() {
        let persistence = Persistence::new(MemoryStore::new());
        assert_eq!(persistence.load(), Restored::Fresh);
        assert_eq!(persistence.menu_source(), None);
        assert!(persistence.manual_menus().unwrap().is_none());
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        crate::logging::init_test();
        let mut persistence = Persistence::new(MemoryStore::read_only());
        persistence.save(&SelectionState::new());
        persistence.set_menu_source(MenuSource::Manual);
        assert_eq!(persistence.load(), Restored::Fresh);
    }

    #[test]
    fn test_menu_source_and_manual_menus() {
        let mut persistence = Persistence::new(MemoryStore::new());
        persistence.set_menu_source(MenuSource::Manual);
        persistence.set_manual_menus(&catalog());

        assert_eq!(persistence.menu_source(), Some(MenuSource::Manual));
        assert_eq!(persistence.manual_menus().unwrap(), Some(catalog()));

        persistence.clear();
        assert!(persistence.store().is_empty());
    }
}
