use std::fmt;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;

use crate::catalog::{Catalog, LoadReport, load_files, load_manifest};
use crate::error::{PlannerError, Result, SelectionError};
use crate::models::Category;
use crate::planner::{CommitOutcome, SelectionState, UndoOutcome};
use crate::state::{KeyValueStore, MenuSource, Persistence, Restored};

/// Non-blocking message for the user produced while loading.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Some menu files failed; the rest were used.
    LoadErrors(Vec<String>),
    /// Stored state was unusable and has been replaced.
    StateReset(String),
    /// Stored manual menus were unreadable and have been dropped.
    ManualMenusDiscarded(String),
    ManifestUnavailable(String),
    /// No menus were found; the user has to load files by hand.
    NeedsManualLoad,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::LoadErrors(errors) => {
                write!(f, "Some menus could not be loaded: {}", errors.join(", "))
            }
            Notice::StateReset(reason) => {
                write!(f, "Saved selection was discarded ({})", reason)
            }
            Notice::ManualMenusDiscarded(reason) => {
                write!(f, "Saved menu files were discarded ({})", reason)
            }
            Notice::ManifestUnavailable(reason) => write!(f, "{}", reason),
            Notice::NeedsManualLoad => {
                write!(f, "No menus found. Load menu files with the 'load' command.")
            }
        }
    }
}

/// The single planning context: catalog, selection state and storage.
///
/// Every mutating command saves the state afterwards.
pub struct Session<S: KeyValueStore> {
    persistence: Persistence<S>,
    manifest: PathBuf,
    catalog: Catalog,
    source: Option<MenuSource>,
    state: SelectionState,
    rng: StdRng,
}

impl<S: KeyValueStore> Session<S> {
    /// Restore the previous session from `store`, loading menus from the
    /// stored manual files or from `manifest`.
    ///
    /// Never fails; problems come back as notices.
    pub fn open<P: Into<PathBuf>>(store: S, manifest: P, rng: StdRng) -> (Self, Vec<Notice>) {
        let mut notices = Vec::new();
        let mut persistence = Persistence::new(store);

        let state = match persistence.load() {
            Restored::Fresh => SelectionState::new(),
            Restored::Restored(state) => state,
            Restored::Reset { reason } => {
                tracing::warn!("Discarding stored state: {}", reason);
                notices.push(Notice::StateReset(reason));
                SelectionState::new()
            }
        };

        let mut session = Self {
            persistence,
            manifest: manifest.into(),
            catalog: Catalog::default(),
            source: None,
            state,
            rng,
        };

        if session.persistence.menu_source() == Some(MenuSource::Manual) {
            match session.persistence.manual_menus() {
                Ok(Some(catalog)) => {
                    tracing::info!("Using {} manually loaded menus", catalog.len());
                    session.catalog = catalog;
                    session.source = Some(MenuSource::Manual);
                }
                Ok(None) => session.persistence.clear_manual_menus(),
                Err(e) => {
                    notices.push(Notice::ManualMenusDiscarded(e.to_string()));
                    session.persistence.clear_manual_menus();
                }
            }
        }

        if session.source.is_none() {
            session.load_directory(&mut notices);
        }

        if !session.state.has_pool() {
            session
                .state
                .rebuild_pools(&session.catalog, &mut session.rng);
        }
        session.state.normalize();
        session.save();

        (session, notices)
    }

    fn load_directory(&mut self, notices: &mut Vec<Notice>) {
        match load_manifest(&self.manifest) {
            Ok(report) if report.needs_manual_load() => {
                notices.push(Notice::NeedsManualLoad);
            }
            Ok(report) => {
                self.persistence.set_menu_source(MenuSource::Directory);
                self.persistence.clear_manual_menus();
                self.source = Some(MenuSource::Directory);
                if !report.errors.is_empty() {
                    notices.push(Notice::LoadErrors(report.errors));
                }
                if report.catalog.is_empty() {
                    notices.push(Notice::NeedsManualLoad);
                }
                self.catalog = report.catalog;
            }
            Err(e) => {
                tracing::warn!("{}", e);
                notices.push(Notice::ManifestUnavailable(e.to_string()));
                notices.push(Notice::NeedsManualLoad);
            }
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn source(&self) -> Option<MenuSource> {
        self.source
    }

    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    fn save(&mut self) {
        self.persistence.save(&self.state);
    }

    pub fn select_candidate(&mut self, index: usize) -> std::result::Result<(), SelectionError> {
        let result = self.state.select_candidate(index);
        self.save();
        result
    }

    pub fn navigate(&mut self, delta: isize) -> std::result::Result<usize, SelectionError> {
        let result = self.state.navigate(delta);
        self.save();
        result
    }

    pub fn choose_day_count(&mut self, days: u8) -> std::result::Result<(), SelectionError> {
        let result = self.state.choose_day_count(days);
        self.save();
        result
    }

    pub fn commit(&mut self) -> std::result::Result<CommitOutcome, SelectionError> {
        let result = self.state.commit();
        self.save();
        result
    }

    /// Jump to candidate `index`, stage `days` and commit in one step.
    ///
    /// Runs on a copy of the state; a rejection at any stage leaves both the
    /// state and the store untouched.
    pub fn commit_candidate(
        &mut self,
        index: usize,
        days: u8,
    ) -> std::result::Result<CommitOutcome, SelectionError> {
        let mut next = self.state.clone();
        next.select_candidate(index)?;
        next.choose_day_count(days)?;
        let outcome = next.commit()?;

        self.state = next;
        self.save();
        Ok(outcome)
    }

    pub fn undo(&mut self) -> UndoOutcome {
        let outcome = self.state.undo();
        self.save();
        outcome
    }

    /// Fill the week from the catalog. Returns categories left empty.
    pub fn autofill(&mut self) -> Vec<Category> {
        let missing = self.state.autofill(&self.catalog);
        self.save();
        missing
    }

    /// Replace the catalog with user-supplied menu files and start a new
    /// selection. The files are stored so later runs skip the manifest.
    pub fn load_manual(&mut self, paths: &[PathBuf]) -> Result<LoadReport> {
        let report = load_files(paths)?;
        if report.catalog.is_empty() {
            return Err(PlannerError::NoValidMenus);
        }

        self.persistence.set_manual_menus(&report.catalog);
        self.persistence.set_menu_source(MenuSource::Manual);
        self.source = Some(MenuSource::Manual);
        self.catalog = report.catalog.clone();

        self.state.initialize(&self.catalog, &mut self.rng);
        self.save();
        tracing::info!("Loaded {} menus by hand", self.catalog.len());
        Ok(report)
    }

    /// Forget everything and start over from the manifest.
    pub fn reset(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        self.persistence.clear();
        self.catalog = Catalog::default();
        self.source = None;

        self.load_directory(&mut notices);
        self.state.initialize(&self.catalog, &mut self.rng);
        self.save();
        notices
    }
}
