use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::SelectionError;
use crate::models::{Category, CommittedSelection, PoolEntry, UndoRecord};
use crate::planner::constants::{SCHEMA_VERSION, TOTAL_DAYS};

const CATEGORY_COUNT: usize = Category::ALL.len();

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Category(Category),
    Complete,
}

/// Per-category working data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySlot {
    /// Shuffled candidates. Never shrinks on commit.
    pub pool: Vec<PoolEntry>,
    pub selections: Vec<CommittedSelection>,
    /// Always equals the sum of `days_used` over `selections`.
    pub days_allocated: u8,
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub category: Category,
    pub menu_name: String,
    pub days_used: u8,
    /// The commit filled the category and the wizard moved on.
    pub category_filled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    /// A staged day count was discarded; history untouched.
    ClearedPending,
    /// The most recent commit was reverted.
    Reverted(UndoRecord),
    Nothing,
}

/// Root aggregate of the week-planning workflow.
///
/// All mutation goes through the command methods below; rejected commands
/// return a [`SelectionError`] and leave the state untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub(crate) version: u32,
    pub(crate) slots: [CategorySlot; CATEGORY_COUNT],
    /// In `0..=CATEGORY_COUNT`; `CATEGORY_COUNT` means complete.
    pub(crate) current_category_index: usize,
    pub(crate) active_candidate_index: usize,
    pub(crate) pending_days: Option<u8>,
    pub(crate) history: Vec<UndoRecord>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            slots: Default::default(),
            current_category_index: 0,
            active_candidate_index: 0,
            pending_days: None,
            history: Vec::new(),
        }
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset everything and build fresh pools from `catalog`.
    ///
    /// Each category gets its own shuffled copy of its bucket; the two snack
    /// slots shuffle the shared snack bucket independently.
    pub fn initialize<R: Rng + ?Sized>(&mut self, catalog: &Catalog, rng: &mut R) {
        *self = Self::new();
        self.rebuild_pools(catalog, rng);
    }

    /// Replace only the pools, keeping committed selections. Used when a
    /// restored state carries no pool snapshot.
    pub fn rebuild_pools<R: Rng + ?Sized>(&mut self, catalog: &Catalog, rng: &mut R) {
        for category in Category::ALL {
            let mut menus = catalog.bucket(category.meal_kind()).to_vec();
            menus.shuffle(rng);
            self.slots[category.index()].pool = menus
                .into_iter()
                .enumerate()
                .map(|(position, menu)| PoolEntry::new(category, position, menu))
                .collect();
        }

        tracing::debug!(
            "Initialized pools: {:?}",
            Category::ALL.map(|c| (c.key(), self.slots[c.index()].pool.len()))
        );
    }

    /// True once any category has candidates.
    pub fn has_pool(&self) -> bool {
        self.slots.iter().any(|s| !s.pool.is_empty())
    }

    pub fn slot(&self, category: Category) -> &CategorySlot {
        &self.slots[category.index()]
    }

    pub fn pool(&self, category: Category) -> &[PoolEntry] {
        &self.slot(category).pool
    }

    pub fn selections(&self, category: Category) -> &[CommittedSelection] {
        &self.slot(category).selections
    }

    pub fn days_allocated(&self, category: Category) -> u8 {
        self.slot(category).days_allocated
    }

    pub fn remaining_days(&self, category: Category) -> u8 {
        TOTAL_DAYS.saturating_sub(self.days_allocated(category))
    }

    pub fn current_category_index(&self) -> usize {
        self.current_category_index
    }

    pub fn active_candidate_index(&self) -> usize {
        self.active_candidate_index
    }

    pub fn pending_days(&self) -> Option<u8> {
        self.pending_days
    }

    pub fn history(&self) -> &[UndoRecord] {
        &self.history
    }

    pub fn current_step(&self) -> Step {
        match Category::from_index(self.current_category_index) {
            Some(category) => Step::Category(category),
            None => Step::Complete,
        }
    }

    pub fn current_category(&self) -> Option<Category> {
        Category::from_index(self.current_category_index)
    }

    /// The candidate currently shown for the active category.
    pub fn active_candidate(&self) -> Option<&PoolEntry> {
        let category = self.current_category()?;
        self.pool(category).get(self.active_candidate_index)
    }

    /// Whether any committed selection in `category` still points at the
    /// pool entry at `index`.
    pub fn is_used(&self, category: Category, index: usize) -> bool {
        let slot = self.slot(category);
        slot.pool.get(index).is_some_and(|entry| {
            slot.selections
                .iter()
                .any(|sel| sel.source_id == entry.unique_id)
        })
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.days_allocated == TOTAL_DAYS)
    }

    pub fn can_undo(&self) -> bool {
        self.pending_days.is_some() || !self.history.is_empty()
    }

    /// Pool length of the active category, or an error when there is nothing
    /// to select.
    fn active_pool_len(&self) -> Result<usize, SelectionError> {
        let category = self
            .current_category()
            .ok_or(SelectionError::AlreadyComplete)?;
        match self.pool(category).len() {
            0 => Err(SelectionError::NoActiveCandidate),
            len => Ok(len),
        }
    }

    /// Jump to the candidate at `index`. Clears any staged day count.
    pub fn select_candidate(&mut self, index: usize) -> Result<(), SelectionError> {
        let len = self.active_pool_len()?;
        if index >= len {
            return Err(SelectionError::CandidateOutOfRange { index, len });
        }
        self.active_candidate_index = index;
        self.pending_days = None;
        Ok(())
    }

    /// Move `delta` candidates forward or back, wrapping at either end.
    /// Returns the new active index.
    pub fn navigate(&mut self, delta: isize) -> Result<usize, SelectionError> {
        let len = self.active_pool_len()?;
        let next = (self.active_candidate_index as isize + delta).rem_euclid(len as isize);
        self.active_candidate_index = next as usize;
        self.pending_days = None;
        Ok(self.active_candidate_index)
    }

    /// Stage a day count for the active candidate.
    pub fn choose_day_count(&mut self, days: u8) -> Result<(), SelectionError> {
        let category = self
            .current_category()
            .ok_or(SelectionError::AlreadyComplete)?;
        if self.active_candidate().is_none() {
            return Err(SelectionError::NoActiveCandidate);
        }

        let remaining = self.remaining_days(category);
        if days == 0 || days > remaining {
            return Err(SelectionError::InvalidDayCount {
                requested: days,
                remaining,
            });
        }

        self.pending_days = Some(days);
        Ok(())
    }

    /// Record the active candidate for the staged number of days.
    pub fn commit(&mut self) -> Result<CommitOutcome, SelectionError> {
        let category = self
            .current_category()
            .ok_or(SelectionError::AlreadyComplete)?;
        let days = self.pending_days.ok_or(SelectionError::NoPendingDays)?;
        let entry = self
            .active_candidate()
            .ok_or(SelectionError::NoActiveCandidate)?;

        let allocated = self.days_allocated(category);
        if days == 0 || allocated + days > TOTAL_DAYS {
            return Err(SelectionError::ExceedsWeek {
                requested: days,
                allocated,
            });
        }

        let selection = CommittedSelection::from_entry(entry, days);
        self.history.push(UndoRecord {
            category,
            selection: selection.clone(),
            previous_category_index: self.current_category_index,
            previous_candidate_index: self.active_candidate_index,
        });

        let slot = &mut self.slots[category.index()];
        slot.selections.push(selection);
        slot.days_allocated += days;
        let filled = slot.days_allocated == TOTAL_DAYS;
        self.pending_days = None;

        if filled {
            self.current_category_index = self.next_unfilled_from(category.index() + 1);
            self.active_candidate_index = 0;
        }

        let outcome = CommitOutcome {
            category,
            menu_name: self.history[self.history.len() - 1].selection.menu_name.clone(),
            days_used: days,
            category_filled: filled,
        };
        tracing::debug!(
            "Committed '{}' for {} days to {}",
            outcome.menu_name,
            days,
            category.key()
        );
        Ok(outcome)
    }

    /// Discard the staged day count, or else revert the most recent commit.
    pub fn undo(&mut self) -> UndoOutcome {
        if self.pending_days.take().is_some() {
            return UndoOutcome::ClearedPending;
        }

        let Some(record) = self.history.pop() else {
            return UndoOutcome::Nothing;
        };

        let slot = &mut self.slots[record.category.index()];
        if let Some(removed) = slot.selections.pop() {
            slot.days_allocated = slot.days_allocated.saturating_sub(removed.days_used);
        }

        self.current_category_index = record.previous_category_index.min(CATEGORY_COUNT);
        self.active_candidate_index = record.previous_candidate_index;

        tracing::debug!(
            "Reverted '{}' ({} days) from {}",
            record.selection.menu_name,
            record.selection.days_used,
            record.category.key()
        );
        UndoOutcome::Reverted(record)
    }

    /// Fill the whole week with the first catalog menu of each category.
    ///
    /// The second snack slot takes the second snack when there is one.
    /// Replaces any existing selection and clears the undo history. Returns
    /// the categories left empty because their bucket has no menus.
    pub fn autofill(&mut self, catalog: &Catalog) -> Vec<Category> {
        let mut missing = Vec::new();

        for category in Category::ALL {
            let bucket = catalog.bucket(category.meal_kind());
            let pick = match category {
                Category::Snack2 => bucket.get(1).or(bucket.first()),
                _ => bucket.first(),
            };

            let slot = &mut self.slots[category.index()];
            slot.selections.clear();
            slot.days_allocated = 0;

            let Some(menu) = pick else {
                missing.push(category);
                continue;
            };

            let source_id = slot
                .pool
                .iter()
                .find(|entry| entry.menu == *menu)
                .map(|entry| entry.unique_id.clone())
                .unwrap_or_default();

            slot.selections.push(CommittedSelection {
                menu_name: menu.menu_name.clone(),
                days_used: TOTAL_DAYS,
                dishes: menu.dishes.clone(),
                source_id,
            });
            slot.days_allocated = TOTAL_DAYS;
        }

        self.history.clear();
        self.pending_days = None;
        self.active_candidate_index = 0;
        self.current_category_index = self.next_unfilled_from(0);
        missing
    }

    /// First unfilled category at or after `start`, wrapping around; the
    /// complete index when every category is full.
    fn next_unfilled_from(&self, start: usize) -> usize {
        (start..CATEGORY_COUNT)
            .chain(0..start.min(CATEGORY_COUNT))
            .find(|i| self.slots[*i].days_allocated < TOTAL_DAYS)
            .unwrap_or(CATEGORY_COUNT)
    }

    /// Check structural invariants of a deserialized state.
    pub(crate) fn validate(&self) -> Result<(), String> {
        for category in Category::ALL {
            let slot = self.slot(category);
            if slot.days_allocated > TOTAL_DAYS {
                return Err(format!(
                    "{} has {} days allocated",
                    category.key(),
                    slot.days_allocated
                ));
            }
            if let Some(bad) = slot
                .selections
                .iter()
                .find(|s| s.days_used == 0 || s.days_used > TOTAL_DAYS)
            {
                return Err(format!(
                    "{} selection '{}' uses {} days",
                    category.key(),
                    bad.menu_name,
                    bad.days_used
                ));
            }
            let sum: u32 = slot.selections.iter().map(|s| s.days_used as u32).sum();
            if sum != slot.days_allocated as u32 {
                return Err(format!(
                    "{} selections sum to {} but {} days are allocated",
                    category.key(),
                    sum,
                    slot.days_allocated
                ));
            }
            let recorded = self
                .history
                .iter()
                .filter(|r| r.category == category)
                .count();
            if recorded > slot.selections.len() {
                return Err(format!(
                    "undo history has {} records for {} but only {} selections",
                    recorded,
                    category.key(),
                    slot.selections.len()
                ));
            }
        }

        if self.current_category_index > CATEGORY_COUNT {
            return Err(format!(
                "category index {} out of range",
                self.current_category_index
            ));
        }
        if let Some(record) = self
            .history
            .iter()
            .find(|r| r.previous_category_index >= CATEGORY_COUNT)
        {
            return Err(format!(
                "undo record points at category index {}",
                record.previous_category_index
            ));
        }

        Ok(())
    }

    /// Default view-level fields that are out of range instead of rejecting
    /// the whole state.
    pub(crate) fn normalize(&mut self) {
        let at_index_full = self
            .current_category()
            .is_some_and(|c| self.remaining_days(c) == 0);
        let past_end_incomplete =
            self.current_category_index >= CATEGORY_COUNT && !self.is_complete();
        if at_index_full || past_end_incomplete {
            self.current_category_index = self.next_unfilled_from(self.current_category_index);
            self.active_candidate_index = 0;
        }

        match self.current_category() {
            Some(category) => {
                if self.active_candidate_index >= self.pool(category).len() {
                    self.active_candidate_index = 0;
                }
                let remaining = self.remaining_days(category);
                if self.pending_days.is_some_and(|d| d == 0 || d > remaining) {
                    self.pending_days = None;
                }
            }
            None => {
                self.active_candidate_index = 0;
                self.pending_days = None;
            }
        }

        self.version = SCHEMA_VERSION;
    }
}
