use thiserror::Error;

/// Rejected selection commands. None of these mutate the selection state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("All categories are already complete")]
    AlreadyComplete,

    #[error("No menu is available for this category")]
    NoActiveCandidate,

    #[error("Menu {index} is out of range (pool has {len} menus)")]
    CandidateOutOfRange { index: usize, len: usize },

    #[error("Invalid day count {requested}: choose between 1 and {remaining}")]
    InvalidDayCount { requested: u8, remaining: u8 },

    #[error("Choose a number of days before confirming")]
    NoPendingDays,

    #[error("Committing {requested} days would exceed the week ({allocated} already allocated)")]
    ExceedsWeek { requested: u8, allocated: u8 },
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Cannot use prompt template {path}: {reason}")]
    Template { path: String, reason: String },

    #[error("Could not decode shared state: {0}")]
    Decode(String),

    #[error("The loaded files contain no valid menus")]
    NoValidMenus,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
