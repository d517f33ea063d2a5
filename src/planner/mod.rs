pub mod constants;
pub mod machine;
pub mod search;
pub mod shopping;

pub use constants::*;
pub use machine::{CategorySlot, CommitOutcome, SelectionState, Step, UndoOutcome};
pub use search::{SearchMatch, search_pool};
pub use shopping::{ShoppingItem, shopping_list};
