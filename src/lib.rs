pub mod catalog;
pub mod cli;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;
pub mod session;
pub mod state;

#[cfg(test)]
#[macro_use]
extern crate assert_float_eq;

pub use error::{PlannerError, Result, SelectionError};
pub use models::{Category, MenuItem};
pub use planner::SelectionState;
pub use session::{Notice, Session};
