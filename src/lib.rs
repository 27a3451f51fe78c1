pub mod fill;
pub mod grid;
pub mod manager;
pub mod parse;
pub mod scan;
pub mod search;
pub mod store;

pub use crate::fill::{FillOptions, FillSolver, SlotPolicy};
pub use crate::grid::{Direction, Grid};
pub use crate::manager::WordListManager;
pub use crate::store::{Constraint, CrossSlotConstraint, SearchResult, WordEntry, WordStore};

use thiserror::Error;

/// Word entries are strictly shorter than this bound. Crossing slots whose
/// length falls outside the storable range can never hold a dictionary entry
/// and are skipped during cross-slot checking.
pub const MAX_WORD_LENGTH: usize = 8;

/// Upper bound on simultaneously active word stores.
pub const MAX_WORD_LISTS: usize = 64;

/// Sentinel for a cell whose letter is not yet known.
pub const MISSING_CHAR: char = ' ';

/// A blocked cell.
pub const BLOCK_CHAR: char = '*';

/// A cell that is not part of the puzzle at all.
pub const VOID_CHAR: char = '.';

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed grid: {0}")]
    MalformedGrid(String),
    #[error("all word list slots are in use")]
    TooManyWordLists,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
