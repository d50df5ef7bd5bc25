//! Error types for parsing and validating Sudoku grids.

use derive_more::{Display, Error};

/// An error produced while parsing a [`DigitGrid`](crate::DigitGrid) from text.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The input did not contain exactly 81 cell characters.
    #[display("expected 81 cells, found {found}")]
    WrongCellCount {
        /// The number of cell characters actually found.
        found: usize,
    },
    /// A multi-line input did not contain exactly 9 lines.
    #[display("expected 9 lines, found {found}")]
    WrongLineCount {
        /// The number of lines actually found.
        found: usize,
    },
    /// A line in a multi-line input was not exactly 9 characters long.
    #[display("line {line} must have exactly 9 characters, found {found}")]
    WrongLineLength {
        /// The 0-8 index of the offending line.
        line: usize,
        /// The number of characters actually found on that line.
        found: usize,
    },
    /// A character could not be interpreted as a digit or an empty cell.
    #[display("invalid character {char:?} at cell index {index}")]
    InvalidChar {
        /// The offending character.
        char: char,
        /// The 0-80 cell index at which the character occurred.
        index: usize,
    },
}

/// An error describing why a candidate grid is logically inconsistent.
///
/// These are structural contradictions the candidate-elimination engine
/// can detect on its own, without resorting to search.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyError {
    /// Two cells in the same house are both decided to the same digit.
    #[display("duplicate value in a house")]
    DuplicateValueInHouse,
    /// A cell has no remaining candidates.
    #[display("cell has an empty candidate set")]
    EmptyCandidateSet,
    /// An elimination (or the grid state implying it) would force a house to
    /// place more copies of a digit than it has room for.
    #[display("candidate elimination would violate a house constraint")]
    CandidateConstraintViolation,
}
