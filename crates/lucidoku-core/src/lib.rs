//! Core Sudoku data types: digits, positions, houses, and the candidate
//! bitboard that every solving technique reads and mutates.
//!
//! This crate has no notion of a "technique" or a solving loop; it only
//! knows how to represent a board and enforce the structural rules of
//! Sudoku (one digit per row/column/box). [`lucidoku-solver`](../lucidoku_solver/index.html)
//! builds the deductive engine on top of it.

mod candidate_grid;
mod digit;
mod digit_grid;
pub mod error;
mod house;
pub mod index;
mod position;

pub mod containers;

pub use candidate_grid::CandidateGrid;
pub use containers::{DigitPositions, DigitSet, HouseMask};
pub use digit::Digit;
pub use digit_grid::DigitGrid;
pub use error::{ConsistencyError, ParseError};
pub use house::{House, all_digit_houses};
pub use position::Position;
