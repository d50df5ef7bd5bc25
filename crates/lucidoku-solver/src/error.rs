//! Error types for the technique-based solving engine.

use derive_more::{Display, Error, From};
use lucidoku_core::ConsistencyError;

/// An error produced while applying or searching for solving techniques.
#[derive(Debug, Display, Error, From, Clone, Copy, PartialEq, Eq)]
pub enum SolverError {
    /// The candidate grid is logically inconsistent (a puzzle contradiction,
    /// not a programmer error): an empty candidate set or a duplicate solved
    /// value within a house.
    #[display("{_0}")]
    Inconsistent(ConsistencyError),
}
