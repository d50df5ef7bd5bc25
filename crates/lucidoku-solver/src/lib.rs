//! Human-style Sudoku solving techniques.
//!
//! This crate builds a candidate-elimination engine on top of
//! [`lucidoku_core`]: a [`TechniqueGrid`] holding the puzzle's candidate
//! state, a fixed-order list of named inference [`technique`]s ranging from
//! Naked Single through chain and coloring techniques, and a
//! [`TechniqueSolver`] driver that applies them one step at a time until the
//! puzzle is solved, found contradictory, or stuck.
//!
//! Each technique produces a [`TechniqueStep`] describing what it found and
//! what it changed, which is the basis for an auditable solving transcript.

mod error;
pub mod technique;
mod technique_grid;
mod technique_solver;
mod technique_step;

pub mod testing;

pub use error::SolverError;
pub use technique::traits::{BoxedTechnique, Technique, TechniqueTier};
pub use technique_grid::TechniqueGrid;
pub use technique_solver::{
    SolveOptions, SolveOutcome, SolverState, StepRecord, TechniqueSolver, TechniqueSolverStats,
};
pub use technique_step::{
    BoxedTechniqueStep, ConditionCells, ConditionDigitCells, TechniqueApplication, TechniqueStep,
    TechniqueStepData,
};
