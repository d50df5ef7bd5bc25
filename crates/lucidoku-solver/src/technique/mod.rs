//! Sudoku solving techniques.
//!
//! This module provides the named inference techniques that a human solver
//! reaches for, roughly in escalating order of difficulty: singles, locked
//! candidates and subsets, fish patterns, and finally chain and coloring
//! techniques. Each implements the [`Technique`] trait and can be applied to
//! a [`TechniqueGrid`].

pub mod traits;

pub use traits::{BoxedTechnique, Technique, TechniqueTier};

pub use crate::technique_step::{
    BoxedTechniqueStep, ConditionCells, ConditionDigitCells, TechniqueApplication, TechniqueStep,
    TechniqueStepData,
};
pub use crate::TechniqueGrid;

pub(crate) use crate::technique_step::collect_applications_from_diff;

pub mod chain;

mod bug;
mod hidden_pair;
mod hidden_quad;
mod hidden_single;
mod hidden_triple;
mod jellyfish;
mod locked_candidates;
mod medusa;
mod naked_pair;
mod naked_quad;
mod naked_quint;
mod naked_single;
mod naked_triple;
mod singles_chain;
mod swordfish;
mod unique_rectangle;
mod wxyz_wing;
mod x_cycle;
mod x_wing;
mod xy_chain;
mod xyz_wing;
mod y_wing;

pub use bug::Bug;
pub use hidden_pair::HiddenPair;
pub use hidden_quad::HiddenQuad;
pub use hidden_single::HiddenSingle;
pub use hidden_triple::HiddenTriple;
pub use jellyfish::Jellyfish;
pub use locked_candidates::LockedCandidates;
pub use medusa::Medusa3D;
pub use naked_pair::NakedPair;
pub use naked_quad::NakedQuad;
pub use naked_quint::NakedQuint;
pub use naked_single::NakedSingle;
pub use naked_triple::NakedTriple;
pub use singles_chain::{SinglesChainRule2, SinglesChainRule4};
pub use swordfish::Swordfish;
pub use unique_rectangle::UniqueRectangle;
pub use wxyz_wing::WxyzWing;
pub use x_cycle::XCycle;
pub use x_wing::XWing;
pub use xy_chain::XyChain;
pub use xyz_wing::XyzWing;
pub use y_wing::YWing;

/// Returns every technique in the fixed order the solver escalates through.
///
/// Basic singles and subsets come first, then fish patterns, then chain and
/// coloring techniques.
/// [`TechniqueSolver::with_all_techniques`](crate::TechniqueSolver::with_all_techniques)
/// uses this list.
#[must_use]
pub fn all_techniques() -> Vec<BoxedTechnique> {
    vec![
        Box::new(NakedSingle::new()),
        Box::new(HiddenSingle::new()),
        Box::new(LockedCandidates::new()),
        Box::new(NakedPair::new()),
        Box::new(HiddenPair::new()),
        Box::new(NakedTriple::new()),
        Box::new(HiddenTriple::new()),
        Box::new(NakedQuad::new()),
        Box::new(HiddenQuad::new()),
        Box::new(NakedQuint::new()),
        Box::new(XWing::new()),
        Box::new(SinglesChainRule2::new()),
        Box::new(SinglesChainRule4::new()),
        Box::new(Swordfish::new()),
        Box::new(YWing::new()),
        Box::new(XyzWing::new()),
        Box::new(Bug::new()),
        Box::new(XyChain::new()),
        Box::new(Medusa3D::new()),
        Box::new(Jellyfish::new()),
        Box::new(UniqueRectangle::new()),
        Box::new(XCycle::new()),
        Box::new(WxyzWing::new()),
    ]
}

/// Returns the minimal technique set needed to handle easy puzzles: the two
/// singles techniques.
///
/// This set remains stable over time, serving as a consistent baseline for
/// benchmarking even as more techniques are added to [`all_techniques`].
#[must_use]
pub fn fundamental_techniques() -> Vec<BoxedTechnique> {
    vec![Box::new(NakedSingle::new()), Box::new(HiddenSingle::new())]
}
