use std::ops::ControlFlow;

use lucidoku_core::{ConsistencyError, DigitPositions, DigitSet, House};

use crate::{
    SolverError, TechniqueGrid,
    technique::{BoxedTechnique, BoxedTechniqueStep, Technique, TechniqueStepData},
};

const NAME: &str = "Hidden Quad";

/// A technique that removes candidates using a hidden quad within a house.
///
/// A "hidden quad" occurs when four digits can only appear in the same four
/// cells of a row, column, or box. Other candidates in those four cells can be
/// removed.
///
/// # Examples
///
/// ```
/// use lucidoku_solver::{
///     TechniqueGrid,
///     technique::{HiddenQuad, Technique},
/// };
///
/// let mut grid = TechniqueGrid::new();
/// let technique = HiddenQuad::new();
///
/// // Apply the technique
/// let changed = technique.apply(&mut grid)?;
/// # Ok::<(), lucidoku_solver::SolverError>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenQuad {}

impl HiddenQuad {
    /// Creates a new `HiddenQuad` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl HiddenQuad {
    fn apply_with_control_flow<F>(
        grid: &mut TechniqueGrid,
        mut on_condition: F,
    ) -> Result<Option<BoxedTechniqueStep>, SolverError>
    where
        F: for<'a> FnMut(
            &'a mut TechniqueGrid,
            DigitPositions,
            DigitSet,
        ) -> ControlFlow<BoxedTechniqueStep>,
    {
        for house in House::ALL {
            let house_positions = house.positions();
            for (d1, remaining_digits1) in DigitSet::FULL.pivots_with_following().take(6) {
                let d1_positions = grid.digit_positions(d1) & house_positions;
                if d1_positions.is_empty() || d1_positions.len() > 4 {
                    continue;
                }
                let digits1 = DigitSet::from_elem(d1);
                for (d2, remaining_digits2) in remaining_digits1
                    .pivots_with_following()
                    .take(remaining_digits1.len() - 2)
                {
                    let d2_positions = grid.digit_positions(d2) & house_positions;
                    if d2_positions.is_empty() {
                        continue;
                    }
                    let pair_positions = d1_positions | d2_positions;
                    if pair_positions.len() > 4 {
                        continue;
                    }
                    let digits12 = digits1 | DigitSet::from_elem(d2);
                    for (d3, remaining_digits3) in remaining_digits2
                        .pivots_with_following()
                        .take(remaining_digits2.len() - 1)
                    {
                        let d3_positions = grid.digit_positions(d3) & house_positions;
                        if d3_positions.is_empty() {
                            continue;
                        }
                        let triple_positions = d1_positions | d2_positions | d3_positions;
                        if triple_positions.len() > 4 {
                            continue;
                        }
                        let digits123 = digits12 | DigitSet::from_elem(d3);
                        for (d4, remaining_digits4) in remaining_digits3.pivots_with_following() {
                            let d4_positions = grid.digit_positions(d4) & house_positions;
                            if d4_positions.is_empty() {
                                continue;
                            }
                            let quad_positions = triple_positions | d4_positions;
                            if quad_positions.len() > 4 {
                                continue;
                            }
                            if quad_positions.len() < 4 {
                                return Err(ConsistencyError::CandidateConstraintViolation.into());
                            }

                            // Digits smaller than `d4` are checked in earlier combinations,
                            // so only the remaining digits need to be validated here.
                            for d in remaining_digits4 {
                                let other_positions = grid.digit_positions(d) & house_positions;
                                if !other_positions.is_empty()
                                    && other_positions.is_subset(quad_positions)
                                {
                                    return Err(
                                        ConsistencyError::CandidateConstraintViolation.into()
                                    );
                                }
                            }

                            let digits1234 = digits123 | DigitSet::from_elem(d4);
                            let eliminate_positions = quad_positions;
                            if grid.remove_candidate_set_with_mask(eliminate_positions, !digits1234)
                                && let ControlFlow::Break(step) =
                                    on_condition(grid, eliminate_positions, digits1234)
                            {
                                return Ok(Some(step));
                            }
                        }
                    }
                }
            }
        }
        Ok(None)
    }
}

impl Technique for HiddenQuad {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_step(&self, grid: &TechniqueGrid) -> Result<Option<BoxedTechniqueStep>, SolverError> {
        let mut after_grid = grid.clone();
        let step =
            Self::apply_with_control_flow(&mut after_grid, |after_grid, positions, digits| {
                ControlFlow::Break(Box::new(TechniqueStepData::from_diff(
                    NAME,
                    positions,
                    vec![(positions, digits)],
                    grid,
                    after_grid,
                )))
            })?;
        Ok(step)
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let mut changed = false;
        Self::apply_with_control_flow(grid, |_, _, _| {
            changed = true;
            ControlFlow::Continue(())
        })?;
        Ok(changed)
    }
}
