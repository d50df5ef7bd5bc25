use lucidoku_core::{ConsistencyError, DigitPositions, DigitSet, House};

use crate::{
    SolverError, TechniqueGrid,
    technique::{
        BoxedTechniqueStep, ConditionCells, ConditionDigitCells, Technique, TechniqueApplication,
        TechniqueStep,
    },
};

use super::BoxedTechnique;

const NAME: &str = "Naked Quad";

/// A technique that removes candidates using a naked quad within a house.
///
/// A "naked quad" occurs when four cells in a row, column, or box contain
/// only four candidates in total. Those four digits can be eliminated from
/// all other cells in that house.
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedQuad {}

impl NakedQuad {
    /// Creates a new `NakedQuad` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

/// A step describing a naked quad and its candidate eliminations.
#[derive(Debug, Clone)]
pub struct NakedQuadStep {
    positions: DigitPositions,
    digits: DigitSet,
    eliminate_positions: DigitPositions,
}

impl NakedQuadStep {
    /// Creates a new `NakedQuadStep`.
    #[must_use]
    pub fn new(
        positions: DigitPositions,
        digits: DigitSet,
        eliminate_positions: DigitPositions,
    ) -> Self {
        Self {
            positions,
            digits,
            eliminate_positions,
        }
    }
}

impl TechniqueStep for NakedQuadStep {
    fn technique_name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechniqueStep {
        Box::new(self.clone())
    }

    fn condition_cells(&self) -> ConditionCells {
        self.positions
    }

    fn condition_digit_cells(&self) -> ConditionDigitCells {
        vec![(self.positions, self.digits)]
    }

    fn application(&self) -> Vec<TechniqueApplication> {
        vec![TechniqueApplication::CandidateElimination {
            positions: self.eliminate_positions,
            digits: self.digits,
        }]
    }
}

impl Technique for NakedQuad {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_step(&self, grid: &TechniqueGrid) -> Result<Option<BoxedTechniqueStep>, SolverError> {
        let classes = grid.classify_cells::<5>();
        let quad_candidate_cells = classes[2] | classes[3] | classes[4];
        if quad_candidate_cells.len() < 4 {
            return Ok(None);
        }
        for house in House::ALL {
            let quad_in_house = quad_candidate_cells & house.positions();
            if quad_in_house.len() < 4 {
                continue;
            }
            for (pos1, remaining_pos1) in quad_in_house.pivots_with_following() {
                let digits1 = grid.candidates_at(pos1);
                for (pos2, remaining_pos2) in remaining_pos1.pivots_with_following() {
                    let digits12 = digits1 | grid.candidates_at(pos2);
                    if digits12.len() > 4 {
                        continue;
                    }
                    for (pos3, remaining_pos3) in remaining_pos2.pivots_with_following() {
                        let digits123 = digits12 | grid.candidates_at(pos3);
                        if digits123.len() > 4 {
                            continue;
                        }
                        for (pos4, remaining_pos4) in remaining_pos3.pivots_with_following() {
                            let digits1234 = digits123 | grid.candidates_at(pos4);
                            if digits1234.len() > 4 {
                                continue;
                            }
                            if digits1234.len() < 4 {
                                return Err(ConsistencyError::CandidateConstraintViolation.into());
                            }

                            // Positions smaller than `pos4` are checked in earlier combinations,
                            // so only the remaining positions need to be validated here.
                            let has_fifth_cell = remaining_pos4
                                .iter()
                                .any(|pos| grid.candidates_at(pos).is_subset(digits1234));
                            if has_fifth_cell {
                                return Err(ConsistencyError::CandidateConstraintViolation.into());
                            }

                            let mut eliminate_positions = house.positions();
                            eliminate_positions.remove(pos1);
                            eliminate_positions.remove(pos2);
                            eliminate_positions.remove(pos3);
                            eliminate_positions.remove(pos4);
                            if grid.would_remove_candidate_set_with_mask_change(
                                eliminate_positions,
                                digits1234,
                            ) {
                                return Ok(Some(Box::new(NakedQuadStep::new(
                                    DigitPositions::from_iter([pos1, pos2, pos3, pos4]),
                                    digits1234,
                                    eliminate_positions,
                                ))));
                            }
                        }
                    }
                }
            }
        }
        Ok(None)
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let classes = grid.classify_cells::<5>();
        let quad_candidate_cells = classes[2] | classes[3] | classes[4];
        if quad_candidate_cells.len() < 4 {
            return Ok(false);
        }
        let mut changed = false;
        for house in House::ALL {
            let quad_in_house = quad_candidate_cells & house.positions();
            if quad_in_house.len() < 4 {
                continue;
            }
            for (pos1, remaining_pos1) in quad_in_house.pivots_with_following() {
                let digits1 = grid.candidates_at(pos1);
                for (pos2, remaining_pos2) in remaining_pos1.pivots_with_following() {
                    let digits12 = digits1 | grid.candidates_at(pos2);
                    if digits12.len() > 4 {
                        continue;
                    }
                    for (pos3, remaining_pos3) in remaining_pos2.pivots_with_following() {
                        let digits123 = digits12 | grid.candidates_at(pos3);
                        if digits123.len() > 4 {
                            continue;
                        }
                        for (pos4, remaining_pos4) in remaining_pos3.pivots_with_following() {
                            let digits1234 = digits123 | grid.candidates_at(pos4);
                            if digits1234.len() > 4 {
                                continue;
                            }
                            if digits1234.len() < 4 {
                                return Err(ConsistencyError::CandidateConstraintViolation.into());
                            }

                            // Positions smaller than `pos4` are checked in earlier combinations,
                            // so only the remaining positions need to be validated here.
                            let has_fifth_cell = remaining_pos4
                                .iter()
                                .any(|pos| grid.candidates_at(pos).is_subset(digits1234));
                            if has_fifth_cell {
                                return Err(ConsistencyError::CandidateConstraintViolation.into());
                            }

                            let mut eliminate_positions = house.positions();
                            eliminate_positions.remove(pos1);
                            eliminate_positions.remove(pos2);
                            eliminate_positions.remove(pos3);
                            eliminate_positions.remove(pos4);
                            changed |= grid
                                .remove_candidate_set_with_mask(eliminate_positions, digits1234);
                        }
                    }
                }
            }
        }
        Ok(changed)
    }
}
