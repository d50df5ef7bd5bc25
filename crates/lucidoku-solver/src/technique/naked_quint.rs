use lucidoku_core::{ConsistencyError, DigitPositions, DigitSet, House};

use crate::{
    SolverError, TechniqueGrid,
    technique::{
        BoxedTechniqueStep, ConditionCells, ConditionDigitCells, Technique, TechniqueApplication,
        TechniqueStep,
    },
};

use super::BoxedTechnique;

const NAME: &str = "Naked Quint";

/// A technique that removes candidates using a naked quint within a house.
///
/// A "naked quint" occurs when five cells in a row, column, or box contain
/// only five candidates in total. Those five digits can be eliminated from
/// all other cells in that house.
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedQuint {}

impl NakedQuint {
    /// Creates a new `NakedQuint` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

/// A step describing a naked quint and its candidate eliminations.
#[derive(Debug, Clone)]
pub struct NakedQuintStep {
    positions: DigitPositions,
    digits: DigitSet,
    eliminate_positions: DigitPositions,
}

impl NakedQuintStep {
    /// Creates a new `NakedQuintStep`.
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

impl TechniqueStep for NakedQuintStep {
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

impl Technique for NakedQuint {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_step(&self, grid: &TechniqueGrid) -> Result<Option<BoxedTechniqueStep>, SolverError> {
        let classes = grid.classify_cells::<6>();
        let quint_candidate_cells = classes[2] | classes[3] | classes[4] | classes[5];
        if quint_candidate_cells.len() < 5 {
            return Ok(None);
        }
        for house in House::ALL {
            let quint_in_house = quint_candidate_cells & house.positions();
            if quint_in_house.len() < 5 {
                continue;
            }
            for (pos1, remaining_pos1) in quint_in_house.pivots_with_following() {
                let digits1 = grid.candidates_at(pos1);
                for (pos2, remaining_pos2) in remaining_pos1.pivots_with_following() {
                    let digits12 = digits1 | grid.candidates_at(pos2);
                    if digits12.len() > 5 {
                        continue;
                    }
                    for (pos3, remaining_pos3) in remaining_pos2.pivots_with_following() {
                        let digits123 = digits12 | grid.candidates_at(pos3);
                        if digits123.len() > 5 {
                            continue;
                        }
                        for (pos4, remaining_pos4) in remaining_pos3.pivots_with_following() {
                            let digits1234 = digits123 | grid.candidates_at(pos4);
                            if digits1234.len() > 5 {
                                continue;
                            }
                            for (pos5, remaining_pos5) in remaining_pos4.pivots_with_following() {
                                let digits12345 = digits1234 | grid.candidates_at(pos5);
                                if digits12345.len() > 5 {
                                    continue;
                                }
                                if digits12345.len() < 5 {
                                    return Err(
                                        ConsistencyError::CandidateConstraintViolation.into()
                                    );
                                }

                                // Positions smaller than `pos5` are checked in earlier
                                // combinations, so only the remaining positions need
                                // validating here.
                                let has_sixth_cell = remaining_pos5
                                    .iter()
                                    .any(|pos| grid.candidates_at(pos).is_subset(digits12345));
                                if has_sixth_cell {
                                    return Err(
                                        ConsistencyError::CandidateConstraintViolation.into()
                                    );
                                }

                                let mut eliminate_positions = house.positions();
                                eliminate_positions.remove(pos1);
                                eliminate_positions.remove(pos2);
                                eliminate_positions.remove(pos3);
                                eliminate_positions.remove(pos4);
                                eliminate_positions.remove(pos5);
                                if grid.would_remove_candidate_set_with_mask_change(
                                    eliminate_positions,
                                    digits12345,
                                ) {
                                    return Ok(Some(Box::new(NakedQuintStep::new(
                                        DigitPositions::from_iter([
                                            pos1, pos2, pos3, pos4, pos5,
                                        ]),
                                        digits12345,
                                        eliminate_positions,
                                    ))));
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(None)
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let classes = grid.classify_cells::<6>();
        let quint_candidate_cells = classes[2] | classes[3] | classes[4] | classes[5];
        if quint_candidate_cells.len() < 5 {
            return Ok(false);
        }
        let mut changed = false;
        for house in House::ALL {
            let quint_in_house = quint_candidate_cells & house.positions();
            if quint_in_house.len() < 5 {
                continue;
            }
            for (pos1, remaining_pos1) in quint_in_house.pivots_with_following() {
                let digits1 = grid.candidates_at(pos1);
                for (pos2, remaining_pos2) in remaining_pos1.pivots_with_following() {
                    let digits12 = digits1 | grid.candidates_at(pos2);
                    if digits12.len() > 5 {
                        continue;
                    }
                    for (pos3, remaining_pos3) in remaining_pos2.pivots_with_following() {
                        let digits123 = digits12 | grid.candidates_at(pos3);
                        if digits123.len() > 5 {
                            continue;
                        }
                        for (pos4, remaining_pos4) in remaining_pos3.pivots_with_following() {
                            let digits1234 = digits123 | grid.candidates_at(pos4);
                            if digits1234.len() > 5 {
                                continue;
                            }
                            for (pos5, remaining_pos5) in remaining_pos4.pivots_with_following() {
                                let digits12345 = digits1234 | grid.candidates_at(pos5);
                                if digits12345.len() > 5 {
                                    continue;
                                }
                                if digits12345.len() < 5 {
                                    return Err(
                                        ConsistencyError::CandidateConstraintViolation.into()
                                    );
                                }

                                let has_sixth_cell = remaining_pos5
                                    .iter()
                                    .any(|pos| grid.candidates_at(pos).is_subset(digits12345));
                                if has_sixth_cell {
                                    return Err(
                                        ConsistencyError::CandidateConstraintViolation.into()
                                    );
                                }

                                let mut eliminate_positions = house.positions();
                                eliminate_positions.remove(pos1);
                                eliminate_positions.remove(pos2);
                                eliminate_positions.remove(pos3);
                                eliminate_positions.remove(pos4);
                                eliminate_positions.remove(pos5);
                                changed |= grid.remove_candidate_set_with_mask(
                                    eliminate_positions,
                                    digits12345,
                                );
                            }
                        }
                    }
                }
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use lucidoku_core::{CandidateGrid, Digit, Position};

    use super::*;
    use crate::testing::TechniqueTester;

    #[test]
    fn test_eliminates_quint_candidates_in_row() {
        let mut grid = CandidateGrid::new();
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(1, 0);
        let pos3 = Position::new(2, 0);
        let pos4 = Position::new(3, 0);
        let pos5 = Position::new(4, 0);
        let target = Position::new(8, 0);

        let quint_digits = [Digit::D1, Digit::D2, Digit::D3, Digit::D4, Digit::D5];
        for pos in [pos1, pos2, pos3, pos4, pos5] {
            for digit in Digit::ALL {
                if !quint_digits.contains(&digit) {
                    grid.remove_candidate(pos, digit);
                }
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&NakedQuint::new())
            .assert_removed_includes(target, quint_digits);
    }

    #[test]
    fn test_no_change_when_no_naked_quints() {
        let grid = CandidateGrid::new();

        TechniqueTester::new(grid)
            .apply_once(&NakedQuint::new())
            .assert_no_change(Position::new(0, 0))
            .assert_no_change(Position::new(4, 4));
    }
}
