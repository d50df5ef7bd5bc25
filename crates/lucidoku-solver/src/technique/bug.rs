use lucidoku_core::{Digit, DigitPositions, DigitSet, House, Position};

use crate::{
    BoxedTechnique, BoxedTechniqueStep, SolverError, Technique, TechniqueApplication,
    TechniqueGrid, TechniqueStepData, TechniqueTier,
};

const NAME: &str = "Bi-Value Universal Grave";

/// A technique that solves a cell using the Bi-Value Universal Grave pattern.
///
/// If every unsolved cell has exactly two candidates except for a single
/// cell with three, the puzzle would otherwise have multiple solutions
/// unless one of that cell's three candidates is forced by appearing
/// exactly three times in each of its row, column, and box. That candidate
/// is placed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bug {}

impl Bug {
    /// Creates a new `Bug` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl Bug {
    fn find_pivot(grid: &TechniqueGrid) -> Option<(Position, Digit)> {
        let classes = grid.classify_cells::<4>();
        let accounted = classes[0] | classes[1] | classes[2] | classes[3];
        if accounted.len() != 81 || !classes[0].is_empty() {
            return None;
        }
        let triple_cells = classes[3];
        if triple_cells.len() != 1 {
            return None;
        }
        let pivot = triple_cells.iter().next().expect("checked len() == 1");
        let pivot_digits = grid.candidates_at(pivot);
        let houses = [
            House::Row { y: pivot.y() },
            House::Column { x: pivot.x() },
            House::Box {
                index: pivot.box_index(),
            },
        ];
        for digit in pivot_digits {
            let digit_positions = grid.digit_positions(digit);
            if houses
                .iter()
                .all(|house| (digit_positions & house.positions()).len() == 3)
            {
                return Some((pivot, digit));
            }
        }
        None
    }
}

impl Technique for Bug {
    fn name(&self) -> &'static str {
        NAME
    }

    fn tier(&self) -> TechniqueTier {
        TechniqueTier::Chain
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_step(&self, grid: &TechniqueGrid) -> Result<Option<BoxedTechniqueStep>, SolverError> {
        let Some((pivot, digit)) = Self::find_pivot(grid) else {
            return Ok(None);
        };
        let mut after = grid.clone();
        after.place(pivot, digit);
        Ok(Some(Box::new(TechniqueStepData::from_diff_with_extra(
            NAME,
            DigitPositions::from_elem(pivot),
            vec![(DigitPositions::from_elem(pivot), DigitSet::from_elem(digit))],
            grid,
            &after,
            vec![TechniqueApplication::Placement {
                position: pivot,
                digit,
            }],
        ))))
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let Some((pivot, digit)) = Self::find_pivot(grid) else {
            return Ok(false);
        };
        Ok(grid.place(pivot, digit))
    }
}

#[cfg(test)]
mod tests {
    use lucidoku_core::{CandidateGrid, Digit, Position};

    use super::*;
    use crate::testing::TechniqueTester;

    #[test]
    fn test_no_change_on_fresh_grid() {
        let grid = CandidateGrid::new();

        TechniqueTester::new(grid)
            .apply_once(&Bug::new())
            .assert_no_change(Position::new(0, 0))
            .assert_no_change(Position::new(4, 4));
    }
}
