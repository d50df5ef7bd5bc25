use lucidoku_core::{Digit, DigitPositions, DigitSet, HouseMask};

use crate::{
    BoxedTechnique, BoxedTechniqueStep, SolverError, Technique, TechniqueGrid, TechniqueStepData,
    TechniqueTier,
};

const NAME: &str = "Swordfish";
const K: u32 = 3;

/// A technique that removes candidates using a Swordfish pattern.
///
/// A "Swordfish" occurs when a digit's candidates in three rows (or three
/// columns) are confined to the same three columns (or rows). The digit can
/// then be eliminated from the rest of those columns (or rows).
#[derive(Debug, Default, Clone, Copy)]
pub struct Swordfish {}

impl Swordfish {
    /// Creates a new `Swordfish` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl Swordfish {
    /// Scans rows (`lines_are_rows = true`) or columns (`false`) for a fish
    /// of size `K` in `digit`, returning the eliminations it would make.
    fn find_fish(
        grid: &TechniqueGrid,
        digit: Digit,
        lines_are_rows: bool,
    ) -> Option<(DigitPositions, DigitPositions)> {
        let mut candidate_lines = HouseMask::EMPTY;
        let mut masks = [HouseMask::EMPTY; 9];
        for i in 0..9u8 {
            let mask = if lines_are_rows {
                grid.row_mask(i, digit)
            } else {
                grid.col_mask(i, digit)
            };
            if (2..=K).contains(&mask.len()) {
                candidate_lines.insert(i);
                masks[usize::from(i)] = mask;
            }
        }
        if candidate_lines.len() < K {
            return None;
        }

        for (i1, rest1) in candidate_lines.pivots_with_following() {
            let union1 = masks[usize::from(i1)];
            for (i2, rest2) in rest1.pivots_with_following() {
                let union2 = union1 | masks[usize::from(i2)];
                if union2.len() > K {
                    continue;
                }
                for i3 in rest2 {
                    let union3 = union2 | masks[usize::from(i3)];
                    if union3.len() != K {
                        continue;
                    }

                    let mut covering = DigitPositions::EMPTY;
                    let mut line_positions = DigitPositions::EMPTY;
                    for j in [i1, i2, i3] {
                        line_positions |= if lines_are_rows {
                            DigitPositions::ROW_POSITIONS[usize::from(j)]
                        } else {
                            DigitPositions::COLUMN_POSITIONS[usize::from(j)]
                        };
                    }
                    for c in union3 {
                        covering |= if lines_are_rows {
                            DigitPositions::COLUMN_POSITIONS[usize::from(c)]
                        } else {
                            DigitPositions::ROW_POSITIONS[usize::from(c)]
                        };
                    }
                    let eliminations = grid.digit_positions(digit) & covering & !line_positions;
                    if !eliminations.is_empty() {
                        return Some((line_positions & grid.digit_positions(digit), eliminations));
                    }
                }
            }
        }
        None
    }
}

impl Technique for Swordfish {
    fn name(&self) -> &'static str {
        NAME
    }

    fn tier(&self) -> TechniqueTier {
        TechniqueTier::Fish
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_step(&self, grid: &TechniqueGrid) -> Result<Option<BoxedTechniqueStep>, SolverError> {
        for digit in Digit::ALL {
            for lines_are_rows in [true, false] {
                if let Some((condition_cells, eliminations)) =
                    Self::find_fish(grid, digit, lines_are_rows)
                {
                    let mut after = grid.clone();
                    after.remove_candidate_with_mask(eliminations, digit);
                    return Ok(Some(Box::new(TechniqueStepData::from_diff(
                        NAME,
                        condition_cells,
                        vec![(condition_cells, DigitSet::from_elem(digit))],
                        grid,
                        &after,
                    ))));
                }
            }
        }
        Ok(None)
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let mut changed = false;
        for digit in Digit::ALL {
            for lines_are_rows in [true, false] {
                if let Some((_, eliminations)) = Self::find_fish(grid, digit, lines_are_rows) {
                    changed |= grid.remove_candidate_with_mask(eliminations, digit);
                }
            }
        }
        Ok(changed)
    }
}
