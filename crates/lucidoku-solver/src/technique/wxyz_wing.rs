use lucidoku_core::{Digit, DigitPositions, DigitSet, House, Position};

use crate::{
    BoxedTechnique, BoxedTechniqueStep, SolverError, Technique, TechniqueGrid, TechniqueStepData,
    TechniqueTier,
};

const NAME: &str = "WXYZ-Wing";

/// A technique that removes candidates using a WXYZ-Wing pattern.
///
/// A "WXYZ-Wing" is four cells, each holding 2 to 4 candidates, drawn from
/// the union of one box and one row-or-column, whose combined candidates
/// number exactly four. If exactly one of those four digits (the
/// non-restricted common digit) has two occurrences among the four cells
/// that are not peers of each other, while every other digit's occurrences
/// are all mutually peers, that digit can be eliminated from any cell that
/// is a peer of every cell containing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct WxyzWing {}

impl WxyzWing {
    /// Creates a new `WxyzWing` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl WxyzWing {
    fn find_elimination(grid: &TechniqueGrid) -> Option<(DigitPositions, Digit, DigitPositions)> {
        for box_index in 0..9u8 {
            let box_ = House::Box { index: box_index };
            let (ox, oy) = Position::box_origin(box_index);
            let lines = [
                House::Row { y: oy },
                House::Row { y: oy + 1 },
                House::Row { y: oy + 2 },
                House::Column { x: ox },
                House::Column { x: ox + 1 },
                House::Column { x: ox + 2 },
            ];
            for line in lines {
                let union_cells = box_.positions() | line.positions();
                let mut candidate_cells = DigitPositions::EMPTY;
                for pos in union_cells {
                    let count = grid.candidates_at(pos).len();
                    if (2..=4).contains(&count) {
                        candidate_cells.insert(pos);
                    }
                }
                if candidate_cells.len() < 4 {
                    continue;
                }

                for (c1, rest1) in candidate_cells.pivots_with_following() {
                    let d1 = grid.candidates_at(c1);
                    for (c2, rest2) in rest1.pivots_with_following() {
                        let d12 = d1 | grid.candidates_at(c2);
                        if d12.len() > 4 {
                            continue;
                        }
                        for (c3, rest3) in rest2.pivots_with_following() {
                            let d123 = d12 | grid.candidates_at(c3);
                            if d123.len() > 4 {
                                continue;
                            }
                            for c4 in rest3 {
                                let d1234 = d123 | grid.candidates_at(c4);
                                if d1234.len() != 4 {
                                    continue;
                                }
                                let cells = [c1, c2, c3, c4];
                                if let Some((n, holders)) =
                                    Self::non_restricted_common_digit(grid, &cells, d1234)
                                {
                                    let mut eliminations = grid.digit_positions(n);
                                    for holder in holders {
                                        eliminations &= holder.house_peers();
                                    }
                                    for cell in cells {
                                        eliminations.remove(cell);
                                    }
                                    if !eliminations.is_empty() {
                                        return Some((
                                            DigitPositions::from_iter(cells),
                                            n,
                                            eliminations,
                                        ));
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        None
    }

    /// Finds the unique non-restricted common digit among the four cells, if any.
    fn non_restricted_common_digit(
        grid: &TechniqueGrid,
        cells: &[Position; 4],
        union_digits: DigitSet,
    ) -> Option<(Digit, DigitPositions)> {
        let mut nrcd = None;
        for digit in union_digits {
            let mut holders = DigitPositions::EMPTY;
            for &cell in cells {
                if grid.candidates_at(cell).contains(digit) {
                    holders.insert(cell);
                }
            }
            let all_peers = holders
                .into_iter()
                .all(|a| holders.into_iter().all(|b| a == b || a.house_peers().contains(b)));
            if !all_peers {
                if nrcd.is_some() {
                    return None;
                }
                nrcd = Some((digit, holders));
            }
        }
        nrcd
    }
}

impl Technique for WxyzWing {
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
        let Some((condition_cells, digit, eliminations)) = Self::find_elimination(grid) else {
            return Ok(None);
        };
        let mut after = grid.clone();
        after.remove_candidate_with_mask(eliminations, digit);
        Ok(Some(Box::new(TechniqueStepData::from_diff(
            NAME,
            condition_cells,
            vec![(condition_cells, DigitSet::from_elem(digit))],
            grid,
            &after,
        ))))
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let Some((_, digit, eliminations)) = Self::find_elimination(grid) else {
            return Ok(false);
        };
        Ok(grid.remove_candidate_with_mask(eliminations, digit))
    }
}
