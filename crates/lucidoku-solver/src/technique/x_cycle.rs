use lucidoku_core::{Digit, DigitPositions, DigitSet, House, Position};

use crate::{
    BoxedTechnique, BoxedTechniqueStep, SolverError, Technique, TechniqueApplication,
    TechniqueGrid, TechniqueStepData, TechniqueTier,
    technique::chain::NiceLoop,
};

const NAME: &str = "X-Cycle";

/// A technique that applies a single-digit nice loop.
///
/// A nice loop alternates strong and weak links for one digit around a
/// cycle of cells. An even loop that alternates strictly lets every weak
/// link eliminate the digit from cells that see both of its endpoints. An
/// odd loop with exactly one pair of adjacent strong links forces the digit
/// true at the cell between them; one with exactly one pair of adjacent
/// weak links forces it false there instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct XCycle {}

impl XCycle {
    /// Creates a new `XCycle` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

enum XCycleAction {
    Solve(Position, Digit),
    Eliminate(DigitPositions, Digit),
}

impl XCycle {
    fn is_strong_link(grid: &TechniqueGrid, digit: Digit, a: Position, b: Position) -> bool {
        let houses = [
            (a.y() == b.y()).then(|| House::Row { y: a.y() }),
            (a.x() == b.x()).then(|| House::Column { x: a.x() }),
            (a.box_index() == b.box_index()).then(|| House::Box {
                index: a.box_index(),
            }),
        ];
        houses
            .into_iter()
            .flatten()
            .any(|house| (grid.digit_positions(digit) & house.positions()).len() == 2)
    }

    fn find_action(grid: &TechniqueGrid) -> Option<(DigitPositions, Digit, XCycleAction)> {
        for digit in Digit::ALL {
            for loop_ in NiceLoop::enumerate(grid, digit) {
                let cells = &loop_.cells;
                let n = cells.len();
                if n < 4 {
                    continue;
                }
                let strong: Vec<bool> = (0..n)
                    .map(|i| Self::is_strong_link(grid, digit, cells[i], cells[(i + 1) % n]))
                    .collect();
                let loop_cells = DigitPositions::from_iter(cells.iter().copied());

                if n % 2 == 0 {
                    let alternates = (0..n).all(|i| strong[i] != strong[(i + 1) % n]);
                    if !alternates {
                        continue;
                    }
                    let mut eliminations = DigitPositions::EMPTY;
                    for i in 0..n {
                        if strong[i] {
                            continue;
                        }
                        let a = cells[i];
                        let b = cells[(i + 1) % n];
                        eliminations |=
                            a.house_peers() & b.house_peers() & grid.digit_positions(digit);
                    }
                    eliminations &= !loop_cells;
                    if !eliminations.is_empty()
                        && grid.would_remove_candidate_with_mask_change(eliminations, digit)
                    {
                        return Some((loop_cells, digit, XCycleAction::Eliminate(eliminations, digit)));
                    }
                } else {
                    let mut strong_pivot = None;
                    let mut weak_pivot = None;
                    let mut strong_count = 0;
                    let mut weak_count = 0;
                    for i in 0..n {
                        let prev = strong[(i + n - 1) % n];
                        let cur = strong[i];
                        if prev && cur {
                            strong_count += 1;
                            strong_pivot = Some(cells[i]);
                        }
                        if !prev && !cur {
                            weak_count += 1;
                            weak_pivot = Some(cells[i]);
                        }
                    }
                    if strong_count == 1 && weak_count == 0 {
                        let pivot = strong_pivot.expect("counted above");
                        if grid.would_place_change(pivot, digit) {
                            return Some((loop_cells, digit, XCycleAction::Solve(pivot, digit)));
                        }
                    } else if weak_count == 1 && strong_count == 0 {
                        let pivot = weak_pivot.expect("counted above");
                        let mask = DigitPositions::from_elem(pivot);
                        if grid.would_remove_candidate_with_mask_change(mask, digit) {
                            return Some((loop_cells, digit, XCycleAction::Eliminate(mask, digit)));
                        }
                    }
                }
            }
        }
        None
    }
}

impl Technique for XCycle {
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
        let Some((cond, _digit, action)) = Self::find_action(grid) else {
            return Ok(None);
        };
        let mut after = grid.clone();
        let (digit_cells, extra) = match action {
            XCycleAction::Solve(pos, d) => {
                after.place(pos, d);
                (
                    vec![(DigitPositions::from_elem(pos), DigitSet::from_elem(d))],
                    vec![TechniqueApplication::Placement {
                        position: pos,
                        digit: d,
                    }],
                )
            }
            XCycleAction::Eliminate(mask, d) => {
                after.remove_candidate_with_mask(mask, d);
                (vec![(mask, DigitSet::from_elem(d))], Vec::new())
            }
        };
        Ok(Some(Box::new(TechniqueStepData::from_diff_with_extra(
            NAME, cond, digit_cells, grid, &after, extra,
        ))))
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let Some((_, _, action)) = Self::find_action(grid) else {
            return Ok(false);
        };
        Ok(match action {
            XCycleAction::Solve(pos, d) => grid.place(pos, d),
            XCycleAction::Eliminate(mask, d) => grid.remove_candidate_with_mask(mask, d),
        })
    }
}
