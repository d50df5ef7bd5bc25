use lucidoku_core::{Digit, DigitPositions, DigitSet, Position};

use crate::{
    BoxedTechnique, BoxedTechniqueStep, SolverError, Technique, TechniqueGrid, TechniqueStepData,
    TechniqueTier,
};

const NAME: &str = "XY-Chain";

/// A technique that removes candidates using an XY-Chain.
///
/// An XY-Chain links bi-value cells end to end, each neighboring pair
/// sharing one candidate that carries the link forward. If the unused
/// candidate at both ends of the chain is the same digit, either end
/// forces that digit true somewhere along the chain, so it can be removed
/// from any cell that sees both endpoints.
#[derive(Debug, Default, Clone, Copy)]
pub struct XyChain {}

impl XyChain {
    /// Creates a new `XyChain` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

type FoundChain = (Vec<Position>, Digit, DigitPositions);

impl XyChain {
    fn find_elimination(grid: &TechniqueGrid) -> Option<FoundChain> {
        let bivalue = grid.classify_cells::<3>()[2];
        for start in bivalue {
            let Some((a, b)) = grid.candidates_at(start).as_double() else {
                continue;
            };
            for (link, z) in [(a, b), (b, a)] {
                let visited = DigitPositions::from_elem(start);
                if let Some(result) =
                    Self::extend(grid, bivalue, z, link, vec![start], visited)
                {
                    return Some(result);
                }
            }
        }
        None
    }

    fn extend(
        grid: &TechniqueGrid,
        bivalue: DigitPositions,
        z: Digit,
        need_digit: Digit,
        path: Vec<Position>,
        visited: DigitPositions,
    ) -> Option<FoundChain> {
        let current = *path.last().expect("path is never empty");
        let candidates = current.house_peers() & bivalue & grid.digit_positions(need_digit);
        for next in candidates {
            if visited.contains(next) {
                continue;
            }
            let Some(other) = (grid.candidates_at(next) & !DigitSet::from_elem(need_digit))
                .as_single()
            else {
                continue;
            };

            if other == z {
                let mut cells = path.clone();
                cells.push(next);
                let chain_cells = DigitPositions::from_iter(cells.iter().copied());
                let start = cells[0];
                let eliminations =
                    start.house_peers() & next.house_peers() & grid.digit_positions(z) & !chain_cells;
                if !eliminations.is_empty()
                    && grid.would_remove_candidate_with_mask_change(eliminations, z)
                {
                    return Some((cells, z, eliminations));
                }
            }

            let mut new_path = path.clone();
            new_path.push(next);
            let mut new_visited = visited;
            new_visited.insert(next);
            if let Some(result) = Self::extend(grid, bivalue, z, other, new_path, new_visited) {
                return Some(result);
            }
        }
        None
    }
}

impl Technique for XyChain {
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
        let Some((cells, z, eliminations)) = Self::find_elimination(grid) else {
            return Ok(None);
        };
        let mut after = grid.clone();
        after.remove_candidate_with_mask(eliminations, z);
        let chain_cells = DigitPositions::from_iter(cells);
        Ok(Some(Box::new(TechniqueStepData::from_diff(
            NAME,
            chain_cells | eliminations,
            vec![(eliminations, DigitSet::from_elem(z))],
            grid,
            &after,
        ))))
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let Some((_, z, eliminations)) = Self::find_elimination(grid) else {
            return Ok(false);
        };
        Ok(grid.remove_candidate_with_mask(eliminations, z))
    }
}

#[cfg(test)]
mod tests {
    use lucidoku_core::{CandidateGrid, Digit, Position};

    use super::*;
    use crate::testing::TechniqueTester;

    #[test]
    fn test_eliminates_along_a_three_cell_chain() {
        let mut grid = CandidateGrid::new();
        let c0 = Position::new(0, 0);
        let c1 = Position::new(0, 4);
        let c2 = Position::new(4, 4);
        let elimination = Position::new(4, 0);

        for digit in Digit::ALL {
            if digit != Digit::D1 && digit != Digit::D2 {
                grid.remove_candidate(c0, digit);
            }
            if digit != Digit::D2 && digit != Digit::D3 {
                grid.remove_candidate(c1, digit);
            }
            if digit != Digit::D3 && digit != Digit::D1 {
                grid.remove_candidate(c2, digit);
            }
        }

        TechniqueTester::new(grid)
            .apply_once(&XyChain::new())
            .assert_removed_includes(elimination, [Digit::D1]);
    }

    #[test]
    fn test_no_change_when_no_chain() {
        let grid = CandidateGrid::new();

        TechniqueTester::new(grid)
            .apply_once(&XyChain::new())
            .assert_no_change(Position::new(0, 0))
            .assert_no_change(Position::new(4, 4));
    }
}
