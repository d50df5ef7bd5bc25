use lucidoku_core::{Digit, DigitPositions, DigitSet, House};

use crate::{
    BoxedTechnique, BoxedTechniqueStep, SolverError, Technique, TechniqueGrid, TechniqueStepData,
    TechniqueTier,
    technique::chain::SinglesChain,
};

const NAME_RULE2: &str = "Singles Chain (twice in a unit)";
const NAME_RULE4: &str = "Singles Chain (two colors elsewhere)";

/// A technique that eliminates a whole chain color when two of its nodes
/// fall in the same house.
///
/// A single-digit chain colors its cells red/blue so that the digit is true
/// in exactly one color. If one color appears twice within a house, that
/// color cannot be true (a house can't repeat a digit), so every candidate
/// of that color is removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SinglesChainRule2 {}

impl SinglesChainRule2 {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    fn find_elimination(grid: &TechniqueGrid) -> Option<(Digit, DigitPositions)> {
        for digit in Digit::ALL {
            for chain in SinglesChain::build_all(grid, digit) {
                for color in [chain.red, chain.blue] {
                    if color.is_empty() {
                        continue;
                    }
                    if House::ALL
                        .into_iter()
                        .any(|house| (color & house.positions()).len() >= 2)
                        && grid.would_remove_candidate_with_mask_change(color, digit)
                    {
                        return Some((digit, color));
                    }
                }
            }
        }
        None
    }
}

impl Technique for SinglesChainRule2 {
    fn name(&self) -> &'static str {
        NAME_RULE2
    }

    fn tier(&self) -> TechniqueTier {
        TechniqueTier::Chain
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_step(&self, grid: &TechniqueGrid) -> Result<Option<BoxedTechniqueStep>, SolverError> {
        let Some((digit, eliminations)) = Self::find_elimination(grid) else {
            return Ok(None);
        };
        let mut after = grid.clone();
        after.remove_candidate_with_mask(eliminations, digit);
        Ok(Some(Box::new(TechniqueStepData::from_diff(
            NAME_RULE2,
            eliminations,
            vec![(eliminations, DigitSet::from_elem(digit))],
            grid,
            &after,
        ))))
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let Some((digit, eliminations)) = Self::find_elimination(grid) else {
            return Ok(false);
        };
        Ok(grid.remove_candidate_with_mask(eliminations, digit))
    }
}

/// A technique that eliminates a candidate from a cell that sees both
/// colors of a single-digit chain.
///
/// If an uncolored cell is a peer of a red node and also a peer of a blue
/// node of the same chain, the digit can't be true there under either
/// coloring, so it is removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SinglesChainRule4 {}

impl SinglesChainRule4 {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    fn find_elimination(grid: &TechniqueGrid) -> Option<(Digit, DigitPositions)> {
        for digit in Digit::ALL {
            for chain in SinglesChain::build_all(grid, digit) {
                let nodes = chain.nodes();
                let candidates = grid.digit_positions(digit) & !nodes;
                let mut eliminations = DigitPositions::EMPTY;
                for pos in candidates {
                    let peers = pos.house_peers();
                    if !(peers & chain.red).is_empty() && !(peers & chain.blue).is_empty() {
                        eliminations.insert(pos);
                    }
                }
                if !eliminations.is_empty() {
                    return Some((digit, eliminations));
                }
            }
        }
        None
    }
}

impl Technique for SinglesChainRule4 {
    fn name(&self) -> &'static str {
        NAME_RULE4
    }

    fn tier(&self) -> TechniqueTier {
        TechniqueTier::Chain
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_step(&self, grid: &TechniqueGrid) -> Result<Option<BoxedTechniqueStep>, SolverError> {
        let Some((digit, eliminations)) = Self::find_elimination(grid) else {
            return Ok(None);
        };
        let mut after = grid.clone();
        after.remove_candidate_with_mask(eliminations, digit);
        Ok(Some(Box::new(TechniqueStepData::from_diff(
            NAME_RULE4,
            eliminations,
            vec![(eliminations, DigitSet::from_elem(digit))],
            grid,
            &after,
        ))))
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let Some((digit, eliminations)) = Self::find_elimination(grid) else {
            return Ok(false);
        };
        Ok(grid.remove_candidate_with_mask(eliminations, digit))
    }
}
