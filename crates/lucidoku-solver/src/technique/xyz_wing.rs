use std::ops::ControlFlow;

use lucidoku_core::{Digit, DigitPositions, DigitSet, Position};

use crate::{BoxedTechniqueStep, Technique, TechniqueGrid, TechniqueStepData};

const NAME: &str = "XYZ-Wing";

/// A technique that removes candidates using an XYZ-Wing pattern.
///
/// An "XYZ-Wing" occurs when a link cell has three candidates (A/B/C), and
/// two wing cells, each bi-value and a peer of the link, carry distinct
/// pairs of the link's candidates whose union is exactly the link's three
/// candidates. The shared candidate C can be eliminated from any cell that
/// is a peer of the link and both wings.
#[derive(Debug, Default, Clone, Copy)]
pub struct XyzWing {}

impl XyzWing {
    /// Creates a new `XyzWing` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl XyzWing {
    #[inline]
    fn apply_with_control_flow<F>(
        grid: &mut TechniqueGrid,
        mut on_condition: F,
    ) -> Option<BoxedTechniqueStep>
    where
        F: for<'a> FnMut(
            &'a mut TechniqueGrid,
            (Position, Position, Position),
            Digit,
        ) -> ControlFlow<BoxedTechniqueStep>,
    {
        let bivalue_cells = grid.classify_cells::<3>()[2];
        let triple_cells = grid.classify_cells::<4>()[3];
        for link in triple_cells {
            let link_peers = link.house_peers();
            let link_digits = grid.candidates_at(link);
            let wing_candidates = link_peers & bivalue_cells;
            for (wing1, remaining) in wing_candidates.pivots_with_following() {
                let wing1_digits = grid.candidates_at(wing1);
                if !wing1_digits.is_subset(link_digits) {
                    continue;
                }
                for wing2 in remaining {
                    let wing2_digits = grid.candidates_at(wing2);
                    if !wing2_digits.is_subset(link_digits) || wing2_digits == wing1_digits {
                        continue;
                    }
                    if (wing1_digits | wing2_digits) != link_digits {
                        continue;
                    }
                    let Some(z) = (wing1_digits & wing2_digits).as_single() else {
                        continue;
                    };
                    let elimination_cells =
                        link_peers & wing1.house_peers() & wing2.house_peers() & grid.digit_positions(z);
                    if grid.remove_candidate_with_mask(elimination_cells, z)
                        && let ControlFlow::Break(value) =
                            on_condition(grid, (link, wing1, wing2), z)
                    {
                        return Some(value);
                    }
                }
            }
        }
        None
    }
}

impl Technique for XyzWing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> crate::BoxedTechnique {
        Box::new(*self)
    }

    fn find_step(
        &self,
        grid: &TechniqueGrid,
    ) -> Result<Option<BoxedTechniqueStep>, crate::SolverError> {
        let mut after_grid = grid.clone();
        let step = Self::apply_with_control_flow(
            &mut after_grid,
            |after_grid, (link, wing1, wing2), z| {
                ControlFlow::Break(Box::new(TechniqueStepData::from_diff(
                    NAME,
                    DigitPositions::from_iter([link, wing1, wing2]),
                    vec![(
                        DigitPositions::from_iter([link, wing1, wing2]),
                        DigitSet::from_elem(z),
                    )],
                    grid,
                    after_grid,
                )))
            },
        );
        Ok(step)
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, crate::SolverError> {
        let mut changed = false;
        Self::apply_with_control_flow(grid, |_, _, _| {
            changed = true;
            ControlFlow::Continue(())
        });
        Ok(changed)
    }
}
