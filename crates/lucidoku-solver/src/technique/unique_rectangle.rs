use lucidoku_core::{Digit, DigitPositions, DigitSet, House, Position};

use crate::{
    BoxedTechnique, BoxedTechniqueStep, SolverError, Technique, TechniqueGrid, TechniqueStepData,
    TechniqueTier,
};

const NAME: &str = "Unique Rectangle";

/// A technique that eliminates candidates using the Unique Rectangle family
/// of patterns.
///
/// Four unsolved cells at the intersections of two rows, two columns, and
/// exactly two boxes, all holding the same pair of candidates `{a,b}`, would
/// let the puzzle swing between two solutions by itself (a "deadly
/// pattern") unless something outside the pattern breaks the symmetry. Each
/// rule below identifies a configuration that a valid, uniquely-solvable
/// puzzle can't allow, and removes the candidate that would create it.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniqueRectangle {}

impl UniqueRectangle {
    /// Creates a new `UniqueRectangle` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

struct Rectangle {
    positions: [Position; 4],
    a: Digit,
    b: Digit,
    bivalue: Vec<usize>,
    nonbivalue: Vec<usize>,
}

impl UniqueRectangle {
    fn shared_houses(a: Position, b: Position) -> Vec<House> {
        let mut houses = Vec::new();
        if a.y() == b.y() {
            houses.push(House::Row { y: a.y() });
        }
        if a.x() == b.x() {
            houses.push(House::Column { x: a.x() });
        }
        if a.box_index() == b.box_index() {
            houses.push(House::Box {
                index: a.box_index(),
            });
        }
        houses
    }

    fn diag(index: usize) -> usize {
        3 - index
    }

    fn rectangles(grid: &TechniqueGrid) -> impl Iterator<Item = Rectangle> + '_ {
        (0..8u8).flat_map(move |r1| {
            (r1 + 1..9u8).flat_map(move |r2| {
                (0..8u8).flat_map(move |c1| {
                    (c1 + 1..9u8).filter_map(move |c2| {
                        let positions = [
                            Position::new(c1, r1),
                            Position::new(c2, r1),
                            Position::new(c1, r2),
                            Position::new(c2, r2),
                        ];
                        let rows_share_box = positions[0].box_index() == positions[1].box_index()
                            && positions[2].box_index() == positions[3].box_index();
                        let columns_share_box = positions[0].box_index()
                            == positions[2].box_index()
                            && positions[1].box_index() == positions[3].box_index();
                        if rows_share_box == columns_share_box {
                            return None;
                        }

                        let candidates: [DigitSet; 4] =
                            positions.map(|pos| grid.candidates_at(pos));
                        let bivalue: Vec<usize> =
                            (0..4).filter(|&i| candidates[i].len() == 2).collect();
                        if bivalue.is_empty() || bivalue.len() == 4 {
                            return None;
                        }
                        let (a, b) = candidates[bivalue[0]].as_double()?;
                        let ab = DigitSet::from_iter([a, b]);
                        let consistent = (0..4).all(|i| {
                            if bivalue.contains(&i) {
                                candidates[i] == ab
                            } else {
                                candidates[i] & ab == ab
                            }
                        });
                        if !consistent {
                            return None;
                        }
                        let nonbivalue: Vec<usize> =
                            (0..4).filter(|i| !bivalue.contains(i)).collect();
                        Some(Rectangle {
                            positions,
                            a,
                            b,
                            bivalue,
                            nonbivalue,
                        })
                    })
                })
            })
        })
    }

    /// Rule 1 (3 bi-value): the fourth cell can't also hold `{a,b}` without
    /// creating the deadly pattern, so both are removed from it.
    fn rule1(grid: &TechniqueGrid, rect: &Rectangle) -> Option<(DigitPositions, DigitSet)> {
        let &[t] = rect.nonbivalue.as_slice() else {
            return None;
        };
        let mask = DigitPositions::from_elem(rect.positions[t]);
        let digits = DigitSet::from_iter([rect.a, rect.b]);
        grid.would_remove_candidate_set_with_mask_change(mask, digits)
            .then_some((mask, digits))
    }

    /// Rule 2 (2 bi-value, matching non-bi-value triples): the extra
    /// candidate is forced true in one of the two non-bi-value cells, so it
    /// can be removed from every cell that sees both.
    fn rule2(grid: &TechniqueGrid, rect: &Rectangle) -> Option<(DigitPositions, DigitSet)> {
        let &[i, j] = rect.nonbivalue.as_slice() else {
            return None;
        };
        let (ni, nj) = (rect.positions[i], rect.positions[j]);
        let (ci, cj) = (grid.candidates_at(ni), grid.candidates_at(nj));
        if ci != cj || ci.len() != 3 {
            return None;
        }
        let ab = DigitSet::from_iter([rect.a, rect.b]);
        let x = (ci & !ab).as_single()?;
        let rect_cells = DigitPositions::from_iter(rect.positions);
        let mask = ni.house_peers() & nj.house_peers() & grid.digit_positions(x) & !rect_cells;
        let digits = DigitSet::from_elem(x);
        grid.would_remove_candidate_set_with_mask_change(mask, digits)
            .then_some((mask, digits))
    }

    /// Rule 3 (2 bi-value, extras form a pair): an external cell matching
    /// the two non-bi-value cells' extra candidates forms a naked pair with
    /// them, so that pair is removed from the rest of the shared group.
    ///
    /// Triple pseudo-cell variant: the two non-bi-value cells jointly act as
    /// a single pseudo-cell holding `{x,y}` (one of them must be true);
    /// combined with two external cells that, between them, carry no
    /// candidate besides `{x,y}` and exactly one shared third digit `z`,
    /// the three "cells" form a naked triple over `{x,y,z}`, so `{x,y}` is
    /// still removable from the rest of the group.
    fn rule3(grid: &TechniqueGrid, rect: &Rectangle) -> Option<(DigitPositions, DigitSet)> {
        let &[i, j] = rect.nonbivalue.as_slice() else {
            return None;
        };
        let (ni, nj) = (rect.positions[i], rect.positions[j]);
        let (ci, cj) = (grid.candidates_at(ni), grid.candidates_at(nj));
        if ci.len() != 3 || cj.len() != 3 {
            return None;
        }
        let ab = DigitSet::from_iter([rect.a, rect.b]);
        let x = (ci & !ab).as_single()?;
        let y = (cj & !ab).as_single()?;
        if x == y {
            return None;
        }
        let xy = DigitSet::from_iter([x, y]);
        let rect_cells = DigitPositions::from_iter(rect.positions);
        for house in Self::shared_houses(ni, nj) {
            let others = house.positions() & !rect_cells;
            for external in others {
                if grid.candidates_at(external) == xy {
                    let mask = others & !DigitPositions::from_elem(external);
                    if grid.would_remove_candidate_set_with_mask_change(mask, xy) {
                        return Some((mask, xy));
                    }
                }
            }
            for (e1, rest) in others.pivots_with_following() {
                for e2 in rest {
                    let (c1, c2) = (grid.candidates_at(e1), grid.candidates_at(e2));
                    if (c1 & ab).is_empty()
                        && (c2 & ab).is_empty()
                        && !(c1 & xy).is_empty()
                        && !(c2 & xy).is_empty()
                    {
                        let extra = (c1 & !xy) | (c2 & !xy);
                        if extra.as_single().is_some() {
                            let pair = DigitPositions::from_iter([e1, e2]);
                            let mask = others & !pair;
                            if grid.would_remove_candidate_set_with_mask_change(mask, xy) {
                                return Some((mask, xy));
                            }
                        }
                    }
                }
            }
        }
        None
    }

    /// Rule 4 (2 bi-value, a UR candidate confined to the pair): if one UR
    /// candidate only appears in the two non-bi-value cells within a shared
    /// group, the other UR candidate can't be true in either, so it's
    /// removed from both.
    fn rule4(grid: &TechniqueGrid, rect: &Rectangle) -> Option<(DigitPositions, DigitSet)> {
        let &[i, j] = rect.nonbivalue.as_slice() else {
            return None;
        };
        let (ni, nj) = (rect.positions[i], rect.positions[j]);
        let pair = DigitPositions::from_iter([ni, nj]);
        for house in Self::shared_houses(ni, nj) {
            for (digit, other) in [(rect.a, rect.b), (rect.b, rect.a)] {
                let confined = grid.digit_positions(digit) & house.positions();
                if confined == pair {
                    let digits = DigitSet::from_elem(other);
                    if grid.would_remove_candidate_set_with_mask_change(pair, digits) {
                        return Some((pair, digits));
                    }
                }
            }
        }
        None
    }

    /// Hidden UR Rule 1 (1 bi-value): if a UR candidate forms a strong link
    /// in both the row and the column of the diagonally opposite cell, that
    /// candidate is forced there, so the other UR candidate is removed.
    fn hidden_ur1(grid: &TechniqueGrid, rect: &Rectangle) -> Option<(DigitPositions, DigitSet)> {
        let &[b_idx] = rect.bivalue.as_slice() else {
            return None;
        };
        let diag = rect.positions[Self::diag(b_idx)];
        for (digit, other) in [(rect.a, rect.b), (rect.b, rect.a)] {
            let row_link =
                (grid.digit_positions(digit) & House::Row { y: diag.y() }.positions()).len() == 2;
            let col_link = (grid.digit_positions(digit) & House::Column { x: diag.x() }.positions())
                .len()
                == 2;
            if row_link && col_link {
                let mask = DigitPositions::from_elem(diag);
                let digits = DigitSet::from_elem(other);
                if grid.would_remove_candidate_set_with_mask_change(mask, digits) {
                    return Some((mask, digits));
                }
            }
        }
        None
    }

    /// Hidden UR Rule 2 (2 bi-value, diagonal): if a UR candidate forms a
    /// strong link in a group shared by a bi-value cell and an adjacent
    /// non-bi-value cell, the other UR candidate is removed from the
    /// remaining non-bi-value cell.
    fn hidden_ur2(grid: &TechniqueGrid, rect: &Rectangle) -> Option<(DigitPositions, DigitSet)> {
        let &[b0, b1] = rect.bivalue.as_slice() else {
            return None;
        };
        if Self::diag(b0) != b1 {
            return None;
        }
        for &b_idx in &rect.bivalue {
            for &n_idx in &rect.nonbivalue {
                let bivalue_pos = rect.positions[b_idx];
                let non_pos = rect.positions[n_idx];
                for house in Self::shared_houses(bivalue_pos, non_pos) {
                    let pair = DigitPositions::from_iter([bivalue_pos, non_pos]);
                    for (digit, other) in [(rect.a, rect.b), (rect.b, rect.a)] {
                        let confined = grid.digit_positions(digit) & house.positions();
                        if confined == pair {
                            let target_idx = rect
                                .nonbivalue
                                .iter()
                                .copied()
                                .find(|&idx| idx != n_idx)
                                .expect("exactly two non-bi-value cells");
                            let mask = DigitPositions::from_elem(rect.positions[target_idx]);
                            let digits = DigitSet::from_elem(other);
                            if grid.would_remove_candidate_set_with_mask_change(mask, digits) {
                                return Some((mask, digits));
                            }
                        }
                    }
                }
            }
        }
        None
    }

    fn find_action(grid: &TechniqueGrid) -> Option<(DigitPositions, DigitPositions, DigitSet)> {
        for rect in Self::rectangles(grid) {
            let action = match rect.bivalue.len() {
                3 => Self::rule1(grid, &rect),
                2 => Self::rule2(grid, &rect)
                    .or_else(|| Self::rule3(grid, &rect))
                    .or_else(|| Self::rule4(grid, &rect))
                    .or_else(|| Self::hidden_ur2(grid, &rect)),
                1 => Self::hidden_ur1(grid, &rect),
                _ => None,
            };
            if let Some((mask, digits)) = action {
                let condition = DigitPositions::from_iter(rect.positions);
                return Some((condition, mask, digits));
            }
        }
        None
    }
}

impl Technique for UniqueRectangle {
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
        let Some((condition, mask, digits)) = Self::find_action(grid) else {
            return Ok(None);
        };
        let mut after = grid.clone();
        after.remove_candidate_set_with_mask(mask, digits);
        Ok(Some(Box::new(TechniqueStepData::from_diff(
            NAME,
            condition | mask,
            vec![(mask, digits)],
            grid,
            &after,
        ))))
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let Some((_, mask, digits)) = Self::find_action(grid) else {
            return Ok(false);
        };
        Ok(grid.remove_candidate_set_with_mask(mask, digits))
    }
}
