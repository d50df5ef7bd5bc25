//! Candidate bitboard for sudoku solving.
//!
//! [`CandidateGrid`] tracks, for every digit, the set of positions that
//! digit could still occupy. It is the data structure every technique
//! reads and mutates.

use crate::{
    Digit, DigitGrid, DigitPositions, DigitSet, House, Position,
    containers::{Array9, HouseMask},
    error::ConsistencyError,
    index::DigitSemantics,
};

/// Candidate bitboard for sudoku solving.
///
/// Internally stores 9 [`DigitPositions`] (one per digit), each tracking the
/// 81 board positions where that digit can still be placed. A decided cell
/// is one whose candidate set has collapsed to a single digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateGrid {
    digits: Array9<DigitPositions, DigitSemantics>,
}

impl Default for CandidateGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateGrid {
    /// Creates a new candidate grid with all 81 positions open to all 9 digits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            digits: Array9::new([DigitPositions::FULL; 9]),
        }
    }

    /// Builds a candidate grid from a partially or fully filled [`DigitGrid`].
    ///
    /// Every decided cell in `grid` is placed in turn; blank cells are left
    /// with all 9 candidates (before peer elimination narrows them).
    #[must_use]
    pub fn from_digit_grid(grid: &DigitGrid) -> Self {
        let mut candidates = Self::new();
        for (pos, digit) in grid.cells() {
            if let Some(digit) = digit {
                candidates.place(pos, digit);
            }
        }
        candidates
    }

    /// Collapses this grid back into a [`DigitGrid`] of its decided cells.
    ///
    /// Cells with more than one remaining candidate are rendered blank.
    #[must_use]
    pub fn to_digit_grid(&self) -> DigitGrid {
        let mut grid = DigitGrid::empty();
        for pos in Position::ROWS.iter().flatten().copied() {
            if let Some(digit) = self.candidates_at(pos).as_single() {
                grid.set(pos, Some(digit));
            }
        }
        grid
    }

    /// Places `digit` at `pos`, removing it as a candidate from every peer
    /// and removing every other candidate from `pos` itself.
    ///
    /// Returns `true` if this changed the grid.
    pub fn place(&mut self, pos: Position, digit: Digit) -> bool {
        let mut changed = false;
        for d in Digit::ALL {
            if d == digit {
                continue;
            }
            let mut positions = self.digits.get(d);
            if positions.contains(pos) {
                changed = true;
                positions.remove(pos);
                self.digits.set(d, positions);
            }
        }
        let peers = pos.house_peers();
        let mut positions = self.digits.get(digit);
        if !positions.contains(pos) {
            changed = true;
            positions.insert(pos);
        }
        if !(positions & peers).is_empty() {
            changed = true;
            positions = positions.difference(peers);
        }
        self.digits.set(digit, positions);
        changed
    }

    /// Returns `true` if calling [`place`](Self::place) with these arguments
    /// would change the grid, without mutating it.
    #[must_use]
    pub fn would_place_change(&self, pos: Position, digit: Digit) -> bool {
        for d in Digit::ALL {
            if d != digit && self.digits.get(d).contains(pos) {
                return true;
            }
        }
        let positions = self.digits.get(digit);
        if !positions.contains(pos) {
            return true;
        }
        !(positions & pos.house_peers()).is_empty()
    }

    /// Removes `digit` as a candidate at `pos`. Returns `true` if it was present.
    pub fn remove_candidate(&mut self, pos: Position, digit: Digit) -> bool {
        let mut positions = self.digits.get(digit);
        if !positions.contains(pos) {
            return false;
        }
        positions.remove(pos);
        self.digits.set(digit, positions);
        true
    }

    /// Returns `true` if [`remove_candidate`](Self::remove_candidate) with
    /// these arguments would change the grid.
    #[must_use]
    pub fn would_remove_candidate_change(&self, pos: Position, digit: Digit) -> bool {
        self.digits.get(digit).contains(pos)
    }

    /// Removes `digit` as a candidate from every position in `mask`.
    ///
    /// Returns `true` if any candidate was actually removed.
    pub fn remove_candidate_with_mask(&mut self, mask: DigitPositions, digit: Digit) -> bool {
        let positions = self.digits.get(digit);
        if (positions & mask).is_empty() {
            return false;
        }
        self.digits.set(digit, positions.difference(mask));
        true
    }

    /// Returns `true` if [`remove_candidate_with_mask`](Self::remove_candidate_with_mask)
    /// with these arguments would change the grid.
    #[must_use]
    pub fn would_remove_candidate_with_mask_change(
        &self,
        mask: DigitPositions,
        digit: Digit,
    ) -> bool {
        !(self.digits.get(digit) & mask).is_empty()
    }

    /// Removes each digit in `digits` as a candidate from every position in `mask`.
    ///
    /// Returns `true` if any candidate was actually removed.
    pub fn remove_candidate_set_with_mask(&mut self, mask: DigitPositions, digits: DigitSet) -> bool {
        let mut changed = false;
        for digit in digits {
            changed |= self.remove_candidate_with_mask(mask, digit);
        }
        changed
    }

    /// Returns `true` if [`remove_candidate_set_with_mask`](Self::remove_candidate_set_with_mask)
    /// with these arguments would change the grid.
    #[must_use]
    pub fn would_remove_candidate_set_with_mask_change(
        &self,
        mask: DigitPositions,
        digits: DigitSet,
    ) -> bool {
        digits
            .into_iter()
            .any(|digit| self.would_remove_candidate_with_mask_change(mask, digit))
    }

    /// Returns the set of positions where `digit` is still a candidate.
    #[must_use]
    pub fn digit_positions(&self, digit: Digit) -> DigitPositions {
        self.digits.get(digit)
    }

    /// Returns the set of candidate digits remaining at `pos`.
    #[must_use]
    pub fn candidates_at(&self, pos: Position) -> DigitSet {
        let mut set = DigitSet::EMPTY;
        for digit in Digit::ALL {
            if self.digits.get(digit).contains(pos) {
                set.insert(digit);
            }
        }
        set
    }

    /// Returns the candidate positions for `digit` within `house`, as a
    /// [`HouseMask`] over that house's 0-8 cell indices.
    #[must_use]
    pub fn house_mask(&self, house: House, digit: Digit) -> HouseMask {
        self.digit_positions(digit).house_mask(house)
    }

    /// Returns the candidate positions for `digit` within row `y`.
    #[must_use]
    pub fn row_mask(&self, y: u8, digit: Digit) -> HouseMask {
        self.house_mask(House::Row { y }, digit)
    }

    /// Returns the candidate positions for `digit` within column `x`.
    #[must_use]
    pub fn col_mask(&self, x: u8, digit: Digit) -> HouseMask {
        self.house_mask(House::Column { x }, digit)
    }

    /// Returns the candidate positions for `digit` within box `box_index`.
    #[must_use]
    pub fn box_mask(&self, box_index: u8, digit: Digit) -> HouseMask {
        self.house_mask(House::Box { index: box_index }, digit)
    }

    /// Returns the set of cells with exactly one remaining candidate.
    #[must_use]
    pub fn decided_cells(&self) -> DigitPositions {
        self.classify_cells::<2>()[1]
    }

    /// Buckets every cell by its candidate count, for counts `0..N`.
    ///
    /// `result[k]` is the set of positions with exactly `k` remaining
    /// candidates. Cells with `N` or more candidates are not placed in any
    /// bucket. Used to find naked subsets of a given size: e.g. a naked
    /// triple's pivot cells are `classify_cells::<4>()[2] | classify_cells::<4>()[3]`.
    #[must_use]
    pub fn classify_cells<const N: usize>(&self) -> [DigitPositions; N] {
        let mut buckets = [DigitPositions::EMPTY; N];
        for pos in Position::ROWS.iter().flatten().copied() {
            let count = self.candidates_at(pos).len() as usize;
            if count < N {
                buckets[count].insert(pos);
            }
        }
        buckets
    }

    /// Checks that this grid is internally consistent: no cell has lost every
    /// candidate, and no house has a digit decided in more than one cell.
    ///
    /// # Errors
    ///
    /// Returns [`ConsistencyError::EmptyCandidateSet`] if some cell has no
    /// remaining candidates, or [`ConsistencyError::DuplicateValueInHouse`]
    /// if a digit is decided twice in the same house.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        let mut any_candidates = DigitPositions::EMPTY;
        for digit in Digit::ALL {
            any_candidates |= self.digits.get(digit);
        }
        if any_candidates != DigitPositions::FULL {
            log::warn!("conflict detected: a cell has no remaining candidates");
            return Err(ConsistencyError::EmptyCandidateSet);
        }

        let decided = self.decided_cells();
        for digit in Digit::ALL {
            let decided_for_digit = self.digits.get(digit) & decided;
            for house in House::ALL {
                if (decided_for_digit & house.positions()).len() > 1 {
                    log::warn!("conflict detected: {digit:?} is decided twice in {house:?}");
                    return Err(ConsistencyError::DuplicateValueInHouse);
                }
            }
        }
        Ok(())
    }

    /// Returns `true` if every cell is decided and the grid is consistent.
    ///
    /// # Errors
    ///
    /// Propagates [`check_consistency`](Self::check_consistency)'s errors.
    pub fn is_solved(&self) -> Result<bool, ConsistencyError> {
        self.check_consistency()?;
        Ok(self.decided_cells().len() == 81)
    }
}
