use lucidoku_core::{Digit, DigitPositions, Position};

use super::{is_strong_link, strong_links};
use crate::TechniqueGrid;

/// A closed alternating-link loop for a single digit, discovered on the fly
/// rather than built from precomputed singles chains.
#[derive(Debug, Clone)]
pub struct NiceLoop {
    pub digit: Digit,
    /// Cells in cycle order; the last cell links back to the first.
    pub cells: Vec<Position>,
    pub closed_loop: bool,
    pub perimeter: bool,
    pub rectangular: bool,
}

impl NiceLoop {
    #[must_use]
    pub fn nodes(&self) -> DigitPositions {
        DigitPositions::from_iter(self.cells.iter().copied())
    }

    /// Enumerates every distinct nice loop for `digit`.
    ///
    /// A branch is abandoned once it accumulates three consecutive weak
    /// links, and loops shorter than 4 distinct cells are not reported.
    #[must_use]
    pub fn enumerate(grid: &TechniqueGrid, digit: Digit) -> Vec<NiceLoop> {
        let links = strong_links(grid, digit);
        if links.is_empty() {
            return Vec::new();
        }

        let mut found = Vec::new();
        let mut seen: Vec<DigitPositions> = Vec::new();
        for &(a, b) in &links {
            for (start, next) in [(a, b), (b, a)] {
                let interior = DigitPositions::from_iter([start, next]);
                Self::extend(
                    grid,
                    digit,
                    &links,
                    start,
                    next,
                    vec![start, next],
                    interior,
                    0,
                    &mut found,
                    &mut seen,
                );
            }
        }
        found
    }

    #[allow(clippy::too_many_arguments)]
    fn extend(
        grid: &TechniqueGrid,
        digit: Digit,
        links: &[(Position, Position)],
        start: Position,
        end: Position,
        path: Vec<Position>,
        interior: DigitPositions,
        consecutive_weak: u32,
        found: &mut Vec<NiceLoop>,
        seen: &mut Vec<DigitPositions>,
    ) {
        if path.len() > 81 {
            return;
        }
        for next in end.house_peers() & grid.digit_positions(digit) {
            let is_strong = is_strong_link(links, end, next);
            let weak_run = if is_strong { 0 } else { consecutive_weak + 1 };
            if weak_run >= 3 {
                continue;
            }

            if next == start {
                if path.len() >= 4 {
                    let cells = DigitPositions::from_iter(path.iter().copied());
                    if !seen.contains(&cells) {
                        seen.push(cells);
                        found.push(NiceLoop {
                            digit,
                            cells: path.clone(),
                            closed_loop: true,
                            perimeter: true,
                            rectangular: path.len() == 4,
                        });
                    }
                }
                continue;
            }

            if interior.contains(next) {
                continue;
            }

            let mut new_path = path.clone();
            new_path.push(next);
            let mut new_interior = interior;
            new_interior.insert(next);
            Self::extend(
                grid,
                digit,
                links,
                start,
                next,
                new_path,
                new_interior,
                weak_run,
                found,
                seen,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use lucidoku_core::{CandidateGrid, Digit};

    use super::*;

    #[test]
    fn test_enumerate_empty_on_fresh_grid() {
        let grid = TechniqueGrid::from(CandidateGrid::new());
        assert!(NiceLoop::enumerate(&grid, Digit::D1).is_empty());
    }
}
