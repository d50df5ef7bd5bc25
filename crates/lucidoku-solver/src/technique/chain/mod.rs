//! Chain data structures shared by the coloring-based techniques.
//!
//! These are built on demand from a [`TechniqueGrid`] snapshot rather than
//! cached on the grid itself, since techniques only need them while they are
//! scanning for a step.

mod nice_loop;
mod singles_chain;
mod super_chain;

pub use nice_loop::NiceLoop;
pub use singles_chain::SinglesChain;
pub use super_chain::{ColoredCandidate, SuperChain};

use lucidoku_core::{Digit, House, Position};

use crate::TechniqueGrid;

/// A 2-coloring color, used throughout the chain-based techniques.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }
}

/// Returns every strong link for `digit`: pairs of cells that are the only
/// two candidate positions for `digit` within some house.
///
/// The result is deduplicated, since a pair of cells can be the sole
/// occurrence of a digit in more than one shared house (e.g. two cells in
/// the same box that also share a row).
#[must_use]
pub fn strong_links(grid: &TechniqueGrid, digit: Digit) -> Vec<(Position, Position)> {
    let mut links = Vec::new();
    for house in House::ALL {
        let mask = house.positions() & grid.digit_positions(digit);
        if mask.len() == 2 {
            let mut iter = mask.into_iter();
            let a = iter.next().expect("len == 2");
            let b = iter.next().expect("len == 2");
            links.push(if a <= b { (a, b) } else { (b, a) });
        }
    }
    links.sort();
    links.dedup();
    links
}

fn is_strong_link(links: &[(Position, Position)], a: Position, b: Position) -> bool {
    let pair = if a <= b { (a, b) } else { (b, a) };
    links.contains(&pair)
}
