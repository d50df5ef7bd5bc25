use std::collections::{HashMap, VecDeque};

use lucidoku_core::{Digit, DigitPositions, Position};

use super::strong_links;
use crate::TechniqueGrid;

/// A 2-colored chain of strong links for a single digit.
///
/// Every cell in the chain is colored red or blue such that the digit is
/// true in exactly one color's cells for any house where the chain is
/// exhaustive.
#[derive(Debug, Clone)]
pub struct SinglesChain {
    pub digit: Digit,
    pub red: DigitPositions,
    pub blue: DigitPositions,
    /// Every node has at least two incident strong links within the chain.
    pub closed_loop: bool,
    /// Every node has exactly two incident strong links within the chain.
    pub perimeter: bool,
    /// A perimeter chain over exactly four cells.
    pub rectangular: bool,
}

impl SinglesChain {
    #[must_use]
    pub fn nodes(&self) -> DigitPositions {
        self.red | self.blue
    }

    /// Builds every singles chain for `digit`, one per connected component of
    /// the strong-link graph.
    #[must_use]
    pub fn build_all(grid: &TechniqueGrid, digit: Digit) -> Vec<SinglesChain> {
        let links = strong_links(grid, digit);
        if links.is_empty() {
            return Vec::new();
        }

        let mut adjacency: HashMap<Position, Vec<Position>> = HashMap::new();
        for &(a, b) in &links {
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }

        let all_nodes = links
            .iter()
            .fold(DigitPositions::EMPTY, |acc, &(a, b)| {
                acc | DigitPositions::from_elem(a) | DigitPositions::from_elem(b)
            });

        let mut visited = DigitPositions::EMPTY;
        let mut chains = Vec::new();
        for start in all_nodes {
            if visited.contains(start) {
                continue;
            }

            let mut red = DigitPositions::EMPTY;
            let mut blue = DigitPositions::EMPTY;
            let mut queue = VecDeque::new();
            queue.push_back((start, true));
            visited.insert(start);

            while let Some((pos, is_red)) = queue.pop_front() {
                if is_red {
                    red.insert(pos);
                } else {
                    blue.insert(pos);
                }
                for &next in adjacency.get(&pos).into_iter().flatten() {
                    if !visited.contains(next) {
                        visited.insert(next);
                        queue.push_back((next, !is_red));
                    }
                }
            }

            let nodes = red | blue;
            let mut degree: HashMap<Position, u32> = HashMap::new();
            for &(a, b) in &links {
                if nodes.contains(a) && nodes.contains(b) {
                    *degree.entry(a).or_insert(0) += 1;
                    *degree.entry(b).or_insert(0) += 1;
                }
            }
            let closed_loop = nodes.into_iter().all(|p| *degree.get(&p).unwrap_or(&0) >= 2);
            let perimeter = nodes.into_iter().all(|p| *degree.get(&p).unwrap_or(&0) == 2);
            let rectangular = perimeter && nodes.len() == 4;

            chains.push(SinglesChain {
                digit,
                red,
                blue,
                closed_loop,
                perimeter,
                rectangular,
            });
        }
        chains
    }
}
