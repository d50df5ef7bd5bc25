use std::collections::{HashMap, VecDeque};

use lucidoku_core::{Digit, Position};

use super::{Color, SinglesChain};
use crate::TechniqueGrid;

/// A single colored (position, digit) candidate within a super chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColoredCandidate {
    pub position: Position,
    pub digit: Digit,
}

/// A merge of multiple per-digit [`SinglesChain`]s across shared bi-value
/// link cells, used by the multi-digit coloring techniques.
#[derive(Debug, Clone, Default)]
pub struct SuperChain {
    pub red: Vec<ColoredCandidate>,
    pub blue: Vec<ColoredCandidate>,
}

impl SuperChain {
    #[must_use]
    pub fn color_of(&self, position: Position, digit: Digit) -> Option<Color> {
        let candidate = ColoredCandidate { position, digit };
        if self.red.contains(&candidate) {
            Some(Color::Red)
        } else if self.blue.contains(&candidate) {
            Some(Color::Blue)
        } else {
            None
        }
    }

    /// Builds every super chain on the grid: one per group of 2 or more
    /// per-digit singles chains that share a bi-value link cell.
    #[must_use]
    pub fn build_all(grid: &TechniqueGrid) -> Vec<SuperChain> {
        struct Component {
            digit: Digit,
            red: Vec<Position>,
            blue: Vec<Position>,
        }

        let mut components = Vec::new();
        for digit in Digit::ALL {
            for chain in SinglesChain::build_all(grid, digit) {
                components.push(Component {
                    digit,
                    red: chain.red.into_iter().collect(),
                    blue: chain.blue.into_iter().collect(),
                });
            }
        }
        let n = components.len();
        if n < 2 {
            return Vec::new();
        }

        let bivalue = grid.classify_cells::<3>()[2];
        let color_at = |c: &Component, pos: Position| -> Option<bool> {
            if c.red.contains(&pos) {
                Some(true)
            } else if c.blue.contains(&pos) {
                Some(false)
            } else {
                None
            }
        };
        let nodes_of = |c: &Component| -> Vec<Position> {
            c.red.iter().chain(c.blue.iter()).copied().collect()
        };

        // Gather pairwise shared bi-value link cells.
        let mut edges: Vec<(usize, usize, Vec<Position>)> = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let shared: Vec<Position> = nodes_of(&components[i])
                    .into_iter()
                    .filter(|p| bivalue.contains(*p) && nodes_of(&components[j]).contains(p))
                    .collect();
                if !shared.is_empty() {
                    edges.push((i, j, shared));
                }
            }
        }
        if edges.is_empty() {
            return Vec::new();
        }

        let mut adjacency: HashMap<usize, Vec<(usize, Position)>> = HashMap::new();
        for &(i, j, ref shared) in &edges {
            let cell = shared[0];
            adjacency.entry(i).or_default().push((j, cell));
            adjacency.entry(j).or_default().push((i, cell));
        }

        // Union-find to group components transitively connected by a link cell.
        let mut parent: Vec<usize> = (0..n).collect();
        fn find(parent: &mut [usize], x: usize) -> usize {
            if parent[x] != x {
                parent[x] = find(parent, parent[x]);
            }
            parent[x]
        }
        for &(i, j, _) in &edges {
            let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
            if ri != rj {
                parent[ri] = rj;
            }
        }
        let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
        for i in 0..n {
            groups.entry(find(&mut parent, i)).or_default().push(i);
        }

        let mut result = Vec::new();
        for idxs in groups.into_values() {
            if idxs.len() < 2 {
                continue;
            }

            let mut flip: HashMap<usize, bool> = HashMap::new();
            let mut visited: Vec<usize> = Vec::new();
            for &start in &idxs {
                if flip.contains_key(&start) {
                    continue;
                }
                flip.insert(start, false);
                visited.push(start);
                let mut queue = VecDeque::from([start]);
                while let Some(cur) = queue.pop_front() {
                    let Some(neighbors) = adjacency.get(&cur) else {
                        continue;
                    };
                    for &(next, cell) in neighbors {
                        if flip.contains_key(&next) || !idxs.contains(&next) {
                            continue;
                        }
                        let cur_color = color_at(&components[cur], cell).expect("shared link cell");
                        let cur_color = if flip[&cur] { !cur_color } else { cur_color };
                        let next_raw = color_at(&components[next], cell).expect("shared link cell");
                        flip.insert(next, next_raw == cur_color);
                        visited.push(next);
                        queue.push_back(next);
                    }
                }
            }

            let mut red = Vec::new();
            let mut blue = Vec::new();
            for &idx in &idxs {
                let comp = &components[idx];
                let f = flip.get(&idx).copied().unwrap_or(false);
                let (red_positions, blue_positions) = if f {
                    (&comp.blue, &comp.red)
                } else {
                    (&comp.red, &comp.blue)
                };
                for &pos in red_positions {
                    red.push(ColoredCandidate {
                        position: pos,
                        digit: comp.digit,
                    });
                }
                for &pos in blue_positions {
                    blue.push(ColoredCandidate {
                        position: pos,
                        digit: comp.digit,
                    });
                }
            }

            // Synthesize the forced complement digit at link cells colored on
            // only one side so far.
            let mut link_cells: Vec<Position> = Vec::new();
            for &idx in &idxs {
                for pos in nodes_of(&components[idx]) {
                    if bivalue.contains(pos) && !link_cells.contains(&pos) {
                        link_cells.push(pos);
                    }
                }
            }
            for pos in link_cells {
                let digits = grid.candidates_at(pos);
                let Some((da, db)) = digits.as_double() else {
                    continue;
                };
                let has_a = red
                    .iter()
                    .chain(blue.iter())
                    .any(|c| c.position == pos && c.digit == da);
                let has_b = red
                    .iter()
                    .chain(blue.iter())
                    .any(|c| c.position == pos && c.digit == db);
                if has_a && !has_b {
                    let a_red = red.iter().any(|c| c.position == pos && c.digit == da);
                    let target = if a_red { &mut blue } else { &mut red };
                    target.push(ColoredCandidate {
                        position: pos,
                        digit: db,
                    });
                } else if has_b && !has_a {
                    let b_red = red.iter().any(|c| c.position == pos && c.digit == db);
                    let target = if b_red { &mut blue } else { &mut red };
                    target.push(ColoredCandidate {
                        position: pos,
                        digit: da,
                    });
                }
            }

            result.push(SuperChain { red, blue });
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use lucidoku_core::CandidateGrid;

    use super::*;

    #[test]
    fn test_build_all_empty_on_fresh_grid() {
        let grid = TechniqueGrid::from(CandidateGrid::new());
        assert!(SuperChain::build_all(&grid).is_empty());
    }
}
