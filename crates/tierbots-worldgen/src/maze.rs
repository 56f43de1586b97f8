//! Eller's algorithm: a perfect maze (spanning tree) over a `width x height`
//! grid of super-cells, represented as two independent wall matrices.
//!
//! Row-carried "set id" bookkeeping: cells in the same set would form a
//! cycle if joined, so same-set neighbors keep their wall; cells in
//! different sets flip a coin between merging (no wall) and staying split
//! (wall).

use rand::Rng;
use tierbots_common::grid::Grid;

/// `rwalls[x, y]` is true iff there is a wall between `(x, y)` and
/// `(x + 1, y)`; `bwalls[x, y]` iff there is a wall between `(x, y)` and
/// `(x, y + 1)`.
#[derive(Debug, Clone)]
pub struct Maze {
    pub width: u32,
    pub height: u32,
    pub rwalls: Grid<bool>,
    pub bwalls: Grid<bool>,
}

impl Maze {
    pub fn right_wall(&self, x: u32, y: u32) -> bool {
        if x + 1 >= self.width {
            return true;
        }
        *self.rwalls.get(x as i64, y as i64).unwrap()
    }

    pub fn bottom_wall(&self, x: u32, y: u32) -> bool {
        if y + 1 >= self.height {
            return true;
        }
        *self.bwalls.get(x as i64, y as i64).unwrap()
    }
}

/// Assigns fresh, unused positive ids to every zero slot in `row`, lowest
/// available id first; non-zero slots are left untouched and their ids are
/// reserved so a fresh id never collides with a carried-over set.
fn fill_unassigned(row: &mut [u32]) {
    let mut used: std::collections::HashSet<u32> =
        row.iter().copied().filter(|&x| x != 0).collect();
    let mut c = 1u32;
    for slot in row.iter_mut() {
        if *slot != 0 {
            continue;
        }
        while used.contains(&c) {
            c += 1;
        }
        *slot = c;
        used.insert(c);
    }
}

/// Replaces every occurrence of set id `b` in `row` with `a`.
fn join_sets(row: &mut [u32], a: u32, b: u32) {
    for slot in row.iter_mut() {
        if *slot == b {
            *slot = a;
        }
    }
}

/// For each distinct set value present in `row`, picks one member at random
/// to guarantee a passage downward (no bottom wall); every other member
/// flips a coin for whether its bottom wall stays.
fn make_bottom_walls<R: Rng>(row: &[u32], rng: &mut R) -> Vec<bool> {
    let mut counts: std::collections::HashMap<u32, u32> = std::collections::HashMap::new();
    for &x in row {
        *counts.entry(x).or_insert(0) += 1;
    }
    let guarded: std::collections::HashMap<u32, u32> = counts
        .iter()
        .map(|(&k, &v)| (k, rng.gen_range(0..v)))
        .collect();
    let mut remaining = counts;
    let mut bwalls = vec![false; row.len()];
    for (i, &x) in row.iter().enumerate() {
        let slot = remaining.get_mut(&x).unwrap();
        *slot -= 1;
        if guarded[&x] == *slot {
            continue;
        }
        if rng.gen_bool(0.5) {
            bwalls[i] = true;
        }
    }
    bwalls
}

/// Generates a perfect maze (cell-graph is a spanning tree: no cycles,
/// every cell reachable from every other) over a `width x height` grid.
pub fn genmaze_eller<R: Rng>(width: u32, height: u32, rng: &mut R) -> Maze {
    assert!(width > 0 && height > 0, "maze dimensions must be positive");

    let mut all_right_walls = Grid::filled(width.saturating_sub(1), height, false);
    let mut all_bottom_walls = Grid::filled(width, height.saturating_sub(1), false);

    let mut row: Vec<u32> = (1..=width).collect();
    let mut rwalls = vec![false; width.saturating_sub(1) as usize];
    let mut rwalls_req = vec![false; width.saturating_sub(1) as usize];

    for y in 0..height {
        fill_unassigned(&mut row);
        rwalls.iter_mut().for_each(|w| *w = false);
        rwalls_req.iter_mut().for_each(|w| *w = false);

        for x in 0..(width.saturating_sub(1)) as usize {
            if row[x] == row[x + 1] {
                rwalls_req[x] = true;
                continue;
            }
            if rng.gen_bool(0.5) {
                rwalls[x] = true;
            } else {
                join_sets(&mut row, row[x], row[x + 1]);
            }
        }

        if y == height - 1 {
            break;
        }

        for x in 0..rwalls.len() as u32 {
            all_right_walls.set(x, y, rwalls_req[x as usize] | rwalls[x as usize]);
        }

        let bwalls = make_bottom_walls(&row, rng);
        for x in 0..width {
            all_bottom_walls.set(x, y, bwalls[x as usize]);
        }
        for (x, cut) in bwalls.iter().enumerate() {
            if *cut {
                row[x] = 0;
            }
        }
    }

    // Bottom row: force full connectivity by merging every pair of distinct
    // sets still separated after the per-row coin flips.
    for x in 0..(width.saturating_sub(1)) as usize {
        if row[x + 1] != row[x] {
            rwalls[x] = false;
            join_sets(&mut row, row[x], row[x + 1]);
        }
    }
    for x in 0..rwalls.len() as u32 {
        all_right_walls.set(x, height - 1, rwalls[x as usize] | rwalls_req[x as usize]);
    }

    Maze {
        width,
        height,
        rwalls: all_right_walls,
        bwalls: all_bottom_walls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use std::collections::{HashSet, VecDeque};

    fn dual_graph_connected(maze: &Maze) -> bool {
        let total = (maze.width * maze.height) as usize;
        if total == 0 {
            return true;
        }
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back((0u32, 0u32));
        seen.insert((0u32, 0u32));
        while let Some((x, y)) = queue.pop_front() {
            let mut neighbors = Vec::new();
            if x > 0 && !maze.right_wall(x - 1, y) {
                neighbors.push((x - 1, y));
            }
            if x + 1 < maze.width && !maze.right_wall(x, y) {
                neighbors.push((x + 1, y));
            }
            if y > 0 && !maze.bottom_wall(x, y - 1) {
                neighbors.push((x, y - 1));
            }
            if y + 1 < maze.height && !maze.bottom_wall(x, y) {
                neighbors.push((x, y + 1));
            }
            for n in neighbors {
                if seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen.len() == total
    }

    fn edge_count(maze: &Maze) -> usize {
        let mut n = 0;
        for y in 0..maze.height {
            for x in 0..maze.width.saturating_sub(1) {
                if !maze.right_wall(x, y) {
                    n += 1;
                }
            }
        }
        for y in 0..maze.height.saturating_sub(1) {
            for x in 0..maze.width {
                if !maze.bottom_wall(x, y) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn perfect_maze_is_spanning_tree() {
        let mut rng = rand_pcg::Pcg64::seed_from_u64(1);
        let maze = genmaze_eller(6, 6, &mut rng);
        assert!(dual_graph_connected(&maze));
        // A spanning tree over N cells has exactly N - 1 edges.
        assert_eq!(edge_count(&maze), (6 * 6 - 1) as usize);
    }

    #[test]
    fn single_cell_maze_is_trivially_connected() {
        let mut rng = rand_pcg::Pcg64::seed_from_u64(2);
        let maze = genmaze_eller(1, 1, &mut rng);
        assert!(dual_graph_connected(&maze));
    }

    #[test]
    fn wide_single_row_maze_is_connected() {
        let mut rng = rand_pcg::Pcg64::seed_from_u64(3);
        let maze = genmaze_eller(10, 1, &mut rng);
        assert!(dual_graph_connected(&maze));
        assert_eq!(edge_count(&maze), 9);
    }

    proptest! {
        #[test]
        fn maze_always_connected_and_acyclic(seed in any::<u64>(), w in 1u32..8, h in 1u32..8) {
            let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
            let maze = genmaze_eller(w, h, &mut rng);
            prop_assert!(dual_graph_connected(&maze));
            prop_assert_eq!(edge_count(&maze), (w * h - 1) as usize);
        }
    }
}
