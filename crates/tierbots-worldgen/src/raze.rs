//! Wall razing: turns a perfect maze into a braided one by independently
//! clearing each interior wall with probability `prob`.

use rand::Rng;

use crate::maze::Maze;

/// Clears each interior right-wall and bottom-wall independently with
/// probability `prob`, introducing cycles into the maze's dual graph.
pub fn raze_maze_walls<R: Rng>(maze: &mut Maze, prob: f64, rng: &mut R) {
    for y in 0..maze.height {
        for x in 0..maze.width.saturating_sub(1) {
            let cur = *maze.rwalls.get(x as i64, y as i64).unwrap();
            if cur && rng.gen_bool(prob) {
                maze.rwalls.set(x, y, false);
            }
        }
    }
    for y in 0..maze.height.saturating_sub(1) {
        for x in 0..maze.width {
            let cur = *maze.bwalls.get(x as i64, y as i64).unwrap();
            if cur && rng.gen_bool(prob) {
                maze.bwalls.set(x, y, false);
            }
        }
    }
}
