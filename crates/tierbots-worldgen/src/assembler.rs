//! World assembler: combines the maze topology with per-cell generation
//! into one glued `NaturalMap` grid, coordinating exits across shared cell
//! borders and sampling energy-source positions.

use std::collections::HashMap;

use rand::Rng;

use tierbots_common::config::WorldSize;
use tierbots_common::direction::Direction;
use tierbots_common::grid::Grid;
use tierbots_common::natural_map::NaturalMap;

use crate::cellgen::{make_cell, make_random_exits, Exit, Point};
use crate::maze::genmaze_eller;
use crate::raze::raze_maze_walls;

/// A fully assembled static map plus the energy-source positions sampled
/// during generation.
#[derive(Debug, Clone)]
pub struct GeneratedWorld {
    pub natural_map: Grid<NaturalMap>,
    pub sources: Vec<(u32, u32)>,
}

/// Probability a perfect-maze wall is razed away.
const RAZE_PROBABILITY: f64 = 0.4;

fn build_cells<R: Rng>(
    cell_w: u32,
    cell_h: u32,
    size: &WorldSize,
    rng: &mut R,
) -> HashMap<(u32, u32), (Grid<NaturalMap>, Vec<Point>)> {
    let maze = genmaze_eller(cell_w, cell_h, rng);
    let mut maze = maze;
    raze_maze_walls(&mut maze, RAZE_PROBABILITY, rng);

    let mut bottom_exits: Vec<Vec<Exit>> = vec![Vec::new(); cell_w as usize];
    let mut cells = HashMap::with_capacity((cell_w * cell_h) as usize);

    for y in 0..cell_h {
        let mut right_exit: Vec<Exit> = Vec::new();
        for x in 0..cell_w {
            let right = if x + 1 < cell_w {
                maze.right_wall(x, y)
            } else {
                true
            };
            let bottom = if y + 1 < cell_h {
                maze.bottom_wall(x, y)
            } else {
                true
            };

            let mut exits: Vec<Exit> = Vec::new();
            exits.extend(right_exit.iter().copied());
            exits.extend(bottom_exits[x as usize].iter().copied());

            let mut sides: Vec<Direction> = Vec::new();
            if !right {
                sides.push(Direction::East);
            }
            if !bottom {
                sides.push(Direction::South);
            }
            exits.extend(make_random_exits(Some(&sides), size.cell, size.corner_wall, rng));

            right_exit = exits
                .iter()
                .filter(|e| e.side == Direction::East)
                .map(|e| Exit {
                    side: Direction::West,
                    a: e.a,
                    b: e.b,
                })
                .collect();
            bottom_exits[x as usize] = exits
                .iter()
                .filter(|e| e.side == Direction::South)
                .map(|e| Exit {
                    side: Direction::North,
                    a: e.a,
                    b: e.b,
                })
                .collect();

            let generated = make_cell(Some(exits), None, size.cell, size.corner_wall, rng);
            tracing::trace!(cell.x = x, cell.y = y, "cell generated");
            cells.insert((x, y), generated);
        }
        tracing::debug!(
            percent = (y + 1) * 100 / cell_h,
            "world generation progress"
        );
    }
    cells
}

fn has_ground_neighbor(cell: &Grid<NaturalMap>, x: i64, y: i64) -> bool {
    for dx in -1i64..=1 {
        for dy in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if let Some(v) = cell.get(x + dx, y + dy) {
                if *v == NaturalMap::Ground {
                    return true;
                }
            }
        }
    }
    false
}

/// Natural-wall squares, inset by `ofs` from the cell border, that touch a
/// ground square — candidate energy-source positions.
fn source_candidates(cell: &Grid<NaturalMap>, cell_size: u32, ofs: u32) -> Vec<(u32, u32)> {
    if ofs * 2 >= cell_size {
        return Vec::new();
    }
    let mut out = Vec::new();
    for x in ofs..(cell_size - ofs) {
        for y in ofs..(cell_size - ofs) {
            if *cell.get(x as i64, y as i64).unwrap() != NaturalMap::NaturalWall {
                continue;
            }
            if has_ground_neighbor(cell, x as i64, y as i64) {
                out.push((x, y));
            }
        }
    }
    out
}

fn setup_sources<R: Rng>(
    cells: &HashMap<(u32, u32), (Grid<NaturalMap>, Vec<Point>)>,
    size: &WorldSize,
    cell_w: u32,
    cell_h: u32,
    rng: &mut R,
) -> Vec<(u32, u32)> {
    let mut result = Vec::new();
    for y in 0..cell_h {
        for x in 0..cell_w {
            let (cell, _) = &cells[&(x, y)];
            let candidates = source_candidates(cell, size.cell, size.source_min_border_offset);
            if candidates.is_empty() {
                continue;
            }
            let want = rng.gen_range(size.sources_per_cell.0..size.sources_per_cell.1);
            let scount = (want as usize).min(candidates.len());
            if scount == 0 {
                continue;
            }
            let picks = rand::seq::index::sample(rng, candidates.len(), scount);
            for i in picks.iter() {
                let (ix, iy) = candidates[i];
                result.push((x * size.cell + ix, y * size.cell + iy));
            }
        }
    }
    result
}

fn glue_parts_together(
    cells: &HashMap<(u32, u32), (Grid<NaturalMap>, Vec<Point>)>,
    cell_w: u32,
    cell_h: u32,
    size: &WorldSize,
) -> Grid<NaturalMap> {
    let total_w = cell_w * size.cell;
    let total_h = cell_h * size.cell;
    let mut out = Grid::filled(total_w, total_h, NaturalMap::NaturalWall);
    for y in 0..cell_h {
        for x in 0..cell_w {
            let (cell, _) = &cells[&(x, y)];
            let (ox, oy) = (x * size.cell, y * size.cell);
            for cy in 0..size.cell {
                for cx in 0..size.cell {
                    let v = *cell.get(cx as i64, cy as i64).unwrap();
                    out.set(ox + cx, oy + cy, v);
                }
            }
        }
    }
    out
}

/// Generates a full `(cell_w * size.cell) x (cell_h * size.cell)` world:
/// maze + raze, per-cell generation with coordinated borders, energy-source
/// sampling, and gluing.
pub fn generate_world<R: Rng>(
    cell_w: u32,
    cell_h: u32,
    size: &WorldSize,
    rng: &mut R,
) -> GeneratedWorld {
    let cells = build_cells(cell_w, cell_h, size, rng);
    let sources = setup_sources(&cells, size, cell_w, cell_h, rng);
    let natural_map = glue_parts_together(&cells, cell_w, cell_h, size);
    GeneratedWorld {
        natural_map,
        sources,
    }
}
