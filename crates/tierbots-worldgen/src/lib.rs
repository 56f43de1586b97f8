//! Procedural generation of the static map: Eller's-algorithm maze over a
//! grid of super-cells, per-cell road-graph carving, and the world
//! assembler that glues everything into one `NaturalMap` grid plus a list
//! of energy-source positions.
//!
//! Every public function here is pure with respect to an injected
//! `rand::Rng`, so a caller that wants a reproducible world seeds a
//! `rand_pcg::Pcg64` once and threads it through -- the generator itself
//! holds no hidden entropy source.

pub mod assembler;
pub mod cellgen;
pub mod ground_index;
pub mod maze;
pub mod raze;

pub mod prelude {
    pub use crate::assembler::{generate_world, GeneratedWorld};
    pub use crate::cellgen::{make_cell, Exit, Point};
    pub use crate::ground_index::build_ground_index;
    pub use crate::maze::{genmaze_eller, Maze};
    pub use crate::raze::raze_maze_walls;
}

/// Convenience constructor for a deterministic RNG: a fixed seed reproduces
/// an identical world.
pub fn seeded_rng(seed: u64) -> rand_pcg::Pcg64 {
    use rand::SeedableRng;
    rand_pcg::Pcg64::seed_from_u64(seed)
}
