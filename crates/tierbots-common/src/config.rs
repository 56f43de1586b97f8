//! World-size and decay-rate configuration, grouped the way
//! `nomai_engine`'s tick loop groups its own tunables into a small
//! `Serialize`/`Deserialize` struct instead of scattering bare constants.

use serde::{Deserialize, Serialize};

/// Fixed geometry constants for a single generated cell and the world grid
/// built out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSize {
    /// Width and height, in ground squares, of one maze cell.
    pub cell: u32,
    /// Thickness, in squares, of the wall ring drawn around a cell's corner.
    pub corner_wall: u32,
    /// Inclusive-exclusive range passed to the source-count sampler, i.e.
    /// `sources_per_cell.0..sources_per_cell.1`.
    pub sources_per_cell: (u32, u32),
    /// Minimum distance a source candidate square must keep from a cell's
    /// outer border.
    pub source_min_border_offset: u32,
}

impl Default for WorldSize {
    fn default() -> Self {
        WorldSize {
            cell: 64,
            corner_wall: 3,
            sources_per_cell: (2, 5),
            source_min_border_offset: 1,
        }
    }
}

/// Per-tick decay rates and related constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayRates {
    /// Fraction of max hp an artificial wall loses per tick once untended.
    pub wall_decay: f64,
    /// Fraction of max hp a road loses per tick once untended.
    pub road_decay: f64,
    /// Fraction of its remaining amount an energy drop loses per tick.
    pub drop_decay: f64,
    /// Energy a source square replenishes up to.
    pub source_max_energy: u32,
}

impl Default for DecayRates {
    fn default() -> Self {
        DecayRates {
            wall_decay: 0.1,
            road_decay: 0.1,
            drop_decay: 0.1,
            source_max_energy: 2000,
        }
    }
}

/// Names of the five artifacts a `ServerState` persists to disk, grouped so `tierbots-persistence` doesn't
/// hardcode them in more than one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filenames {
    pub natural_map: String,
    pub ground_index: String,
    pub wall_road: String,
    pub drops: String,
    pub data: String,
}

impl Default for Filenames {
    fn default() -> Self {
        Filenames {
            natural_map: "naturalmap.npy".to_string(),
            ground_index: "gindex.npy".to_string(),
            wall_road: "wallroad.npy".to_string(),
            drops: "drops.npy".to_string(),
            data: "data.pickle".to_string(),
        }
    }
}
