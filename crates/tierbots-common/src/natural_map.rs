//! `NaturalMap` terrain codes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NaturalMap {
    /// Unexplored / not currently visible to any watcher.
    Unknown = 0,
    /// Empty, walkable floor.
    Ground = 1,
    /// Immutable impassable terrain from generation. Never decays.
    NaturalWall = 2,
    /// Player-built wall occupying a ground square. Decays per
    /// `wall_road_zero`.
    ArtificialWall = 3,
    /// Player-built road occupying a ground square. Decays per
    /// `wall_road_zero`.
    Road = 4,
}

impl NaturalMap {
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => NaturalMap::Unknown,
            1 => NaturalMap::Ground,
            2 => NaturalMap::NaturalWall,
            3 => NaturalMap::ArtificialWall,
            4 => NaturalMap::Road,
            other => panic!("invalid NaturalMap byte: {other}"),
        }
    }

    /// Only artificial walls and roads carry hp via the decay arrays.
    #[inline]
    pub fn decays(self) -> bool {
        matches!(self, NaturalMap::ArtificialWall | NaturalMap::Road)
    }
}
