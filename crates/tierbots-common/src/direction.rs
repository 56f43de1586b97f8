//! 8-way direction codes, aliased onto `up`/`down`/`left`/`right`-style
//! names for callers that prefer compass terms.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    North = 1,
    NorthEast = 2,
    East = 3,
    SouthEast = 4,
    South = 5,
    SouthWest = 6,
    West = 7,
    NorthWest = 8,
}

impl Direction {
    pub const UP: Direction = Direction::North;
    pub const UP_RIGHT: Direction = Direction::NorthEast;
    pub const RIGHT: Direction = Direction::East;
    pub const DOWN_RIGHT: Direction = Direction::SouthEast;
    pub const DOWN: Direction = Direction::South;
    pub const DOWN_LEFT: Direction = Direction::SouthWest;
    pub const LEFT: Direction = Direction::West;
    pub const UP_LEFT: Direction = Direction::NorthWest;

    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// `(dx, dy)` offset for this direction on a y-down grid.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// The direction pointing the opposite way, used by the world assembler
    /// to mirror exits across a shared cell border (E<->W, N<->S).
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }

    pub fn from_code(code: u8) -> Option<Direction> {
        Some(match code {
            1 => Direction::North,
            2 => Direction::NorthEast,
            3 => Direction::East,
            4 => Direction::SouthEast,
            5 => Direction::South,
            6 => Direction::SouthWest,
            7 => Direction::West,
            8 => Direction::NorthWest,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_cover_all_eight_compass_points() {
        assert_eq!(Direction::North.offset(), (0, -1));
        assert_eq!(Direction::NorthEast.offset(), (1, -1));
        assert_eq!(Direction::East.offset(), (1, 0));
        assert_eq!(Direction::SouthEast.offset(), (1, 1));
        assert_eq!(Direction::South.offset(), (0, 1));
        assert_eq!(Direction::SouthWest.offset(), (-1, 1));
        assert_eq!(Direction::West.offset(), (-1, 0));
        assert_eq!(Direction::NorthWest.offset(), (-1, -1));
    }

    #[test]
    fn aliases_reuse_the_same_codes() {
        assert_eq!(Direction::UP as u8, Direction::North as u8);
        assert_eq!(Direction::RIGHT as u8, Direction::East as u8);
        assert_eq!(Direction::DOWN as u8, Direction::South as u8);
        assert_eq!(Direction::LEFT as u8, Direction::West as u8);
    }

    #[test]
    fn opposite_is_involutive() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn east_west_are_opposites() {
        assert_eq!(Direction::East.opposite(), Direction::West);
        assert_eq!(Direction::North.opposite(), Direction::South);
    }

    #[test]
    fn from_code_roundtrips() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_code(d as u8), Some(d));
        }
        assert_eq!(Direction::from_code(0), None);
        assert_eq!(Direction::from_code(9), None);
    }
}
