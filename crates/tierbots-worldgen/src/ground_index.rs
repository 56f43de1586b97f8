//! Dense ground-square enumeration: a perfect hash from `(x, y)` to a slot
//! in the decay arrays.
//!
//! The index is built once, in `x`-outer, `y`-inner order, and never changes
//! afterward even if the square later becomes a wall or road.

use tierbots_common::grid::Grid;
use tierbots_common::natural_map::NaturalMap;

/// Builds a `W*H` array of ids and returns `(index, upper_bound)` where
/// `upper_bound == G + 1` (slot 0 is reserved for "not ground").
pub fn build_ground_index(natural_map: &Grid<NaturalMap>) -> (Grid<u32>, u32) {
    let width = natural_map.width();
    let height = natural_map.height();
    let mut out = Grid::filled(width, height, 0u32);
    let mut next_id = 1u32;
    for x in 0..width {
        for y in 0..height {
            if *natural_map.get(x as i64, y as i64).unwrap() == NaturalMap::Ground {
                out.set(x, y, next_id);
                next_id += 1;
            }
        }
    }
    (out, next_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_map_has_no_ground_ids() {
        let map = Grid::filled(4, 4, NaturalMap::NaturalWall);
        let (idx, upper) = build_ground_index(&map);
        assert_eq!(upper, 1);
        for (x, y) in idx.iter_coords() {
            assert_eq!(*idx.get(x as i64, y as i64).unwrap(), 0);
        }
    }

    #[test]
    fn ground_squares_get_unique_dense_ids() {
        let mut map = Grid::filled(2, 2, NaturalMap::NaturalWall);
        map.set(0, 0, NaturalMap::Ground);
        map.set(1, 1, NaturalMap::Ground);
        let (idx, upper) = build_ground_index(&map);
        assert_eq!(upper, 3);
        let a = *idx.get(0, 0).unwrap();
        let b = *idx.get(1, 1).unwrap();
        assert_ne!(a, 0);
        assert_ne!(b, 0);
        assert_ne!(a, b);
        assert_eq!(*idx.get(1, 0).unwrap(), 0);
    }

    #[test]
    fn index_is_assigned_in_x_outer_y_inner_order() {
        let mut map = Grid::filled(2, 2, NaturalMap::NaturalWall);
        map.set(0, 0, NaturalMap::Ground);
        map.set(0, 1, NaturalMap::Ground);
        map.set(1, 0, NaturalMap::Ground);
        let (idx, _) = build_ground_index(&map);
        assert_eq!(*idx.get(0, 0).unwrap(), 1);
        assert_eq!(*idx.get(0, 1).unwrap(), 2);
        assert_eq!(*idx.get(1, 0).unwrap(), 3);
    }

    proptest! {
        #[test]
        fn index_is_a_bijection_onto_one_upper_bound(
            cells in prop::collection::vec(any::<bool>(), 1..400),
            w in 1u32..20,
        ) {
            let h = (cells.len() as u32 / w).max(1);
            let padded: Vec<NaturalMap> = (0..(w * h) as usize)
                .map(|i| {
                    if *cells.get(i).unwrap_or(&false) {
                        NaturalMap::Ground
                    } else {
                        NaturalMap::NaturalWall
                    }
                })
                .collect();
            let ground_count = padded.iter().filter(|&&v| v == NaturalMap::Ground).count() as u32;
            let map = Grid::from_cells(w, h, padded);
            let (idx, upper) = build_ground_index(&map);

            prop_assert_eq!(upper, ground_count + 1);
            let mut seen = std::collections::HashSet::new();
            for (x, y) in idx.iter_coords() {
                let id = *idx.get(x as i64, y as i64).unwrap();
                let is_ground = *map.get(x as i64, y as i64).unwrap() == NaturalMap::Ground;
                prop_assert_eq!(id != 0, is_ground);
                if id != 0 {
                    prop_assert!(seen.insert(id), "duplicate ground index id {}", id);
                    prop_assert!(id < upper);
                }
            }
        }
    }
}
