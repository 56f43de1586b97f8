//! Per-cell generation: side exits, an interior road graph of weighted
//! points, and circular road-carving between connected points.
//!
//! The road graph is modeled as an arena (`Vec<Point>`) with neighbor sets
//! of indices rather than handles that could reference each other
//! cyclically.

use rand::Rng;
use std::collections::BTreeSet;

use tierbots_common::direction::Direction;
use tierbots_common::grid::Grid;
use tierbots_common::natural_map::NaturalMap;

/// One side exit: a ground span `[a, b)` carved through the border on
/// `side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    pub side: Direction,
    pub a: u32,
    pub b: u32,
}

/// One node of a cell's interior road graph.
///
/// `fixed` points sit on an exit span and never have their size resampled;
/// every other point is free to grow, shrink, or be cut into a midpoint
/// during long-chord subdivision.
#[derive(Debug, Clone)]
pub struct Point {
    pub xy: (i32, i32),
    pub neigh: BTreeSet<usize>,
    pub fixed: bool,
    pub size: i32,
}

/// `[a1,b1) ∩ [a2,b2)`, or `None` if the intersection is empty.
pub fn range_intersect(a1: i64, b1: i64, a2: i64, b2: i64) -> Option<(i64, i64)> {
    let a = a1.max(a2);
    let b = b1.min(b2);
    if a >= b {
        None
    } else {
        Some((a, b))
    }
}

/// Clamps `value` into `[a, b)`.
pub fn ensure_range(value: i64, a: i64, b: i64) -> i64 {
    if value < a {
        a
    } else if value >= b {
        b - 1
    } else {
        value
    }
}

fn build_wall(cell: &mut Grid<NaturalMap>, size: u32) {
    for x in 0..size {
        cell.set(x, 0, NaturalMap::NaturalWall);
        cell.set(x, size - 1, NaturalMap::NaturalWall);
    }
    for y in 0..size {
        cell.set(0, y, NaturalMap::NaturalWall);
        cell.set(size - 1, y, NaturalMap::NaturalWall);
    }
}

/// Chooses a random exit set, restricted to `only_sides` if given.
pub fn make_random_exits<R: Rng>(
    only_sides: Option<&[Direction]>,
    cell_size: u32,
    corner_wall: u32,
    rng: &mut R,
) -> Vec<Exit> {
    const ALL_SIDES: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
    let sides: &[Direction] = only_sides.unwrap_or(&ALL_SIDES);
    if sides.is_empty() {
        return Vec::new();
    }
    let count = rng.gen_range(sides.len()..=sides.len() * 3);
    let mut r = Vec::with_capacity(count);
    for i in 0..count {
        let side = if i < sides.len() {
            sides[i]
        } else {
            sides[rng.gen_range(0..sides.len())]
        };
        let leng = rng.gen_range(3..=cell_size) as i64;
        let mut mid = rng.gen_range(corner_wall as i64..=(cell_size - corner_wall - 1) as i64);
        mid -= leng / 2;
        if let Some((a, b)) = range_intersect(
            mid,
            mid + leng,
            corner_wall as i64,
            (cell_size - corner_wall) as i64,
        ) {
            r.push(Exit {
                side,
                a: a as u32,
                b: b as u32,
            });
        }
    }
    r
}

fn apply_exits(cell: &mut Grid<NaturalMap>, exits: &[Exit], cell_size: u32) {
    for e in exits {
        match e.side {
            Direction::North => {
                for x in e.a..e.b {
                    cell.set(x, 0, NaturalMap::Ground);
                }
            }
            Direction::East => {
                for y in e.a..e.b {
                    cell.set(cell_size - 1, y, NaturalMap::Ground);
                }
            }
            Direction::South => {
                for x in e.a..e.b {
                    cell.set(x, cell_size - 1, NaturalMap::Ground);
                }
            }
            _ => {
                for y in e.a..e.b {
                    cell.set(0, y, NaturalMap::Ground);
                }
            }
        }
    }
}

/// Finds contiguous ground spans along a border row/column.
fn find_exits(row: &[NaturalMap]) -> Vec<(u32, u32)> {
    if row.is_empty() {
        return Vec::new();
    }
    let is_wall: Vec<bool> = row.iter().map(|v| *v == NaturalMap::NaturalWall).collect();
    let mut changes = Vec::new();
    for i in 0..is_wall.len() - 1 {
        if is_wall[i] != is_wall[i + 1] {
            changes.push(i as u32);
        }
    }
    let mut out = Vec::new();
    let mut opn: Option<u32> = if row[0] == NaturalMap::Ground {
        Some(0)
    } else {
        None
    };
    for i in changes {
        match opn {
            None => opn = Some(i + 1),
            Some(o) => {
                out.push((o, i + 1));
                opn = None;
            }
        }
    }
    if let Some(o) = opn {
        out.push((o, row.len() as u32));
    }
    out
}

fn point_dist(a: (i32, i32), b: (i32, i32)) -> f64 {
    let dx = (b.0 - a.0) as f64;
    let dy = (b.1 - a.1) as f64;
    (dx * dx + dy * dy).sqrt()
}

fn make_side_point(side: Direction, x: i32, cell_size: i32) -> (i32, i32) {
    match side {
        Direction::North => (x, 0),
        Direction::East => (cell_size - 1, x),
        Direction::South => (x, cell_size - 1),
        _ => (0, x),
    }
}

struct Builder {
    points: Vec<Point>,
}

impl Builder {
    fn add_point(&mut self, x: i32, y: i32, fixed: bool, size: i32) -> usize {
        self.points.push(Point {
            xy: (x, y),
            neigh: BTreeSet::new(),
            fixed,
            size,
        });
        self.points.len() - 1
    }

    fn connect(&mut self, a: usize, b: usize) {
        self.points[a].neigh.insert(b);
        self.points[b].neigh.insert(a);
    }

    fn disconnect(&mut self, a: usize, b: usize) {
        self.points[a].neigh.remove(&b);
        self.points[b].neigh.remove(&a);
    }

    fn split_chord(&mut self, a: usize, b: usize) -> usize {
        let ap = self.points[a].xy;
        let bp = self.points[b].xy;
        let mid = ((ap.0 + bp.0) / 2, (ap.1 + bp.1) / 2);
        let mid_id = self.add_point(mid.0, mid.1, false, 0);
        self.disconnect(a, b);
        self.connect(a, mid_id);
        self.connect(b, mid_id);
        mid_id
    }

    /// Nearest non-fixed point to `(x, y)` other than `my_id`.
    fn closest_notfixed(&self, my_id: usize, x: i32, y: i32) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(idx, p)| *idx != my_id && !p.fixed)
            .min_by(|(_, a), (_, b)| {
                point_dist((x, y), a.xy)
                    .partial_cmp(&point_dist((x, y), b.xy))
                    .unwrap()
            })
            .map(|(idx, _)| idx)
    }

    /// Connected components over the whole arena (fixed and non-fixed).
    fn detect_groups(&self) -> Vec<BTreeSet<usize>> {
        let mut remaining: BTreeSet<usize> = (0..self.points.len()).collect();
        let mut groups = Vec::new();
        while let Some(&seed) = remaining.iter().next() {
            remaining.remove(&seed);
            let mut group = BTreeSet::new();
            group.insert(seed);
            let mut stack = vec![seed];
            while let Some(idx) = stack.pop() {
                for &n in &self.points[idx].neigh {
                    if group.insert(n) {
                        remaining.remove(&n);
                        stack.push(n);
                    }
                }
            }
            groups.push(group);
        }
        groups
    }

    /// Closest cross-group pair between `groups[0]` and every other group;
    /// returns `(a, b, other_group_index)`.
    fn find_closest_group(&self, groups: &[BTreeSet<usize>]) -> Option<(usize, usize, usize)> {
        let my_group = &groups[0];
        let mut best: Option<(f64, usize, usize, usize)> = None;
        for (gi, group) in groups.iter().enumerate().skip(1) {
            for &aidx in my_group {
                for &bidx in group {
                    let d = point_dist(self.points[aidx].xy, self.points[bidx].xy);
                    if best.map(|(bd, ..)| d < bd).unwrap_or(true) {
                        best = Some((d, aidx, bidx, gi));
                    }
                }
            }
        }
        best.map(|(_, a, b, gi)| (a, b, gi))
    }

    /// Shortest-path distance between `a` and `b` over the current graph,
    /// Euclidean edge weights (plain Dijkstra).
    fn dijkstra(&self, a: usize, b: usize) -> f64 {
        use std::collections::HashSet;
        let mut finished: HashSet<usize> = HashSet::new();
        let mut not_finished: HashSet<usize> = HashSet::from([a]);
        let mut mindist: std::collections::HashMap<usize, f64> =
            std::collections::HashMap::from([(a, 0.0)]);
        loop {
            let kidx = *not_finished
                .iter()
                .min_by(|&&x, &&y| mindist[&x].partial_cmp(&mindist[&y]).unwrap())
                .expect("graph connected: target must be reachable");
            let kdist = mindist[&kidx];
            if kidx == b {
                return kdist;
            }
            for &midx in &self.points[kidx].neigh {
                if finished.contains(&midx) {
                    continue;
                }
                not_finished.insert(midx);
                let d = point_dist(self.points[kidx].xy, self.points[midx].xy);
                let cand = kdist + d;
                let better = mindist.get(&midx).map(|&cur| cand < cur).unwrap_or(true);
                if better {
                    mindist.insert(midx, cand);
                }
            }
            finished.insert(kidx);
            not_finished.remove(&kidx);
        }
    }
}

/// Builds the interior road graph for a cell whose border exits are
/// already carved. Returns the point arena.
fn build_road_graph<R: Rng>(cell: &Grid<NaturalMap>, cell_size: u32, rng: &mut R) -> Vec<Point> {
    let sz = cell_size as i32;
    let north: Vec<NaturalMap> = (0..cell_size).map(|x| *cell.get(x as i64, 0).unwrap()).collect();
    let east: Vec<NaturalMap> = (0..cell_size)
        .map(|y| *cell.get((cell_size - 1) as i64, y as i64).unwrap())
        .collect();
    let south: Vec<NaturalMap> = (0..cell_size)
        .map(|x| *cell.get(x as i64, (cell_size - 1) as i64).unwrap())
        .collect();
    let west: Vec<NaturalMap> = (0..cell_size).map(|y| *cell.get(0, y as i64).unwrap()).collect();

    let mut exits: Vec<Exit> = Vec::new();
    exits.extend(find_exits(&north).into_iter().map(|(a, b)| Exit {
        side: Direction::North,
        a,
        b,
    }));
    exits.extend(find_exits(&east).into_iter().map(|(a, b)| Exit {
        side: Direction::East,
        a,
        b,
    }));
    exits.extend(find_exits(&south).into_iter().map(|(a, b)| Exit {
        side: Direction::South,
        a,
        b,
    }));
    exits.extend(find_exits(&west).into_iter().map(|(a, b)| Exit {
        side: Direction::West,
        a,
        b,
    }));

    let mut b = Builder { points: Vec::new() };

    // Fixed points every 5 squares along each exit span.
    for e in &exits {
        let (base, end, size) = if e.b - e.a < 10 {
            ((e.a + e.b) / 2, e.b, ((e.b - e.a) / 2) as i32)
        } else {
            (e.a + 2, e.b - 2, 3)
        };
        let mut i = base;
        while i < end {
            let p = make_side_point(e.side, i as i32, sz);
            b.add_point(p.0, p.1, true, size);
            i += 5;
        }
    }

    // Random interior points.
    let mut not_fixed_ids: BTreeSet<usize> = BTreeSet::new();
    let n_interior = rng.gen_range(8..=30);
    let corner_wall = 3i32; // matches WorldSize::default().corner_wall
    for _ in 0..n_interior {
        let x = rng.gen_range(corner_wall..=(sz - corner_wall - 1));
        let y = rng.gen_range(corner_wall..=(sz - corner_wall - 1));
        let idx = b.add_point(x, y, false, 0);
        not_fixed_ids.insert(idx);
    }

    // Connect every point to its nearest non-fixed point.
    for aidx in 0..b.points.len() {
        let (x, y) = b.points[aidx].xy;
        if let Some(bidx) = b.closest_notfixed(aidx, x, y) {
            b.connect(aidx, bidx);
        }
    }

    // Merge connected components restricted to non-fixed points.
    let mut groups: Vec<BTreeSet<usize>> = b
        .detect_groups()
        .into_iter()
        .map(|g| g.intersection(&not_fixed_ids).copied().collect())
        .filter(|g: &BTreeSet<usize>| !g.is_empty())
        .collect();
    while groups.len() > 1 {
        if let Some((aidx, bidx, gi)) = b.find_closest_group(&groups) {
            b.connect(aidx, bidx);
            let merged = groups[gi].clone();
            groups[0].extend(merged);
            groups.remove(gi);
        } else {
            break;
        }
    }

    // Shortcut edges: connect the non-fixed pair most under its shortest
    // path distance, up to a random number of times.
    let shortcut_rounds = rng.gen_range(0..=8);
    for _ in 0..shortcut_rounds {
        let ids: Vec<usize> = not_fixed_ids.iter().copied().collect();
        let mut best: Option<(f64, usize, usize)> = None;
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let (aidx, bidx) = (ids[i], ids[j]);
                let direct = point_dist(b.points[aidx].xy, b.points[bidx].xy);
                let path = b.dijkstra(aidx, bidx);
                let rate = path - direct;
                if best.map(|(br, ..)| rate > br).unwrap_or(true) {
                    best = Some((rate, aidx, bidx));
                }
            }
        }
        match best {
            Some((_, aidx, bidx)) => b.connect(aidx, bidx),
            None => break,
        }
    }

    // Size assignment for non-fixed points.
    for &idx in &not_fixed_ids {
        let deg = b.points[idx].neigh.len() as i64;
        let lo = (deg / 2).max(1);
        let hi = deg.max(2);
        b.points[idx].size = rng.gen_range(lo..=hi) as i32;
    }

    // Long-chord subdivision.
    let mut worked: BTreeSet<(usize, usize)> = BTreeSet::new();
    let mut aidx = 0;
    while aidx < b.points.len() {
        let neigh: Vec<usize> = b.points[aidx].neigh.iter().copied().collect();
        for bidx in neigh {
            let key = if aidx > bidx { (aidx, bidx) } else { (bidx, aidx) };
            if worked.contains(&key) {
                continue;
            }
            worked.insert(key);
            let ap = b.points[aidx].xy;
            let bp = b.points[bidx].xy;
            let dist = point_dist(ap, bp);
            if dist < cell_size as f64 / 6.0 {
                continue;
            }
            let midx = b.split_chord(aidx, bidx);
            let old_xy = b.points[midx].xy;
            let k = (dist / 2.5).round() as i64;
            let jx = if k == 0 { 0 } else { rng.gen_range(-k..=k) };
            let jy = if k == 0 { 0 } else { rng.gen_range(-k..=k) };
            let size_a = b.points[aidx].size;
            let size_b = b.points[bidx].size;
            b.points[midx].xy = (
                ensure_range(
                    old_xy.0 as i64 + jx,
                    corner_wall as i64,
                    (sz - corner_wall - 1) as i64,
                ) as i32,
                ensure_range(
                    old_xy.1 as i64 + jy,
                    corner_wall as i64,
                    (sz - corner_wall - 1) as i64,
                ) as i32,
            );
            b.points[midx].size = (size_a + size_b) / 2;
        }
        aidx += 1;
    }

    b.points
}

/// Sets every square within `radius` of `(cx, cy)` to ground, clipped to
/// the inner `[1, cell_size - 1)` rectangle.
fn remove_circle(cell: &mut Grid<NaturalMap>, cx: i64, cy: i64, radius: i64, cell_size: i64) {
    if radius < 0 {
        return;
    }
    let radius2 = radius * radius;
    let (xa, xb) = match range_intersect(1, cell_size - 1, cx - radius, cx + radius + 1) {
        Some(r) => r,
        None => return,
    };
    let (ya, yb) = match range_intersect(1, cell_size - 1, cy - radius, cy + radius + 1) {
        Some(r) => r,
        None => return,
    };
    for x in xa..xb {
        for y in ya..yb {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy > radius2 {
                continue;
            }
            cell.set(x as u32, y as u32, NaturalMap::Ground);
        }
    }
}

fn remove_walls_along_path(
    cell: &mut Grid<NaturalMap>,
    a: (i32, i32),
    b: (i32, i32),
    a_diam: i64,
    b_diam: i64,
    cell_size: i64,
) {
    remove_circle(cell, a.0 as i64, a.1 as i64, a_diam, cell_size);
    remove_circle(cell, b.0 as i64, b.1 as i64, b_diam, cell_size);
    let d = point_dist(a, b);
    if d == 0.0 {
        return;
    }
    let dx = (b.0 - a.0) as f64 / d;
    let dy = (b.1 - a.1) as f64 / d;
    let dd = (b_diam - a_diam) as f64 / d;
    let mut i = 0.0;
    while i < d {
        let x = (i * dx + a.0 as f64).round() as i64;
        let y = (i * dy + a.1 as f64).round() as i64;
        let diam = (i * dd + a_diam as f64).round() as i64;
        remove_circle(cell, x, y, diam, cell_size);
        i += 1.0;
    }
}

fn carve_roads(cell: &mut Grid<NaturalMap>, points: &[Point], cell_size: u32) {
    let mut worked: BTreeSet<(usize, usize)> = BTreeSet::new();
    for (aidx, pt) in points.iter().enumerate() {
        for &bidx in &pt.neigh {
            let key = if aidx > bidx { (aidx, bidx) } else { (bidx, aidx) };
            if worked.contains(&key) {
                continue;
            }
            worked.insert(key);
            let pt2 = &points[bidx];
            remove_walls_along_path(
                cell,
                pt.xy,
                pt2.xy,
                pt.size as i64,
                pt2.size as i64,
                cell_size as i64,
            );
        }
    }
}

/// Generates one 64x64 `NaturalMap` cell block. `exits`, when given,
/// overrides random exit generation (used by the world assembler to line
/// up shared borders between neighboring cells).
pub fn make_cell<R: Rng>(
    exits: Option<Vec<Exit>>,
    exit_sides: Option<&[Direction]>,
    cell_size: u32,
    corner_wall: u32,
    rng: &mut R,
) -> (Grid<NaturalMap>, Vec<Point>) {
    let mut cell = Grid::filled(cell_size, cell_size, NaturalMap::NaturalWall);
    build_wall(&mut cell, cell_size);
    let exits = exits.unwrap_or_else(|| make_random_exits(exit_sides, cell_size, corner_wall, rng));
    apply_exits(&mut cell, &exits, cell_size);
    let points = build_road_graph(&cell, cell_size, rng);
    carve_roads(&mut cell, &points, cell_size);
    (cell, points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn range_intersect_matches_doctests() {
        assert_eq!(range_intersect(0, 4, 1, 8), Some((1, 4)));
        assert_eq!(range_intersect(0, 4, 7, 8), None);
        assert_eq!(range_intersect(1, 8, 0, 4), Some((1, 4)));
    }

    #[test]
    fn find_exits_detects_single_span() {
        let mut row = vec![NaturalMap::NaturalWall; 64];
        for v in row.iter_mut().take(20).skip(10) {
            *v = NaturalMap::Ground;
        }
        assert_eq!(find_exits(&row), vec![(10, 20)]);
    }

    #[test]
    fn find_exits_handles_open_start() {
        let mut row = vec![NaturalMap::NaturalWall; 10];
        row[0] = NaturalMap::Ground;
        row[1] = NaturalMap::Ground;
        assert_eq!(find_exits(&row), vec![(0, 2)]);
    }

    #[test]
    fn make_cell_is_bordered_by_natural_wall() {
        let mut rng = rand_pcg::Pcg64::seed_from_u64(7);
        let (cell, _) = make_cell(None, None, 64, 3, &mut rng);
        for x in 0..64u32 {
            assert!(
                *cell.get(x as i64, 0).unwrap() == NaturalMap::NaturalWall
                    || *cell.get(x as i64, 0).unwrap() == NaturalMap::Ground
            );
        }
        // Corners are never touched by an exit (inside range starts at corner_wall).
        assert_eq!(cell.get(0, 0), Some(&NaturalMap::NaturalWall));
        assert_eq!(cell.get(63, 63), Some(&NaturalMap::NaturalWall));
    }

    #[test]
    fn make_cell_with_explicit_exits_carves_ground_there() {
        let mut rng = rand_pcg::Pcg64::seed_from_u64(11);
        let exits = vec![Exit {
            side: Direction::North,
            a: 10,
            b: 20,
        }];
        let (cell, _) = make_cell(Some(exits), None, 64, 3, &mut rng);
        assert_eq!(cell.get(15, 0), Some(&NaturalMap::Ground));
    }

    #[test]
    fn make_cell_produces_some_ground_interior() {
        let mut rng = rand_pcg::Pcg64::seed_from_u64(42);
        let (cell, points) = make_cell(None, None, 64, 3, &mut rng);
        assert!(!points.is_empty());
        let ground_count = cell
            .iter_coords()
            .filter(|&(x, y)| *cell.get(x as i64, y as i64).unwrap() == NaturalMap::Ground)
            .count();
        assert!(ground_count > 0);
    }
}
