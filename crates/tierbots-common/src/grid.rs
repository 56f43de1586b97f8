//! A dense, row-major 2-D grid.
//!
//! A flat `Vec<T>` with `(width, height)` and `x + y * width` indexing --
//! cache-friendly and trivial to serialize as a single contiguous byte run,
//! which is exactly the shape the `.npy` writer in `tierbots-persistence`
//! wants.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; (width as usize) * (height as usize)],
        }
    }
}

impl<T> Grid<T> {
    pub fn from_cells(width: u32, height: u32, cells: Vec<T>) -> Self {
        assert_eq!(
            cells.len(),
            (width as usize) * (height as usize),
            "cell buffer length must equal width * height"
        );
        Self {
            width,
            height,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.width as usize
    }

    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<&T> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let idx = self.index(x as u32, y as u32);
        self.cells.get(idx)
    }

    #[inline]
    pub fn get_mut(&mut self, x: i64, y: i64) -> Option<&mut T> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let idx = self.index(x as u32, y as u32);
        self.cells.get_mut(idx)
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        let idx = self.index(x, y);
        self.cells[idx] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn into_raw(self) -> (u32, u32, Vec<T>) {
        (self.width, self.height, self.cells)
    }

    pub fn iter_coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let w = self.width;
        let h = self.height;
        (0..h).flat_map(move |y| (0..w).map(move |x| (x, y)))
    }
}
