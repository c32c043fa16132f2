use std::collections::HashSet;

use rand::Rng;

use crate::cell::Cell;
use crate::error::GridError;

/// Axis-aligned rectangular board geometry. Coordinates run `min_x..=max_x` and
/// `min_z..=max_z`; the grid does not own occupancy, only shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    width: i32,
    height: i32,
    min_x: i32,
    min_z: i32,
}

impl GridBounds {
    pub fn new(width: i32, height: i32, min_x: i32, min_z: i32) -> Result<Self, GridError> {
        if width <= 0 {
            return Err(GridError::NonPositiveWidth(width));
        }
        if height <= 0 {
            return Err(GridError::NonPositiveHeight(height));
        }
        Ok(Self {
            width,
            height,
            min_x,
            min_z,
        })
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    pub const fn min_x(&self) -> i32 {
        self.min_x
    }

    pub const fn min_z(&self) -> i32 {
        self.min_z
    }

    pub const fn max_x(&self) -> i32 {
        self.min_x + self.width - 1
    }

    pub const fn max_z(&self) -> i32 {
        self.min_z + self.height - 1
    }

    pub const fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= self.min_x && cell.x <= self.max_x() && cell.z >= self.min_z && cell.z <= self.max_z()
    }

    /// Dense index of `cell` within `0..cell_count()`, following
    /// `(x - min_x) + (z - min_z) * width`. Callers must check `in_bounds` first;
    /// out-of-bounds cells produce a meaningless index rather than panicking.
    pub fn key(&self, cell: Cell) -> usize {
        ((cell.x - self.min_x) + (cell.z - self.min_z) * self.width) as usize
    }

    pub fn cell_at_key(&self, key: usize) -> Cell {
        let key = key as i32;
        let x = self.min_x + key % self.width;
        let z = self.min_z + key / self.width;
        Cell::new(x, z)
    }

    pub fn for_each_cell(&self, mut f: impl FnMut(Cell)) {
        for z in self.min_z..=self.max_z() {
            for x in self.min_x..=self.max_x() {
                f(Cell::new(x, z));
            }
        }
    }

    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        crate::cell::Direction::ALL
            .into_iter()
            .map(move |dir| cell.translate(dir))
            .filter(move |c| self.in_bounds(*c))
    }

    /// Picks a uniformly random cell that is neither occupied nor hazardous.
    /// Returns `None` when the board has no free cell left.
    pub fn random_free_cell(
        &self,
        occupied: &HashSet<Cell>,
        rng: &mut impl Rng,
    ) -> Option<Cell> {
        let mut free = Vec::with_capacity(self.cell_count());
        self.for_each_cell(|c| {
            if !occupied.contains(&c) {
                free.push(c);
            }
        });
        if free.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..free.len());
        Some(free[idx])
    }
}
