use crate::cell::Cell;
use crate::grid::GridBounds;

/// A Hamiltonian cycle over every cell of a grid: a closed tour that visits each
/// cell exactly once before returning to its start. Only constructible when at
/// least one of the grid's dimensions is even — see `HamiltonianCycle::new`.
///
/// Indices are stored densely, keyed by `GridBounds::key`, so `index_of`/`cell_at`
/// are O(1) array lookups rather than hash lookups.
#[derive(Debug, Clone)]
pub struct HamiltonianCycle {
    order: Vec<Cell>,
    index_by_key: Vec<i32>,
}

impl HamiltonianCycle {
    /// Builds a serpentine Hamiltonian cycle over `grid`. Prefers a construction
    /// that zig-zags across columns with a top-row return corridor (needs an even
    /// width); falls back to zig-zagging across rows with a left-column return
    /// corridor (needs an even height) when width is odd. Returns `None` when both
    /// dimensions are odd, or if the constructed tour somehow fails validation.
    pub fn new(grid: &GridBounds) -> Option<HamiltonianCycle> {
        let order = if grid.width() % 2 == 0 {
            build_width_even(grid)
        } else if grid.height() % 2 == 0 {
            build_height_even(grid)
        } else {
            return None;
        };

        let cycle = HamiltonianCycle {
            index_by_key: index_by_key(grid, &order),
            order,
        };

        if cycle.is_valid(grid) {
            Some(cycle)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn index_of(&self, grid: &GridBounds, cell: Cell) -> Option<usize> {
        let idx = self.index_by_key.get(grid.key(cell)).copied().unwrap_or(-1);
        if idx < 0 {
            None
        } else {
            Some(idx as usize)
        }
    }

    pub fn cell_at(&self, index: usize) -> Cell {
        self.order[index % self.order.len()]
    }

    /// The cell the tour visits immediately after `cell`.
    pub fn next_cell(&self, grid: &GridBounds, cell: Cell) -> Option<Cell> {
        let idx = self.index_of(grid, cell)?;
        Some(self.cell_at(idx + 1))
    }

    /// Forward distance from `from` to `to` along the tour direction, i.e. how many
    /// steps the tour takes to reach `to` starting at `from`. Always in
    /// `0..self.len()`.
    pub fn distance_forward(&self, from: usize, to: usize) -> usize {
        let len = self.order.len();
        if to >= from {
            to - from
        } else {
            len - from + to
        }
    }

    fn is_valid(&self, grid: &GridBounds) -> bool {
        if self.order.len() != grid.cell_count() {
            return false;
        }
        let mut seen = vec![false; grid.cell_count()];
        for &cell in &self.order {
            if !grid.in_bounds(cell) {
                return false;
            }
            let key = grid.key(cell);
            if seen[key] {
                return false;
            }
            seen[key] = true;
        }
        for i in 0..self.order.len() {
            let next = self.order[(i + 1) % self.order.len()];
            if self.order[i].manhattan_distance(next) != 1 {
                return false;
            }
        }
        true
    }
}

fn index_by_key(grid: &GridBounds, order: &[Cell]) -> Vec<i32> {
    let mut table = vec![-1i32; grid.cell_count()];
    for (i, &cell) in order.iter().enumerate() {
        table[grid.key(cell)] = i as i32;
    }
    table
}

/// Requires an even width; works for any height. Column `min_x` is the return
/// corridor: its top cell opens the tour, its remaining cells close it.
fn build_width_even(grid: &GridBounds) -> Vec<Cell> {
    let (min_x, max_x, min_z, max_z) = (grid.min_x(), grid.max_x(), grid.min_z(), grid.max_z());
    let mut order = Vec::with_capacity(grid.cell_count());

    for z in min_z..=max_z {
        order.push(Cell::new(min_x, z));
    }

    for (i, x) in (min_x + 1..=max_x).enumerate() {
        let going_up = i % 2 == 0; // first interior column walks bottom-to-top
        if going_up {
            for z in (min_z + 1..=max_z).rev() {
                order.push(Cell::new(x, z));
            }
        } else {
            for z in min_z + 1..=max_z {
                order.push(Cell::new(x, z));
            }
        }
    }

    for x in (min_x + 1..=max_x).rev() {
        order.push(Cell::new(x, min_z));
    }

    order
}

/// Requires an even height; works for any width. Row `min_z` is the return
/// corridor: its leftmost cell opens the tour, its remaining cells close it.
fn build_height_even(grid: &GridBounds) -> Vec<Cell> {
    let (min_x, max_x, min_z, max_z) = (grid.min_x(), grid.max_x(), grid.min_z(), grid.max_z());
    let mut order = Vec::with_capacity(grid.cell_count());

    for x in min_x..=max_x {
        order.push(Cell::new(x, min_z));
    }

    for (i, z) in (min_z + 1..=max_z).enumerate() {
        let going_left = i % 2 == 0; // first interior row walks right-to-left
        if going_left {
            for x in (min_x + 1..=max_x).rev() {
                order.push(Cell::new(x, z));
            }
        } else {
            for x in min_x + 1..=max_x {
                order.push(Cell::new(x, z));
            }
        }
    }

    for z in (min_z + 1..=max_z).rev() {
        order.push(Cell::new(min_x, z));
    }

    order
}
