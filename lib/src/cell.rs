use serde::{Deserialize, Serialize};

/// A single grid coordinate. Immutable, compared and hashed by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn manhattan_distance(self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.z - other.z).abs()
    }

    pub fn translate(self, dir: Direction) -> Cell {
        let (dx, dz) = dir.delta();
        Cell::new(self.x + dx, self.z + dz)
    }
}

/// One of the four orthogonal unit vectors. No zero-vector variant exists at this
/// type's level; "no prior move" is represented as `Option<Direction> = None` at the
/// call sites that need it (see `Autopilot::next_direction`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Enumeration order used everywhere legal moves are generated, so that
    /// decisions are reproducible given identical inputs.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_is_involutive() {
        for dir in Direction::ALL {
            assert_eq!(dir.reverse().reverse(), dir);
        }
    }

    #[test]
    fn manhattan_distance_basic() {
        assert_eq!(Cell::new(0, 0).manhattan_distance(Cell::new(3, 4)), 7);
        assert_eq!(Cell::new(5, 5).manhattan_distance(Cell::new(5, 5)), 0);
    }

    #[test]
    fn translate_matches_delta() {
        let c = Cell::new(2, 2);
        assert_eq!(c.translate(Direction::Up), Cell::new(2, 1));
        assert_eq!(c.translate(Direction::Down), Cell::new(2, 3));
        assert_eq!(c.translate(Direction::Left), Cell::new(1, 2));
        assert_eq!(c.translate(Direction::Right), Cell::new(3, 2));
    }
}
