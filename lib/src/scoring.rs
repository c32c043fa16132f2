use std::collections::HashSet;

use crate::cell::Cell;
use crate::cycle::HamiltonianCycle;
use crate::grid::GridBounds;
use crate::pathfinding::{find_path, flood_fill, open_neighbor_count};

const FLOOD_FILL_WEIGHT: f64 = 6.0;
const OPEN_NEIGHBOR_WEIGHT: f64 = 55.0;
const CYCLE_BUFFER_WEIGHT: f64 = 4.0;
const FRUIT_DISTANCE_WEIGHT: f64 = 3.0;

/// How favorable `body_after` (a body that already reflects a candidate move) is
/// to commit to. Higher is safer. Combines local mobility (flood fill and open
/// neighbor count around the new head), how much slack the Hamiltonian cycle
/// still gives before the tail catches up, and proximity to the nearest fruit.
pub fn survival_score(
    grid: &GridBounds,
    body_after: &[Cell],
    hazards: &HashSet<Cell>,
    fruits: &[Cell],
    cycle: Option<&HamiltonianCycle>,
) -> f64 {
    let new_head = body_after[0];
    let mut obstacles: HashSet<Cell> = body_after[1..].iter().copied().collect();
    obstacles.extend(hazards.iter().copied());

    let open_space = flood_fill(grid, new_head, &obstacles) as f64;
    let open_neighbors = open_neighbor_count(grid, new_head, &obstacles) as f64;

    let tail_buffer = cycle
        .and_then(|c| {
            let head_idx = c.index_of(grid, new_head)?;
            let tail_idx = c.index_of(grid, *body_after.last()?)?;
            Some(c.distance_forward(head_idx, tail_idx) as f64)
        })
        .unwrap_or(0.0);

    let nearest_fruit = fruits
        .iter()
        .map(|f| new_head.manhattan_distance(*f) as f64)
        .fold(None, |acc: Option<f64>, d| {
            Some(acc.map_or(d, |a| a.min(d)))
        })
        .unwrap_or(0.0);

    open_space * FLOOD_FILL_WEIGHT + open_neighbors * OPEN_NEIGHBOR_WEIGHT
        + tail_buffer * CYCLE_BUFFER_WEIGHT
        - nearest_fruit * FRUIT_DISTANCE_WEIGHT
}

/// Whether the snake can still reach its own tail after committing to
/// `body_after` — the escape-route check every accepted candidate must pass.
pub fn has_escape_route(grid: &GridBounds, body_after: &[Cell], hazards: &HashSet<Cell>) -> bool {
    let new_head = body_after[0];
    let tail = match body_after.last() {
        Some(t) => *t,
        None => return true,
    };
    if body_after.len() == 1 {
        return true;
    }
    let mut obstacles: HashSet<Cell> = body_after[1..body_after.len() - 1]
        .iter()
        .copied()
        .collect();
    obstacles.extend(hazards.iter().copied());
    find_path(grid, new_head, tail, &obstacles).is_some()
}

/// Whether advancing to `new_head_idx` still leaves enough room, measured as
/// forward distance around the cycle to `new_tail_idx`, before the snake's own
/// growth (or lack of it) could cause it to run into its tail. `length` is the
/// body length *after* the move.
pub fn satisfies_cycle_order(
    cycle: &HamiltonianCycle,
    new_head_idx: usize,
    new_tail_idx: usize,
    grows: bool,
    length: usize,
) -> bool {
    let gap = cycle.distance_forward(new_head_idx, new_tail_idx) as f64;
    let base_gap = if grows { 2.0 } else { 1.0 };
    let required = base_gap.max((length as f64 * 0.08).floor());
    gap > required
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::HamiltonianCycle;

    #[test]
    fn survival_score_prefers_more_open_space() {
        let grid = GridBounds::new(10, 10, 0, 0).unwrap();
        let hazards = HashSet::new();
        let fruits = vec![];
        let open_body = vec![Cell::new(5, 5)];
        let cramped_body = vec![Cell::new(0, 0)];
        let open_score = survival_score(&grid, &open_body, &hazards, &fruits, None);
        let cramped_score = survival_score(&grid, &cramped_body, &hazards, &fruits, None);
        assert!(open_score >= cramped_score);
    }

    #[test]
    fn escape_route_false_when_tail_is_walled_off() {
        let grid = GridBounds::new(4, 4, 0, 0).unwrap();
        let hazards = HashSet::new();
        // A body that encloses its own tail with no gap.
        let body = vec![
            Cell::new(1, 1),
            Cell::new(1, 0),
            Cell::new(2, 0),
            Cell::new(2, 1),
            Cell::new(2, 2),
            Cell::new(1, 2),
            Cell::new(0, 2),
            Cell::new(0, 1),
            Cell::new(0, 0),
        ];
        assert!(!has_escape_route(&grid, &body, &hazards));
    }

    #[test]
    fn cycle_order_requires_minimum_gap() {
        let grid = GridBounds::new(4, 4, 0, 0).unwrap();
        let cycle = HamiltonianCycle::new(&grid).unwrap();
        // Head one step behind tail on the cycle: essentially no buffer.
        assert!(!satisfies_cycle_order(&cycle, 0, 1, false, 4));
        assert!(satisfies_cycle_order(&cycle, 0, 8, false, 4));
    }
}
