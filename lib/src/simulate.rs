use std::collections::HashSet;

use crate::cell::Cell;
use crate::grid::GridBounds;

/// The sole legality oracle in this crate: given a body (`body[0]` is the head)
/// and a candidate next head position, produces the resulting body or `None` if
/// the move is illegal. Pure and side-effect free; every policy in the autopilot
/// consults this instead of re-deriving collision rules itself.
///
/// A move is illegal when the destination is out of bounds, hazardous, or
/// occupied by the body — except the tail segment, which vacates on the same
/// tick unless `grows` is set.
pub fn simulate(
    grid: &GridBounds,
    body: &[Cell],
    hazards: &HashSet<Cell>,
    next_cell: Cell,
    grows: bool,
) -> Option<Vec<Cell>> {
    if !grid.in_bounds(next_cell) {
        return None;
    }
    if hazards.contains(&next_cell) {
        return None;
    }

    let tail_index = body.len().saturating_sub(1);
    for (i, &segment) in body.iter().enumerate() {
        if segment != next_cell {
            continue;
        }
        let tail_vacates = i == tail_index && !grows;
        if !tail_vacates {
            return None;
        }
    }

    let mut new_body = Vec::with_capacity(body.len() + 1);
    new_body.push(next_cell);
    new_body.extend_from_slice(body);
    if !grows {
        new_body.pop();
    }
    Some(new_body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridBounds {
        GridBounds::new(10, 10, 0, 0).unwrap()
    }

    #[test]
    fn moving_into_open_space_shifts_the_body() {
        let body = vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)];
        let hazards = HashSet::new();
        let result = simulate(&grid(), &body, &hazards, Cell::new(5, 4), false).unwrap();
        assert_eq!(
            result,
            vec![Cell::new(5, 4), Cell::new(5, 5), Cell::new(4, 5)]
        );
    }

    #[test]
    fn eating_a_fruit_grows_the_body() {
        let body = vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)];
        let hazards = HashSet::new();
        let result = simulate(&grid(), &body, &hazards, Cell::new(5, 4), true).unwrap();
        assert_eq!(
            result,
            vec![
                Cell::new(5, 4),
                Cell::new(5, 5),
                Cell::new(4, 5),
                Cell::new(3, 5)
            ]
        );
    }

    #[test]
    fn moving_into_the_vacating_tail_is_legal() {
        let body = vec![Cell::new(5, 5), Cell::new(5, 4), Cell::new(5, 3)];
        let hazards = HashSet::new();
        // Head doubles back onto where the tail currently sits.
        let result = simulate(&grid(), &body, &hazards, Cell::new(5, 3), false);
        assert!(result.is_some());
    }

    #[test]
    fn moving_into_the_tail_while_growing_is_illegal() {
        let body = vec![Cell::new(5, 5), Cell::new(5, 4), Cell::new(5, 3)];
        let hazards = HashSet::new();
        let result = simulate(&grid(), &body, &hazards, Cell::new(5, 3), true);
        assert!(result.is_none());
    }

    #[test]
    fn moving_into_own_neck_is_illegal() {
        let body = vec![Cell::new(5, 5), Cell::new(5, 4), Cell::new(5, 3)];
        let hazards = HashSet::new();
        let result = simulate(&grid(), &body, &hazards, Cell::new(5, 4), false);
        assert!(result.is_none());
    }

    #[test]
    fn moving_out_of_bounds_is_illegal() {
        let body = vec![Cell::new(0, 0)];
        let hazards = HashSet::new();
        assert!(simulate(&grid(), &body, &hazards, Cell::new(-1, 0), false).is_none());
    }

    #[test]
    fn moving_into_a_hazard_is_illegal() {
        let body = vec![Cell::new(5, 5)];
        let mut hazards = HashSet::new();
        hazards.insert(Cell::new(5, 4));
        assert!(simulate(&grid(), &body, &hazards, Cell::new(5, 4), false).is_none());
    }
}
