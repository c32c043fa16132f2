//! Literal end-to-end scenarios against a 20x20 board (`minX = minZ = -10`,
//! `maxX = maxZ = 9`), plus the boundary behaviors called out alongside them.

use autopilot::{Autopilot, Cell, Direction, GridBounds, HamiltonianCycle};

fn board() -> GridBounds {
    GridBounds::new(20, 20, -10, -10).unwrap()
}

fn direction_from(from: Cell, to: Cell) -> Direction {
    Direction::ALL
        .into_iter()
        .find(|d| from.translate(*d) == to)
        .expect("from and to must be adjacent")
}

#[test]
fn scenario_1_direct_safe_fruit_adjacency() {
    let mut autopilot = Autopilot::new(board(), "normal");
    let body = vec![Cell::new(-1, 0), Cell::new(-2, 0), Cell::new(-3, 0)];
    let dir = autopilot.next_direction(
        body[0],
        Some(Direction::Right),
        &body,
        &[Cell::new(0, 0)],
    );
    assert_eq!(dir, Direction::Right);
}

#[test]
fn scenario_2_cycle_successor_when_no_fruit() {
    let grid = board();
    let cycle = HamiltonianCycle::new(&grid).unwrap();
    let mut autopilot = Autopilot::new(grid, "normal");
    let body = vec![Cell::new(0, 0), Cell::new(-1, 0), Cell::new(-2, 0)];
    let dir = autopilot.next_direction(body[0], Some(Direction::Right), &body, &[]);
    let expected_next = cycle.next_cell(&grid, body[0]).unwrap();
    assert_eq!(body[0].translate(dir), expected_next);
}

#[test]
fn scenario_3_refuses_to_leave_bounds() {
    let grid = board();
    let mut autopilot = Autopilot::new(grid, "normal");
    let body = vec![Cell::new(9, 9), Cell::new(8, 9), Cell::new(7, 9)];
    let dir = autopilot.next_direction(
        body[0],
        Some(Direction::Right),
        &body,
        &[Cell::new(-9, -9)],
    );
    assert_ne!(dir, Direction::Right);
    assert!(grid.in_bounds(body[0].translate(dir)));
}

#[test]
fn scenario_4_never_reverses_into_its_own_neck() {
    let mut autopilot = Autopilot::new(board(), "normal");
    let body = vec![Cell::new(0, 0), Cell::new(-1, 0), Cell::new(-2, 0)];
    let dir = autopilot.next_direction(
        body[0],
        Some(Direction::Right),
        &body,
        &[Cell::new(0, 0)],
    );
    assert_ne!(dir, Direction::Left);
    assert_ne!(body[0].translate(dir), body[1]);
}

#[test]
fn scenario_5_direct_safe_fruit_avoiding_a_hazard() {
    let mut autopilot = Autopilot::new(board(), "normal");
    autopilot.set_hazards(&[Cell::new(5, 6)]);
    let body = vec![Cell::new(5, 5)];
    let dir = autopilot.next_direction(body[0], None, &body, &[Cell::new(5, 4)]);
    assert_eq!(dir, Direction::Up);
}

#[test]
fn scenario_6_full_board_cycle_traversal_never_self_collides() {
    let grid = board();
    let cycle = HamiltonianCycle::new(&grid).unwrap();
    let len = cycle.len();
    assert_eq!(len, grid.cell_count());

    let k = 57;
    let body: Vec<Cell> = (0..len).map(|i| cycle.cell_at((k + len - i) % len)).collect();
    let head = body[0];
    let prev = cycle.cell_at((k + len - 1) % len);
    let current_dir = direction_from(prev, head);

    let mut autopilot = Autopilot::new(grid, "normal");
    let dir = autopilot.next_direction(head, Some(current_dir), &body, &[]);
    let next = head.translate(dir);

    assert_eq!(next, cycle.cell_at((k + 1) % len));
    assert!(!body[..body.len() - 1].contains(&next));
}

#[test]
fn boundary_two_by_two_produces_valid_cycle() {
    let grid = GridBounds::new(2, 2, 0, 0).unwrap();
    let cycle = HamiltonianCycle::new(&grid).expect("2x2 must be constructible");
    assert_eq!(cycle.len(), 4);
}

#[test]
fn boundary_three_by_three_has_no_cycle_but_still_moves() {
    let grid = GridBounds::new(3, 3, 0, 0).unwrap();
    assert!(HamiltonianCycle::new(&grid).is_none());

    let mut autopilot = Autopilot::new(grid, "normal");
    // A short, clearly-legal body near the center; the autopilot must still
    // produce an in-bounds, non-reversing move without a cycle to fall back on.
    let body = vec![Cell::new(1, 1), Cell::new(1, 0)];
    let dir = autopilot.next_direction(body[0], Some(Direction::Down), &body, &[]);
    assert!(grid.in_bounds(body[0].translate(dir)));
}

#[test]
fn boundary_no_legal_move_when_board_is_full() {
    let grid = GridBounds::new(3, 3, 0, 0).unwrap();
    let mut autopilot = Autopilot::new(grid, "normal");
    let head = Cell::new(1, 1);
    let body = vec![
        head,
        Cell::new(1, 0),
        Cell::new(0, 0),
        Cell::new(0, 1),
        Cell::new(0, 2),
        Cell::new(1, 2),
        Cell::new(2, 2),
        Cell::new(2, 1),
        Cell::new(2, 0),
    ];
    let dir = autopilot.next_direction(head, Some(Direction::Up), &body, &[]);
    assert_eq!(dir, Direction::Up);
    assert_eq!(autopilot.debug_stats().mode, "no-legal-move");
}
