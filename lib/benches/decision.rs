use autopilot::{Autopilot, Cell, Direction, GridBounds};
use criterion::{criterion_group, criterion_main, Criterion};

fn mid_fill_body(grid: &GridBounds) -> Vec<Cell> {
    // A 60-segment snake folded back and forth near the center of the board,
    // representative of a mid-game decision rather than the cheap early-game case.
    let mut body = Vec::new();
    let mut x = 0;
    let mut z = 0;
    let mut dz = 1;
    for _ in 0..60 {
        body.push(Cell::new(x, z));
        z += dz;
        if z > 10 || z < -10 {
            dz = -dz;
            z += 2 * dz;
            x -= 1;
        }
    }
    body.dedup();
    body
}

fn decision_benchmark(c: &mut Criterion) {
    let grid = GridBounds::new(20, 20, -10, -10).unwrap();
    let body = mid_fill_body(&grid);
    let fruits = vec![Cell::new(8, 8), Cell::new(-8, -8), Cell::new(3, -5)];

    c.bench_function("next_direction_mid_fill_20x20", |b| {
        b.iter_batched(
            || Autopilot::new(grid, "normal"),
            |mut autopilot| {
                autopilot.next_direction(body[0], Some(Direction::Up), &body, &fruits);
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, decision_benchmark);
criterion_main!(benches);
