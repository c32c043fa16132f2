use std::collections::HashSet;

use autopilot::{simulate, Autopilot, Cell, GridBounds};
use rand::Rng;

/// Configuration for a single repeated-fill episode.
#[derive(Clone, Debug)]
pub struct EpisodeConfig {
    pub width: i32,
    pub height: i32,
    pub min_x: i32,
    pub min_z: i32,
    pub max_steps: u32,
    pub difficulty: String,
}

impl EpisodeConfig {
    pub fn grid(&self) -> GridBounds {
        GridBounds::new(self.width, self.height, self.min_x, self.min_z)
            .expect("harness-configured grid dimensions must be positive")
    }
}

/// Why an episode ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    Filled,
    StepLimit,
    Crashed,
}

impl EndReason {
    pub fn label(self) -> &'static str {
        match self {
            EndReason::Filled => "filled",
            EndReason::StepLimit => "step-limit",
            EndReason::Crashed => "crashed",
        }
    }
}

#[derive(Clone, Debug)]
pub struct EpisodeResult {
    pub fruits_eaten: u32,
    pub steps_survived: u32,
    pub reason: EndReason,
}

/// Drives a fresh autopilot against a freshly generated board: spawns a single
/// snake and a fruit, then steps until the snake crashes, survives
/// `config.max_steps` ticks, or fills the board.
pub fn run_episode(config: &EpisodeConfig, rng: &mut impl Rng) -> EpisodeResult {
    let grid = config.grid();
    let mut autopilot = Autopilot::new(grid, config.difficulty.clone());

    let mut body = vec![grid
        .random_free_cell(&HashSet::new(), rng)
        .expect("a freshly built grid always has at least one free cell")];
    let mut fruits: Vec<Cell> = Vec::new();
    respawn_fruit(&grid, &body, &mut fruits, rng);

    let mut current_dir = None;
    let mut fruits_eaten = 0u32;
    let mut steps_survived = 0u32;

    for _ in 0..config.max_steps {
        if body.len() == grid.cell_count() {
            return EpisodeResult {
                fruits_eaten,
                steps_survived,
                reason: EndReason::Filled,
            };
        }

        let head = body[0];
        let direction = autopilot.next_direction(head, current_dir, &body, &fruits);
        let next_cell = head.translate(direction);
        let grows = fruits.contains(&next_cell);

        match simulate(&grid, &body, &HashSet::new(), next_cell, grows) {
            Some(new_body) => {
                body = new_body;
                current_dir = Some(direction);
                steps_survived += 1;
                if grows {
                    fruits.retain(|f| *f != next_cell);
                    fruits_eaten += 1;
                    respawn_fruit(&grid, &body, &mut fruits, rng);
                }
            }
            None => {
                return EpisodeResult {
                    fruits_eaten,
                    steps_survived,
                    reason: EndReason::Crashed,
                };
            }
        }
    }

    EpisodeResult {
        fruits_eaten,
        steps_survived,
        reason: EndReason::StepLimit,
    }
}

fn respawn_fruit(grid: &GridBounds, body: &[Cell], fruits: &mut Vec<Cell>, rng: &mut impl Rng) {
    if !fruits.is_empty() {
        return;
    }
    let occupied: HashSet<Cell> = body.iter().copied().collect();
    if let Some(cell) = grid.random_free_cell(&occupied, rng) {
        fruits.push(cell);
    }
}
