use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Direction};
use crate::cycle::HamiltonianCycle;
use crate::grid::GridBounds;
use crate::pathfinding::find_path;
use crate::scoring::{has_escape_route, satisfies_cycle_order, survival_score};
use crate::simulate::simulate;
use crate::tuning::Tuning;

/// Below this body length the autopilot chases fruit directly with A* instead of
/// deferring to the Hamiltonian-cycle baseline; short snakes have enough slack
/// that the faster, riskier policy pays off.
const EARLY_GAME_LENGTH_CAP: usize = 18;
const MAX_CHASE_CANDIDATES: usize = 4;
const MAX_SHORTCUT_CANDIDATES: usize = 4;
const MAX_REACHABILITY_CANDIDATES: usize = 6;

/// Snapshot of the autopilot's most recent decision, exposed for harnesses and
/// diagnostics. Never consulted by the decision pipeline itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugStats {
    pub mode: String,
    pub cycle_available: bool,
    pub step: u64,
    pub shortcuts_accepted: u64,
    pub shortcuts_rejected: u64,
    pub emergency_count: u64,
    pub fallback_count: u64,
    pub last_survival_buffer: i64,
}

struct Candidate {
    direction: Direction,
    score: f64,
}

/// Decision subsystem for a single snake: given the current board state, picks a
/// direction every tick via a layered policy pipeline (direct fruit grab, early
/// A* chase, Hamiltonian-cycle baseline, validated cycle shortcut, flood-fill
/// emergency fallback), falling back to the safest available move whenever a
/// higher-priority policy can't produce one.
pub struct Autopilot {
    grid: GridBounds,
    cycle: Option<HamiltonianCycle>,
    tuning: Tuning,
    difficulty: String,
    hazards: HashSet<Cell>,
    step: u64,
    shortcuts_accepted: u64,
    shortcuts_rejected: u64,
    emergency_count: u64,
    fallback_count: u64,
    last_mode: String,
    last_survival_buffer: i64,
}

impl Autopilot {
    pub fn new(grid: GridBounds, difficulty: impl Into<String>) -> Self {
        let difficulty = difficulty.into();
        let cycle = HamiltonianCycle::new(&grid);
        if cycle.is_none() {
            tracing::warn!(
                width = grid.width(),
                height = grid.height(),
                "no Hamiltonian cycle exists for this grid; autopilot will run without a baseline"
            );
        }
        Autopilot {
            grid,
            cycle,
            tuning: Tuning::resolve(&difficulty),
            difficulty,
            hazards: HashSet::new(),
            step: 0,
            shortcuts_accepted: 0,
            shortcuts_rejected: 0,
            emergency_count: 0,
            fallback_count: 0,
            last_mode: "idle".to_string(),
            last_survival_buffer: 0,
        }
    }

    pub fn set_difficulty(&mut self, difficulty: impl Into<String>) {
        self.difficulty = difficulty.into();
        self.tuning = Tuning::resolve(&self.difficulty);
    }

    pub fn set_hazards(&mut self, hazards: &[Cell]) {
        self.hazards = hazards
            .iter()
            .copied()
            .filter(|c| self.grid.in_bounds(*c))
            .collect();
    }

    pub fn reset_state(&mut self) {
        self.hazards.clear();
        self.step = 0;
        self.shortcuts_accepted = 0;
        self.shortcuts_rejected = 0;
        self.emergency_count = 0;
        self.fallback_count = 0;
        self.last_mode = "idle".to_string();
        self.last_survival_buffer = 0;
    }

    pub fn debug_stats(&self) -> DebugStats {
        DebugStats {
            mode: self.last_mode.clone(),
            cycle_available: self.cycle.is_some(),
            step: self.step,
            shortcuts_accepted: self.shortcuts_accepted,
            shortcuts_rejected: self.shortcuts_rejected,
            emergency_count: self.emergency_count,
            fallback_count: self.fallback_count,
            last_survival_buffer: self.last_survival_buffer,
        }
    }

    /// The primary decision entry point. Never panics across this boundary: any
    /// internal panic is caught, logged, and converted into the flood-fill
    /// emergency fallback so a host never sees the process die mid-decision.
    pub fn next_direction(
        &mut self,
        head: Cell,
        current_dir: Option<Direction>,
        body: &[Cell],
        fruits: &[Cell],
    ) -> Direction {
        let fruits = dedup_in_bounds(&self.grid, body, fruits);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.decide(head, current_dir, body, &fruits)
        }));

        let direction = match result {
            Ok(dir) => dir,
            Err(_) => {
                tracing::error!("autopilot decision pipeline panicked; falling back to emergency move");
                self.fallback_count += 1;
                self.last_mode = "fallback".to_string();
                self.pick_emergency(head, current_dir, body, &fruits)
                    .unwrap_or_else(|| current_dir.unwrap_or(Direction::Up))
            }
        };

        self.step += 1;
        direction
    }

    /// Re-derives a safe move after a host-side collision on the primary choice,
    /// without advancing the tick counter used for shortcut cadence.
    pub fn emergency_direction(
        &mut self,
        head: Cell,
        current_dir: Option<Direction>,
        body: &[Cell],
        fruits: &[Cell],
    ) -> Option<Direction> {
        let fruits = dedup_in_bounds(&self.grid, body, fruits);
        self.emergency_count += 1;
        self.pick_emergency(head, current_dir, body, &fruits)
    }

    pub fn has_reachable_food(&self, head: Cell, body: &[Cell], fruits: &[Cell]) -> bool {
        let fruits = dedup_in_bounds(&self.grid, body, fruits);
        let mut candidates = fruits.clone();
        candidates.sort_by_key(|f| head.manhattan_distance(*f));
        candidates.truncate(MAX_REACHABILITY_CANDIDATES);

        let obstacles = body_obstacles_excluding_tail(body);
        candidates
            .iter()
            .any(|&fruit| find_path(&self.grid, head, fruit, &obstacles).is_some())
    }

    fn decide(
        &mut self,
        head: Cell,
        current_dir: Option<Direction>,
        body: &[Cell],
        fruits: &[Cell],
    ) -> Direction {
        let legal = self.legal_moves(head, current_dir, body);
        if legal.is_empty() {
            self.last_mode = "no-legal-move".to_string();
            return current_dir.unwrap_or(Direction::Up);
        }

        if !fruits.is_empty() {
            if let Some(c) = self.policy_direct_fruit(&legal, body, fruits) {
                self.last_mode = "direct-fruit".to_string();
                return c.direction;
            }

            if body.len() <= EARLY_GAME_LENGTH_CAP {
                if let Some(c) = self.policy_early_chase(&legal, head, body, fruits) {
                    self.last_mode = "chase".to_string();
                    return c.direction;
                }
            }
        }

        let cycle_candidate = self.policy_cycle_baseline(&legal, head, body, fruits);
        let shortcut_candidate = if !fruits.is_empty() {
            self.policy_validated_shortcut(head, body, fruits)
        } else {
            None
        };

        if let Some(shortcut) = &shortcut_candidate {
            let buffer = self.last_survival_buffer;
            let cadence_ok = self.step % self.tuning.shortcut_cadence(body.len()) == 0;
            let min_buffer = self.tuning.min_survival_buffer(body.len());
            let length_gate = if body.len() < 70 { 8 } else { 6 };
            let gate_ok = buffer > min_buffer
                && (shortcut.path_len <= length_gate || shortcut.food_gain >= 1 || cadence_ok);
            let score_ok = cycle_candidate
                .as_ref()
                .map(|c| shortcut.score >= c.score - self.tuning.shortcut_tolerance(body.len()))
                .unwrap_or(true);

            if gate_ok && score_ok {
                self.shortcuts_accepted += 1;
                self.last_mode = "shortcut".to_string();
                self.last_survival_buffer = shortcut.survival_buffer;
                return shortcut.direction;
            }
            self.shortcuts_rejected += 1;
        }

        if let Some(c) = cycle_candidate {
            self.last_mode = "cycle".to_string();
            return c.direction;
        }

        self.last_mode = "emergency".to_string();
        self.emergency_count += 1;
        match self.pick_emergency(head, current_dir, body, fruits) {
            Some(dir) => dir,
            None => {
                self.last_mode = "no-legal-move".to_string();
                current_dir.unwrap_or(Direction::Up)
            }
        }
    }

    /// Moves whose destination is in bounds, unobstructed by hazards, not a
    /// reversal onto the snake's own neck, and not the opposite of `current_dir`
    /// (unless `current_dir` is `None`, meaning no prior move constrains us yet).
    fn legal_moves(
        &self,
        head: Cell,
        current_dir: Option<Direction>,
        body: &[Cell],
    ) -> Vec<(Direction, Cell)> {
        let reverse = current_dir.map(Direction::reverse);
        Direction::ALL
            .into_iter()
            .filter(|&dir| Some(dir) != reverse)
            .map(|dir| (dir, head.translate(dir)))
            .filter(|(_, cell)| simulate(&self.grid, body, &self.hazards, *cell, false).is_some())
            .collect()
    }

    fn policy_direct_fruit(
        &self,
        legal: &[(Direction, Cell)],
        body: &[Cell],
        fruits: &[Cell],
    ) -> Option<Candidate> {
        let fruit_set: HashSet<Cell> = fruits.iter().copied().collect();
        let mut best: Option<Candidate> = None;

        for &(dir, cell) in legal {
            if !fruit_set.contains(&cell) {
                continue;
            }
            let Some(new_body) = simulate(&self.grid, body, &self.hazards, cell, true) else {
                continue;
            };
            if !has_escape_route(&self.grid, &new_body, &self.hazards) {
                continue;
            }
            if let Some(cycle) = &self.cycle {
                let head_idx = cycle.index_of(&self.grid, cell);
                let tail_idx = cycle.index_of(&self.grid, *new_body.last().unwrap());
                if let (Some(h), Some(t)) = (head_idx, tail_idx) {
                    if !satisfies_cycle_order(cycle, h, t, true, new_body.len()) {
                        continue;
                    }
                }
            }
            let score = survival_score(&self.grid, &new_body, &self.hazards, fruits, self.cycle.as_ref());
            if best.as_ref().map(|b| score > b.score).unwrap_or(true) {
                best = Some(Candidate { direction: dir, score });
            }
        }

        best
    }

    fn policy_early_chase(
        &self,
        legal: &[(Direction, Cell)],
        head: Cell,
        body: &[Cell],
        fruits: &[Cell],
    ) -> Option<Candidate> {
        let obstacles = body_obstacles_excluding_tail(body);
        let mut nearest = fruits.to_vec();
        nearest.sort_by_key(|f| head.manhattan_distance(*f));
        nearest.truncate(MAX_CHASE_CANDIDATES);

        let mut best: Option<Candidate> = None;

        for fruit in nearest {
            let Some(path) = find_path(&self.grid, head, fruit, &obstacles) else {
                continue;
            };
            let Some(&first_step) = path.first() else {
                continue;
            };
            let Some(&(dir, _)) = legal.iter().find(|(_, c)| *c == first_step) else {
                continue;
            };
            let grows = first_step == fruit;
            let Some(new_body) = simulate(&self.grid, body, &self.hazards, first_step, grows) else {
                continue;
            };
            if !has_escape_route(&self.grid, &new_body, &self.hazards) {
                continue;
            }
            let base = survival_score(&self.grid, &new_body, &self.hazards, fruits, self.cycle.as_ref());
            let score = base + 300.0 + (14_i64.saturating_sub(path.len() as i64)).max(0) as f64 * 22.0;
            if best.as_ref().map(|b| score > b.score).unwrap_or(true) {
                best = Some(Candidate { direction: dir, score });
            }
        }

        best
    }

    fn policy_cycle_baseline(
        &mut self,
        legal: &[(Direction, Cell)],
        head: Cell,
        body: &[Cell],
        fruits: &[Cell],
    ) -> Option<Candidate> {
        let cycle = self.cycle.as_ref()?;
        let next_cell = cycle.next_cell(&self.grid, head)?;
        let &(dir, _) = legal.iter().find(|(_, c)| *c == next_cell)?;
        let grows = fruits.contains(&next_cell);
        let new_body = simulate(&self.grid, body, &self.hazards, next_cell, grows)?;

        let head_idx = cycle.index_of(&self.grid, next_cell)?;
        let tail_idx = cycle.index_of(&self.grid, *new_body.last().unwrap())?;
        let buffer = cycle.distance_forward(head_idx, tail_idx) as i64;
        self.last_survival_buffer = buffer;

        let score = 380.0 + buffer as f64 * 1.2;
        Some(Candidate { direction: dir, score })
    }

    fn policy_validated_shortcut(
        &mut self,
        head: Cell,
        body: &[Cell],
        fruits: &[Cell],
    ) -> Option<ShortcutCandidate> {
        let cycle = self.cycle.as_ref()?;
        let cap = self.tuning.shortcut_path_cap(body.len());
        let obstacles = body_obstacles_excluding_tail(body);

        let mut nearest = fruits.to_vec();
        nearest.sort_by_key(|f| head.manhattan_distance(*f));
        nearest.truncate(MAX_SHORTCUT_CANDIDATES);

        let mut best: Option<ShortcutCandidate> = None;

        for fruit in nearest {
            let Some(path) = find_path(&self.grid, head, fruit, &obstacles) else {
                continue;
            };
            if path.is_empty() || path.len() > cap {
                continue;
            }

            if !self.validate_shortcut_path(cycle, body, &path) {
                continue;
            }

            let mut simulated = body.to_vec();
            let mut new_body_opt = None;
            for &step in &path {
                let grows = step == fruit;
                match simulate(&self.grid, &simulated, &self.hazards, step, grows) {
                    Some(b) => {
                        simulated = b;
                        new_body_opt = Some(simulated.clone());
                    }
                    None => {
                        new_body_opt = None;
                        break;
                    }
                }
            }
            let Some(final_body) = new_body_opt else {
                continue;
            };

            let head_idx = cycle.index_of(&self.grid, final_body[0]);
            let tail_idx = cycle.index_of(&self.grid, *final_body.last().unwrap());
            let survival_buffer = match (head_idx, tail_idx) {
                (Some(h), Some(t)) => cycle.distance_forward(h, t) as i64,
                _ => 0,
            };

            let fruit_cycle_idx = cycle.index_of(&self.grid, fruit);
            let head_cycle_idx = cycle.index_of(&self.grid, head);
            let food_gain = match (head_cycle_idx, fruit_cycle_idx) {
                (Some(h), Some(f)) => {
                    cycle.distance_forward(h, f) as i64 - path.len() as i64
                }
                _ => 0,
            };

            let base = survival_score(&self.grid, &final_body, &self.hazards, fruits, Some(cycle));
            let score = base + food_gain as f64 * 34.0
                + (220_i64.saturating_sub(path.len() as i64 * 7)).max(0) as f64;

            if best.as_ref().map(|b| score > b.score).unwrap_or(true) {
                best = Some(ShortcutCandidate {
                    direction: direction_between(head, path[0]),
                    score,
                    path_len: path.len(),
                    food_gain,
                    survival_buffer,
                });
            }
        }

        if let Some(candidate) = &best {
            self.last_survival_buffer = candidate.survival_buffer;
        }
        best
    }

    /// Walks a candidate shortcut step by step, checking the cycle-order
    /// invariant after every step and an escape route at the final one.
    fn validate_shortcut_path(&self, cycle: &HamiltonianCycle, body: &[Cell], path: &[Cell]) -> bool {
        let mut simulated = body.to_vec();
        for (i, &step) in path.iter().enumerate() {
            let is_last = i == path.len() - 1;
            let grows = false; // growth is irrelevant to the order invariant itself
            let Some(new_body) = simulate(&self.grid, &simulated, &self.hazards, step, grows) else {
                return false;
            };
            if let (Some(h), Some(t)) = (
                cycle.index_of(&self.grid, step),
                cycle.index_of(&self.grid, *new_body.last().unwrap()),
            ) {
                if !satisfies_cycle_order(cycle, h, t, false, new_body.len()) {
                    return false;
                }
            } else {
                return false;
            }
            if is_last && !has_escape_route(&self.grid, &new_body, &self.hazards) {
                return false;
            }
            simulated = new_body;
        }
        true
    }

    fn pick_emergency(
        &self,
        head: Cell,
        current_dir: Option<Direction>,
        body: &[Cell],
        fruits: &[Cell],
    ) -> Option<Direction> {
        let legal = self.legal_moves(head, current_dir, body);
        legal
            .into_iter()
            .filter_map(|(dir, cell)| {
                let new_body = simulate(&self.grid, body, &self.hazards, cell, false)?;
                let score = survival_score(&self.grid, &new_body, &self.hazards, fruits, self.cycle.as_ref());
                Some((dir, score))
            })
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(dir, _)| dir)
    }
}

struct ShortcutCandidate {
    direction: Direction,
    score: f64,
    path_len: usize,
    food_gain: i64,
    survival_buffer: i64,
}

fn body_obstacles_excluding_tail(body: &[Cell]) -> HashSet<Cell> {
    if body.is_empty() {
        return HashSet::new();
    }
    body[..body.len() - 1].iter().copied().collect()
}

/// Filters `cells` down to the ones worth treating as fruit: in bounds,
/// not sitting on the snake's own body, and de-duplicated.
fn dedup_in_bounds(grid: &GridBounds, body: &[Cell], cells: &[Cell]) -> Vec<Cell> {
    let occupied: HashSet<Cell> = body.iter().copied().collect();
    let mut seen = HashSet::new();
    cells
        .iter()
        .copied()
        .filter(|c| grid.in_bounds(*c))
        .filter(|c| !occupied.contains(c))
        .filter(|c| seen.insert(*c))
        .collect()
}

fn direction_between(from: Cell, to: Cell) -> Direction {
    Direction::ALL
        .into_iter()
        .find(|d| from.translate(*d) == to)
        .unwrap_or(Direction::Up)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_no_legal_move_when_fully_boxed_in() {
        let grid = GridBounds::new(3, 3, 0, 0).unwrap();
        let mut autopilot = Autopilot::new(grid, "normal");
        let head = Cell::new(1, 1);
        // Body occupies every neighbor of the head and the head itself.
        let body = vec![
            Cell::new(1, 1),
            Cell::new(1, 0),
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(0, 2),
            Cell::new(1, 2),
            Cell::new(2, 2),
            Cell::new(2, 1),
            Cell::new(2, 0),
        ];
        let _ = autopilot.next_direction(head, Some(Direction::Up), &body, &[]);
        assert_eq!(autopilot.debug_stats().mode, "no-legal-move");
    }

    #[test]
    fn picks_a_legal_direction_on_an_open_board() {
        let grid = GridBounds::new(20, 20, -10, -10).unwrap();
        let mut autopilot = Autopilot::new(grid, "normal");
        let head = Cell::new(0, 0);
        let body = vec![head, Cell::new(-1, 0), Cell::new(-2, 0)];
        let dir = autopilot.next_direction(head, Some(Direction::Right), &body, &[Cell::new(5, 5)]);
        let next = head.translate(dir);
        assert!(grid.in_bounds(next));
        assert_ne!(dir, Direction::Left);
    }

    #[test]
    fn difficulty_resolution_falls_back_to_normal() {
        let grid = GridBounds::new(10, 10, 0, 0).unwrap();
        let mut autopilot = Autopilot::new(grid, "unknown-tag");
        autopilot.set_difficulty("also-unknown");
        assert_eq!(autopilot.tuning, Tuning::normal());
    }

    #[test]
    fn has_reachable_food_detects_a_walled_off_fruit() {
        let grid = GridBounds::new(5, 5, 0, 0).unwrap();
        let autopilot = Autopilot::new(grid, "normal");
        let head = Cell::new(0, 0);
        let body = vec![head];
        assert!(autopilot.has_reachable_food(head, &body, &[Cell::new(4, 4)]));
        assert!(!autopilot.has_reachable_food(head, &body, &[]));
    }

    #[test]
    fn debug_stats_round_trip_through_json() {
        let grid = GridBounds::new(10, 10, 0, 0).unwrap();
        let mut autopilot = Autopilot::new(grid, "hard");
        let head = Cell::new(5, 5);
        let body = vec![head, Cell::new(4, 5)];
        autopilot.next_direction(head, Some(Direction::Right), &body, &[]);

        let stats = autopilot.debug_stats();
        let json = serde_json::to_string(&stats).unwrap();
        let round_tripped: DebugStats = serde_json::from_str(&json).unwrap();
        assert_eq!(round_tripped.mode, stats.mode);
        assert_eq!(round_tripped.step, 1);
    }
}
