use std::collections::HashMap;

use serde::Serialize;

use crate::runner::{EndReason, EpisodeResult};

/// Aggregated statistics over a batch of episodes.
#[derive(Clone, Debug, Serialize)]
pub struct HarnessStats {
    pub pass_rate: f64,
    pub full_win_rate: f64,
    pub avg_fruits: f64,
    pub avg_steps: f64,
    pub p95_survival: f64,
    pub reasons: HashMap<String, u32>,
}

impl HarnessStats {
    /// A run "passes" when it fills the board, or — unless `require_fill` is
    /// set — survives to the step limit without crashing.
    pub fn from_results(results: &[EpisodeResult], require_fill: bool) -> Self {
        let total = results.len().max(1) as f64;

        let passes = results
            .iter()
            .filter(|r| match r.reason {
                EndReason::Filled => true,
                EndReason::StepLimit => !require_fill,
                EndReason::Crashed => false,
            })
            .count();

        let full_wins = results
            .iter()
            .filter(|r| r.reason == EndReason::Filled)
            .count();

        let avg_fruits = results.iter().map(|r| r.fruits_eaten as f64).sum::<f64>() / total;
        let avg_steps = results.iter().map(|r| r.steps_survived as f64).sum::<f64>() / total;

        let mut reasons = HashMap::new();
        for reason in [EndReason::Filled, EndReason::StepLimit, EndReason::Crashed] {
            let count = results.iter().filter(|r| r.reason == reason).count() as u32;
            reasons.insert(reason.label().to_string(), count);
        }

        Self {
            pass_rate: passes as f64 / total,
            full_win_rate: full_wins as f64 / total,
            avg_fruits,
            avg_steps,
            p95_survival: percentile(results, 0.95),
            reasons,
        }
    }
}

fn percentile(results: &[EpisodeResult], p: f64) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let mut steps: Vec<u32> = results.iter().map(|r| r.steps_survived).collect();
    steps.sort_unstable();
    let rank = ((steps.len() as f64 - 1.0) * p).round() as usize;
    steps[rank.min(steps.len() - 1)] as f64
}
