use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::SmallRng;
use rand::SeedableRng;

mod runner;
mod stats;

use runner::{run_episode, EpisodeConfig, EpisodeResult};
use stats::HarnessStats;

/// Drives the autopilot through repeated simulated boards and reports
/// survival/fill statistics, exiting non-zero when the pass rate drops
/// below `--threshold`.
#[derive(Parser)]
#[command(name = "snake-gym")]
#[command(about = "Test harness for the snake autopilot decision pipeline")]
#[command(version)]
struct Cli {
    /// Number of episodes to run
    #[arg(short, long, default_value = "100")]
    runs: usize,

    /// Board width and height
    #[arg(long, default_value = "20")]
    size: i32,

    /// Maximum steps per episode before declaring a step-limit pass
    #[arg(long, default_value = "20000")]
    steps: u32,

    /// Minimum pass rate required to exit successfully
    #[arg(long, default_value = "0.95")]
    threshold: f64,

    /// Difficulty tag passed through to the autopilot's tuning
    #[arg(long, default_value = "normal")]
    difficulty: String,

    /// Base RNG seed; episode i is seeded with `seed + i`
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Only count a full board fill as a pass, not a step-limit survival
    #[arg(long)]
    require_fill: bool,

    /// Output the summary as JSON only, with no progress bar or color
    #[arg(long)]
    json: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if !cli.json {
        println!("\n{}", "=== Snake Autopilot Harness ===".green().bold());
        println!(
            "Runs: {} | Board: {}x{} | Max steps: {}",
            cli.runs, cli.size, cli.size, cli.steps
        );
        println!("Difficulty: {} | Seed: {}", cli.difficulty, cli.seed);
        println!();
    }

    let half = cli.size / 2;
    let config = EpisodeConfig {
        width: cli.size,
        height: cli.size,
        min_x: -half,
        min_z: -half,
        max_steps: cli.steps,
        difficulty: cli.difficulty.clone(),
    };

    let pb = if !cli.json {
        let pb = ProgressBar::new(cli.runs as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let results: Vec<EpisodeResult> = if cli.runs > 1 {
        use rayon::prelude::*;
        (0..cli.runs)
            .into_par_iter()
            .map(|i| {
                let mut rng = SmallRng::seed_from_u64(cli.seed.wrapping_add(i as u64));
                let result = run_episode(&config, &mut rng);
                if let Some(ref pb) = pb {
                    pb.inc(1);
                }
                result
            })
            .collect()
    } else {
        (0..cli.runs)
            .map(|i| {
                let mut rng = SmallRng::seed_from_u64(cli.seed.wrapping_add(i as u64));
                let result = run_episode(&config, &mut rng);
                if let Some(ref pb) = pb {
                    pb.inc(1);
                }
                result
            })
            .collect()
    };

    if let Some(pb) = pb {
        pb.finish_with_message("Done!");
    }

    let stats = HarnessStats::from_results(&results, cli.require_fill);

    if cli.json {
        let summary = serde_json::json!({
            "config": {
                "runs": cli.runs,
                "size": cli.size,
                "difficulty": cli.difficulty,
                "seed": cli.seed,
                "require_fill": cli.require_fill,
            },
            "results": stats,
        });
        println!("{}", serde_json::to_string_pretty(&summary).unwrap());
    } else {
        println!();
        println!(
            "Pass rate:     {}",
            format!("{:.2}%", stats.pass_rate * 100.0).bold()
        );
        println!("Full-win rate: {:.2}%", stats.full_win_rate * 100.0);
        println!("Avg fruits:    {:.2}", stats.avg_fruits);
        println!("Avg steps:     {:.2}", stats.avg_steps);
        println!("p95 survival:  {:.2}", stats.p95_survival);
        println!("Reasons:       {:?}", stats.reasons);
        println!();
    }

    if stats.pass_rate < cli.threshold {
        if !cli.json {
            eprintln!(
                "{}",
                format!(
                    "pass rate {:.2}% below threshold {:.2}%",
                    stats.pass_rate * 100.0,
                    cli.threshold * 100.0
                )
                .red()
                .bold()
            );
        }
        std::process::exit(1);
    }

    Ok(())
}
