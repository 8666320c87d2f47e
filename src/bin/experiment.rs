use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{error, info, warn};

use slide_solver::engine::State;
use slide_solver::heuristics::Heuristic;
use slide_solver::logging;
use slide_solver::solver::{solve, Algorithm, Solution};
use slide_solver::utils::scramble;

/// Per-size defaults: (size, scramble distance, trials, timeout in seconds).
const DEFAULT_PLANS: [(usize, usize, usize, u64); 3] =
    [(3, 15, 10, 10), (5, 25, 5, 60), (7, 30, 3, 180)];

#[derive(Parser, Debug)]
#[clap(author, version, about = "Times a search on batches of random puzzles", long_about = None)]
struct Args {
    /// Board sizes to test, comma separated
    #[clap(long, value_delimiter = ',', default_value = "3,5,7")]
    sizes: Vec<usize>,

    /// Random moves applied to the goal (defaults: 15 for 3x3, 25 for 5x5, 30 otherwise)
    #[clap(long)]
    distance: Option<usize>,

    /// Trials per size (defaults: 10 for 3x3, 5 for 5x5, 3 otherwise)
    #[clap(long)]
    trials: Option<usize>,

    /// Timeout per trial in seconds (defaults: 10 for 3x3, 60 for 5x5, 180 otherwise)
    #[clap(long)]
    timeout_secs: Option<u64>,

    /// Search algorithm: bfs, dfs, ids or astar
    #[clap(short, long, default_value = "astar")]
    algorithm: Algorithm,

    /// Heuristic used by astar: misplaced or manhattan
    #[clap(long, default_value = "manhattan")]
    heuristic: Heuristic,

    /// Depth limit for bfs, dfs and ids
    #[clap(short, long)]
    depth: Option<usize>,

    /// Seed of the puzzle generator
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Enable debug logging
    #[clap(short, long)]
    verbose: bool,
}

struct Plan {
    size: usize,
    distance: usize,
    trials: usize,
    timeout: Duration,
}

impl Plan {
    fn for_size(size: usize, args: &Args) -> Self {
        let (_, distance, trials, timeout) = DEFAULT_PLANS
            .iter()
            .copied()
            .find(|&(s, ..)| s == size)
            .unwrap_or(DEFAULT_PLANS[DEFAULT_PLANS.len() - 1]);
        Plan {
            size,
            distance: args.distance.unwrap_or(distance),
            trials: args.trials.unwrap_or(trials),
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(timeout)),
        }
    }
}

#[derive(Default)]
struct Results {
    times: Vec<f64>,
    expansions: Vec<f64>,
    path_lengths: Vec<f64>,
    distances: Vec<f64>,
    timeouts: usize,
    errors: usize,
}

/// Mean and sample standard deviation; `None` for an empty sample.
fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if values.len() > 1 {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        0.0
    };
    Some((mean, std))
}

fn format_stat(values: &[f64], precision: usize) -> String {
    match mean_std(values) {
        Some((mean, std)) if std > 0.0 => {
            format!("{:.*} (+/-){:.*}", precision, mean, precision, std)
        }
        Some((mean, _)) => format!("{:.*}", precision, mean),
        None => "Timeout".to_string(),
    }
}

/// Runs the search on its own thread and waits at most `timeout` for it.
///
/// A search that times out is abandoned, not stopped: its thread keeps
/// running until the search returns.
fn run_with_timeout(
    start: State,
    goal: State,
    algorithm: Algorithm,
    timeout: Duration,
) -> Result<(Solution, Duration), RecvTimeoutError> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let started = Instant::now();
        let solution = solve(&start, &goal, algorithm);
        let _ = tx.send((solution, started.elapsed()));
    });
    rx.recv_timeout(timeout)
}

fn run_experiment(plan: &Plan, goal: &State, algorithm: Algorithm, rng: &mut SmallRng) -> Results {
    let mut results = Results::default();

    for trial in 0..plan.trials {
        println!(
            "\nTrial {}/{} for {}x{} puzzle with target distance {}",
            trial + 1,
            plan.trials,
            plan.size,
            plan.size,
            plan.distance
        );
        let (start, actual_distance) = scramble(goal, plan.distance, rng);
        println!("Generated puzzle with actual distance: {}", actual_distance);
        results.distances.push(actual_distance as f64);

        match run_with_timeout(start, goal.clone(), algorithm, plan.timeout) {
            Ok((solution, elapsed)) => {
                let secs = elapsed.as_secs_f64();
                results.times.push(secs);
                results.expansions.push(solution.expansions as f64);
                results.path_lengths.push(solution.actions.len() as f64);
                println!(
                    "[OK] Path length: {} | Nodes: {} | Time: {:.2}s",
                    solution.actions.len(),
                    solution.expansions,
                    secs
                );
            }
            Err(RecvTimeoutError::Timeout) => {
                results.timeouts += 1;
                warn!(trial = trial + 1, timeout_secs = plan.timeout.as_secs(), "trial timed out");
                println!("[TIMEOUT] Trial timed out after {} seconds", plan.timeout.as_secs());
            }
            Err(RecvTimeoutError::Disconnected) => {
                results.errors += 1;
                error!(trial = trial + 1, "search thread exited without a result");
                println!("[ERROR] Search thread exited without a result");
            }
        }
    }

    results
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Some(&size) = args.sizes.iter().find(|&&s| s < 2) {
        bail!("Board size must be at least 2, got {}", size);
    }

    let algorithm = args
        .algorithm
        .with_depth_limit(args.depth)
        .with_heuristic(args.heuristic);
    let mut rng = SmallRng::seed_from_u64(args.seed);

    let title = format!("{} Experiment", algorithm);
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));

    let mut all_results = Vec::new();
    for &size in &args.sizes {
        let plan = Plan::for_size(size, &args);
        info!(size, distance = plan.distance, trials = plan.trials, "starting batch");
        println!("\n--- Testing {}x{} puzzle ---", size, size);

        let goal = State::goal(size)?;
        let results = run_experiment(&plan, &goal, algorithm, &mut rng);
        let successes = plan.trials - results.timeouts - results.errors;
        let success_rate = if plan.trials > 0 {
            successes as f64 / plan.trials as f64
        } else {
            0.0
        };

        println!("\nResults for {}x{} puzzle:", size, size);
        println!("Success rate: {:.1}%", success_rate * 100.0);
        if results.timeouts > 0 {
            println!("Timeouts: {}/{}", results.timeouts, plan.trials);
        }
        if results.errors > 0 {
            println!("Errors: {}/{}", results.errors, plan.trials);
        }
        let avg_distance = mean_std(&results.distances).map_or(0.0, |(mean, _)| mean);
        println!("Average distance from goal: {:.1}", avg_distance);
        if results.times.is_empty() {
            println!("No successful trials");
        } else {
            println!("Avg Time: {} sec", format_stat(&results.times, 2));
            println!("Avg Nodes: {}", format_stat(&results.expansions, 0));
            println!("Avg Path Length: {}", format_stat(&results.path_lengths, 1));
        }

        all_results.push((size, success_rate, avg_distance, results));
    }

    println!("\nComparison Summary");
    println!("==================");
    println!(
        "{:<6}| {:<13}| {:<9}| {:<24}| {:<24}| {}",
        "Size", "Success Rate", "Distance", "Time", "Nodes", "Path Length"
    );
    println!("{}", "-".repeat(100));
    for (size, success_rate, avg_distance, results) in &all_results {
        println!(
            "{:<6}| {:<13}| {:<9}| {:<24}| {:<24}| {}",
            format!("{}x{}", size, size),
            format!("{:.0}%", success_rate * 100.0),
            format!("{:.0}", avg_distance),
            format_stat(&results.times, 3),
            format_stat(&results.expansions, 3),
            format_stat(&results.path_lengths, 3)
        );
    }

    Ok(())
}
