use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::info;

use slide_solver::engine::State;
use slide_solver::heuristics::Heuristic;
use slide_solver::logging;
use slide_solver::solver::{solve_observed, Algorithm};
use slide_solver::utils::{is_solvable, read_board_file, replay, scramble};

/// Expansions between two progress log lines.
const PROGRESS_INTERVAL: usize = 100_000;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search algorithm: bfs, dfs, ids or astar
    #[clap(short, long, default_value = "astar")]
    algorithm: Algorithm,

    /// Heuristic used by astar: misplaced or manhattan
    #[clap(long, default_value = "manhattan")]
    heuristic: Heuristic,

    /// Depth limit for bfs, dfs and ids (bfs is unbounded and dfs/ids use 50 when omitted)
    #[clap(short, long)]
    depth: Option<usize>,

    /// Scramble the goal with this many random moves instead of reading a board file
    #[clap(long, conflicts_with = "board_file")]
    random_moves: Option<usize>,

    /// Board size used with --random-moves
    #[clap(long, default_value_t = 3)]
    size: usize,

    /// Random seed used with --random-moves
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Print every board along the solution
    #[clap(long)]
    replay: bool,

    /// Enable debug logging
    #[clap(short, long)]
    verbose: bool,

    /// Path to the board file (whitespace-separated integers, one row per line, 0 is the blank)
    board_file: Option<PathBuf>,
}

fn load_start(args: &Args) -> Result<State> {
    match (&args.board_file, args.random_moves) {
        (Some(path), _) => read_board_file(path)
            .with_context(|| format!("Failed to load puzzle from {}", path.display())),
        (None, Some(moves)) => {
            if args.size < 2 {
                bail!("Board size must be at least 2, got {}", args.size);
            }
            let goal = State::goal(args.size)?;
            let mut rng = SmallRng::seed_from_u64(args.seed);
            let (start, moves_made) = scramble(&goal, moves, &mut rng);
            info!(size = args.size, seed = args.seed, moves_made, "generated random puzzle");
            Ok(start)
        }
        (None, None) => bail!("Provide a board file or --random-moves"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let start = load_start(&args)?;
    let goal = State::goal(start.size())?;
    println!("Initial board state:\n{}", start);

    if !is_solvable(&start, &goal) {
        bail!("This puzzle configuration is not solvable");
    }

    let algorithm = args
        .algorithm
        .with_depth_limit(args.depth)
        .with_heuristic(args.heuristic);
    println!("Searching with {}...\n", algorithm);

    let mut progress = |_: &State, depth: usize, expansions: usize| {
        if expansions % PROGRESS_INTERVAL == 0 {
            info!(expansions, depth, "still searching");
        }
    };

    let started = Instant::now();
    let solution = solve_observed(&start, &goal, algorithm, &mut progress);
    let elapsed = started.elapsed();

    if solution.actions.is_empty() {
        if start == goal {
            println!("The puzzle is already solved.");
        } else {
            println!("No solution found.");
        }
        println!("Expanded nodes: {}", solution.expansions);
        println!("Time: {:.4} seconds", elapsed.as_secs_f64());
        return Ok(());
    }

    println!("Solution found in {} steps!", solution.actions.len());
    let moves: Vec<String> = solution.actions.iter().map(|a| a.to_string()).collect();
    println!("Moves: {}", moves.join(", "));
    println!("Expanded nodes: {}", solution.expansions);
    println!("Time: {:.4} seconds", elapsed.as_secs_f64());

    if args.replay {
        let states = replay(&start, &solution.actions).context("Solution does not replay")?;
        let total = states.len() - 1;
        for (step, (state, action)) in states.iter().skip(1).zip(&solution.actions).enumerate() {
            println!("\nStep {}/{}: {}\n{}", step + 1, total, action, state);
        }
    }

    Ok(())
}
