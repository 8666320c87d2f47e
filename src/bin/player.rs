use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use slide_solver::engine::{Action, State};
use slide_solver::heuristics::manhattan_distance;
use slide_solver::logging;
use slide_solver::solver::astar;
use slide_solver::utils::random_solvable;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play the sliding puzzle in the terminal", long_about = None)]
struct Args {
    /// Board size
    #[clap(long, default_value_t = 3)]
    size: usize,

    /// Seed for the starting board (random when omitted)
    #[clap(long)]
    seed: Option<u64>,
}

enum Command {
    Move(Action),
    Undo,
    Hint,
    Quit,
}

/// `w/a/s/d` move the blank up/left/down/right; full direction names work too.
/// `u` is undo, so the one-letter form of Up is not accepted here.
fn parse_command(input: &str) -> Option<Command> {
    match input.trim().to_ascii_lowercase().as_str() {
        "q" | "quit" => Some(Command::Quit),
        "u" | "undo" => Some(Command::Undo),
        "h" | "hint" => Some(Command::Hint),
        "w" => Some(Command::Move(Action::Up)),
        "a" => Some(Command::Move(Action::Left)),
        "s" => Some(Command::Move(Action::Down)),
        "d" => Some(Command::Move(Action::Right)),
        other => other.parse::<Action>().ok().map(Command::Move),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(false);

    if args.size < 2 {
        bail!("Board size must be at least 2, got {}", args.size);
    }

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let goal = State::goal(args.size)?;
    let mut history = vec![random_solvable(args.size, &mut rng)?];
    println!("Welcome to the sliding puzzle!");

    loop {
        let current = history[history.len() - 1].clone();
        println!("---------------------");
        println!("Moves: {}", history.len() - 1);
        println!("{}", current);

        if current == goal {
            println!("---------------------");
            println!("Solved in {} moves!", history.len() - 1);
            println!("---------------------");
            break;
        }

        print!("Enter a move (w/a/s/d or up/down/left/right), h = hint, u = undo, q = quit: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        match parse_command(&input) {
            Some(Command::Quit) => {
                println!("Thanks for playing!");
                break;
            }
            Some(Command::Undo) => {
                if history.len() > 1 {
                    history.pop();
                    println!("Move undone.");
                } else {
                    println!("Cannot undo further (already at the initial board).");
                }
            }
            Some(Command::Hint) => {
                let solution = astar(&current, &goal, manhattan_distance);
                match solution.actions.first() {
                    Some(action) => println!(
                        "Hint: move {} ({} moves left, {} nodes expanded)",
                        action,
                        solution.actions.len(),
                        solution.expansions
                    ),
                    None => println!("No hint available."),
                }
            }
            Some(Command::Move(action)) => match current.apply_move(action) {
                Some(next) => history.push(next),
                None => println!("Invalid move: the blank cannot move {}.", action),
            },
            None => println!("Invalid input. Use w/a/s/d, up/down/left/right, 'h', 'u' or 'q'."),
        }
    }

    Ok(())
}
