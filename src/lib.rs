//! # Sliding Puzzle Solver Library
//!
//! This library provides the state model of the N x N sliding-tile puzzle
//! (the 8-puzzle, 15-puzzle and their larger relatives) and four searches
//! that find a sequence of blank moves from a start state to a goal state:
//! breadth-first, depth-bounded depth-first, iterative deepening and A*.
//!
//! It is used by three binaries:
//! - `solve`: Loads (or generates) a board, runs one search and prints the
//!   moves, the number of expanded nodes and the elapsed time.
//! - `experiment`: Runs A* (or another search) on batches of random puzzles
//!   of several sizes under a timeout and reports averages.
//! - `player`: Interactive play on the command line, with search-backed hints.
//!
//! ## Modules
//! - `engine`: The puzzle state (`State`), blank moves (`Action`) and the
//!   canonical key (`StateKey`) used for revisit tracking.
//! - `heuristics`: Misplaced-tiles and Manhattan-distance estimates.
//! - `frontier`: The stable priority queue behind A*.
//! - `solver`: `bfs`, `dfs`, `ids`, `astar` and the `Algorithm` selector.
//! - `utils`: Board parsing and loading, solvability, random boards, replay.
//! - `error`: The `PuzzleError` type.
//! - `logging`: Subscriber setup for the binaries.

pub mod engine;
pub mod error;
pub mod frontier;
pub mod heuristics;
pub mod logging;
pub mod solver;
pub mod utils;

pub use crate::engine::{Action, State, StateKey};
pub use crate::error::PuzzleError;
pub use crate::solver::{solve, Algorithm, Solution};
