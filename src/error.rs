//! Error type shared by the puzzle engine and its loaders.

use std::path::PathBuf;

use crate::engine::Action;

/// Errors raised while building, loading or replaying puzzle states.
///
/// Failing to find a solution is not an error: searches report it as an
/// empty action sequence together with their expansion count.
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    /// The grid has no blank (`0`) cell, or no cells at all.
    #[error("No empty position (0) found in the puzzle board")]
    InvalidBoard,

    /// The cell count does not match the side length.
    #[error("A board of side {size} needs {size}x{size} cells, found {found}")]
    CellCount { size: usize, found: usize },

    /// The board text contained no rows.
    #[error("Board is empty")]
    EmptyBoard,

    /// A row does not have as many cells as the board has rows.
    #[error("Board must be square: row {row} has {found} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A cell could not be parsed as a non-negative integer.
    #[error("Invalid token '{token}' in row {row}")]
    InvalidToken { row: usize, token: String },

    /// The cells are not exactly the values `0..size*size`.
    #[error("Board must contain exactly the numbers 0 to {}", .size * .size - 1)]
    InvalidTileSet { size: usize },

    #[error("Failed to read board file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A replayed action cannot be applied (the blank is on that edge).
    #[error("Illegal move {action} at step {step}")]
    IllegalMove { step: usize, action: Action },

    #[error("Unknown action '{0}' (expected up, down, left or right)")]
    UnknownAction(String),

    #[error("Unknown heuristic '{0}' (expected misplaced or manhattan)")]
    UnknownHeuristic(String),

    #[error("Unknown algorithm '{0}' (expected bfs, dfs, ids or astar)")]
    UnknownAlgorithm(String),
}
