//! Core puzzle engine for the sliding-tile puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Action`: The four directions the blank can move in.
//! - `State`: An immutable N x N grid snapshot with a cached blank position,
//!   move generation and a canonical, value-based identity.
//! - `StateKey`: The owned canonical encoding of a `State`, used as the key of
//!   every visited/parent/cost map kept by the searches.
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::PuzzleError;

/// A move of the blank tile, one cell in the given direction.
///
/// Moving the blank `Up` is the same as sliding the tile above the blank down
/// into the empty cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// All actions in the fixed successor order: Up, Down, Left, Right.
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Returns the (row, column) offset of the blank for this action.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }

    /// Returns the action that undoes this one.
    ///
    /// # Examples
    /// ```
    /// use slide_solver::engine::Action;
    /// assert_eq!(Action::Up.inverse(), Action::Down);
    /// assert_eq!(Action::Left.inverse(), Action::Right);
    /// ```
    pub fn inverse(&self) -> Action {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Up => "Up",
            Action::Down => "Down",
            Action::Left => "Left",
            Action::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Action {
    type Err = PuzzleError;

    /// Parses full names (any case) and the single letters `u`, `d`, `l`, `r`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Action::Up),
            "down" | "d" => Ok(Action::Down),
            "left" | "l" => Ok(Action::Left),
            "right" | "r" => Ok(Action::Right),
            _ => Err(PuzzleError::UnknownAction(s.to_string())),
        }
    }
}

/// Canonical, value-based encoding of a grid: every cell in row-major order.
///
/// Two keys are equal exactly when the grids they were taken from are equal
/// cell by cell, however those states were constructed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateKey(Box<[u32]>);

impl StateKey {
    /// The encoded cells, row-major.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// An immutable snapshot of the puzzle grid.
///
/// Tiles are stored row-major; `0` is the blank. Every move builds a new
/// `State`, so a state handed to a search is never changed behind its back.
#[derive(Clone, Debug)]
pub struct State {
    size: usize,
    tiles: Vec<u32>,
    blank: usize,
}

impl State {
    /// Builds a state from a grid given as rows.
    ///
    /// Only the cell count and the blank are checked here; per-row squareness
    /// and the value set are the loader's job (see `utils::board_from_str`).
    ///
    /// # Errors
    /// Returns `PuzzleError::InvalidBoard` when no cell holds `0` and
    /// `PuzzleError::CellCount` when the rows do not hold N*N cells in total.
    ///
    /// # Examples
    /// ```
    /// use slide_solver::engine::State;
    /// let state = State::new(vec![vec![1, 2], vec![3, 0]]).unwrap();
    /// assert_eq!(state.blank(), (1, 1));
    /// assert!(State::new(vec![vec![1, 2], vec![3, 4]]).is_err());
    /// ```
    pub fn new(grid: Vec<Vec<u32>>) -> Result<Self, PuzzleError> {
        let size = grid.len();
        let tiles = grid.into_iter().flatten().collect();
        Self::from_tiles(size, tiles)
    }

    /// Builds a state from row-major tiles of an `size` x `size` grid.
    ///
    /// # Errors
    /// Returns `PuzzleError::CellCount` when `tiles` does not hold exactly
    /// `size * size` cells, and `PuzzleError::InvalidBoard` when no cell
    /// holds `0` (which includes the empty grid).
    pub fn from_tiles(size: usize, tiles: Vec<u32>) -> Result<Self, PuzzleError> {
        if size.checked_mul(size) != Some(tiles.len()) {
            return Err(PuzzleError::CellCount {
                size,
                found: tiles.len(),
            });
        }
        let blank = tiles
            .iter()
            .position(|&t| t == 0)
            .ok_or(PuzzleError::InvalidBoard)?;
        Ok(State { size, tiles, blank })
    }

    /// Returns the conventional goal: `1, 2, ..., N*N-1` in reading order with
    /// the blank in the bottom-right corner.
    ///
    /// # Errors
    /// Returns `PuzzleError::InvalidBoard` for `size == 0`, which has no cell
    /// to hold the blank.
    ///
    /// # Examples
    /// ```
    /// use slide_solver::engine::State;
    /// let goal = State::goal(3).unwrap();
    /// assert_eq!(goal.tiles(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
    /// assert!(State::goal(0).is_err());
    /// ```
    pub fn goal(size: usize) -> Result<Self, PuzzleError> {
        if size == 0 {
            return Err(PuzzleError::InvalidBoard);
        }
        let cells = size * size;
        let tiles = (0..cells).map(|i| ((i + 1) % cells) as u32).collect();
        Ok(State {
            size,
            tiles,
            blank: cells - 1,
        })
    }

    /// Side length N of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All cells in row-major order.
    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    /// Returns the tile at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` is outside the grid.
    pub fn tile(&self, r: usize, c: usize) -> u32 {
        self.tiles[r * self.size + c]
    }

    /// Position of the blank as (row, column).
    pub fn blank(&self) -> (usize, usize) {
        (self.blank / self.size, self.blank % self.size)
    }

    /// Iterates over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.tiles.chunks(self.size.max(1))
    }

    /// Returns the state reached by moving the blank in direction `action`,
    /// or `None` if the blank is already on that edge of the grid.
    ///
    /// # Examples
    /// ```
    /// use slide_solver::engine::{Action, State};
    /// let goal = State::goal(3).unwrap();
    /// assert!(goal.apply_move(Action::Down).is_none());
    /// let moved = goal.apply_move(Action::Up).unwrap();
    /// assert_eq!(moved.blank(), (1, 2));
    /// assert_eq!(moved.tile(2, 2), 6);
    /// ```
    pub fn apply_move(&self, action: Action) -> Option<State> {
        let (row, col) = self.blank();
        let (dr, dc) = action.offset();
        let new_row = row.checked_add_signed(dr).filter(|&r| r < self.size)?;
        let new_col = col.checked_add_signed(dc).filter(|&c| c < self.size)?;
        let target = new_row * self.size + new_col;

        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);
        Some(State {
            size: self.size,
            tiles,
            blank: target,
        })
    }

    /// Returns every legal (action, next state) pair, always in the order
    /// Up, Down, Left, Right. Between two and four entries on any grid with
    /// N >= 2.
    pub fn successors(&self) -> Vec<(Action, State)> {
        Action::ALL
            .iter()
            .filter_map(|&action| self.apply_move(action).map(|next| (action, next)))
            .collect()
    }

    /// Returns the canonical key used for equality and hashing.
    pub fn canonical_key(&self) -> StateKey {
        StateKey(self.tiles.clone().into_boxed_slice())
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.tiles == other.tiles
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tiles.hash(state);
    }
}

impl fmt::Display for State {
    /// One row per line, cells separated by a single space. This is the same
    /// text format `utils::board_from_str` reads.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|t| t.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
