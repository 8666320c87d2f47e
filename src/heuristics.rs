//! Heuristic estimates of the remaining distance to the goal.
//!
//! Both heuristics are admissible and consistent for unit-cost blank moves,
//! and `misplaced_tiles(s, g) <= manhattan_distance(s, g)` for every pair.
//! They take two states of the same size; passing states of different sizes
//! is a contract violation.
use std::fmt;
use std::str::FromStr;

use crate::engine::State;
use crate::error::PuzzleError;

/// Counts the non-blank tiles that are not in their goal cell.
///
/// # Examples
/// ```
/// use slide_solver::engine::State;
/// use slide_solver::heuristics::misplaced_tiles;
/// let goal = State::goal(3).unwrap();
/// let start = State::new(vec![vec![1, 2, 3], vec![4, 0, 6], vec![7, 5, 8]]).unwrap();
/// assert_eq!(misplaced_tiles(&start, &goal), 2);
/// assert_eq!(misplaced_tiles(&goal, &goal), 0);
/// ```
pub fn misplaced_tiles(state: &State, goal: &State) -> u32 {
    state
        .tiles()
        .iter()
        .zip(goal.tiles())
        .filter(|&(&tile, &target)| tile != 0 && tile != target)
        .count() as u32
}

/// Sums, over every non-blank tile, the row plus column distance between its
/// cell in `state` and its cell in `goal`.
///
/// # Examples
/// ```
/// use slide_solver::engine::State;
/// use slide_solver::heuristics::manhattan_distance;
/// let goal = State::goal(3).unwrap();
/// let start = State::new(vec![vec![3, 4, 6], vec![1, 0, 8], vec![7, 2, 5]]).unwrap();
/// assert_eq!(manhattan_distance(&start, &goal), 12);
/// ```
pub fn manhattan_distance(state: &State, goal: &State) -> u32 {
    let size = goal.size();

    // Goal cell of every value, indexed by value.
    let mut goal_positions = vec![(0usize, 0usize); goal.tiles().len()];
    for (idx, &value) in goal.tiles().iter().enumerate() {
        if let Some(slot) = goal_positions.get_mut(value as usize) {
            *slot = (idx / size, idx % size);
        }
    }

    state
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != 0)
        .map(|(idx, &tile)| {
            let (goal_r, goal_c) = goal_positions[tile as usize];
            ((idx / size).abs_diff(goal_r) + (idx % size).abs_diff(goal_c)) as u32
        })
        .sum()
}

/// Selects one of the built-in heuristics by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Heuristic {
    Misplaced,
    #[default]
    Manhattan,
}

impl Heuristic {
    /// Scores `state` against `goal` with the selected heuristic.
    pub fn evaluate(&self, state: &State, goal: &State) -> u32 {
        (self.as_fn())(state, goal)
    }

    /// Returns the heuristic as a plain function pointer, suitable for
    /// `solver::astar`.
    pub fn as_fn(&self) -> fn(&State, &State) -> u32 {
        match self {
            Heuristic::Misplaced => misplaced_tiles,
            Heuristic::Manhattan => manhattan_distance,
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Heuristic::Misplaced => write!(f, "misplaced"),
            Heuristic::Manhattan => write!(f, "manhattan"),
        }
    }
}

impl FromStr for Heuristic {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "misplaced" | "misplaced-tiles" | "hamming" => Ok(Heuristic::Misplaced),
            "manhattan" | "manhattan-distance" => Ok(Heuristic::Manhattan),
            _ => Err(PuzzleError::UnknownHeuristic(s.to_string())),
        }
    }
}
