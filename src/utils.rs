use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::engine::{Action, State};
use crate::error::PuzzleError;

/// Parses a board from text: whitespace-separated integers, one row per line.
///
/// Blank lines and surrounding whitespace are ignored. The board must be
/// square and contain every value from `0` to `N*N-1` exactly once.
///
/// # Errors
/// * `PuzzleError::EmptyBoard` if there are no rows.
/// * `PuzzleError::InvalidToken` if a cell is not a non-negative integer.
/// * `PuzzleError::NotSquare` if a row's length differs from the row count.
/// * `PuzzleError::InvalidTileSet` if values are missing, duplicated or out of range.
///
/// # Examples
/// ```
/// use slide_solver::utils::board_from_str;
/// let board = board_from_str("1 2 3\n4 0 6\n7 5 8\n").unwrap();
/// assert_eq!(board.size(), 3);
/// assert_eq!(board.blank(), (1, 1));
///
/// assert!(board_from_str("1 2\n3").is_err());
/// assert!(board_from_str("1 1\n2 0").is_err());
/// ```
pub fn board_from_str(text: &str) -> Result<State, PuzzleError> {
    let rows = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(r, line)| {
            line.split_whitespace()
                .map(|token| {
                    token.parse::<u32>().map_err(|_| PuzzleError::InvalidToken {
                        row: r,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<u32>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Err(PuzzleError::EmptyBoard);
    }

    let size = rows.len();
    if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != size) {
        return Err(PuzzleError::NotSquare {
            row: r,
            expected: size,
            found: row.len(),
        });
    }

    let mut values: Vec<u32> = rows.iter().flatten().copied().collect();
    values.sort_unstable();
    if !values.iter().enumerate().all(|(i, &v)| v as usize == i) {
        return Err(PuzzleError::InvalidTileSet { size });
    }

    State::new(rows)
}

/// Reads and parses a board file in the format accepted by [`board_from_str`].
pub fn read_board_file(path: impl AsRef<Path>) -> Result<State, PuzzleError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| PuzzleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    board_from_str(&content)
}

/// Returns whether `goal` can be reached from `start` by blank moves.
///
/// Every move swaps the blank with a neighbour: it flips the parity of the
/// cell permutation and moves the blank one step. So the goal is reachable
/// exactly when the permutation taking `start` to `goal` has the same parity
/// as the blank's row-plus-column displacement. For odd N and the standard
/// goal this is the familiar "even number of inversions" rule.
///
/// States of different sizes or with different tile sets are never solvable.
pub fn is_solvable(start: &State, goal: &State) -> bool {
    if start.size() != goal.size() || start.tiles().len() != goal.tiles().len() {
        return false;
    }

    let cells = goal.tiles().len();
    let mut goal_index = vec![usize::MAX; cells];
    for (idx, &value) in goal.tiles().iter().enumerate() {
        match goal_index.get_mut(value as usize) {
            Some(slot) => *slot = idx,
            None => return false,
        }
    }

    let mut permutation = Vec::with_capacity(cells);
    for &value in start.tiles() {
        match goal_index.get(value as usize) {
            Some(&idx) if idx != usize::MAX => permutation.push(idx),
            _ => return false,
        }
    }

    // Parity of a permutation is (cells - cycles) mod 2.
    let mut visited = vec![false; cells];
    let mut cycles = 0;
    for i in 0..cells {
        if visited[i] {
            continue;
        }
        cycles += 1;
        let mut j = i;
        while !visited[j] {
            visited[j] = true;
            j = permutation[j];
        }
    }
    let permutation_parity = (cells - cycles) % 2;

    let (start_r, start_c) = start.blank();
    let (goal_r, goal_c) = goal.blank();
    let blank_parity = (start_r.abs_diff(goal_r) + start_c.abs_diff(goal_c)) % 2;

    permutation_parity == blank_parity
}

/// Scrambles `goal` with a random walk of up to `moves` blank moves.
///
/// Each step prefers a successor not seen earlier in the walk and falls back
/// to any successor when all of them were seen. Returns the final state and
/// the number of moves made, an upper bound on its distance from `goal`.
pub fn scramble(goal: &State, moves: usize, rng: &mut impl Rng) -> (State, usize) {
    let mut state = goal.clone();
    let mut seen = HashSet::new();
    seen.insert(goal.canonical_key());
    let mut moves_made = 0;

    while moves_made < moves {
        let successors = state.successors();
        let fresh: Vec<&State> = successors
            .iter()
            .map(|(_, next)| next)
            .filter(|next| !seen.contains(&next.canonical_key()))
            .collect();

        let next = match fresh.choose(rng) {
            Some(&next) => next.clone(),
            None => match successors.choose(rng) {
                Some((_, next)) => next.clone(),
                None => break,
            },
        };

        seen.insert(next.canonical_key());
        state = next;
        moves_made += 1;
    }

    (state, moves_made)
}

/// Shuffles the standard goal of the given size uniformly until the result is
/// solvable.
///
/// # Errors
/// Returns `PuzzleError::InvalidBoard` for `size == 0`.
pub fn random_solvable(size: usize, rng: &mut impl Rng) -> Result<State, PuzzleError> {
    let goal = State::goal(size)?;
    let mut tiles = goal.tiles().to_vec();
    loop {
        tiles.shuffle(rng);
        let candidate = State::from_tiles(size, tiles.clone())?;
        if is_solvable(&candidate, &goal) {
            return Ok(candidate);
        }
    }
}

/// Applies `actions` to `start` one by one and returns every state visited,
/// starting with `start` itself.
///
/// # Errors
/// Returns `PuzzleError::IllegalMove` at the first action that would push the
/// blank off the grid.
pub fn replay(start: &State, actions: &[Action]) -> Result<Vec<State>, PuzzleError> {
    let mut states = Vec::with_capacity(actions.len() + 1);
    states.push(start.clone());
    let mut current = start.clone();
    for (step, &action) in actions.iter().enumerate() {
        current = current
            .apply_move(action)
            .ok_or(PuzzleError::IllegalMove { step, action })?;
        states.push(current.clone());
    }
    Ok(states)
}
