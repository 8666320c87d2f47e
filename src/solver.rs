//! Uninformed and heuristic searches over the puzzle's state graph.
//!
//! Every strategy takes a start and a goal `State` and returns a [`Solution`]:
//! the actions leading from start to goal (empty when none was found, or when
//! start already equals goal) and the number of node expansions performed.
//! An expansion is one pop from the frontier, counted whether or not the
//! popped node gets successors generated.
//!
//! All bookkeeping (frontier, visited sets, parent links) lives inside a single
//! call. Progress can be watched through a [`SearchObserver`] passed to the
//! `*_observed` variants.
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::engine::{Action, State, StateKey};
use crate::error::PuzzleError;
use crate::frontier::PriorityFrontier;
use crate::heuristics::Heuristic;

/// Depth limit used by bounded DFS and iterative deepening unless told otherwise.
pub const DEFAULT_DEPTH_LIMIT: usize = 50;

/// Result of one search call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Blank moves leading from the start state to the goal, in order.
    pub actions: Vec<Action>,
    /// Number of nodes popped from the frontier, across all iterations for IDS.
    pub expansions: usize,
}

/// Receives a callback for every expansion a search performs.
///
/// `depth` is the depth of the popped node (its `g` cost for A*) and
/// `expansions` the running count including this one.
pub trait SearchObserver {
    fn on_expand(&mut self, state: &State, depth: usize, expansions: usize);
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_expand(&mut self, _state: &State, _depth: usize, _expansions: usize) {}
}

impl<F> SearchObserver for F
where
    F: FnMut(&State, usize, usize),
{
    fn on_expand(&mut self, state: &State, depth: usize, expansions: usize) {
        self(state, depth, expansions)
    }
}

/// Predecessor links: `None` marks the start state.
type ParentMap = HashMap<StateKey, Option<(StateKey, Action)>>;

fn reconstruct_path(parents: &ParentMap, goal: StateKey) -> Vec<Action> {
    let mut actions = Vec::new();
    let mut current = goal;
    while let Some(Some((prev, action))) = parents.get(&current) {
        actions.push(*action);
        current = prev.clone();
    }
    actions.reverse();
    actions
}

fn finish(algorithm: &'static str, actions: Option<Vec<Action>>, expansions: usize) -> Solution {
    let found = actions.is_some();
    let actions = actions.unwrap_or_default();
    debug!(
        algorithm,
        found,
        path_len = actions.len(),
        expansions,
        "search finished"
    );
    Solution {
        actions,
        expansions,
    }
}

/// Breadth-first search. See [`bfs_observed`].
pub fn bfs(start: &State, goal: &State, max_depth: Option<usize>) -> Solution {
    bfs_observed(start, goal, max_depth, &mut NoopObserver)
}

/// Breadth-first search with an optional depth limit.
///
/// States are marked visited when enqueued, so each state enters the queue at
/// most once. With `max_depth` set, nodes at that depth are still popped (and
/// counted) but not expanded. Without a limit the returned path has the
/// minimum number of moves.
pub fn bfs_observed<O: SearchObserver>(
    start: &State,
    goal: &State,
    max_depth: Option<usize>,
    observer: &mut O,
) -> Solution {
    debug!(algorithm = "bfs", ?max_depth, "search started");

    let mut queue = VecDeque::new();
    queue.push_back((start.clone(), 0usize));
    // The parent map doubles as the visited set.
    let mut parents = ParentMap::new();
    parents.insert(start.canonical_key(), None);
    let mut expansions = 0;

    while let Some((state, depth)) = queue.pop_front() {
        expansions += 1;
        observer.on_expand(&state, depth, expansions);

        let key = state.canonical_key();
        if state == *goal {
            return finish("bfs", Some(reconstruct_path(&parents, key)), expansions);
        }

        if max_depth.is_some_and(|limit| depth >= limit) {
            continue;
        }

        for (action, next) in state.successors() {
            if let Entry::Vacant(slot) = parents.entry(next.canonical_key()) {
                slot.insert(Some((key.clone(), action)));
                queue.push_back((next, depth + 1));
            }
        }
    }

    finish("bfs", None, expansions)
}

/// Depth-bounded depth-first search. See [`dfs_observed`].
pub fn dfs(start: &State, goal: &State, max_depth: usize) -> Solution {
    dfs_observed(start, goal, max_depth, &mut NoopObserver)
}

/// Depth-first search that never expands nodes deeper than `max_depth`.
///
/// A state joins the explored set only when it is popped and expanded, and
/// successors are skipped only if already explored at push time. A state can
/// therefore sit on the stack several times and be expanded more than once.
/// Successors are pushed in reverse order so Up is tried first.
///
/// Parent links ride on the stack entries and are recorded on pop, so the
/// returned path is the depth-first branch that reached the goal and is never
/// longer than `max_depth`. It is not necessarily the shortest.
pub fn dfs_observed<O: SearchObserver>(
    start: &State,
    goal: &State,
    max_depth: usize,
    observer: &mut O,
) -> Solution {
    debug!(algorithm = "dfs", max_depth, "search started");

    let mut stack: Vec<(State, usize, Option<(StateKey, Action)>)> = vec![(start.clone(), 0, None)];
    let mut explored = HashSet::new();
    let mut parents = ParentMap::new();
    let mut expansions = 0;

    while let Some((state, depth, link)) = stack.pop() {
        expansions += 1;
        observer.on_expand(&state, depth, expansions);

        let key = state.canonical_key();
        parents.insert(key.clone(), link);
        if state == *goal {
            return finish("dfs", Some(reconstruct_path(&parents, key)), expansions);
        }

        explored.insert(key.clone());

        if depth < max_depth {
            for (action, next) in state.successors().into_iter().rev() {
                if !explored.contains(&next.canonical_key()) {
                    stack.push((next, depth + 1, Some((key.clone(), action))));
                }
            }
        }
    }

    finish("dfs", None, expansions)
}

/// Iterative deepening search. See [`ids_observed`].
pub fn ids(start: &State, goal: &State, max_depth: usize) -> Solution {
    ids_observed(start, goal, max_depth, &mut NoopObserver)
}

/// Runs depth-limited searches with limits `0..=max_depth`, returning the
/// first success. Expansions accumulate over all iterations; if no iteration
/// succeeds the path is empty and the count is the total spent.
///
/// The first limit that succeeds is the optimal move count, so the returned
/// path is a shortest one.
pub fn ids_observed<O: SearchObserver>(
    start: &State,
    goal: &State,
    max_depth: usize,
    observer: &mut O,
) -> Solution {
    debug!(algorithm = "ids", max_depth, "search started");

    let mut total_expansions = 0;
    for limit in 0..=max_depth {
        let (actions, expansions) =
            depth_limited_search(start, goal, limit, observer, total_expansions);
        total_expansions += expansions;
        trace!(limit, expansions, total_expansions, "deepening iteration done");

        if actions.is_some() {
            return finish("ids", actions, total_expansions);
        }
    }

    finish("ids", None, total_expansions)
}

/// One iteration of iterative deepening.
///
/// Keeps the shallowest depth at which each state has been reached. A
/// successor is pushed (and its parent link set) only when it is new or
/// reached at a strictly smaller depth; popped entries that have since been
/// beaten by a shallower route are skipped without counting an expansion.
fn depth_limited_search<O: SearchObserver>(
    start: &State,
    goal: &State,
    limit: usize,
    observer: &mut O,
    prior_expansions: usize,
) -> (Option<Vec<Action>>, usize) {
    let mut stack = vec![(start.clone(), 0usize)];
    let mut best_depth: HashMap<StateKey, usize> = HashMap::new();
    best_depth.insert(start.canonical_key(), 0);
    let mut parents = ParentMap::new();
    parents.insert(start.canonical_key(), None);
    let mut expansions = 0;

    while let Some((state, depth)) = stack.pop() {
        let key = state.canonical_key();
        if best_depth.get(&key).is_some_and(|&best| depth > best) {
            continue;
        }

        expansions += 1;
        observer.on_expand(&state, depth, prior_expansions + expansions);

        if state == *goal {
            return (Some(reconstruct_path(&parents, key)), expansions);
        }

        if depth < limit {
            for (action, next) in state.successors().into_iter().rev() {
                let next_key = next.canonical_key();
                let shallower = best_depth
                    .get(&next_key)
                    .map_or(true, |&best| depth + 1 < best);
                if shallower {
                    best_depth.insert(next_key.clone(), depth + 1);
                    parents.insert(next_key, Some((key.clone(), action)));
                    stack.push((next, depth + 1));
                }
            }
        }
    }

    (None, expansions)
}

/// A* search. See [`astar_observed`].
pub fn astar<H>(start: &State, goal: &State, heuristic: H) -> Solution
where
    H: Fn(&State, &State) -> u32,
{
    astar_observed(start, goal, heuristic, &mut NoopObserver)
}

/// Best-first search on `f = g + h` with unit move costs.
///
/// Equal `f` values leave the frontier in insertion order. A successor is
/// (re)inserted whenever its cost improves; older entries for the same state
/// stay queued. There is no closed set, so a state may be popped more than
/// once if a cheaper route to it turns up later. With an admissible heuristic
/// the returned path is optimal.
pub fn astar_observed<H, O>(start: &State, goal: &State, heuristic: H, observer: &mut O) -> Solution
where
    H: Fn(&State, &State) -> u32,
    O: SearchObserver,
{
    debug!(algorithm = "astar", "search started");

    let mut frontier = PriorityFrontier::new();
    frontier.push(start.clone(), 0);
    let mut parents = ParentMap::new();
    parents.insert(start.canonical_key(), None);
    let mut cost_so_far: HashMap<StateKey, u32> = HashMap::new();
    cost_so_far.insert(start.canonical_key(), 0);
    let mut expansions = 0;

    while let Some(state) = frontier.pop() {
        expansions += 1;

        let key = state.canonical_key();
        let cost = cost_so_far.get(&key).copied().unwrap_or_default();
        observer.on_expand(&state, cost as usize, expansions);

        if state == *goal {
            return finish("astar", Some(reconstruct_path(&parents, key)), expansions);
        }

        for (action, next) in state.successors() {
            let new_cost = cost + 1;
            let next_key = next.canonical_key();
            let improves = cost_so_far
                .get(&next_key)
                .map_or(true, |&known| new_cost < known);
            if improves {
                cost_so_far.insert(next_key.clone(), new_cost);
                parents.insert(next_key, Some((key.clone(), action)));
                let priority = new_cost + heuristic(&next, goal);
                frontier.push(next, priority);
            }
        }
    }

    finish("astar", None, expansions)
}

/// A search strategy together with its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Bfs { max_depth: Option<usize> },
    Dfs { max_depth: usize },
    Ids { max_depth: usize },
    AStar { heuristic: Heuristic },
}

impl Algorithm {
    /// Replaces the depth limit of the bounded strategies. `None` lifts the
    /// BFS limit and restores the default limit for DFS and IDS. A* ignores it.
    pub fn with_depth_limit(self, max_depth: Option<usize>) -> Self {
        match self {
            Algorithm::Bfs { .. } => Algorithm::Bfs { max_depth },
            Algorithm::Dfs { .. } => Algorithm::Dfs {
                max_depth: max_depth.unwrap_or(DEFAULT_DEPTH_LIMIT),
            },
            Algorithm::Ids { .. } => Algorithm::Ids {
                max_depth: max_depth.unwrap_or(DEFAULT_DEPTH_LIMIT),
            },
            astar @ Algorithm::AStar { .. } => astar,
        }
    }

    /// Replaces the heuristic of A*. Other strategies ignore it.
    pub fn with_heuristic(self, heuristic: Heuristic) -> Self {
        match self {
            Algorithm::AStar { .. } => Algorithm::AStar { heuristic },
            other => other,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Bfs { max_depth: None } => write!(f, "Breadth First Search"),
            Algorithm::Bfs {
                max_depth: Some(limit),
            } => write!(f, "Breadth First Search (depth <= {})", limit),
            Algorithm::Dfs { max_depth } => {
                write!(f, "Depth First Search (depth <= {})", max_depth)
            }
            Algorithm::Ids { max_depth } => {
                write!(f, "Iterative Deepening Search (depth <= {})", max_depth)
            }
            Algorithm::AStar { heuristic } => write!(f, "A* - {}", heuristic),
        }
    }
}

impl FromStr for Algorithm {
    type Err = PuzzleError;

    /// Parses `bfs`, `dfs`, `ids` or `astar` with default parameters:
    /// unbounded BFS, `DEFAULT_DEPTH_LIMIT` for DFS and IDS, Manhattan A*.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Algorithm::Bfs { max_depth: None }),
            "dfs" => Ok(Algorithm::Dfs {
                max_depth: DEFAULT_DEPTH_LIMIT,
            }),
            "ids" => Ok(Algorithm::Ids {
                max_depth: DEFAULT_DEPTH_LIMIT,
            }),
            "astar" | "a*" => Ok(Algorithm::AStar {
                heuristic: Heuristic::default(),
            }),
            _ => Err(PuzzleError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Runs `algorithm` from `start` to `goal`.
///
/// # Examples
/// ```
/// use slide_solver::engine::{Action, State};
/// use slide_solver::solver::{solve, Algorithm};
/// let goal = State::goal(3).unwrap();
/// let start = goal.apply_move(Action::Up).unwrap();
/// let solution = solve(&start, &goal, "astar".parse::<Algorithm>().unwrap());
/// assert_eq!(solution.actions, vec![Action::Down]);
/// ```
pub fn solve(start: &State, goal: &State, algorithm: Algorithm) -> Solution {
    solve_observed(start, goal, algorithm, &mut NoopObserver)
}

/// Runs `algorithm`, reporting every expansion to `observer`.
pub fn solve_observed<O: SearchObserver>(
    start: &State,
    goal: &State,
    algorithm: Algorithm,
    observer: &mut O,
) -> Solution {
    match algorithm {
        Algorithm::Bfs { max_depth } => bfs_observed(start, goal, max_depth, observer),
        Algorithm::Dfs { max_depth } => dfs_observed(start, goal, max_depth, observer),
        Algorithm::Ids { max_depth } => ids_observed(start, goal, max_depth, observer),
        Algorithm::AStar { heuristic } => astar_observed(start, goal, heuristic.as_fn(), observer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Action::{Down, Left, Right, Up};
    use crate::heuristics::{manhattan_distance, misplaced_tiles};
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn state(rows: &[&[u32]]) -> State {
        State::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn outcome(actions: Vec<Action>, expansions: usize) -> Solution {
        Solution {
            actions,
            expansions,
        }
    }

    fn replay_to_end(start: &State, actions: &[Action]) -> State {
        actions.iter().fold(start.clone(), |s, &a| {
            s.apply_move(a)
                .unwrap_or_else(|| panic!("illegal move {} in returned path", a))
        })
    }

    fn all_algorithms() -> Vec<Algorithm> {
        vec![
            Algorithm::Bfs { max_depth: None },
            Algorithm::Dfs {
                max_depth: DEFAULT_DEPTH_LIMIT,
            },
            Algorithm::Ids {
                max_depth: DEFAULT_DEPTH_LIMIT,
            },
            Algorithm::AStar {
                heuristic: Heuristic::Misplaced,
            },
            Algorithm::AStar {
                heuristic: Heuristic::Manhattan,
            },
        ]
    }

    /// The scrambled board the interactive front end starts from.
    fn sample_board() -> State {
        state(&[&[3, 4, 6], &[1, 0, 8], &[7, 2, 5]])
    }

    #[test]
    fn test_start_equals_goal() {
        let goal = State::goal(3).unwrap();
        for algorithm in all_algorithms() {
            let solution = solve(&goal, &goal, algorithm);
            assert!(solution.actions.is_empty(), "{}", algorithm);
            assert_eq!(solution.expansions, 1, "{}", algorithm);
        }
    }

    #[test]
    fn test_one_move_from_goal() {
        let goal = State::goal(3).unwrap();
        let cases = [(Up, 3, 4), (Left, 4, 5)];
        for (scramble, bfs_expansions, ids_expansions) in cases {
            let start = goal.apply_move(scramble).unwrap();
            let expected = vec![scramble.inverse()];

            let solution = bfs(&start, &goal, None);
            assert_eq!(solution.actions, expected);
            assert_eq!(solution.expansions, bfs_expansions);

            let solution = ids(&start, &goal, DEFAULT_DEPTH_LIMIT);
            assert_eq!(solution.actions, expected);
            assert_eq!(solution.expansions, ids_expansions);

            for h in [misplaced_tiles, manhattan_distance] {
                let solution = astar(&start, &goal, h);
                assert_eq!(solution.actions, expected);
                assert_eq!(solution.expansions, 2);
            }
        }
    }

    #[test]
    fn test_dfs_one_move_from_goal_takes_the_long_way() {
        // Up is tried first, so the blank wanders off before it comes back.
        let goal = State::goal(3).unwrap();
        let start = goal.apply_move(Up).unwrap();
        let solution = dfs(&start, &goal, DEFAULT_DEPTH_LIMIT);
        assert_eq!(solution.actions.len(), 39);
        assert_eq!(solution.expansions, 56_580);
        assert_eq!(replay_to_end(&start, &solution.actions), goal);
    }

    #[test]
    fn test_scrambled_board_all_strategies() {
        let goal = State::goal(3).unwrap();
        let start = sample_board();
        let optimal = vec![Up, Left, Down, Right, Down, Right, Up, Up, Left, Down, Down, Right];

        let solution = bfs(&start, &goal, None);
        assert_eq!(solution.actions, optimal);
        assert_eq!(solution.expansions, 1513);

        let solution = ids(&start, &goal, DEFAULT_DEPTH_LIMIT);
        assert_eq!(solution.actions.len(), 12);
        assert_eq!(solution.expansions, 4266);
        assert_eq!(replay_to_end(&start, &solution.actions), goal);

        let solution = astar(&start, &goal, misplaced_tiles);
        assert_eq!(solution.actions.len(), 12);
        assert_eq!(solution.expansions, 104);
        assert_eq!(replay_to_end(&start, &solution.actions), goal);

        let solution = astar(&start, &goal, manhattan_distance);
        assert_eq!(solution.actions, optimal);
        assert_eq!(solution.expansions, 24);

        let solution = dfs(&start, &goal, DEFAULT_DEPTH_LIMIT);
        assert_eq!(solution.actions.len(), 50);
        assert_eq!(solution.expansions, 5246);
        assert_eq!(replay_to_end(&start, &solution.actions), goal);
    }

    #[test]
    fn test_eight_move_board_expansion_counts() {
        let goal = State::goal(3).unwrap();
        let start = state(&[&[1, 3, 6], &[5, 0, 2], &[4, 7, 8]]);
        let optimal = vec![Right, Up, Left, Down, Left, Down, Right, Right];

        let solution = bfs(&start, &goal, None);
        assert_eq!((solution.actions.clone(), solution.expansions), (optimal.clone(), 311));

        let solution = ids(&start, &goal, DEFAULT_DEPTH_LIMIT);
        assert_eq!((solution.actions.clone(), solution.expansions), (optimal.clone(), 768));

        let solution = astar(&start, &goal, misplaced_tiles);
        assert_eq!((solution.actions.clone(), solution.expansions), (optimal.clone(), 19));

        let solution = astar(&start, &goal, manhattan_distance);
        assert_eq!((solution.actions.clone(), solution.expansions), (optimal, 13));

        let solution = dfs(&start, &goal, DEFAULT_DEPTH_LIMIT);
        assert_eq!(solution.expansions, 32_501);
        assert!(solution.actions.len() >= 8 && solution.actions.len() <= DEFAULT_DEPTH_LIMIT);
        assert_eq!(replay_to_end(&start, &solution.actions), goal);
    }

    #[test]
    fn test_dfs_path_never_exceeds_depth_limit() {
        // Parent links written at push time would yield a 64-move path here.
        let goal = State::goal(3).unwrap();
        let start = state(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]);
        let solution = dfs(&start, &goal, DEFAULT_DEPTH_LIMIT);
        assert_eq!(solution.expansions, 9874);
        assert_eq!(solution.actions.len(), DEFAULT_DEPTH_LIMIT);
        assert_eq!(replay_to_end(&start, &solution.actions), goal);
    }

    #[test]
    fn test_low_depth_limit_reports_no_solution() {
        let goal = State::goal(3).unwrap();
        let start = sample_board();
        let cases = [(3, 21, 21, 40), (5, 69, 69, 146)];
        for (limit, bfs_expansions, dfs_expansions, ids_expansions) in cases {
            let solution = bfs(&start, &goal, Some(limit));
            assert!(solution.actions.is_empty());
            assert_eq!(solution.expansions, bfs_expansions);

            let solution = dfs(&start, &goal, limit);
            assert!(solution.actions.is_empty());
            assert_eq!(solution.expansions, dfs_expansions);

            let solution = ids(&start, &goal, limit);
            assert!(solution.actions.is_empty());
            assert_eq!(solution.expansions, ids_expansions);
        }
    }

    #[test]
    fn test_depth_limit_at_optimal_cost_still_solves() {
        let goal = State::goal(3).unwrap();
        let start = sample_board();
        assert_eq!(bfs(&start, &goal, Some(12)).actions.len(), 12);
        assert!(bfs(&start, &goal, Some(11)).actions.is_empty());
        assert_eq!(ids(&start, &goal, 12).actions.len(), 12);
        assert!(ids(&start, &goal, 11).actions.is_empty());
    }

    #[test]
    fn test_two_by_two_board() {
        let goal = State::goal(2).unwrap();
        let start = state(&[&[0, 3], &[2, 1]]);
        let expected = vec![Down, Right, Up, Left, Down, Right];

        assert_eq!(bfs(&start, &goal, None), outcome(expected.clone(), 12));
        assert_eq!(dfs(&start, &goal, DEFAULT_DEPTH_LIMIT), outcome(expected.clone(), 7));
        assert_eq!(ids(&start, &goal, DEFAULT_DEPTH_LIMIT), outcome(expected.clone(), 43));
        assert_eq!(astar(&start, &goal, manhattan_distance), outcome(expected, 12));
    }

    #[test]
    fn test_unsolvable_board_exhausts_the_frontier() {
        let goal = State::goal(2).unwrap();
        let start = state(&[&[2, 1], &[3, 0]]);

        assert_eq!(bfs(&start, &goal, None), outcome(vec![], 12));
        assert_eq!(astar(&start, &goal, manhattan_distance), outcome(vec![], 12));
        assert_eq!(ids(&start, &goal, 10), outcome(vec![], 106));

        // Twelve reachable states, thirteen expansions: one state was sitting
        // on the stack twice and got expanded twice.
        let mut seen: Vec<StateKey> = Vec::new();
        let mut record = |s: &State, _depth: usize, _n: usize| seen.push(s.canonical_key());
        let solution = dfs_observed(&start, &goal, DEFAULT_DEPTH_LIMIT, &mut record);
        assert!(solution.actions.is_empty());
        assert_eq!(solution.expansions, 13);
        let unique: HashSet<StateKey> = seen.iter().cloned().collect();
        assert_eq!(unique.len(), 12);
    }

    #[test]
    fn test_astar_pops_a_state_again_when_a_cheaper_route_appears() {
        let goal = State::goal(2).unwrap();
        let start = state(&[&[2, 1], &[3, 0]]);
        // Overestimate on the Up neighbour of the start so the search walks
        // the long way round the 12-state cycle first.
        let detour = start.apply_move(Up).unwrap();
        let heuristic = |s: &State, _: &State| if *s == detour { 100 } else { 0 };

        let mut pops: Vec<(StateKey, usize)> = Vec::new();
        let mut record = |s: &State, depth: usize, _n: usize| pops.push((s.canonical_key(), depth));
        let solution = astar_observed(&start, &goal, heuristic, &mut record);
        assert!(solution.actions.is_empty());
        assert_eq!(solution.expansions, 16);

        let unique: HashSet<StateKey> = pops.iter().map(|(key, _)| key.clone()).collect();
        assert_eq!(unique.len(), 12);

        // Each state popped twice came out cheaper the second time.
        let mut first_cost: HashMap<StateKey, usize> = HashMap::new();
        let mut repeats = 0;
        for (key, cost) in pops {
            match first_cost.get(&key) {
                Some(&first) => {
                    assert!(cost < first, "re-popped at cost {} after {}", cost, first);
                    repeats += 1;
                }
                None => {
                    first_cost.insert(key, cost);
                }
            }
        }
        assert_eq!(repeats, 4);
    }

    #[test]
    fn test_optimal_strategies_agree_on_random_scrambles() {
        let goal = State::goal(3).unwrap();
        let mut rng = SmallRng::seed_from_u64(2024);

        for _ in 0..8 {
            let mut start = goal.clone();
            for _ in 0..14 {
                let successors = start.successors();
                start = successors.choose(&mut rng).unwrap().1.clone();
            }

            let optimal = bfs(&start, &goal, None);
            assert_eq!(replay_to_end(&start, &optimal.actions), goal);

            for algorithm in all_algorithms() {
                let solution = solve(&start, &goal, algorithm);
                assert_eq!(replay_to_end(&start, &solution.actions), goal, "{}", algorithm);
                match algorithm {
                    Algorithm::Dfs { max_depth } => {
                        assert!(solution.actions.len() >= optimal.actions.len());
                        assert!(solution.actions.len() <= max_depth);
                    }
                    _ => assert_eq!(solution.actions.len(), optimal.actions.len(), "{}", algorithm),
                }
            }
        }
    }

    #[test]
    fn test_astar_expansion_order_is_deterministic() {
        let goal = State::goal(3).unwrap();
        let start = sample_board();
        let run = || {
            let mut order = Vec::new();
            let mut record = |s: &State, g: usize, _n: usize| order.push((s.canonical_key(), g));
            let solution = astar_observed(&start, &goal, misplaced_tiles, &mut record);
            (solution, order)
        };
        let (first_solution, first_order) = run();
        for _ in 0..3 {
            let (solution, order) = run();
            assert_eq!(solution, first_solution);
            assert_eq!(order, first_order);
        }
    }

    #[test]
    fn test_astar_ties_follow_successor_order() {
        // From the centre every successor has the same f with a zero heuristic,
        // so they must be expanded Up, Down, Left, Right.
        let start = state(&[&[1, 2, 3], &[4, 0, 5], &[6, 7, 8]]);
        let goal = State::goal(3).unwrap();
        let mut order = Vec::new();
        let mut record = |s: &State, _g: usize, _n: usize| order.push(s.blank());
        astar_observed(&start, &goal, |_: &State, _: &State| 0, &mut record);
        assert_eq!(&order[..5], &[(1, 1), (0, 1), (2, 1), (1, 0), (1, 2)]);
    }

    #[test]
    fn test_observer_sees_every_expansion() {
        let goal = State::goal(3).unwrap();
        let start = state(&[&[1, 3, 6], &[5, 0, 2], &[4, 7, 8]]);
        for algorithm in all_algorithms() {
            let mut calls = 0;
            let mut last = 0;
            let mut count = |_: &State, _: usize, n: usize| {
                calls += 1;
                last = n;
            };
            let solution = solve_observed(&start, &goal, algorithm, &mut count);
            assert_eq!(calls, solution.expansions, "{}", algorithm);
            assert_eq!(last, solution.expansions, "{}", algorithm);
        }
    }

    #[test]
    fn test_algorithm_parsing_and_overrides() {
        assert_eq!("bfs".parse::<Algorithm>().unwrap(), Algorithm::Bfs { max_depth: None });
        assert_eq!(
            "IDS".parse::<Algorithm>().unwrap(),
            Algorithm::Ids {
                max_depth: DEFAULT_DEPTH_LIMIT
            }
        );
        assert!("greedy".parse::<Algorithm>().is_err());

        let dfs = "dfs".parse::<Algorithm>().unwrap().with_depth_limit(Some(7));
        assert_eq!(dfs, Algorithm::Dfs { max_depth: 7 });
        let astar = "astar"
            .parse::<Algorithm>()
            .unwrap()
            .with_depth_limit(Some(3))
            .with_heuristic(Heuristic::Misplaced);
        assert_eq!(
            astar,
            Algorithm::AStar {
                heuristic: Heuristic::Misplaced
            }
        );
        assert_eq!(astar.to_string(), "A* - misplaced");
    }
}
