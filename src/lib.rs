use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;

use fxhash::{FxBuildHasher, FxHashMap, FxHashSet};
use priority_queue::PriorityQueue;

pub mod deadlock;
pub mod direction;
pub mod engine;
pub mod grid;
pub mod harness;
pub mod heuristic;
pub mod position;
pub mod solution;
pub mod state;

pub use direction::Direction;
pub use engine::{Engine, Outcome};
pub use grid::{Board, FormatError, Layout, Puzzle};
pub use position::Position;
pub use solution::Solution;
pub use state::{Config, Step};

pub trait State<G, S>: Clone + Eq + Hash {
    /// Every legal successor as (step cost, step taken, state), `None` if there are none.
    fn next_states(&self, global: &G) -> Option<Vec<(i64, S, Self)>>;

    /// `false` prunes the state: it is never expanded.
    fn is_valid(&self, global: &G) -> bool;
    fn is_solved(&self, global: &G) -> bool;

    fn heuristic(&self, _global: &G) -> Estimate {
        Estimate::default()
    }

    fn stringify(&self, global: &G) -> String;
}

/// Remaining cost as guessed by [`State::heuristic`]: `cost` ranks, `steps` breaks ties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Estimate {
    pub cost: i64,
    pub steps: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    BreadthFirst,
    DepthFirst,
    UniformCost,
    BestFirst,
}

impl SearchMode {
    pub fn all() -> [SearchMode; 4] {
        [
            SearchMode::BreadthFirst,
            SearchMode::DepthFirst,
            SearchMode::UniformCost,
            SearchMode::BestFirst,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchMode::BreadthFirst => "BFS",
            SearchMode::DepthFirst => "DFS",
            SearchMode::UniformCost => "UCS",
            SearchMode::BestFirst => "A*",
        }
    }

    // BFS and DFS test successors for the goal as soon as they are generated,
    // UCS and A* only once they come off the frontier
    fn solves_on_generate(&self) -> bool {
        matches!(self, SearchMode::BreadthFirst | SearchMode::DepthFirst)
    }

    // Costs saturate at i64::MAX instead of wrapping around to a negative rank
    fn rank(&self, cost: i64, steps: usize, estimate: Estimate) -> Rank {
        match self {
            SearchMode::BestFirst => Rank(
                cost.saturating_add(estimate.cost),
                estimate.steps.saturating_add(steps as i64),
            ),
            _ => Rank(cost, steps as i64),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Frontier ordering key, smallest first: (primary, tie-break).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Rank(i64, i64);

/// Metadata for a state waiting in the priority frontier.
///
/// Ordered by rank alone, reversed so the max-heap pops the smallest rank.
struct Pending<S, St> {
    rank: Rank,
    cost: i64,
    steps: usize,
    parent: Option<(St, S)>,
}

impl<S, St> PartialEq for Pending<S, St> {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}

impl<S, St> Eq for Pending<S, St> {}

impl<S, St> PartialOrd for Pending<S, St> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<S, St> Ord for Pending<S, St> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.rank.cmp(&self.rank)
    }
}

enum Frontier<S, St: Hash + Eq> {
    Queue(VecDeque<St>),
    Priority(PriorityQueue<St, Pending<S, St>, FxBuildHasher>),
}

impl<S, St: Hash + Eq> Frontier<S, St> {
    fn len(&self) -> usize {
        match self {
            Frontier::Queue(queue) => queue.len(),
            Frontier::Priority(heap) => heap.len(),
        }
    }
}

pub struct Solver<G, St, S>
where
    St: State<G, S>,
{
    global: G,
    initial: St,
    mode: SearchMode,
    frontier: Frontier<S, St>,
    checked: FxHashSet<St>,
    parents: FxHashMap<St, Option<(St, S)>>,
    invalidated: usize,
    iterations: usize,
    started: bool,
    solution: Option<St>,
}

impl<G, St, S> Solver<G, St, S>
where
    St: State<G, S>,
    S: Clone,
{
    pub fn new(global: G, initial: St) -> Solver<G, St, S> {
        Solver {
            global,
            initial,
            mode: SearchMode::BreadthFirst,
            frontier: Frontier::Queue(VecDeque::new()),
            checked: FxHashSet::default(),
            parents: FxHashMap::default(),
            invalidated: 0,
            iterations: 0,
            started: false,
            solution: None,
        }
    }

    /// Pick the strategy; only has an effect before the first call to `next`.
    pub fn set_mode(&mut self, new_mode: SearchMode) -> &mut Self {
        if !self.started {
            self.mode = new_mode;
        }
        self
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Distinct states seen so far.
    ///
    /// BFS and DFS count every state as it is generated, UCS and A* as it is first taken off
    /// the frontier.
    pub fn states_checked(&self) -> usize {
        self.checked.len()
    }

    pub fn states_invalidated(&self) -> usize {
        self.invalidated
    }

    pub fn in_queue(&self) -> usize {
        self.frontier.len()
    }

    pub fn get_solution(&self) -> Option<St> {
        self.solution.clone()
    }

    /// Run until a solution is found or the frontier is exhausted.
    pub fn solve(&mut self) -> Option<St> {
        while self.next().is_some() {}
        self.get_solution()
    }

    /// States from `state` back to the initial state (inclusive), following the trace map.
    pub fn trace(&self, state: &St) -> Option<Vec<St>> {
        let mut states = vec![state.clone()];
        let mut current = state;

        while let Some((parent, _)) = self.parents.get(current)? {
            states.push(parent.clone());
            current = parent;
        }

        Some(states)
    }

    /// Steps from the initial state to `state`, in order.
    pub fn path(&self, state: &St) -> Option<Vec<S>> {
        let mut steps = Vec::new();
        let mut current = state;

        while let Some((parent, step)) = self.parents.get(current)? {
            steps.push(step.clone());
            current = parent;
        }

        steps.reverse();
        Some(steps)
    }

    fn start(&mut self) {
        self.started = true;
        let initial = self.initial.clone();

        if self.mode.solves_on_generate() {
            self.checked.insert(initial.clone());
            self.parents.insert(initial.clone(), None);

            if initial.is_solved(&self.global) {
                self.solution = Some(initial);
                return;
            }
            self.frontier = Frontier::Queue(VecDeque::from([initial]));
        } else {
            let estimate = match self.mode {
                SearchMode::BestFirst => initial.heuristic(&self.global),
                _ => Estimate::default(),
            };

            let mut heap = PriorityQueue::with_default_hasher();
            heap.push(
                initial,
                Pending {
                    rank: self.mode.rank(0, 0, estimate),
                    cost: 0,
                    steps: 0,
                    parent: None,
                },
            );
            self.frontier = Frontier::Priority(heap);
        }
    }

    // Expand a state taken from a BFS/DFS queue; successors are goal tested as they are generated
    fn expand_generated(&mut self, state: &St) {
        let Some(next_states) = state.next_states(&self.global) else {
            return;
        };
        let Frontier::Queue(queue) = &mut self.frontier else {
            return;
        };

        for (_, step, next_state) in next_states {
            if self.checked.contains(&next_state) {
                continue;
            }

            self.checked.insert(next_state.clone());
            self.parents
                .insert(next_state.clone(), Some((state.clone(), step)));

            if next_state.is_solved(&self.global) {
                self.solution = Some(next_state);
                return;
            }

            queue.push_back(next_state);
        }
    }

    // Expand a state taken from the UCS/A* heap; a successor already waiting keeps whichever
    // entry ranks better
    fn expand_ranked(&mut self, state: &St, cost: i64, steps: usize) {
        let Some(next_states) = state.next_states(&self.global) else {
            return;
        };
        let Frontier::Priority(heap) = &mut self.frontier else {
            return;
        };

        for (step_cost, step, next_state) in next_states {
            if self.checked.contains(&next_state) {
                continue;
            }

            let estimate = match self.mode {
                SearchMode::BestFirst => next_state.heuristic(&self.global),
                _ => Estimate::default(),
            };

            let next_cost = cost.saturating_add(step_cost);
            let pending = Pending {
                rank: self.mode.rank(next_cost, steps + 1, estimate),
                cost: next_cost,
                steps: steps + 1,
                parent: Some((state.clone(), step)),
            };
            heap.push_increase(next_state, pending);
        }
    }
}

// Iterate through the states the solver expands, stopping once a solution is found
impl<G, St, S> Iterator for Solver<G, St, S>
where
    St: State<G, S>,
    S: Clone,
{
    type Item = St;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.start();
        }

        while self.solution.is_none() {
            let (state, pending) = match &mut self.frontier {
                Frontier::Queue(queue) => match self.mode {
                    SearchMode::DepthFirst => (queue.pop_back()?, None),
                    _ => (queue.pop_front()?, None),
                },
                Frontier::Priority(heap) => {
                    let (state, pending) = heap.pop()?;
                    (state, Some(pending))
                }
            };
            self.iterations += 1;

            if self.iterations % 10000 == 0 {
                tracing::debug!(
                    "{} iter: {}, queue: {}, checked: {}, invalidated: {}",
                    self.mode,
                    self.iterations,
                    self.frontier.len(),
                    self.checked.len(),
                    self.invalidated,
                );
            }

            if let Some(pending) = pending {
                // A ranked state is counted once, the first time it is taken off the heap, and
                // that includes deadlocked states: they go into `checked` before being pruned,
                // so they are never counted again
                if !self.checked.insert(state.clone()) {
                    continue;
                }

                if !state.is_valid(&self.global) {
                    self.invalidated += 1;
                    continue;
                }

                self.parents.insert(state.clone(), pending.parent);

                if state.is_solved(&self.global) {
                    self.solution = Some(state.clone());
                    return Some(state);
                }

                self.expand_ranked(&state, pending.cost, pending.steps);
            } else {
                if !state.is_valid(&self.global) {
                    self.invalidated += 1;
                    continue;
                }

                self.expand_generated(&state);
            }

            return Some(state);
        }

        // If we make it here, return None to stop iterator
        None
    }
}

impl<G, St, S> fmt::Display for Solver<G, St, S>
where
    St: State<G, S>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {} checked, {} in queue, {} invalidated",
            self.mode,
            self.checked.len(),
            self.frontier.len(),
            self.invalidated
        )
    }
}

#[cfg(test)]
mod test_solver {
    use super::*;

    // A number line walk: step +1 (cost 1) or +3 (cost 5); multiples of 7 are invalid
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Walk(i64);

    impl State<i64, char> for Walk {
        fn next_states(&self, goal: &i64) -> Option<Vec<(i64, char, Walk)>> {
            if self.0 > *goal {
                return None;
            }
            Some(vec![(1, 'a', Walk(self.0 + 1)), (5, 'b', Walk(self.0 + 3))])
        }

        fn is_valid(&self, _goal: &i64) -> bool {
            self.0 == 0 || self.0 % 7 != 0
        }

        fn is_solved(&self, goal: &i64) -> bool {
            self.0 == *goal
        }

        fn heuristic(&self, goal: &i64) -> Estimate {
            Estimate {
                cost: (goal - self.0).max(0),
                steps: 0,
            }
        }

        fn stringify(&self, _goal: &i64) -> String {
            self.0.to_string()
        }
    }

    fn solve(mode: SearchMode, goal: i64) -> (Solver<i64, Walk, char>, Option<Walk>) {
        let mut solver: Solver<i64, Walk, char> = Solver::new(goal, Walk(0));
        solver.set_mode(mode);
        let solution = solver.solve();
        (solver, solution)
    }

    #[test]
    fn test_breadth_first_fewest_steps() {
        let (solver, solution) = solve(SearchMode::BreadthFirst, 6);
        assert_eq!(solution, Some(Walk(6)));
        assert_eq!(solver.path(&Walk(6)).unwrap(), vec!['b', 'b']);
    }

    #[test]
    fn test_uniform_cost_cheapest() {
        let (solver, solution) = solve(SearchMode::UniformCost, 6);
        assert_eq!(solution, Some(Walk(6)));

        let path = solver.path(&Walk(6)).unwrap();
        assert_eq!(path.len(), 6);
        assert!(path.iter().all(|c| *c == 'a'));
    }

    #[test]
    fn test_best_first_matches_uniform_cost() {
        let (ucs, _) = solve(SearchMode::UniformCost, 12);
        let (astar, solution) = solve(SearchMode::BestFirst, 12);
        assert_eq!(solution, Some(Walk(12)));

        let cost = |solver: &Solver<i64, Walk, char>| {
            solver
                .path(&Walk(12))
                .unwrap()
                .iter()
                .map(|c| if *c == 'a' { 1 } else { 5 })
                .sum::<i64>()
        };
        assert_eq!(cost(&ucs), cost(&astar));
        assert!(astar.states_checked() <= ucs.states_checked());
    }

    #[test]
    fn test_invalid_states_are_pruned() {
        for mode in SearchMode::all() {
            let (solver, solution) = solve(mode, 12);
            assert_eq!(solution, Some(Walk(12)), "{mode}");

            let trace = solver.trace(&Walk(12)).unwrap();
            assert_eq!(trace.last(), Some(&Walk(0)));
            assert!(!trace.contains(&Walk(7)), "{mode}");

            // DFS dives 0, 3, 6, 9, 12 and never takes 7 off the stack
            if mode != SearchMode::DepthFirst {
                assert!(solver.states_invalidated() > 0, "{mode}");
            }
        }
    }

    #[test]
    fn test_initial_state_solved() {
        for mode in SearchMode::all() {
            let (solver, solution) = solve(mode, 0);
            assert_eq!(solution, Some(Walk(0)), "{mode}");
            assert_eq!(solver.states_checked(), 1);
            assert_eq!(solver.trace(&Walk(0)).unwrap(), vec![Walk(0)]);
            assert!(solver.path(&Walk(0)).unwrap().is_empty());
        }
    }

    #[test]
    fn test_exhausted() {
        // Multiples of 7 are invalid, but steps of 3 hop over them
        let mut solver: Solver<i64, Walk, char> = Solver::new(100, Walk(0));
        solver.set_mode(SearchMode::DepthFirst);
        assert_eq!(solver.solve(), Some(Walk(100)));

        // Nothing is generated past the goal, and the start is already past it
        let mut solver: Solver<i64, Walk, char> = Solver::new(-1, Walk(0));
        assert_eq!(solver.solve(), None);
        assert_eq!(solver.in_queue(), 0);
    }

    #[test]
    fn test_mode_is_fixed_once_started() {
        let mut solver: Solver<i64, Walk, char> = Solver::new(6, Walk(0));
        solver.set_mode(SearchMode::UniformCost);
        assert!(solver.next().is_some());

        solver.set_mode(SearchMode::DepthFirst);
        assert_eq!(solver.mode(), SearchMode::UniformCost);
    }
}
