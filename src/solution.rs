use anyhow::{anyhow, Result};

use crate::grid::{Board, Layout};
use crate::state::{step_cost, Config, Step};
use crate::Solver;

/// A solved puzzle: total weight pushed, the boards visited and their move labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub cost: i64,
    pub states_checked: usize,
    /// Goal first, the starting board last.
    pub path: Vec<Board>,
    pub moves: String,
}

impl Solution {
    /// Walk the solver's trace back from `goal`, rebuilding each board from `initial`.
    ///
    /// Cost and labels are derived again from each consecutive pair of configurations rather
    /// than read off the search.
    pub fn reconstruct(
        solver: &Solver<Layout, Config, Step>,
        goal: &Config,
        initial: &Board,
    ) -> Result<Solution> {
        let trace = solver
            .trace(goal)
            .ok_or_else(|| anyhow!("Goal was never reached by the {} search", solver.mode()))?;

        let mut cost = 0;
        let mut labels = Vec::with_capacity(trace.len());

        // trace is goal first, so each window is (next, prev)
        for pair in trace.windows(2) {
            let (next, prev) = (&pair[0], &pair[1]);
            let step = Step::between(prev, next).ok_or_else(|| {
                anyhow!("Consecutive states are not one move apart:\n{prev:?}\n{next:?}")
            })?;

            cost = step_cost(prev, next).saturating_add(cost);
            labels.push(step.label());
        }
        labels.reverse();

        Ok(Solution {
            cost,
            states_checked: solver.states_checked(),
            path: trace.iter().map(|c| c.decompress(initial)).collect(),
            moves: labels.into_iter().collect(),
        })
    }

    /// Number of moves, one less than the number of boards.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Boards from the start to the goal.
    pub fn boards(&self) -> impl Iterator<Item = &Board> {
        self.path.iter().rev()
    }
}
