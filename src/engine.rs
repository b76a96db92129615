//! One puzzle solved with one strategy.

use anyhow::Result;

use crate::grid::{Board, Puzzle};
use crate::solution::Solution;
use crate::state::Config;
use crate::{SearchMode, Solver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Outcome {
    Solved,
    /// The whole reachable space was searched without finding a goal.
    Unsolvable,
    /// The state budget ran out first; the puzzle may still be solvable.
    OverBudget,
}

pub struct Engine {
    puzzle: Puzzle,
    mode: SearchMode,
    solution: Option<Solution>,
    states_checked: usize,
}

impl Engine {
    pub fn new(puzzle: Puzzle, mode: SearchMode) -> Engine {
        Engine {
            puzzle,
            mode,
            solution: None,
            states_checked: 0,
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Search without a budget, `true` if a solution was found.
    pub fn solve(&mut self) -> bool {
        match self.solve_within(None) {
            Ok(outcome) => outcome == Outcome::Solved,
            Err(err) => {
                log::error!("{} search failed: {err:#}", self.mode);
                false
            }
        }
    }

    /// Search, giving up once more than `max_states` states have been checked.
    pub fn solve_within(&mut self, max_states: Option<usize>) -> Result<Outcome> {
        let initial = Config::compress(&self.puzzle.board);
        let mut solver = Solver::new(self.puzzle.layout.clone(), initial);
        solver.set_mode(self.mode);

        self.solution = None;
        let mut over_budget = false;

        while solver.next().is_some() {
            if max_states.is_some_and(|max| solver.states_checked() > max) {
                over_budget = true;
                break;
            }
        }
        self.states_checked = solver.states_checked();
        log::debug!(
            "{}: {} deadlocked states pruned",
            self.mode,
            solver.states_invalidated()
        );

        // A goal found on the very last expansion still counts
        let outcome = match solver.get_solution() {
            Some(goal) => {
                let solution = Solution::reconstruct(&solver, &goal, &self.puzzle.board)?;
                log::info!(
                    "{}: solved with cost {} in {} moves, {}",
                    self.mode,
                    solution.cost,
                    solution.steps(),
                    solver
                );
                self.solution = Some(solution);
                Outcome::Solved
            }
            None if over_budget => {
                log::info!("{}: gave up, {}", self.mode, solver);
                Outcome::OverBudget
            }
            None => {
                log::info!("{}: no solution, {}", self.mode, solver);
                Outcome::Unsolvable
            }
        };

        Ok(outcome)
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Total weight pushed by the solution, 0 if there is none.
    pub fn cost(&self) -> i64 {
        self.solution.as_ref().map_or(0, |s| s.cost)
    }

    pub fn states_checked(&self) -> usize {
        self.states_checked
    }

    /// Boards of the solution, goal first.
    pub fn path(&self) -> &[Board] {
        match &self.solution {
            Some(solution) => &solution.path,
            None => &[],
        }
    }

    pub fn moves(&self) -> &str {
        self.solution.as_ref().map_or("", |s| s.moves.as_str())
    }

    pub fn steps(&self) -> usize {
        self.solution.as_ref().map_or(0, |s| s.steps())
    }
}
