//! Runs a puzzle through each strategy, timing it and measuring memory on the way.

use std::fmt;
use std::time::Instant;

use derive_builder::Builder;
use serde::Serialize;

use crate::engine::{Engine, Outcome};
use crate::grid::{Board, Puzzle};
use crate::SearchMode;

#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct HarnessConfig {
    /// Strategies to run, in order.
    pub modes: Vec<SearchMode>,
    /// Give up on a strategy once it has checked this many states.
    pub max_states: Option<usize>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            modes: SearchMode::all().to_vec(),
            max_states: None,
        }
    }
}

/// One strategy's result on one puzzle.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub algorithm: &'static str,
    pub outcome: Outcome,
    pub steps: usize,
    pub weight: i64,
    pub nodes: usize,
    pub time_ms: f64,
    pub memory_mb: f64,
    pub moves: String,
    /// Boards of the solution from the start to the goal.
    #[serde(skip)]
    pub boards: Vec<Board>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.algorithm)?;
        writeln!(
            f,
            "Steps: {}, Weight: {}, Node: {}, Time (ms): {:.2}, Memory (MB): {:.2}",
            self.steps, self.weight, self.nodes, self.time_ms, self.memory_mb
        )?;

        match self.outcome {
            Outcome::Solved => write!(f, "{}", self.moves),
            Outcome::Unsolvable => write!(f, "no solution"),
            Outcome::OverBudget => write!(f, "no solution within budget"),
        }
    }
}

/// Solve `puzzle` once per configured strategy.
///
/// A strategy that fails outright is logged and left out of the reports.
pub fn run(puzzle: &Puzzle, config: &HarnessConfig) -> Vec<Report> {
    let mut reports = Vec::with_capacity(config.modes.len());

    for mode in &config.modes {
        let mut engine = Engine::new(puzzle.clone(), *mode);

        let memory_before = peak_memory_kb();
        let start = Instant::now();
        let outcome = engine.solve_within(config.max_states);
        let time_ms = start.elapsed().as_secs_f64() * 1000.0;
        let memory_kb = peak_memory_kb().saturating_sub(memory_before);

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("{mode} search failed: {err:#}");
                continue;
            }
        };

        reports.push(Report {
            algorithm: mode.name(),
            outcome,
            steps: engine.steps(),
            weight: engine.cost(),
            nodes: engine.states_checked(),
            time_ms,
            memory_mb: memory_kb as f64 / 1024.0,
            moves: engine.moves().to_string(),
            boards: engine
                .solution()
                .map(|s| s.boards().cloned().collect())
                .unwrap_or_default(),
        });
    }

    reports
}

// Peak resident set size of this process in kB, 0 where /proc isn't available
fn peak_memory_kb() -> u64 {
    let Ok(status) = std::fs::read_to_string("/proc/self/status") else {
        return 0;
    };

    status
        .lines()
        .find_map(|line| line.strip_prefix("VmHWM:"))
        .and_then(|value| value.split_whitespace().next())
        .and_then(|kb| kb.parse().ok())
        .unwrap_or(0)
}
