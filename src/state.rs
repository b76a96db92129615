//! The compressed configuration the search runs on, and the moves between them.

use std::fmt;

use anyhow::{anyhow, Result};
use im::OrdMap;

use crate::deadlock;
use crate::direction::Direction;
use crate::grid::{Board, Glyph, Layout};
use crate::heuristic;
use crate::position::Position;
use crate::{Estimate, State};

/// Stone positions mapped to their weights.
///
/// A persistent map so that a move copies the map structurally instead of cloning every entry.
pub type Stones = OrdMap<Position, i64>;

/// Agent position plus stones; the switch set lives in the shared [`Layout`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Config {
    pub agent: Position,
    pub stones: Stones,
}

/// A single move of the agent, remembering whether it pushed a stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    pub direction: Direction,
    pub push: bool,
}

impl Step {
    /// Recover the step taken between two consecutive configurations.
    pub fn between(prev: &Config, next: &Config) -> Option<Step> {
        let direction = Direction::try_from(next.agent - prev.agent).ok()?;

        Some(Step {
            direction,
            push: prev.stones.contains_key(&next.agent),
        })
    }

    pub fn label(&self) -> char {
        self.direction.label(self.push)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Weight pushed going from `prev` to `next`, 0 for a plain step.
pub fn step_cost(prev: &Config, next: &Config) -> i64 {
    prev.stones.get(&next.agent).copied().unwrap_or(0)
}

impl Config {
    pub fn compress(board: &Board) -> Config {
        Config {
            agent: board.agent,
            stones: board.stones.clone(),
        }
    }

    /// Rebuild a full board, using `reference` for the layout and to know which cells to clear.
    pub fn decompress(&self, reference: &Board) -> Board {
        let mut board = reference.clone();
        board.agent = self.agent;
        board.stones = self.stones.clone();

        for p in reference.stones.keys() {
            board.set(*p, Glyph::empty(reference.is_switch(*p)));
        }
        board.set(reference.agent, Glyph::empty(reference.is_switch(reference.agent)));

        for p in self.stones.keys() {
            board.set(*p, Glyph::stone(reference.is_switch(*p)));
        }
        board.set(self.agent, Glyph::agent(reference.is_switch(self.agent)));

        board
    }

    pub fn has_stone(&self, p: Position) -> bool {
        self.stones.contains_key(&p)
    }

    fn is_free(&self, layout: &Layout, p: Position) -> bool {
        layout.is_open(p) && !self.has_stone(p)
    }

    pub fn can_move(&self, layout: &Layout, direction: Direction) -> bool {
        let delta: Position = direction.into();
        let target = self.agent + delta;

        if self.is_free(layout, target) {
            return true;
        }

        self.has_stone(target) && self.is_free(layout, target + delta)
    }

    /// Move the agent one cell, pushing a stone if there is one. Assumes [`Config::can_move`].
    pub fn apply_move(&self, direction: Direction) -> Config {
        let delta: Position = direction.into();
        let mut next = self.clone();
        next.agent = self.agent + delta;

        if let Some(weight) = next.stones.remove(&next.agent) {
            next.stones.insert(next.agent + delta, weight);
        }

        next
    }

    /// Replay a move string from this configuration, checking each move is legal.
    pub fn replay(&self, layout: &Layout, moves: &str) -> Result<Config> {
        let mut current = self.clone();

        for (i, c) in moves.chars().enumerate() {
            let direction = Direction::try_from(c)?;
            if !current.can_move(layout, direction) {
                return Err(anyhow!("Move {i} ({c}) is blocked"));
            }

            let next = current.apply_move(direction);
            let step = Step::between(&current, &next)
                .ok_or_else(|| anyhow!("Move {i} ({c}) is not a single step"))?;
            if step.label() != c {
                return Err(anyhow!("Move {i} is labeled {c} but is actually {step}"));
            }

            current = next;
        }

        Ok(current)
    }

    pub fn is_goal(&self, layout: &Layout) -> bool {
        self.stones.keys().all(|p| layout.is_switch(*p))
    }
}

impl State<Layout, Step> for Config {
    fn next_states(&self, layout: &Layout) -> Option<Vec<(i64, Step, Config)>> {
        let mut next_states = Vec::new();

        for direction in Direction::all() {
            if !self.can_move(layout, direction) {
                continue;
            }

            let next = self.apply_move(direction);
            let step = Step {
                direction,
                push: self.has_stone(next.agent),
            };
            next_states.push((step_cost(self, &next), step, next));
        }

        if next_states.is_empty() {
            None
        } else {
            Some(next_states)
        }
    }

    fn is_valid(&self, layout: &Layout) -> bool {
        !deadlock::is_deadlocked(self, layout)
    }

    fn is_solved(&self, layout: &Layout) -> bool {
        self.is_goal(layout)
    }

    fn heuristic(&self, layout: &Layout) -> Estimate {
        heuristic::estimate(self, layout)
    }

    fn stringify(&self, layout: &Layout) -> String {
        let mut grid = layout.glyphs();
        let mut stamp = |p: Position, glyph: Glyph| {
            if let Some(cell) = grid
                .get_mut(p.row as usize)
                .and_then(|row| row.get_mut(p.col as usize))
            {
                *cell = glyph;
            }
        };

        for p in self.stones.keys() {
            stamp(*p, Glyph::stone(layout.is_switch(*p)));
        }
        stamp(self.agent, Glyph::agent(layout.is_switch(self.agent)));

        let mut output = String::new();
        for row in grid {
            output.extend(row.into_iter().map(char::from));
            output.push('\n');
        }
        output
    }
}
