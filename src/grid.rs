//! Puzzle loading: the static layout and the full, rendered board.
//!
//! Input format: the first line holds the stone weights in the order the stones
//! appear reading the grid row-major; every following line is one grid row.
//! Rows may be ragged, anything past the end of a row is off the grid.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::position::Position;
use crate::state::Stones;

/// The static part of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Wall,
    Floor,
    Switch,
}

/// A rendered cell: the static tile with the agent or a stone stamped on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    Wall,
    Floor,
    Switch,
    Stone,
    StoneOnSwitch,
    Agent,
    AgentOnSwitch,
}

impl TryFrom<char> for Glyph {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        use Glyph::*;

        match value {
            '#' => Ok(Wall),
            ' ' => Ok(Floor),
            '.' => Ok(Switch),
            '$' => Ok(Stone),
            '*' => Ok(StoneOnSwitch),
            '@' => Ok(Agent),
            '+' => Ok(AgentOnSwitch),
            _ => Err(()),
        }
    }
}

impl From<Glyph> for char {
    fn from(glyph: Glyph) -> char {
        match glyph {
            Glyph::Wall => '#',
            Glyph::Floor => ' ',
            Glyph::Switch => '.',
            Glyph::Stone => '$',
            Glyph::StoneOnSwitch => '*',
            Glyph::Agent => '@',
            Glyph::AgentOnSwitch => '+',
        }
    }
}

impl Glyph {
    pub fn tile(&self) -> Tile {
        match self {
            Glyph::Wall => Tile::Wall,
            Glyph::Floor | Glyph::Stone | Glyph::Agent => Tile::Floor,
            Glyph::Switch | Glyph::StoneOnSwitch | Glyph::AgentOnSwitch => Tile::Switch,
        }
    }

    pub fn stone(on_switch: bool) -> Glyph {
        if on_switch {
            Glyph::StoneOnSwitch
        } else {
            Glyph::Stone
        }
    }

    pub fn agent(on_switch: bool) -> Glyph {
        if on_switch {
            Glyph::AgentOnSwitch
        } else {
            Glyph::Agent
        }
    }

    pub fn empty(on_switch: bool) -> Glyph {
        if on_switch {
            Glyph::Switch
        } else {
            Glyph::Floor
        }
    }
}

/// Why a puzzle failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    MissingHeader,
    InvalidWeight(String),
    WeightCountMismatch { weights: usize, stones: usize },
    MissingAgent,
    MultipleAgents { first: Position, second: Position },
    UnknownGlyph { glyph: char, at: Position },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "missing weight header line"),
            Self::InvalidWeight(value) => write!(f, "invalid stone weight {value:?}"),
            Self::WeightCountMismatch { weights, stones } => {
                write!(f, "header lists {weights} weights but the grid has {stones} stones")
            }
            Self::MissingAgent => write!(f, "no agent on the grid"),
            Self::MultipleAgents { first, second } => write!(
                f,
                "more than one agent: ({}, {}) and ({}, {})",
                first.row, first.col, second.row, second.col
            ),
            Self::UnknownGlyph { glyph, at } => {
                write!(f, "unknown glyph {glyph:?} at ({}, {})", at.row, at.col)
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// The immutable walls, floor and switches of a puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    rows: Vec<Vec<Tile>>,
    width: usize,
    switches: Vec<Position>,
}

impl Layout {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Switch positions in row-major order.
    pub fn switches(&self) -> &[Position] {
        &self.switches
    }

    /// The tile at a position, `None` anywhere off the grid (including past the end of a short row).
    pub fn tile(&self, p: Position) -> Option<Tile> {
        if p.row < 0 || p.col < 0 {
            return None;
        }

        self.rows
            .get(p.row as usize)
            .and_then(|row| row.get(p.col as usize))
            .copied()
    }

    pub fn is_wall(&self, p: Position) -> bool {
        self.tile(p) == Some(Tile::Wall)
    }

    /// Can something stand here (ignoring stones)? Off the grid is blocked.
    pub fn is_open(&self, p: Position) -> bool {
        matches!(self.tile(p), Some(Tile::Floor) | Some(Tile::Switch))
    }

    pub fn is_switch(&self, p: Position) -> bool {
        self.tile(p) == Some(Tile::Switch)
    }

    /// Render the bare layout with nothing stamped on it.
    pub fn glyphs(&self) -> Vec<Vec<Glyph>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|tile| match tile {
                        Tile::Wall => Glyph::Wall,
                        Tile::Floor => Glyph::Floor,
                        Tile::Switch => Glyph::Switch,
                    })
                    .collect()
            })
            .collect()
    }
}

/// A full configuration: agent, stones and a rendered grid snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub agent: Position,
    pub stones: Stones,
    pub switches: Vec<Position>,
    pub grid: Vec<Vec<Glyph>>,
}

impl Board {
    pub fn glyph(&self, p: Position) -> Option<Glyph> {
        if p.row < 0 || p.col < 0 {
            return None;
        }

        self.grid
            .get(p.row as usize)
            .and_then(|row| row.get(p.col as usize))
            .copied()
    }

    pub fn set(&mut self, p: Position, glyph: Glyph) {
        if let Some(cell) = self
            .grid
            .get_mut(p.row as usize)
            .and_then(|row| row.get_mut(p.col as usize))
        {
            *cell = glyph;
        }
    }

    pub fn is_switch(&self, p: Position) -> bool {
        self.switches.contains(&p)
    }

    pub fn is_solved(&self) -> bool {
        self.stones.keys().all(|p| self.is_switch(*p))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in &self.grid {
            let line = row.iter().map(|g| char::from(*g)).collect::<String>();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// A loaded puzzle: its static layout and the starting board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub layout: Layout,
    pub board: Board,
}

impl Puzzle {
    pub fn parse(input: &str) -> Result<Puzzle, FormatError> {
        let mut lines = input.lines();

        let header = lines.next().ok_or(FormatError::MissingHeader)?;
        let weights = header
            .split_whitespace()
            .map(|value| match value.parse::<i64>() {
                Ok(weight) if weight >= 0 => Ok(weight),
                _ => Err(FormatError::InvalidWeight(value.to_string())),
            })
            .collect::<Result<Vec<i64>, FormatError>>()?;

        let mut grid: Vec<Vec<Glyph>> = Vec::new();
        let mut agent: Option<Position> = None;
        let mut stones = Vec::new();
        let mut switches = Vec::new();

        for (row, line) in lines.enumerate() {
            let mut glyphs = Vec::new();

            for (col, c) in line.trim_end().chars().enumerate() {
                let p = Position::new(row as isize, col as isize);
                let glyph = Glyph::try_from(c)
                    .map_err(|_| FormatError::UnknownGlyph { glyph: c, at: p })?;

                match glyph {
                    Glyph::Stone | Glyph::StoneOnSwitch => stones.push(p),
                    Glyph::Agent | Glyph::AgentOnSwitch => {
                        if let Some(first) = agent {
                            return Err(FormatError::MultipleAgents { first, second: p });
                        }
                        agent = Some(p);
                    }
                    _ => {}
                }

                if glyph.tile() == Tile::Switch {
                    switches.push(p);
                }

                glyphs.push(glyph);
            }

            grid.push(glyphs);
        }

        // Trailing blank lines aren't part of the grid
        while grid.last().is_some_and(|row| row.is_empty()) {
            grid.pop();
        }

        if weights.len() != stones.len() {
            return Err(FormatError::WeightCountMismatch {
                weights: weights.len(),
                stones: stones.len(),
            });
        }
        let agent = agent.ok_or(FormatError::MissingAgent)?;

        let layout = Layout {
            rows: grid
                .iter()
                .map(|row| row.iter().map(|g| g.tile()).collect())
                .collect(),
            width: grid.iter().map(|row| row.len()).max().unwrap_or(0),
            switches: switches.clone(),
        };

        let board = Board {
            agent,
            stones: stones.into_iter().zip(weights).collect(),
            switches,
            grid,
        };

        Ok(Puzzle { layout, board })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Puzzle> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read puzzle {}", path.display()))?;

        Puzzle::parse(&input).with_context(|| format!("Failed to load puzzle {}", path.display()))
    }
}

impl FromStr for Puzzle {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Puzzle::parse(s)
    }
}
