use anyhow::{anyhow, Result};

use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl From<Direction> for Position {
    fn from(direction: Direction) -> Position {
        match direction {
            Direction::Up => Position { row: -1, col: 0 },
            Direction::Down => Position { row: 1, col: 0 },
            Direction::Left => Position { row: 0, col: -1 },
            Direction::Right => Position { row: 0, col: 1 },
        }
    }
}

impl TryFrom<Position> for Direction {
    type Error = anyhow::Error;

    fn try_from(delta: Position) -> Result<Self> {
        match delta {
            Position { row: -1, col: 0 } => Ok(Direction::Up),
            Position { row: 1, col: 0 } => Ok(Direction::Down),
            Position { row: 0, col: -1 } => Ok(Direction::Left),
            Position { row: 0, col: 1 } => Ok(Direction::Right),
            _ => Err(anyhow!("Not a single step: {delta:?}")),
        }
    }
}

impl TryFrom<char> for Direction {
    type Error = anyhow::Error;

    fn try_from(value: char) -> Result<Self> {
        match value {
            'U' | 'u' => Ok(Direction::Up),
            'D' | 'd' => Ok(Direction::Down),
            'L' | 'l' => Ok(Direction::Left),
            'R' | 'r' => Ok(Direction::Right),
            _ => Err(anyhow!("Invalid direction: {value}")),
        }
    }
}

impl Direction {
    // Order matters: successors are generated (and so ties are broken) in this order
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Right,
        ]
    }

    pub fn flip(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The move label for a step in this direction, uppercase for a push.
    pub fn label(&self, push: bool) -> char {
        let c = match self {
            Direction::Up => 'u',
            Direction::Down => 'd',
            Direction::Left => 'l',
            Direction::Right => 'r',
        };

        if push {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}
