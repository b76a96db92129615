use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: isize,
    pub col: isize,
}

impl Position {
    pub const fn new(row: isize, col: isize) -> Position {
        Position { row, col }
    }

    pub fn manhattan_distance(&self, other: Position) -> i64 {
        ((self.row - other.row).abs() + (self.col - other.col).abs()) as i64
    }
}

impl From<(isize, isize)> for Position {
    fn from((row, col): (isize, isize)) -> Position {
        Position { row, col }
    }
}

impl Add<Position> for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position {
            row: self.row + other.row,
            col: self.col + other.col,
        }
    }
}

impl Sub<Position> for Position {
    type Output = Position;

    fn sub(self, other: Position) -> Position {
        Position {
            row: self.row - other.row,
            col: self.col - other.col,
        }
    }
}

impl Mul<isize> for Position {
    type Output = Position;

    fn mul(self, other: isize) -> Position {
        Position {
            row: self.row * other,
            col: self.col * other,
        }
    }
}

#[cfg(test)]
mod test_position {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        let a = Position::new(1, 1);
        let b = Position::new(4, -1);

        assert_eq!(a.manhattan_distance(b), 5);
        assert_eq!(b.manhattan_distance(a), 5);
        assert_eq!(a.manhattan_distance(a), 0);
    }

    #[test]
    fn test_arithmetic() {
        let a = Position::new(2, 3);
        let step = Position::new(0, -1);

        assert_eq!(a + step, Position::new(2, 2));
        assert_eq!(a + step * 2, Position::new(2, 1));
        assert_eq!((a + step) - a, step);
    }
}
