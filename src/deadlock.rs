//! Local patterns that prove a configuration can no longer be solved.
//!
//! Only stones off a switch are checked. Every pattern is a certain deadlock, but plenty of
//! deadlocks match none of them, so a `false` never means the configuration is solvable.
//!
//! Offsets are (row, col); walls come from the layout (off the grid is not a wall), stones come
//! from the configuration.

use crate::grid::Layout;
use crate::position::Position;
use crate::state::Config;

type Offset = (isize, isize);

const N: Offset = (-1, 0);
const S: Offset = (1, 0);
const W: Offset = (0, -1);
const E: Offset = (0, 1);
const NW: Offset = (-1, -1);
const NE: Offset = (-1, 1);
const SW: Offset = (1, -1);
const SE: Offset = (1, 1);

// Two walls at right angles: the stone sits in a corner
const CORNERS: [[Offset; 2]; 4] = [[N, W], [W, S], [S, E], [E, N]];

// Three consecutive cells around one corner all blocked by walls or stones
const FROZEN_BLOCKS: [[Offset; 3]; 4] = [[N, NW, W], [W, SW, S], [S, SE, E], [E, NE, N]];

// Wall, stone, wall: a neighbor stone pinned together with this one
const BRACKETS: [[Offset; 3]; 8] = [
    [SE, E, N],
    [NE, N, W],
    [NW, W, S],
    [SW, S, E],
    [E, N, NW],
    [N, W, SW],
    [W, S, SE],
    [S, E, NE],
];

// Wall, stone, stone, wall: two neighbor stones closing a pocket between two walls
const POCKETS: [[Offset; 4]; 4] = [
    [SE, E, N, NW],
    [NE, N, W, SW],
    [NW, W, S, SE],
    [SW, S, E, NE],
];

struct Neighborhood<'a> {
    layout: &'a Layout,
    config: &'a Config,
    center: Position,
}

impl Neighborhood<'_> {
    fn at(&self, (row, col): Offset) -> Position {
        self.center + Position::new(row, col)
    }

    fn wall(&self, offset: Offset) -> bool {
        self.layout.is_wall(self.at(offset))
    }

    fn stone(&self, offset: Offset) -> bool {
        self.config.has_stone(self.at(offset))
    }

    fn blocked(&self, offset: Offset) -> bool {
        self.wall(offset) || self.stone(offset)
    }

    fn is_stuck(&self) -> bool {
        if CORNERS.iter().any(|[a, b]| self.wall(*a) && self.wall(*b)) {
            log::trace!("corner at {:?}", self.center);
            return true;
        }

        if FROZEN_BLOCKS
            .iter()
            .any(|block| block.iter().all(|offset| self.blocked(*offset)))
        {
            log::trace!("frozen block at {:?}", self.center);
            return true;
        }

        if BRACKETS
            .iter()
            .any(|[wall_a, stone, wall_b]| {
                self.wall(*wall_a) && self.stone(*stone) && self.wall(*wall_b)
            })
        {
            log::trace!("bracket at {:?}", self.center);
            return true;
        }

        if POCKETS.iter().any(|[wall_a, stone_a, stone_b, wall_b]| {
            self.stone(*stone_a) && self.stone(*stone_b) && self.wall(*wall_a) && self.wall(*wall_b)
        }) {
            log::trace!("pocket at {:?}", self.center);
            return true;
        }

        false
    }
}

/// Is any stone that isn't on a switch provably stuck?
pub fn is_deadlocked(config: &Config, layout: &Layout) -> bool {
    config
        .stones
        .keys()
        .filter(|p| !layout.is_switch(**p))
        .any(|p| {
            Neighborhood {
                layout,
                config,
                center: *p,
            }
            .is_stuck()
        })
}
