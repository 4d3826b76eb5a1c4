//! # Hex Grid Geometry
//!
//! Axial coordinates for the hexagonal grid the hive lives on, plus a height
//! component for bugs stacked on top of the hive. Hexagons use the
//! "pointy-top" orientation, so the six neighbours of a cell are NE, E, SE,
//! SW, W and NW.
//!
//! ## Coordinate System
//! A position is `(q, r, h)`: `q` and `r` are the two axial hex axes (the
//! third cube coordinate `-q-r` is implicit), `h` is the stack index with
//! `h = 0` being the ground plane. See
//! <https://www.redblobgames.com/grids/hexagons/#coordinates-axial>.

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// A position on (or above) the hex grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub q: i8,
    pub r: i8,
    pub h: i8,
}

impl Position {
    /// The first-move anchor at the centre of the board.
    pub const ORIGIN: Position = Position::new(0, 0, 0);

    /// Sentinel for a tile that is not in play. Kept as a real value (rather
    /// than an `Option`) because it participates in position arithmetic and
    /// can never collide with an on-board position (`h >= 0`).
    pub const NULL: Position = Position::new(0, 0, -1);

    pub const fn new(q: i8, r: i8, h: i8) -> Self {
        Self { q, r, h }
    }

    /// Hex (cube) distance to another position, ignoring height.
    pub fn distance_to(self, other: Position) -> i32 {
        let dq = i32::from(self.q) - i32::from(other.q);
        let dr = i32::from(self.r) - i32::from(other.r);
        (dq.abs() + (dq + dr).abs() + dr.abs()) / 2
    }

    /// All six cardinal neighbours, at this position's height.
    pub fn neighbours(self) -> [Position; 6] {
        [
            Position::new(self.q + 1, self.r - 1, self.h),
            Position::new(self.q + 1, self.r, self.h),
            Position::new(self.q, self.r + 1, self.h),
            Position::new(self.q - 1, self.r + 1, self.h),
            Position::new(self.q - 1, self.r, self.h),
            Position::new(self.q, self.r - 1, self.h),
        ]
    }

    /// The neighbour one step in `dir`.
    pub fn neighbour(self, dir: Direction) -> Position {
        self + dir.offset()
    }

    /// This position projected down to the ground plane (`h = 0`).
    pub fn grounded(self) -> Position {
        Position::new(self.q, self.r, 0)
    }

    pub fn is_in_play(self) -> bool {
        self != Position::NULL
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.q + rhs.q, self.r + rhs.r, self.h + rhs.h)
    }
}

impl AddAssign for Position {
    fn add_assign(&mut self, rhs: Position) {
        *self = *self + rhs;
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.q - rhs.q, self.r - rhs.r, self.h - rhs.h)
    }
}

/// The six cardinal directions, starting at the top-right neighbour and
/// rotating clockwise, plus `Above` for climbing on top of the hive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    NE = 0,
    E,
    SE,
    SW,
    W,
    NW,
    Above,
}

/// Number of move directions including `Above`.
pub const NUM_DIRECTIONS: usize = 7;

impl Direction {
    /// The six in-plane directions, in enum order.
    pub const CARDINALS: [Direction; 6] = [
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// The offset one step in this direction adds to a position.
    pub fn offset(self) -> Position {
        match self {
            Direction::NE => Position::new(1, -1, 0),
            Direction::E => Position::new(1, 0, 0),
            Direction::SE => Position::new(0, 1, 0),
            Direction::SW => Position::new(-1, 1, 0),
            Direction::W => Position::new(-1, 0, 0),
            Direction::NW => Position::new(0, -1, 0),
            Direction::Above => Position::new(0, 0, 1),
        }
    }

    /// The direction pointing the opposite way. Cardinals only.
    pub fn opposite(self) -> Direction {
        debug_assert!(self != Direction::Above);
        Self::CARDINALS[(self as usize + 3) % 6]
    }

    /// The next cardinal direction, rotating clockwise.
    pub fn clockwise(self) -> Direction {
        debug_assert!(self != Direction::Above);
        Self::CARDINALS[(self as usize + 1) % 6]
    }

    /// The next cardinal direction, rotating counter-clockwise.
    pub fn counter_clockwise(self) -> Direction {
        debug_assert!(self != Direction::Above);
        Self::CARDINALS[(self as usize + 5) % 6]
    }

    pub fn from_index(index: u8) -> Option<Direction> {
        match index {
            0 => Some(Direction::NE),
            1 => Some(Direction::E),
            2 => Some(Direction::SE),
            3 => Some(Direction::SW),
            4 => Some(Direction::W),
            5 => Some(Direction::NW),
            6 => Some(Direction::Above),
            _ => None,
        }
    }
}
