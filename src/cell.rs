use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Integer grid coordinates. `y` grows upwards, matching the server's pixel space.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Add for Cell {
    type Output = Cell;

    fn add(self, other: Cell) -> Cell {
        Cell {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Cell {
    type Output = Cell;

    fn sub(self, other: Cell) -> Cell {
        Cell {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<i32> for Cell {
    type Output = Cell;

    fn mul(self, other: i32) -> Cell {
        Cell {
            x: self.x * other,
            y: self.y * other,
        }
    }
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn normalize(raw: [i32; 2], cell_width: i32) -> Self {
        let cell_width = cell_width.max(1);
        Cell {
            x: raw[0] / cell_width,
            y: raw[1] / cell_width,
        }
    }

    pub fn neighbors(self) -> [Cell; 4] {
        [
            Cell::new(self.x + 1, self.y),
            Cell::new(self.x - 1, self.y),
            Cell::new(self.x, self.y + 1),
            Cell::new(self.x, self.y - 1),
        ]
    }

    pub fn step(self, direction: Direction) -> Cell {
        self.step_by(direction, 1)
    }

    pub fn step_by(self, direction: Direction, multiplier: i32) -> Cell {
        self + direction.offset() * multiplier
    }

    pub fn manhattan(self, other: Cell) -> i32 {
        let delta = self - other;
        delta.x.abs() + delta.y.abs()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn offset(self) -> Cell {
        match self {
            Direction::Up => Cell::new(0, 1),
            Direction::Down => Cell::new(0, -1),
            Direction::Left => Cell::new(-1, 0),
            Direction::Right => Cell::new(1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn sides(self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }

    pub fn between(from: Cell, to: Cell) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&direction| from.step(direction) == to)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}
