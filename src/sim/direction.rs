//! Slide directions and their scan geometry

use serde::{Deserialize, Serialize};

/// A direction to slide every tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Which coordinate a scan sorts tiles by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
}

/// Order in which tiles are resolved during a move.
///
/// Tiles nearest the destination wall come first so that a later tile can
/// never slide past a cell an earlier tile is still going to occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOrder {
    pub axis: Axis,
    pub ascending: bool,
}

/// Step vector and scan order for one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    /// (d_row, d_col) unit step
    pub step: (isize, isize),
    pub order: ScanOrder,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Map this direction to its step vector and scan order
    pub const fn motion(self) -> Motion {
        match self {
            Direction::Up => Motion {
                step: (-1, 0),
                order: ScanOrder { axis: Axis::Row, ascending: true },
            },
            Direction::Down => Motion {
                step: (1, 0),
                order: ScanOrder { axis: Axis::Row, ascending: false },
            },
            Direction::Left => Motion {
                step: (0, -1),
                order: ScanOrder { axis: Axis::Col, ascending: true },
            },
            Direction::Right => Motion {
                step: (0, 1),
                order: ScanOrder { axis: Axis::Col, ascending: false },
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parse a direction name. Unrecognized names yield `None`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }
}
