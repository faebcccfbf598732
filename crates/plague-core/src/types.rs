//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D position in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether this position lies on the outermost ring of a grid
    pub fn is_border(&self, width: i32, height: i32) -> bool {
        self.x == 0 || self.y == 0 || self.x == width - 1 || self.y == height - 1
    }
}

/// Contents of a single grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// No organism present
    #[default]
    Empty,
    /// Living, uninfected organism
    Healthy,
    /// Living organism carrying the infection
    Infected,
}

impl Cell {
    /// True for any living organism
    pub fn is_occupied(&self) -> bool {
        *self != Cell::Empty
    }

    /// Single character used by text frames
    pub fn glyph(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Healthy => 'o',
            Cell::Infected => 'x',
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}
