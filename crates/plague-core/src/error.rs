//! Error types for the simulation.

use crate::types::Cell;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("Position ({x}, {y}) out of bounds for {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("Capacity exceeded: requested {requested} {cell:?} cells, only {available} available")]
    CapacityExceeded {
        cell: Cell,
        requested: usize,
        available: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
