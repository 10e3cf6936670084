//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Occupant of a single grid cell.
///
/// Agents carry no identity beyond their color; a white/vacant cell in the
/// classic presentation maps to `Vacant` here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    Vacant,
    Red,
    Blue,
}

impl CellState {
    pub fn is_vacant(&self) -> bool {
        matches!(self, Self::Vacant)
    }
}

/// One 2-dimensional grid location (row, col)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridLocation {
    pub row: usize,
    pub col: usize,
}

impl GridLocation {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}
