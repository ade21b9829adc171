//! Error types for grid construction and tile placement.

use thiserror::Error;

use crate::Coord;

/// Errors raised while building a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height is zero or negative.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions {
        /// Requested width
        width: i32,
        /// Requested height
        height: i32,
    },

    /// Partition cells must be positive and no larger than the key stride.
    #[error("cell size {width}x{height} is outside 1..={max}")]
    InvalidCellSize {
        /// Requested cell width
        width: i32,
        /// Requested cell height
        height: i32,
        /// Largest supported cell dimension
        max: i32,
    },
}

/// Why an insert was rejected.
///
/// Both variants are recoverable: callers pick another tile and retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// The coordinate lies outside the grid.
    #[error("{0} is outside the grid")]
    OutOfBounds(Coord),

    /// The tile already holds an occupant.
    #[error("{0} is already occupied")]
    Occupied(Coord),
}

impl PlacementError {
    /// Coordinate the insert was aimed at.
    #[must_use]
    pub fn coord(&self) -> Coord {
        match self {
            Self::OutOfBounds(at) | Self::Occupied(at) => *at,
        }
    }
}
