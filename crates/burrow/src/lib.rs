//! # Burrow
//!
//! Bounded tile grids for grid-dwelling agent simulations.
//!
//! Burrow stores who occupies which tile of a rectangular world and answers
//! "where is the nearest resource?" without scanning the whole world:
//!
//! - **[`Grid`]**: a flat, bounds-checked array of [`Tile`]s with an origin offset
//! - **[`PartitionedGrid`]**: the world split into fixed-size [`Cell`]s, each a
//!   [`Grid`] plus reverse registries of its occupied tiles
//! - **[`Spiral`]**: a lazy, deterministic ring-by-ring walk around a center
//! - **Searches**: [`spiral_search`] and [`partition_search`], both bounded
//!
//! Every occupancy query is total: coordinates outside the grid yield `None`
//! or a [`PlacementError`], never a panic.
//!
//! ## Quick Start
//!
//! ```
//! use burrow::{Coord, PartitionedGrid, TileStore, partition_search};
//!
//! // 100x100 world split into 10x10 cells, agents are u64 ids, food is u32 nutrition.
//! let mut grid: PartitionedGrid<u64, u32> = PartitionedGrid::new(100, 100, 10, 10).unwrap();
//!
//! grid.insert_agent(Coord::new(5, 5), 1).unwrap();
//! grid.insert_food(Coord::new(7, 6), 25).unwrap();
//!
//! let outcome = partition_search(&grid, Coord::new(5, 5), 1);
//! assert_eq!(outcome.target, Some(Coord::new(7, 6)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod grid;
pub mod hash;
pub mod partition;
pub mod search;
pub mod spiral;
pub mod tile;

// Re-exports for convenience
pub use error::{GridError, PlacementError};
pub use grid::{Grid, TileStore};
pub use hash::{hash_store, hash_tiles_into};
pub use partition::{coord_key, Cell, PartitionedGrid, KEY_STRIDE, MAX_CELL_SIDE};
pub use search::{partition_search, spiral_search, SearchOutcome};
pub use spiral::{ring_offset, ring_len, Spiral};
pub use tile::{Tile, TileKind};

/// Integer grid coordinates.
///
/// Equality and hashing are component-wise, so two coordinates with equal
/// `x` and `y` always land on the same key.
pub type Coord = glam::IVec2;

/// Chebyshev (king-move) distance between two coordinates.
#[must_use]
pub fn chebyshev(a: Coord, b: Coord) -> i32 {
    (a - b).abs().max_element()
}

/// Axis-aligned integer rectangle, half-open on its far edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Inclusive minimum corner
    pub origin: Coord,
    /// Number of columns
    pub width: i32,
    /// Number of rows
    pub height: i32,
}

impl Rect {
    /// Create a rectangle from its origin and size.
    #[must_use]
    pub const fn new(origin: Coord, width: i32, height: i32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Create a rectangle anchored at `(0, 0)`.
    #[must_use]
    pub const fn with_size(width: i32, height: i32) -> Self {
        Self::new(Coord::ZERO, width, height)
    }

    /// Exclusive maximum corner.
    #[must_use]
    pub fn end(&self) -> Coord {
        self.origin + Coord::new(self.width, self.height)
    }

    /// Check if a point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Coord) -> bool {
        point.x >= self.origin.x
            && point.x < self.origin.x + self.width
            && point.y >= self.origin.y
            && point.y < self.origin.y + self.height
    }

    /// Number of tiles covered.
    #[must_use]
    pub fn area(&self) -> usize {
        self.width.max(0) as usize * self.height.max(0) as usize
    }

    /// Largest Chebyshev distance from `center` to any tile of the rectangle.
    ///
    /// A spiral around `center` has visited every tile once it has finished
    /// this ring.
    #[must_use]
    pub fn max_ring_from(&self, center: Coord) -> i32 {
        let end = self.end() - Coord::ONE;
        let dx = (center.x - self.origin.x).abs().max((end.x - center.x).abs());
        let dy = (center.y - self.origin.y).abs().max((end.y - center.y).abs());
        dx.max(dy)
    }

    /// Flat row-major index of `point`, or `None` outside the rectangle.
    #[must_use]
    pub fn index_of(&self, point: Coord) -> Option<usize> {
        if !self.contains(point) {
            return None;
        }
        let local = point - self.origin;
        Some(local.y as usize * self.width as usize + local.x as usize)
    }

    /// Coordinates for a flat row-major index.
    #[must_use]
    pub fn coord_at(&self, index: usize) -> Coord {
        let width = self.width as usize;
        self.origin + Coord::new((index % width) as i32, (index / width) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(Coord::new(10, 20), 5, 3);
        assert!(rect.contains(Coord::new(10, 20)));
        assert!(rect.contains(Coord::new(14, 22)));
        assert!(!rect.contains(Coord::new(15, 22)));
        assert!(!rect.contains(Coord::new(14, 23)));
        assert!(!rect.contains(Coord::new(9, 20)));
    }

    #[test]
    fn test_rect_index_roundtrip() {
        let rect = Rect::new(Coord::new(-2, 3), 4, 6);
        for index in 0..rect.area() {
            assert_eq!(rect.index_of(rect.coord_at(index)), Some(index));
        }
        assert_eq!(rect.index_of(Coord::new(2, 3)), None);
    }

    #[test]
    fn test_max_ring_from() {
        let rect = Rect::with_size(10, 10);
        assert_eq!(rect.max_ring_from(Coord::new(0, 0)), 9);
        assert_eq!(rect.max_ring_from(Coord::new(5, 5)), 5);
        assert_eq!(rect.max_ring_from(Coord::new(4, 4)), 5);
    }

    #[test]
    fn test_distances() {
        let a = Coord::new(1, 2);
        let b = Coord::new(4, -2);
        assert_eq!(chebyshev(a, b), 4);
        assert_eq!(chebyshev(a, a), 0);
    }
}
