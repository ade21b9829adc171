//! `WorldView` provides read-only access to world state for decisions.
//!
//! # Immutability
//!
//! A `WorldView` holds only shared references, so:
//! - decisions cannot mutate the grid (they return [`Action`](crate::action::Action)s instead)
//! - any number of decisions can read the same view in parallel
//! - every decision in a tick sees the grid as it was when the tick started
//!
//! # Example
//!
//! ```
//! use burrow::{Coord, PartitionedGrid, TileStore};
//! use gopherlife_core::entity::FoodItem;
//! use gopherlife_core::settings::WorldSettings;
//! use gopherlife_core::world_view::{WorldGrid, WorldView};
//!
//! let mut grid: WorldGrid = PartitionedGrid::new(20, 20, 10, 10).unwrap();
//! grid.insert_food(Coord::new(4, 4), FoodItem::new(10)).unwrap();
//!
//! let settings = WorldSettings::default();
//! let view = WorldView::new(&grid, &settings, 0);
//!
//! assert!(view.has_food(Coord::new(4, 4)));
//! assert_eq!(view.find_food(Coord::new(1, 1)).target, Some(Coord::new(4, 4)));
//! ```

use burrow::{
    partition_search, spiral_search, Coord, PartitionedGrid, Rect, SearchOutcome, Tile, TileStore,
};

use crate::entity::{FoodItem, GopherId};
use crate::settings::{SearchStrategyKind, WorldSettings};

/// The world's occupancy grid.
pub type WorldGrid = PartitionedGrid<GopherId, FoodItem>;

/// Read-only view of a world at the start of a tick.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    grid: &'a WorldGrid,
    settings: &'a WorldSettings,
    tick: u64,
}

impl<'a> WorldView<'a> {
    /// Creates a view over `grid` for `tick`.
    #[must_use]
    pub fn new(grid: &'a WorldGrid, settings: &'a WorldSettings, tick: u64) -> Self {
        Self {
            grid,
            settings,
            tick,
        }
    }

    /// Tick being decided.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// World settings.
    #[must_use]
    pub fn settings(&self) -> &'a WorldSettings {
        self.settings
    }

    /// World bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.grid.bounds()
    }

    /// Tile at `at`, `None` outside the world.
    #[must_use]
    pub fn tile(&self, at: Coord) -> Option<&'a Tile<GopherId, FoodItem>> {
        self.grid.tile(at)
    }

    /// Gopher standing on `at`.
    #[must_use]
    pub fn gopher_at(&self, at: Coord) -> Option<GopherId> {
        self.tile(at).and_then(Tile::agent).copied()
    }

    /// True if `at` holds food.
    #[must_use]
    pub fn has_food(&self, at: Coord) -> bool {
        self.tile(at).is_some_and(Tile::has_food)
    }

    /// True if `at` is inside the world and empty.
    #[must_use]
    pub fn is_vacant(&self, at: Coord) -> bool {
        self.grid.is_vacant(at)
    }

    /// Run the configured food search from `from`.
    #[must_use]
    pub fn find_food(&self, from: Coord) -> SearchOutcome {
        let search = &self.settings.search;
        match search.strategy {
            SearchStrategyKind::Spiral => spiral_search(self.grid, from, search.max_radius),
            SearchStrategyKind::Partition => partition_search(self.grid, from, search.max_rings),
        }
    }
}
