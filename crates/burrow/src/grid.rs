//! Flat, bounds-checked tile grid.
//!
//! [`Grid`] owns a row-major array of [`Tile`]s covering a [`Rect`]. Every
//! operation checks the rectangle first, so a coordinate outside it is a
//! typed miss rather than an out-of-range index.
//!
//! [`TileStore`] is the seam between storage and its users. Searches and the
//! simulation only ever talk to a `TileStore`, which lets a plain [`Grid`] and
//! a [`PartitionedGrid`](crate::PartitionedGrid) stand in for each other.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, PlacementError};
use crate::tile::Tile;
use crate::{Coord, Rect};

/// Occupancy storage for a rectangular world.
///
/// # Invariants
///
/// - `tile(at)` is `Some` iff `bounds().contains(at)`
/// - a rejected insert leaves the existing occupant untouched
/// - mutation happens through `&mut self` only, so shared readers never race
///   a writer
pub trait TileStore<A, F> {
    /// Rectangle covered by this store.
    fn bounds(&self) -> Rect;

    /// Tile at `at`, or `None` outside the bounds.
    fn tile(&self, at: Coord) -> Option<&Tile<A, F>>;

    /// Place an agent on an empty tile.
    ///
    /// # Errors
    ///
    /// [`PlacementError::OutOfBounds`] outside the grid,
    /// [`PlacementError::Occupied`] if the tile is not empty.
    fn insert_agent(&mut self, at: Coord, agent: A) -> Result<(), PlacementError>;

    /// Place a food item on an empty tile.
    ///
    /// # Errors
    ///
    /// [`PlacementError::OutOfBounds`] outside the grid,
    /// [`PlacementError::Occupied`] if the tile is not empty.
    fn insert_food(&mut self, at: Coord, food: F) -> Result<(), PlacementError>;

    /// Take the agent off `at`. `None` if there is no agent there.
    fn remove_agent(&mut self, at: Coord) -> Option<A>;

    /// Take the food off `at`. `None` if there is no food there.
    fn remove_food(&mut self, at: Coord) -> Option<F>;

    /// True if `at` is inside the bounds and empty.
    fn is_vacant(&self, at: Coord) -> bool {
        self.tile(at).is_some_and(Tile::is_empty)
    }
}

/// A rectangular block of tiles.
///
/// # Example
///
/// ```
/// use burrow::{Coord, Grid, Tile, TileStore};
///
/// let mut grid: Grid<u64, u32> = Grid::new(Coord::ZERO, 10, 10).unwrap();
/// grid.insert_agent(Coord::new(1, 2), 42).unwrap();
///
/// assert_eq!(grid.tile(Coord::new(1, 2)), Some(&Tile::Agent(42)));
/// assert_eq!(grid.tile(Coord::new(10, 2)), None);
/// assert!(grid.insert_food(Coord::new(1, 2), 5).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid<A, F> {
    bounds: Rect,
    tiles: Vec<Tile<A, F>>,
    agent_count: usize,
    food_count: usize,
}

impl<A, F> Grid<A, F> {
    /// Create an empty grid covering `width x height` tiles from `origin`.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidDimensions`] if either dimension is not positive.
    pub fn new(origin: Coord, width: i32, height: i32) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let bounds = Rect::new(origin, width, height);
        let tiles = (0..bounds.area()).map(|_| Tile::Empty).collect();
        Ok(Self {
            bounds,
            tiles,
            agent_count: 0,
            food_count: 0,
        })
    }

    /// Number of tiles holding an agent.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agent_count
    }

    /// Number of tiles holding food.
    #[must_use]
    pub fn food_count(&self) -> usize {
        self.food_count
    }

    /// Iterate over occupied tiles in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, &Tile<A, F>)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| !tile.is_empty())
            .map(|(index, tile)| (self.bounds.coord_at(index), tile))
    }

    fn slot_mut(&mut self, at: Coord) -> Result<&mut Tile<A, F>, PlacementError> {
        let index = self
            .bounds
            .index_of(at)
            .ok_or(PlacementError::OutOfBounds(at))?;
        Ok(&mut self.tiles[index])
    }
}

impl<A, F> TileStore<A, F> for Grid<A, F> {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn tile(&self, at: Coord) -> Option<&Tile<A, F>> {
        self.bounds.index_of(at).map(|index| &self.tiles[index])
    }

    fn insert_agent(&mut self, at: Coord, agent: A) -> Result<(), PlacementError> {
        let slot = self.slot_mut(at)?;
        if !slot.is_empty() {
            return Err(PlacementError::Occupied(at));
        }
        *slot = Tile::Agent(agent);
        self.agent_count += 1;
        Ok(())
    }

    fn insert_food(&mut self, at: Coord, food: F) -> Result<(), PlacementError> {
        let slot = self.slot_mut(at)?;
        if !slot.is_empty() {
            return Err(PlacementError::Occupied(at));
        }
        *slot = Tile::Food(food);
        self.food_count += 1;
        Ok(())
    }

    fn remove_agent(&mut self, at: Coord) -> Option<A> {
        let slot = self.slot_mut(at).ok()?;
        if !slot.has_agent() {
            return None;
        }
        match std::mem::take(slot) {
            Tile::Agent(agent) => {
                self.agent_count -= 1;
                Some(agent)
            }
            _ => None,
        }
    }

    fn remove_food(&mut self, at: Coord) -> Option<F> {
        let slot = self.slot_mut(at).ok()?;
        if !slot.has_food() {
            return None;
        }
        match std::mem::take(slot) {
            Tile::Food(food) => {
                self.food_count -= 1;
                Some(food)
            }
            _ => None,
        }
    }
}
