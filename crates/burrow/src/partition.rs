//! Partitioned grid with per-cell occupancy registries.
//!
//! The world is divided into fixed-size [`Cell`]s. Each cell is an
//! independent [`Grid`] plus two reverse registries (agents and food) keyed by
//! [`coord_key`] of the tile's cell-local coordinates. The registries let a
//! search enumerate the occupied tiles of a cell without scanning the cell.
//!
//! # Registry Invariant
//!
//! A location is in a cell's agent registry iff its tile holds an agent, and
//! in the food registry iff its tile holds food. Every insert and remove goes
//! through [`Cell`], which updates tile and registry together.
//!
//! # Layout
//!
//! Global coordinate `(x, y)` lives in cell `(x / cell_width, y / cell_height)`.
//! Cells on the far edges are clipped to the world, so no cell covers tiles
//! outside it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, PlacementError};
use crate::grid::{Grid, TileStore};
use crate::tile::Tile;
use crate::{Coord, Rect};

/// Multiplier for registry keys. Prime, and larger than any allowed cell side.
pub const KEY_STRIDE: u64 = 65_537;

/// Largest supported cell width or height.
pub const MAX_CELL_SIDE: i32 = 65_536;

/// Registry key for cell-local coordinates: `x * KEY_STRIDE + y`.
///
/// Collision-free for `0 <= x, y < KEY_STRIDE`, and ordering keys orders
/// locations column-major, which fixes the registry scan order.
///
/// ```
/// use burrow::{coord_key, Coord, KEY_STRIDE};
///
/// assert_eq!(coord_key(Coord::new(0, 3)), 3);
/// assert_eq!(coord_key(Coord::new(2, 1)), 2 * KEY_STRIDE + 1);
/// ```
#[must_use]
pub fn coord_key(local: Coord) -> u64 {
    debug_assert!(local.x >= 0 && local.y >= 0, "registry keys need local coordinates");
    local.x as u64 * KEY_STRIDE + local.y as u64
}

/// One partition of the world: a grid and the registries of its occupants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell<A, F> {
    grid: Grid<A, F>,
    agents: BTreeMap<u64, Coord>,
    food: BTreeMap<u64, Coord>,
}

impl<A, F> Cell<A, F> {
    /// Create an empty cell covering `bounds`.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidDimensions`] for an empty rectangle.
    pub fn new(bounds: Rect) -> Result<Self, GridError> {
        Ok(Self {
            grid: Grid::new(bounds.origin, bounds.width, bounds.height)?,
            agents: BTreeMap::new(),
            food: BTreeMap::new(),
        })
    }

    /// Top-left corner in global coordinates.
    #[must_use]
    pub fn origin(&self) -> Coord {
        self.grid.bounds().origin
    }

    /// Convert a global coordinate into this cell's local space.
    #[must_use]
    pub fn to_local(&self, at: Coord) -> Coord {
        at - self.origin()
    }

    /// The cell's tile grid.
    #[must_use]
    pub fn grid(&self) -> &Grid<A, F> {
        &self.grid
    }

    /// Global coordinates of agent-occupied tiles, in registry key order.
    pub fn agent_locations(&self) -> impl Iterator<Item = Coord> + '_ {
        self.agents.values().copied()
    }

    /// Global coordinates of food-occupied tiles, in registry key order.
    pub fn food_locations(&self) -> impl Iterator<Item = Coord> + '_ {
        self.food.values().copied()
    }

    /// Number of registered agents.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Number of registered food items.
    #[must_use]
    pub fn food_count(&self) -> usize {
        self.food.len()
    }

    fn key(&self, at: Coord) -> u64 {
        coord_key(self.to_local(at))
    }
}

impl<A, F> TileStore<A, F> for Cell<A, F> {
    fn bounds(&self) -> Rect {
        self.grid.bounds()
    }

    fn tile(&self, at: Coord) -> Option<&Tile<A, F>> {
        self.grid.tile(at)
    }

    fn insert_agent(&mut self, at: Coord, agent: A) -> Result<(), PlacementError> {
        self.grid.insert_agent(at, agent)?;
        self.agents.insert(self.key(at), at);
        Ok(())
    }

    fn insert_food(&mut self, at: Coord, food: F) -> Result<(), PlacementError> {
        self.grid.insert_food(at, food)?;
        self.food.insert(self.key(at), at);
        Ok(())
    }

    fn remove_agent(&mut self, at: Coord) -> Option<A> {
        let agent = self.grid.remove_agent(at)?;
        let key = self.key(at);
        self.agents.remove(&key);
        Some(agent)
    }

    fn remove_food(&mut self, at: Coord) -> Option<F> {
        let food = self.grid.remove_food(at)?;
        let key = self.key(at);
        self.food.remove(&key);
        Some(food)
    }
}

/// A world split into equally sized cells.
///
/// # Example
///
/// ```
/// use burrow::{Coord, PartitionedGrid, TileStore};
///
/// let mut grid: PartitionedGrid<u64, u32> = PartitionedGrid::new(30, 20, 10, 10).unwrap();
/// assert_eq!(grid.cell_columns(), 3);
/// assert_eq!(grid.cell_rows(), 2);
///
/// grid.insert_food(Coord::new(25, 15), 8).unwrap();
/// let cell = grid.cell_for(Coord::new(25, 15)).unwrap();
/// assert_eq!(cell.origin(), Coord::new(20, 10));
/// assert_eq!(cell.food_locations().collect::<Vec<_>>(), vec![Coord::new(25, 15)]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionedGrid<A, F> {
    bounds: Rect,
    cell_width: i32,
    cell_height: i32,
    columns: i32,
    rows: i32,
    /// Row-major by cell coordinate.
    cells: Vec<Cell<A, F>>,
}

impl<A, F> PartitionedGrid<A, F> {
    /// Create an empty `width x height` world anchored at the origin, split
    /// into `cell_width x cell_height` cells.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidDimensions`] for an empty world,
    /// [`GridError::InvalidCellSize`] for cells that are empty or wider than
    /// [`MAX_CELL_SIDE`].
    pub fn new(
        width: i32,
        height: i32,
        cell_width: i32,
        cell_height: i32,
    ) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let valid_side = |side: i32| (1..=MAX_CELL_SIDE).contains(&side);
        if !valid_side(cell_width) || !valid_side(cell_height) {
            return Err(GridError::InvalidCellSize {
                width: cell_width,
                height: cell_height,
                max: MAX_CELL_SIDE,
            });
        }

        let columns = (width + cell_width - 1) / cell_width;
        let rows = (height + cell_height - 1) / cell_height;

        let mut cells = Vec::with_capacity(columns as usize * rows as usize);
        for row in 0..rows {
            for column in 0..columns {
                let origin = Coord::new(column * cell_width, row * cell_height);
                let w = cell_width.min(width - origin.x);
                let h = cell_height.min(height - origin.y);
                cells.push(Cell::new(Rect::new(origin, w, h))?);
            }
        }

        tracing::debug!(width, height, columns, rows, "built partitioned grid");

        Ok(Self {
            bounds: Rect::with_size(width, height),
            cell_width,
            cell_height,
            columns,
            rows,
            cells,
        })
    }

    /// Number of cell columns.
    #[must_use]
    pub fn cell_columns(&self) -> i32 {
        self.columns
    }

    /// Number of cell rows.
    #[must_use]
    pub fn cell_rows(&self) -> i32 {
        self.rows
    }

    /// Cell coordinate containing global coordinate `at`.
    #[must_use]
    pub fn cell_coord_of(&self, at: Coord) -> Option<Coord> {
        self.bounds
            .contains(at)
            .then(|| Coord::new(at.x / self.cell_width, at.y / self.cell_height))
    }

    /// Cell at cell coordinate `cell`.
    #[must_use]
    pub fn cell_at(&self, cell: Coord) -> Option<&Cell<A, F>> {
        let index = self.cell_index(cell)?;
        Some(&self.cells[index])
    }

    /// Cell owning global coordinate `at`.
    #[must_use]
    pub fn cell_for(&self, at: Coord) -> Option<&Cell<A, F>> {
        self.cell_at(self.cell_coord_of(at)?)
    }

    /// All cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = &Cell<A, F>> + '_ {
        self.cells.iter()
    }

    /// Total agents across all cells.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.cells.iter().map(Cell::agent_count).sum()
    }

    /// Total food items across all cells.
    #[must_use]
    pub fn food_count(&self) -> usize {
        self.cells.iter().map(Cell::food_count).sum()
    }

    fn cell_index(&self, cell: Coord) -> Option<usize> {
        Rect::with_size(self.columns, self.rows).index_of(cell)
    }

    fn cell_for_mut(&mut self, at: Coord) -> Option<&mut Cell<A, F>> {
        let index = self.cell_index(self.cell_coord_of(at)?)?;
        Some(&mut self.cells[index])
    }
}

impl<A, F> TileStore<A, F> for PartitionedGrid<A, F> {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn tile(&self, at: Coord) -> Option<&Tile<A, F>> {
        self.cell_for(at)?.tile(at)
    }

    fn insert_agent(&mut self, at: Coord, agent: A) -> Result<(), PlacementError> {
        self.cell_for_mut(at)
            .ok_or(PlacementError::OutOfBounds(at))?
            .insert_agent(at, agent)
    }

    fn insert_food(&mut self, at: Coord, food: F) -> Result<(), PlacementError> {
        self.cell_for_mut(at)
            .ok_or(PlacementError::OutOfBounds(at))?
            .insert_food(at, food)
    }

    fn remove_agent(&mut self, at: Coord) -> Option<A> {
        self.cell_for_mut(at)?.remove_agent(at)
    }

    fn remove_food(&mut self, at: Coord) -> Option<F> {
        self.cell_for_mut(at)?.remove_food(at)
    }
}
