//! Tile occupancy.
//!
//! A tile is either empty or holds exactly one occupant: an agent or a food
//! item. The two are mutually exclusive, so an agent never stands on food.

use serde::{Deserialize, Serialize};

/// Occupancy of a single grid tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile<A, F> {
    /// Nothing here
    Empty,
    /// An agent handle
    Agent(A),
    /// A food item
    Food(F),
}

/// Occupant kind of a tile, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Nothing here
    Empty,
    /// An agent
    Agent,
    /// A food item
    Food,
}

impl<A, F> Default for Tile<A, F> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<A, F> Tile<A, F> {
    /// Occupant kind.
    #[must_use]
    pub fn kind(&self) -> TileKind {
        match self {
            Self::Empty => TileKind::Empty,
            Self::Agent(_) => TileKind::Agent,
            Self::Food(_) => TileKind::Food,
        }
    }

    /// True if nothing occupies the tile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// True if an agent occupies the tile.
    #[must_use]
    pub fn has_agent(&self) -> bool {
        matches!(self, Self::Agent(_))
    }

    /// True if food occupies the tile.
    #[must_use]
    pub fn has_food(&self) -> bool {
        matches!(self, Self::Food(_))
    }

    /// The agent on this tile, if any.
    #[must_use]
    pub fn agent(&self) -> Option<&A> {
        match self {
            Self::Agent(agent) => Some(agent),
            _ => None,
        }
    }

    /// The food on this tile, if any.
    #[must_use]
    pub fn food(&self) -> Option<&F> {
        match self {
            Self::Food(food) => Some(food),
            _ => None,
        }
    }
}
