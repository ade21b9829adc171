//! Error types for the simulation.
//!
//! Placement conflicts are not errors at this level: actions re-validate and
//! quietly reject. What remains are configuration mistakes, failed agent
//! decisions and the fatal world conditions.

use burrow::{Coord, GridError, PlacementError};
use thiserror::Error;

use crate::entity::GopherId;

/// Invalid [`WorldSettings`](crate::settings::WorldSettings).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// World width or height is not positive.
    #[error("world dimensions must be positive, got {width}x{height}")]
    InvalidDimensions {
        /// Requested width
        width: i32,
        /// Requested height
        height: i32,
    },

    /// More starting gophers than the population cap allows.
    #[error("initial population {initial} exceeds max population {max}")]
    PopulationExceedsMax {
        /// Requested initial population
        initial: usize,
        /// Population cap
        max: usize,
    },

    /// Seeding would need more tiles than the world has.
    #[error("{requested} gophers and food items do not fit in {tiles} tiles")]
    Overcrowded {
        /// Gophers plus food requested at setup
        requested: usize,
        /// Tiles in the world
        tiles: usize,
    },

    /// The action queue cannot hold two actions per gopher.
    #[error("action queue capacity {capacity} is below twice the max population {max_population}")]
    QueueTooSmall {
        /// Configured capacity
        capacity: usize,
        /// Population cap
        max_population: usize,
    },

    /// Food respawn window side is not positive.
    #[error("respawn window must be positive, got {0}")]
    InvalidRespawnWindow(i32),

    /// A population cap of zero leaves nothing to simulate.
    #[error("max population must be at least 1")]
    ZeroPopulationCap,

    /// Search settings out of range.
    #[error("invalid search settings: {0}")]
    InvalidSearch(String),

    /// Gopher vitals out of range.
    #[error("invalid gopher settings: {0}")]
    InvalidGopher(String),
}

/// A decision that could not be computed.
///
/// The scheduler counts these, removes the gopher and carries on with the
/// tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    /// The grid does not hold the gopher where the gopher thinks it is.
    #[error("gopher {id} is not on its tile {at}")]
    Displaced {
        /// Gopher that lost track of itself
        id: GopherId,
        /// Position recorded on the gopher
        at: Coord,
    },

    /// The decision panicked.
    #[error("decision for gopher {id} panicked: {message}")]
    Panicked {
        /// Gopher whose decision panicked
        id: GopherId,
        /// Panic payload, if it was a string
        message: String,
    },
}

/// Fatal world errors.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Settings rejected at construction.
    #[error("invalid configuration: {0}")]
    Settings(#[from] SettingsError),

    /// Grid could not be built.
    #[error("grid construction failed: {0}")]
    Grid(#[from] GridError),

    /// Seeding hit an occupied or out-of-range tile.
    #[error("seeding failed: {0}")]
    Seeding(#[from] PlacementError),

    /// The action queue is full. Buffers are undersized for the population.
    #[error("action queue saturated at capacity {capacity}")]
    QueueSaturated {
        /// Capacity of the saturated queue
        capacity: usize,
    },
}
