//! # Gopherlife Core
//!
//! Tick-based gopher population simulation on a partitioned tile grid.
//!
//! Gophers wander, search for food, eat, age, parent newborns and die. Each
//! tick every live gopher decides in parallel against a frozen view of the
//! world; the decisions are then applied one at a time, in order, by a single
//! writer.
//!
//! ## Architecture
//!
//! - **Entities**: [`Gopher`](entity::Gopher)s and [`FoodItem`](entity::FoodItem)s
//! - **Behaviors**: [`Behavior`](behavior::Behavior) turns a gopher and a
//!   [`WorldView`](world_view::WorldView) into at most one [`Action`](action::Action)
//! - **Scheduler**: [`World`](world::World) drains the registry, dispatches
//!   decisions, applies the [`ActionQueue`](action::ActionQueue) and admits births
//!
//! Spatial storage and food searches live in [`burrow`].
//!
//! ## Usage
//!
//! ```
//! use gopherlife_core::{hash_world, World, WorldSettings};
//!
//! let settings = WorldSettings {
//!     width: 32,
//!     height: 32,
//!     initial_population: 16,
//!     food_count: 64,
//!     ..WorldSettings::default()
//! };
//! let mut a = World::new(settings.clone()).unwrap();
//! let mut b = World::new(settings).unwrap();
//! for _ in 0..5 {
//!     a.advance_one_tick().unwrap();
//!     b.advance_one_tick().unwrap();
//! }
//! assert_eq!(hash_world(&a), hash_world(&b));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export burrow for coordinates and tiles
pub use burrow;

pub mod action;
pub mod behavior;
pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod hash;
pub mod names;
pub mod settings;
pub mod spiral_world;
pub mod world;
pub mod world_view;

#[cfg(test)]
mod tests;

pub use action::{Action, ActionQueue, ActionSender};
pub use behavior::{Behavior, DecisionContext, ForagingBehavior};
pub use diagnostics::{Diagnostics, StopWatch, TickCounters};
pub use entity::{FoodItem, Gender, Gopher, GopherFlags, GopherId, LifeState};
pub use error::{AgentError, SettingsError, WorldError};
pub use hash::hash_world;
pub use settings::{GopherSettings, SearchSettings, SearchStrategyKind, WorldSettings};
pub use spiral_world::{SpiralWorld, SpiralWorldSettings};
pub use world::World;
pub use world_view::{WorldGrid, WorldView};
