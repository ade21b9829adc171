//! World configuration.
//!
//! Settings are fixed at construction. Every field has a default, so a JSON
//! settings file only needs the fields it changes:
//!
//! ```
//! use gopherlife_core::settings::{SearchStrategyKind, WorldSettings};
//!
//! let settings: WorldSettings =
//!     serde_json::from_str(r#"{ "width": 64, "height": 32, "search": { "strategy": "spiral" } }"#)
//!         .unwrap();
//!
//! assert_eq!(settings.width, 64);
//! assert_eq!(settings.search.strategy, SearchStrategyKind::Spiral);
//! assert_eq!(settings.birth_rate, WorldSettings::default().birth_rate);
//! assert!(settings.validate().is_ok());
//! ```

use burrow::MAX_CELL_SIDE;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Queue slots kept free for controller actions on top of two per gopher.
pub const EXTERNAL_ACTION_HEADROOM: usize = 64;

/// How gophers look for food.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategyKind {
    /// Tile-by-tile spiral around the gopher
    Spiral,
    /// Cell registries, ring by ring
    #[default]
    Partition,
}

/// Search and partitioning parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Which search gophers use
    pub strategy: SearchStrategyKind,
    /// Partition cell width
    pub cell_width: i32,
    /// Partition cell height
    pub cell_height: i32,
    /// Cell rings a partition search may expand to
    pub max_rings: i32,
    /// Tile rings a spiral search may expand to
    pub max_radius: i32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            strategy: SearchStrategyKind::Partition,
            cell_width: 50,
            cell_height: 50,
            max_rings: 1,
            max_radius: 25,
        }
    }
}

/// Gopher vitals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GopherSettings {
    /// Energy of a newborn
    pub initial_energy: u32,
    /// Energy cap
    pub max_energy: u32,
    /// Energy gained per food item
    pub food_nutrition: u32,
    /// Below this energy a gopher forages instead of wandering
    pub hunger_threshold: u32,
    /// Age from which a gopher can parent
    pub maturity_age: u32,
    /// Age past which a gopher dies
    pub lifespan: u32,
    /// Energy at which a mature gopher starts mating
    pub mating_energy: u32,
    /// Energy a parent pays per birth
    pub birth_cost: u32,
}

impl Default for GopherSettings {
    fn default() -> Self {
        Self {
            initial_energy: 60,
            max_energy: 100,
            food_nutrition: 25,
            hunger_threshold: 70,
            maturity_age: 30,
            lifespan: 600,
            mating_energy: 90,
            birth_cost: 40,
        }
    }
}

/// Everything needed to build a [`World`](crate::world::World).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// World width in tiles
    pub width: i32,
    /// World height in tiles
    pub height: i32,
    /// Gophers placed at setup
    pub initial_population: usize,
    /// Population cap for births
    pub max_population: usize,
    /// Food items placed at setup
    pub food_count: usize,
    /// Ticks between births; 0 disables births
    pub birth_rate: u32,
    /// Master seed
    pub seed: u64,
    /// Replace eaten food near where it was eaten
    pub respawn_food: bool,
    /// Side of the square respawn window
    pub respawn_window: i32,
    /// Action queue capacity override, see
    /// [`action_queue_capacity`](Self::action_queue_capacity)
    pub queue_capacity: Option<usize>,
    /// Search parameters
    pub search: SearchSettings,
    /// Gopher vitals
    pub gopher: GopherSettings,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            initial_population: 200,
            max_population: 5_000,
            food_count: 4_000,
            birth_rate: 7,
            seed: 0,
            respawn_food: true,
            respawn_window: 50,
            queue_capacity: None,
            search: SearchSettings::default(),
            gopher: GopherSettings::default(),
        }
    }
}

impl WorldSettings {
    /// Large partitioned world.
    #[must_use]
    pub fn partition() -> Self {
        Self {
            width: 3000,
            height: 3000,
            initial_population: 5_000,
            max_population: 1_000_000,
            food_count: 1_000_000,
            birth_rate: 7,
            ..Self::default()
        }
    }

    /// [`partition`](Self::partition) with spiral search.
    #[must_use]
    pub fn spiral_search() -> Self {
        Self {
            search: SearchSettings {
                strategy: SearchStrategyKind::Spiral,
                ..SearchSettings::default()
            },
            ..Self::partition()
        }
    }

    /// Small, crowded world with frequent births.
    #[must_use]
    pub fn fireworks() -> Self {
        Self {
            width: 400,
            height: 200,
            initial_population: 2_000,
            max_population: 100_000,
            food_count: 2_500,
            birth_rate: 35,
            search: SearchSettings {
                strategy: SearchStrategyKind::Spiral,
                ..SearchSettings::default()
            },
            ..Self::default()
        }
    }

    /// Number of tiles in the world.
    #[must_use]
    pub fn area(&self) -> usize {
        self.width.max(0) as usize * self.height.max(0) as usize
    }

    /// Most gophers the world can ever hold: the cap, or one per tile.
    #[must_use]
    pub fn population_ceiling(&self) -> usize {
        self.max_population.min(self.area())
    }

    /// Capacity the action queue is built with.
    ///
    /// Two slots per gopher the world can hold plus
    /// [`EXTERNAL_ACTION_HEADROOM`]. An explicit `queue_capacity` may shrink
    /// this but never grow it.
    #[must_use]
    pub fn action_queue_capacity(&self) -> usize {
        let full = self
            .population_ceiling()
            .saturating_mul(2)
            .saturating_add(EXTERNAL_ACTION_HEADROOM);
        self.queue_capacity.map_or(full, |capacity| capacity.min(full))
    }

    /// Check the settings describe a world that can be built and run.
    ///
    /// # Errors
    ///
    /// The first [`SettingsError`] found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(SettingsError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.initial_population > self.max_population {
            return Err(SettingsError::PopulationExceedsMax {
                initial: self.initial_population,
                max: self.max_population,
            });
        }
        let requested = self.initial_population.saturating_add(self.food_count);
        if requested > self.area() {
            return Err(SettingsError::Overcrowded {
                requested,
                tiles: self.area(),
            });
        }
        let capacity = self.action_queue_capacity();
        if capacity == 0 || capacity < self.population_ceiling().saturating_mul(2) {
            return Err(SettingsError::QueueTooSmall {
                capacity,
                max_population: self.max_population,
            });
        }
        if self.respawn_window <= 0 {
            return Err(SettingsError::InvalidRespawnWindow(self.respawn_window));
        }
        self.search.validate()?;
        self.gopher.validate()
    }
}

impl SearchSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        let valid_side = |side: i32| (1..=MAX_CELL_SIDE).contains(&side);
        if !valid_side(self.cell_width) || !valid_side(self.cell_height) {
            return Err(SettingsError::InvalidSearch(format!(
                "cell size {}x{} is outside 1..={MAX_CELL_SIDE}",
                self.cell_width, self.cell_height
            )));
        }
        if self.max_rings < 0 || self.max_radius < 0 {
            return Err(SettingsError::InvalidSearch(
                "search limits must not be negative".into(),
            ));
        }
        Ok(())
    }
}

impl GopherSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        if self.initial_energy == 0 {
            return Err(SettingsError::InvalidGopher(
                "newborns need some energy".into(),
            ));
        }
        if self.initial_energy > self.max_energy {
            return Err(SettingsError::InvalidGopher(format!(
                "initial energy {} exceeds max energy {}",
                self.initial_energy, self.max_energy
            )));
        }
        if self.birth_cost >= self.mating_energy {
            return Err(SettingsError::InvalidGopher(format!(
                "birth cost {} must stay below mating energy {}",
                self.birth_cost, self.mating_energy
            )));
        }
        Ok(())
    }
}
