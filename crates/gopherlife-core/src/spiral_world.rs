//! Spiral demo world.
//!
//! A plain grid with no food. Every third tick a gopher is spawned on the
//! center tile, as long as it is free and the population is below the cap.
//! Each gopher walks its own spiral outward from where it was born, one tile
//! per tick, and dies once the spiral has covered the whole grid.
//!
//! With `weird` set, a walker treats each spiral offset as a step from where
//! it stands instead of a tile around its birthplace. The walks fly apart.
//!
//! Shares the scheduler shape of [`World`](crate::world::World): walkers pick
//! their next step in parallel, then the queue is applied in order.

use std::time::Instant;

use burrow::{Coord, Grid, Rect, Spiral, Tile, TileStore};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, info, trace};

use crate::action::{Action, ActionQueue};
use crate::diagnostics::{Diagnostics, TickCounters};
use crate::entity::{FoodItem, Gender, Gopher, GopherId};
use crate::error::{SettingsError, WorldError};
use crate::names::cute_name;
use crate::settings::GopherSettings;

/// Ticks between spawns.
const SPAWN_INTERVAL: u32 = 3;

/// Configuration for a [`SpiralWorld`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralWorldSettings {
    /// Grid width
    pub width: i32,
    /// Grid height
    pub height: i32,
    /// Population cap
    pub max_population: usize,
    /// Seed for names and genders
    pub seed: u64,
    /// Step by raw spiral offsets
    pub weird: bool,
}

impl Default for SpiralWorldSettings {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            max_population: 1000,
            seed: 0,
            weird: false,
        }
    }
}

impl SpiralWorldSettings {
    /// Check the settings describe a buildable world.
    ///
    /// # Errors
    ///
    /// [`SettingsError::InvalidDimensions`] for a non-positive side,
    /// [`SettingsError::ZeroPopulationCap`] for a zero cap.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(SettingsError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.max_population == 0 {
            return Err(SettingsError::ZeroPopulationCap);
        }
        Ok(())
    }

    /// One queue slot per action two full ticks could produce. Walkers never
    /// outnumber tiles.
    #[must_use]
    pub fn action_queue_capacity(&self) -> usize {
        let tiles = self.width.max(0) as usize * self.height.max(0) as usize;
        self.max_population.min(tiles).saturating_mul(2)
    }
}

#[derive(Debug, Clone)]
struct Walker {
    gopher: Gopher,
    spiral: Spiral,
}

/// Gophers walking spirals on an empty grid.
#[derive(Debug)]
pub struct SpiralWorld {
    settings: SpiralWorldSettings,
    grid: Grid<GopherId, FoodItem>,
    walkers: Vec<Walker>,
    queue: ActionQueue,
    rng: ChaCha8Rng,
    tick: u64,
    spawn_counter: u32,
    next_id: u64,
    diagnostics: Diagnostics,
}

impl SpiralWorld {
    /// Build the world and spawn the first walker on the center tile.
    ///
    /// # Errors
    ///
    /// [`WorldError::Settings`] if the settings do not validate.
    pub fn new(settings: SpiralWorldSettings) -> Result<Self, WorldError> {
        settings.validate()?;
        let grid = Grid::new(Coord::ZERO, settings.width, settings.height)?;

        let mut world = Self {
            queue: ActionQueue::new(settings.action_queue_capacity()),
            rng: ChaCha8Rng::seed_from_u64(settings.seed),
            walkers: Vec::new(),
            grid,
            tick: 0,
            spawn_counter: 0,
            next_id: 0,
            diagnostics: Diagnostics::default(),
            settings,
        };
        world.spawn_at_center();

        info!(
            width = world.settings.width,
            height = world.settings.height,
            max_population = world.settings.max_population,
            "created spiral world"
        );
        Ok(world)
    }

    /// Center tile, where every walker is born.
    #[must_use]
    pub fn center(&self) -> Coord {
        Coord::new(self.settings.width / 2, self.settings.height / 2)
    }

    fn spawn_at_center(&mut self) -> bool {
        let at = self.center();
        if self.walkers.len() >= self.settings.max_population || !self.grid.is_vacant(at) {
            return false;
        }

        let id = GopherId::new(self.next_id);
        if self.grid.insert_agent(at, id).is_err() {
            return false;
        }
        self.next_id += 1;

        let name = cute_name(&mut self.rng);
        let gender = Gender::random(&mut self.rng);
        let energy = GopherSettings::default().initial_energy;
        self.walkers.push(Walker {
            gopher: Gopher::new(id, name, gender, at, energy),
            spiral: Spiral::new(at, self.grid.bounds()),
        });
        trace!(%id, "walker spawned");
        true
    }

    /// Run one tick.
    ///
    /// # Errors
    ///
    /// [`WorldError::QueueSaturated`] if the action queue overflows.
    pub fn advance_one_tick(&mut self) -> Result<(), WorldError> {
        let span = debug_span!("spiral_tick", tick = self.tick);
        let _guard = span.enter();
        let started = Instant::now();
        let mut counters = TickCounters::default();

        let compute_started = Instant::now();
        let weird = self.settings.weird;
        let steps: Vec<Action> = self
            .walkers
            .par_iter_mut()
            .map(|walker| {
                let id = walker.gopher.id();
                let from = walker.gopher.position();
                if let Some(next) = walker.spiral.next() {
                    let to = if weird {
                        from + (next - walker.spiral.center())
                    } else {
                        next
                    };
                    Action::MoveGopher { id, from, to }
                } else {
                    walker.gopher.decay();
                    Action::RemoveGopher { id, at: from }
                }
            })
            .collect();
        self.diagnostics.compute.lap_since(compute_started);

        let apply_started = Instant::now();
        for step in steps {
            self.queue.enqueue(step)?;
        }
        while let Some(action) = self.queue.pop() {
            if !self.apply(&action) {
                counters.rejected_actions += 1;
                trace!(?action, "action rejected");
            }
        }

        let before = self.walkers.len();
        self.walkers.retain(|walker| !walker.gopher.is_decayed());
        counters.deaths = (before - self.walkers.len()) as u64;

        self.spawn_counter += 1;
        if self.spawn_counter >= SPAWN_INTERVAL {
            self.spawn_counter = 0;
            if self.spawn_at_center() {
                counters.births += 1;
            }
        }
        self.diagnostics.apply.lap_since(apply_started);

        self.tick += 1;
        self.diagnostics.tick.lap_since(started);
        debug!(
            population = self.walkers.len(),
            births = counters.births,
            deaths = counters.deaths,
            "spiral tick complete"
        );
        self.diagnostics.finish_tick(counters);
        Ok(())
    }

    fn apply(&mut self, action: &Action) -> bool {
        match *action {
            Action::MoveGopher { id, from, to } => {
                if self.grid.tile(from).and_then(Tile::agent) != Some(&id) {
                    return false;
                }
                if from == to {
                    return true;
                }
                if !self.grid.is_vacant(to) {
                    return false;
                }
                // Walkers stay sorted by id: spawn order, and retain keeps it.
                let Ok(slot) = self.walkers.binary_search_by_key(&id, |w| w.gopher.id()) else {
                    return false;
                };
                let walker = &mut self.walkers[slot];
                self.grid.remove_agent(from);
                if self.grid.insert_agent(to, id).is_err() {
                    let _ = self.grid.insert_agent(from, id);
                    return false;
                }
                walker.gopher.set_position(to);
                true
            }
            Action::RemoveGopher { id, at } => {
                if self.grid.tile(at).and_then(Tile::agent) == Some(&id) {
                    self.grid.remove_agent(at);
                }
                true
            }
            Action::ConsumeFood { .. }
            | Action::SpawnGopher { .. }
            | Action::SelectAt(_)
            | Action::SelectRandom
            | Action::Unselect => false,
        }
    }

    /// Ticks run so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Live walkers.
    #[must_use]
    pub fn population(&self) -> usize {
        self.walkers.len()
    }

    /// Live gophers in spawn order.
    pub fn gophers(&self) -> impl Iterator<Item = &Gopher> + '_ {
        self.walkers.iter().map(|walker| &walker.gopher)
    }

    /// Tile at `at`, `None` outside the world.
    #[must_use]
    pub fn tile(&self, at: Coord) -> Option<&Tile<GopherId, FoodItem>> {
        self.grid.tile(at)
    }

    /// World bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.grid.bounds()
    }

    /// Settings the world was built with.
    #[must_use]
    pub fn settings(&self) -> &SpiralWorldSettings {
        &self.settings
    }

    /// Timing and counters.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn tiny(side: i32, max_population: usize) -> SpiralWorld {
        SpiralWorld::new(SpiralWorldSettings {
            width: side,
            height: side,
            max_population,
            seed: 1,
            weird: false,
        })
        .unwrap()
    }

    #[test]
    fn first_walker_starts_at_center() {
        let world = tiny(5, 1);
        assert_eq!(world.population(), 1);
        let first = world.gophers().next().unwrap();
        assert_eq!(first.position(), Coord::new(2, 2));
        assert_eq!(world.tile(Coord::new(2, 2)), Some(&Tile::Agent(first.id())));
    }

    #[test]
    fn walker_covers_grid_then_dies() {
        let mut world = tiny(5, 1);
        let id = world.gophers().next().unwrap().id();
        let mut visited = HashSet::new();

        for _ in 0..25 {
            world.advance_one_tick().unwrap();
            let walker = world.gophers().find(|g| g.id() == id).unwrap();
            visited.insert(walker.position());
        }
        assert_eq!(visited.len(), 25);

        world.advance_one_tick().unwrap();
        assert!(world.gophers().all(|g| g.id() != id));
        assert_eq!(world.population(), 0);
        assert_eq!(world.diagnostics().cumulative.deaths, 1);
    }

    #[test]
    fn spawns_every_third_tick() {
        let mut world = SpiralWorld::new(SpiralWorldSettings::default()).unwrap();
        for _ in 0..9 {
            world.advance_one_tick().unwrap();
        }
        assert_eq!(world.population(), 4);
        assert_eq!(world.diagnostics().cumulative.births, 3);
    }

    #[test]
    fn cap_limits_spawns() {
        let mut world = tiny(9, 2);
        for _ in 0..12 {
            world.advance_one_tick().unwrap();
        }
        assert_eq!(world.population(), 2);
    }

    #[test]
    fn rejects_bad_settings() {
        let err = SpiralWorld::new(SpiralWorldSettings {
            width: 0,
            ..SpiralWorldSettings::default()
        })
        .unwrap_err();
        assert!(matches!(err, WorldError::Settings(_)));

        let err = SpiralWorld::new(SpiralWorldSettings {
            max_population: 0,
            ..SpiralWorldSettings::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            WorldError::Settings(SettingsError::ZeroPopulationCap)
        ));
    }

    #[test]
    fn huge_population_cap_sizes_queue_to_tiles() {
        let settings = SpiralWorldSettings {
            width: 10,
            height: 10,
            max_population: usize::MAX,
            ..SpiralWorldSettings::default()
        };
        assert_eq!(settings.action_queue_capacity(), 200);
        let mut world = SpiralWorld::new(settings).unwrap();
        world.advance_one_tick().unwrap();
        assert_eq!(world.population(), 1);
    }

    #[test]
    fn weird_walkers_step_by_raw_offsets() {
        let mut world = SpiralWorld::new(SpiralWorldSettings {
            width: 21,
            height: 21,
            max_population: 1,
            seed: 1,
            weird: true,
        })
        .unwrap();
        let center = world.center();
        let id = world.gophers().next().unwrap().id();
        let position = |world: &SpiralWorld| world.gophers().find(|g| g.id() == id).unwrap().position();

        // Offsets (0, 0), (1, 0), (1, 1), (0, 1) added up.
        world.advance_one_tick().unwrap();
        assert_eq!(position(&world), center);
        world.advance_one_tick().unwrap();
        assert_eq!(position(&world), center + Coord::new(1, 0));
        world.advance_one_tick().unwrap();
        assert_eq!(position(&world), center + Coord::new(2, 1));
        world.advance_one_tick().unwrap();
        assert_eq!(position(&world), center + Coord::new(2, 2));
    }

    #[test]
    fn spiral_world_ignores_foreign_actions() {
        let mut world = tiny(5, 1);
        for action in [
            Action::SpawnGopher { parent: None },
            Action::SelectRandom,
            Action::Unselect,
        ] {
            assert!(!world.apply(&action));
        }
        assert_eq!(world.population(), 1);
    }
}
