//! Test helper functions for building worlds and checking their invariants.

use burrow::{Coord, Tile, TileStore};

use crate::entity::GopherId;
use crate::settings::WorldSettings;
use crate::world::World;

// =============================================================================
// Setup
// =============================================================================

/// A quiet 10x10 world: no gophers, no food, no births, no respawn.
///
/// Scenarios place what they need by hand.
pub fn tiny_settings() -> WorldSettings {
    WorldSettings {
        width: 10,
        height: 10,
        initial_population: 0,
        max_population: 10,
        food_count: 0,
        birth_rate: 0,
        respawn_food: false,
        seed: 42,
        ..WorldSettings::default()
    }
}

/// World built from [`tiny_settings`].
pub fn tiny_world() -> World {
    World::new(tiny_settings()).unwrap()
}

/// Spawn a gopher at `(x, y)` with the given energy.
pub fn spawn_with_energy(world: &mut World, x: i32, y: i32, energy: u32) -> GopherId {
    let id = world.spawn_gopher_at(Coord::new(x, y)).unwrap();
    world.gopher_mut(id).unwrap().energy = energy;
    id
}

/// A seeded, busy world for determinism checks.
pub fn busy_settings(seed: u64) -> WorldSettings {
    WorldSettings {
        width: 60,
        height: 60,
        initial_population: 120,
        max_population: 400,
        food_count: 300,
        birth_rate: 2,
        seed,
        ..WorldSettings::default()
    }
}

// =============================================================================
// Invariants
// =============================================================================

/// Every registered gopher stands on a tile holding its id, and the grid holds
/// no other gophers.
pub fn assert_consistent(world: &World) {
    assert_eq!(world.grid().agent_count(), world.population());
    for gopher in world.gophers() {
        assert!(!gopher.is_decayed(), "decayed gopher {} in registry", gopher.id());
        assert_eq!(
            world.grid().tile(gopher.position()),
            Some(&Tile::Agent(gopher.id())),
            "gopher {} is not on its tile",
            gopher.id()
        );
    }
}
