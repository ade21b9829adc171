//! World state hashing for determinism verification.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use burrow::hash_tiles_into;

use crate::world::World;

/// Compute a deterministic digest of a world.
///
/// Covers the tick, every occupied tile, every live gopher in registry order
/// and the selection. Two runs from the same settings hash equal tick for
/// tick.
#[must_use]
pub fn hash_world(world: &World) -> u64 {
    let mut hasher = DefaultHasher::new();
    world.tick().hash(&mut hasher);
    hash_tiles_into(world.grid(), &mut hasher);
    world.population().hash(&mut hasher);
    for gopher in world.gophers() {
        gopher.hash(&mut hasher);
    }
    world.selected_id().hash(&mut hasher);
    hasher.finish()
}
