//! State hashing for determinism verification.
//!
//! Two stores holding the same occupants on the same tiles hash equal. Used
//! to check that a simulation replays identically from the same seed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::grid::TileStore;

/// Compute a deterministic digest of a store's occupancy.
///
/// Covers the bounds and every non-empty tile, visited row-major.
#[must_use]
pub fn hash_store<A, F, S>(store: &S) -> u64
where
    A: Hash,
    F: Hash,
    S: TileStore<A, F> + ?Sized,
{
    let mut hasher = DefaultHasher::new();
    hash_tiles_into(store, &mut hasher);
    hasher.finish()
}

/// Feed a store's occupancy into an existing hasher.
///
/// Lets a caller fold grid state into a larger digest.
pub fn hash_tiles_into<A, F, S, H>(store: &S, hasher: &mut H)
where
    A: Hash,
    F: Hash,
    S: TileStore<A, F> + ?Sized,
    H: Hasher,
{
    let bounds = store.bounds();
    bounds.hash(hasher);

    for y in bounds.origin.y..bounds.end().y {
        for x in bounds.origin.x..bounds.end().x {
            let Some(tile) = store.tile(crate::Coord::new(x, y)) else {
                continue;
            };
            if tile.is_empty() {
                continue;
            }
            x.hash(hasher);
            y.hash(hasher);
            tile.hash(hasher);
        }
    }
}
