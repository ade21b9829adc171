//! Bounded nearest-food searches.
//!
//! Neither search is shortest-path: both report a target tile and leave the
//! stepping to the caller. Ties always go to the first tile met in the
//! search's scan order, so results never depend on anything but the grid.

use crate::grid::TileStore;
use crate::partition::PartitionedGrid;
use crate::spiral::{ring_len, ring_offset, Spiral};
use crate::{chebyshev, Coord, Rect};

/// Result of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOutcome {
    /// Food tile to head for, if any was found.
    pub target: Option<Coord>,
    /// Work done: tiles for [`spiral_search`], cells for [`partition_search`].
    pub inspected: usize,
}

impl SearchOutcome {
    /// True if the search found food.
    #[must_use]
    pub fn found(&self) -> bool {
        self.target.is_some()
    }
}

/// Walk a spiral out from `from` and stop at the first food tile.
///
/// Gives up after ring `max_radius`; the result is then a search failure for
/// this call only.
///
/// ```
/// use burrow::{spiral_search, Coord, Grid, TileStore};
///
/// let mut grid: Grid<u64, u32> = Grid::new(Coord::ZERO, 10, 10).unwrap();
/// grid.insert_food(Coord::new(4, 4), 1).unwrap();
///
/// assert_eq!(spiral_search(&grid, Coord::new(2, 2), 5).target, Some(Coord::new(4, 4)));
/// assert_eq!(spiral_search(&grid, Coord::new(2, 2), 1).target, None);
/// ```
pub fn spiral_search<A, F, S>(store: &S, from: Coord, max_radius: i32) -> SearchOutcome
where
    S: TileStore<A, F> + ?Sized,
{
    let mut inspected = 0;
    for at in Spiral::within(from, store.bounds(), max_radius) {
        inspected += 1;
        if store.tile(at).is_some_and(|tile| tile.has_food()) {
            return SearchOutcome {
                target: Some(at),
                inspected,
            };
        }
    }
    SearchOutcome {
        target: None,
        inspected,
    }
}

/// Search cell registries ring by ring around the cell holding `from`.
///
/// Ring 0 is the home cell, ring `r` the cells at Chebyshev distance `r` in
/// cell space, visited in [`ring_offset`] order. The first ring that has any
/// food wins; inside it the food tile nearest to `from` wins, earlier scan
/// order breaking ties. At most `(2 * max_rings + 1)^2` cells are inspected.
pub fn partition_search<A, F>(
    grid: &PartitionedGrid<A, F>,
    from: Coord,
    max_rings: i32,
) -> SearchOutcome {
    let Some(home) = grid.cell_coord_of(from) else {
        return SearchOutcome::default();
    };
    let cell_space = Rect::with_size(grid.cell_columns(), grid.cell_rows());
    let last_ring = max_rings.min(cell_space.max_ring_from(home));

    let mut inspected = 0;
    for ring in 0..=last_ring {
        let mut best: Option<(i32, Coord)> = None;
        for step in 0..ring_len(ring) {
            let Some(cell) = grid.cell_at(home + ring_offset(ring, step)) else {
                continue;
            };
            inspected += 1;
            for at in cell.food_locations() {
                let distance = chebyshev(at, from);
                if best.map_or(true, |(nearest, _)| distance < nearest) {
                    best = Some((distance, at));
                }
            }
        }
        if let Some((_, at)) = best {
            return SearchOutcome {
                target: Some(at),
                inspected,
            };
        }
    }

    SearchOutcome {
        target: None,
        inspected,
    }
}
