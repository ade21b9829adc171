//! Outward spiral enumeration.
//!
//! Ring `d` around a center is every coordinate at Chebyshev distance `d`.
//! Ring 0 is the center alone; ring `d > 0` has `8d` coordinates, walked
//! clockwise in screen space (y down) starting just below the top-right
//! corner:
//!
//! ```text
//!   ring 1 around C, visit order:
//!
//!   6 7 8
//!   5 C 1
//!   4 3 2
//! ```
//!
//! [`Spiral`] clips the walk to a rectangle and stops once every tile of the
//! rectangle has been produced.

use crate::{Coord, Rect};

/// Number of coordinates on ring `d`.
#[must_use]
pub fn ring_len(d: i32) -> usize {
    if d == 0 {
        1
    } else {
        8 * d as usize
    }
}

/// The `k`-th offset of ring `d`, for `k < ring_len(d)`.
///
/// The right edge comes first, then bottom, left and top. Each side owns
/// `2d` coordinates ending on a corner, so no corner is produced twice.
#[must_use]
pub fn ring_offset(d: i32, k: usize) -> Coord {
    if d == 0 {
        return Coord::ZERO;
    }
    debug_assert!(k < ring_len(d), "ring {d} has no offset {k}");

    let side_len = 2 * d as usize;
    let t = (k % side_len) as i32;
    match k / side_len {
        0 => Coord::new(d, -d + 1 + t),
        1 => Coord::new(d - 1 - t, d),
        2 => Coord::new(-d, d - 1 - t),
        _ => Coord::new(-d + 1 + t, -d),
    }
}

/// Lazy spiral over the tiles of a rectangle, nearest rings first.
///
/// For a fixed center and rectangle the order is always the same.
///
/// ```
/// use burrow::{Coord, Rect, Spiral};
///
/// let walk: Vec<Coord> = Spiral::new(Coord::new(0, 0), Rect::with_size(2, 2)).collect();
/// assert_eq!(
///     walk,
///     vec![Coord::new(0, 0), Coord::new(1, 0), Coord::new(1, 1), Coord::new(0, 1)]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Spiral {
    center: Coord,
    bounds: Rect,
    last_ring: i32,
    ring: i32,
    step: usize,
}

impl Spiral {
    /// Spiral covering all of `bounds`.
    #[must_use]
    pub fn new(center: Coord, bounds: Rect) -> Self {
        Self::within(center, bounds, bounds.max_ring_from(center))
    }

    /// Spiral over `bounds` that gives up after ring `max_ring`.
    #[must_use]
    pub fn within(center: Coord, bounds: Rect, max_ring: i32) -> Self {
        Self {
            center,
            bounds,
            last_ring: max_ring.min(bounds.max_ring_from(center)),
            ring: 0,
            step: 0,
        }
    }

    /// Center of the spiral.
    #[must_use]
    pub fn center(&self) -> Coord {
        self.center
    }

    /// Ring the next coordinate will come from.
    #[must_use]
    pub fn ring(&self) -> i32 {
        self.ring
    }

    /// True once nothing is left to produce.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.ring > self.last_ring || self.bounds.area() == 0
    }

    /// Start over from the center.
    pub fn reset(&mut self) {
        self.ring = 0;
        self.step = 0;
    }

    /// Next raw offset, clipped or not. `None` once past the last ring.
    fn advance(&mut self) -> Option<Coord> {
        if self.is_exhausted() {
            return None;
        }
        let offset = ring_offset(self.ring, self.step);
        self.step += 1;
        if self.step >= ring_len(self.ring) {
            self.ring += 1;
            self.step = 0;
        }
        Some(offset)
    }
}

impl Iterator for Spiral {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        while let Some(offset) = self.advance() {
            let at = self.center + offset;
            if self.bounds.contains(at) {
                return Some(at);
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Spiral {}
