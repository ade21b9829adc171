//! Gopher decision logic.
//!
//! A [`Behavior`] looks at one gopher and a read-only [`WorldView`] and picks
//! at most one [`Action`]. Behaviors run in parallel, one call per gopher per
//! tick, so they must not rely on call order or shared mutable state. The only
//! state they may change is the gopher they are handed.
//!
//! Vitals (ageing, energy burn, death) are handled by the scheduler before the
//! behavior is asked; a behavior is only consulted for live gophers standing
//! where the grid says they are.
//!
//! # Example
//!
//! ```
//! use burrow::{Coord, PartitionedGrid, TileStore};
//! use gopherlife_core::action::Action;
//! use gopherlife_core::behavior::{Behavior, DecisionContext, ForagingBehavior};
//! use gopherlife_core::entity::{FoodItem, Gender, Gopher, GopherFlags, GopherId};
//! use gopherlife_core::settings::WorldSettings;
//! use gopherlife_core::world_view::{WorldGrid, WorldView};
//!
//! let id = GopherId::new(1);
//! let mut grid: WorldGrid = PartitionedGrid::new(10, 10, 10, 10).unwrap();
//! grid.insert_agent(Coord::new(1, 2), id).unwrap();
//! grid.insert_food(Coord::new(1, 3), FoodItem::new(10)).unwrap();
//!
//! let settings = WorldSettings::default();
//! let view = WorldView::new(&grid, &settings, 0);
//! let mut gopher = Gopher::new(id, "Pip", Gender::Male, Coord::new(1, 2), 5);
//! gopher.flags = GopherFlags::HUNGRY;
//!
//! let mut ctx = DecisionContext::new(0, 42);
//! let action = ForagingBehavior.decide(&mut ctx, &mut gopher, &view).unwrap();
//! assert_eq!(
//!     action,
//!     Some(Action::ConsumeFood { id, from: Coord::new(1, 2), food_at: Coord::new(1, 3) })
//! );
//! ```

use std::fmt;

use burrow::{chebyshev, ring_len, ring_offset, Coord};
use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::action::Action;
use crate::entity::{Gopher, LifeState};
use crate::error::AgentError;
use crate::world_view::WorldView;

// =============================================================================
// Decision Context
// =============================================================================

/// Per-decision context.
///
/// Each decision owns its random source, seeded from the tick and the gopher,
/// so the outcome does not depend on which thread ran it or when.
#[derive(Debug, Clone)]
pub struct DecisionContext {
    /// Tick being decided
    pub tick: u64,
    /// Random source private to this decision
    pub rng: ChaCha8Rng,
}

impl DecisionContext {
    /// Context for `tick` with a random source seeded from `seed`.
    #[must_use]
    pub fn new(tick: u64, seed: u64) -> Self {
        Self {
            tick,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

// =============================================================================
// Behavior
// =============================================================================

/// Chooses what a gopher does this tick.
pub trait Behavior: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Decide on an action for `gopher`.
    ///
    /// `Ok(None)` means the gopher stays put this tick.
    ///
    /// # Errors
    ///
    /// An [`AgentError`] if no decision can be made; the scheduler removes
    /// the gopher.
    fn decide(
        &self,
        ctx: &mut DecisionContext,
        gopher: &mut Gopher,
        view: &WorldView<'_>,
    ) -> Result<Option<Action>, AgentError>;
}

impl fmt::Debug for dyn Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Behavior({})", self.name())
    }
}

// =============================================================================
// Foraging
// =============================================================================

/// The standard gopher.
///
/// - mature and well fed: hold position and wait to parent a birth
/// - fed: wander to a random free neighbour
/// - hungry: search for food; eat it if adjacent, otherwise step towards it,
///   eating any food that happens to be on the way
/// - hungry and nothing in range: wander
#[derive(Debug, Default, Clone, Copy)]
pub struct ForagingBehavior;

impl Behavior for ForagingBehavior {
    fn name(&self) -> &str {
        "foraging"
    }

    fn decide(
        &self,
        ctx: &mut DecisionContext,
        gopher: &mut Gopher,
        view: &WorldView<'_>,
    ) -> Result<Option<Action>, AgentError> {
        let vitals = &view.settings().gopher;

        if gopher.ready_to_mate(vitals) {
            gopher.state = LifeState::Mating;
            gopher.target = None;
            return Ok(None);
        }

        if !gopher.is_hungry() {
            gopher.state = LifeState::Idle;
            gopher.target = None;
            return Ok(wander(ctx, gopher, view));
        }

        let here = gopher.position();
        let Some(target) = view.find_food(here).target else {
            gopher.state = LifeState::Searching;
            gopher.target = None;
            return Ok(wander(ctx, gopher, view));
        };

        gopher.target = Some(target);
        if chebyshev(here, target) <= 1 {
            gopher.state = LifeState::Eating;
            return Ok(Some(Action::ConsumeFood {
                id: gopher.id(),
                from: here,
                food_at: target,
            }));
        }

        gopher.state = LifeState::MovingTowardFood;
        Ok(step_toward(gopher, view, target))
    }
}

/// One step towards `target`, sidestepping gophers in the way.
fn step_toward(gopher: &Gopher, view: &WorldView<'_>, target: Coord) -> Option<Action> {
    let here = gopher.position();
    let step = (target - here).signum();

    let sidesteps = if step.x != 0 && step.y != 0 {
        [IVec2::new(step.x, 0), IVec2::new(0, step.y)]
    } else if step.x != 0 {
        [IVec2::new(step.x, 1), IVec2::new(step.x, -1)]
    } else {
        [IVec2::new(1, step.y), IVec2::new(-1, step.y)]
    };

    std::iter::once(step)
        .chain(sidesteps)
        .map(|offset| here + offset)
        .find_map(|to| {
            if view.has_food(to) {
                Some(Action::ConsumeFood {
                    id: gopher.id(),
                    from: here,
                    food_at: to,
                })
            } else if view.is_vacant(to) {
                Some(Action::MoveGopher {
                    id: gopher.id(),
                    from: here,
                    to,
                })
            } else {
                None
            }
        })
}

/// Move to a random free neighbour, if there is one.
fn wander(ctx: &mut DecisionContext, gopher: &Gopher, view: &WorldView<'_>) -> Option<Action> {
    let here = gopher.position();
    let neighbours = ring_len(1);
    let start = ctx.rng.gen_range(0..neighbours);

    (0..neighbours)
        .map(|k| here + ring_offset(1, (start + k) % neighbours))
        .find(|&to| view.is_vacant(to))
        .map(|to| Action::MoveGopher {
            id: gopher.id(),
            from: here,
            to,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{FoodItem, Gender, GopherFlags, GopherId};
    use crate::settings::WorldSettings;
    use crate::world_view::WorldGrid;
    use burrow::{PartitionedGrid, TileStore};

    const ME: GopherId = GopherId::new(1);

    fn setup(at: Coord) -> (WorldGrid, Gopher) {
        let mut grid: WorldGrid = PartitionedGrid::new(10, 10, 5, 5).unwrap();
        grid.insert_agent(at, ME).unwrap();
        let mut gopher = Gopher::new(ME, "Me", Gender::Female, at, 10);
        gopher.flags = GopherFlags::HUNGRY;
        (grid, gopher)
    }

    fn decide(grid: &WorldGrid, gopher: &mut Gopher) -> Option<Action> {
        let settings = WorldSettings::default();
        let view = WorldView::new(grid, &settings, 0);
        ForagingBehavior
            .decide(&mut DecisionContext::new(0, 7), gopher, &view)
            .unwrap()
    }

    mod foraging_tests {
        use super::*;

        #[test]
        fn steps_diagonally_towards_food() {
            let (mut grid, mut gopher) = setup(Coord::new(1, 1));
            grid.insert_food(Coord::new(4, 3), FoodItem::new(5)).unwrap();

            let action = decide(&grid, &mut gopher);
            assert_eq!(
                action,
                Some(Action::MoveGopher {
                    id: ME,
                    from: Coord::new(1, 1),
                    to: Coord::new(2, 2)
                })
            );
            assert_eq!(gopher.state, LifeState::MovingTowardFood);
            assert_eq!(gopher.target, Some(Coord::new(4, 3)));
        }

        #[test]
        fn sidesteps_a_blocking_gopher() {
            let (mut grid, mut gopher) = setup(Coord::new(1, 1));
            grid.insert_food(Coord::new(4, 4), FoodItem::new(5)).unwrap();
            grid.insert_agent(Coord::new(2, 2), GopherId::new(2)).unwrap();

            let action = decide(&grid, &mut gopher);
            assert_eq!(
                action,
                Some(Action::MoveGopher {
                    id: ME,
                    from: Coord::new(1, 1),
                    to: Coord::new(2, 1)
                })
            );
        }

        #[test]
        fn eats_food_on_the_way() {
            // Target in the home cell; the sidestep food sits in the next
            // cell down, so the search does not pick it.
            let (mut grid, mut gopher) = setup(Coord::new(4, 4));
            grid.insert_food(Coord::new(2, 4), FoodItem::new(5)).unwrap();
            grid.insert_agent(Coord::new(3, 4), GopherId::new(2)).unwrap();
            grid.insert_food(Coord::new(3, 5), FoodItem::new(5)).unwrap();

            let action = decide(&grid, &mut gopher);
            assert_eq!(gopher.target, Some(Coord::new(2, 4)));
            assert_eq!(
                action,
                Some(Action::ConsumeFood {
                    id: ME,
                    from: Coord::new(4, 4),
                    food_at: Coord::new(3, 5)
                })
            );
        }

        #[test]
        fn boxed_in_gopher_stays_put() {
            let (mut grid, mut gopher) = setup(Coord::new(0, 0));
            grid.insert_food(Coord::new(4, 4), FoodItem::new(5)).unwrap();
            for (i, at) in [Coord::new(1, 0), Coord::new(0, 1), Coord::new(1, 1)]
                .into_iter()
                .enumerate()
            {
                grid.insert_agent(at, GopherId::new(10 + i as u64)).unwrap();
            }
            assert_eq!(decide(&grid, &mut gopher), None);
        }
    }

    mod mood_tests {
        use super::*;

        #[test]
        fn ready_gopher_mates() {
            let (mut grid, mut gopher) = setup(Coord::new(5, 5));
            grid.insert_food(Coord::new(5, 6), FoodItem::new(5)).unwrap();
            gopher.flags = GopherFlags::MATURE;
            gopher.energy = WorldSettings::default().gopher.mating_energy;

            assert_eq!(decide(&grid, &mut gopher), None);
            assert_eq!(gopher.state, LifeState::Mating);
        }

        #[test]
        fn fed_gopher_wanders_to_a_neighbour() {
            let (grid, mut gopher) = setup(Coord::new(5, 5));
            gopher.flags = GopherFlags::empty();

            match decide(&grid, &mut gopher) {
                Some(Action::MoveGopher { from, to, .. }) => {
                    assert_eq!(from, Coord::new(5, 5));
                    assert_eq!(chebyshev(from, to), 1);
                }
                other => panic!("expected a wander step, got {other:?}"),
            }
            assert_eq!(gopher.state, LifeState::Idle);
        }

        #[test]
        fn hungry_without_food_searches() {
            let (grid, mut gopher) = setup(Coord::new(5, 5));
            assert!(decide(&grid, &mut gopher).is_some());
            assert_eq!(gopher.state, LifeState::Searching);
            assert_eq!(gopher.target, None);
        }

        #[test]
        fn wandering_is_seeded() {
            let (grid, gopher) = setup(Coord::new(5, 5));
            let settings = WorldSettings::default();
            let view = WorldView::new(&grid, &settings, 0);
            let a = wander(&mut DecisionContext::new(0, 11), &gopher, &view);
            let b = wander(&mut DecisionContext::new(0, 11), &gopher, &view);
            assert_eq!(a, b);
        }
    }
}
