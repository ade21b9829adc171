//! The world and its tick loop.
//!
//! A tick runs in six steps:
//!
//! 1. **Drain**: take the live-gopher registry out of the world
//! 2. **Dispatch**: run one decision per gopher in parallel against a
//!    read-only [`WorldView`]
//! 3. **Barrier**: wait for every decision; a failed or panicking decision is
//!    caught, counted and turned into a removal
//! 4. **Apply**: push the decisions onto the [`ActionQueue`] in registry order
//!    and execute the queue on this thread, oldest first
//! 5. **Admit**: rebuild the registry from survivors, then newborns
//! 6. **Advance**: bump the tick counter
//!
//! # Determinism
//!
//! Given the same settings the world replays identically, however many
//! threads run the dispatch:
//! - every decision draws from its own random source, seeded by hashing
//!   (seed, tick, gopher id)
//! - actions are queued in registry order, never completion order
//! - everything random in the apply phase uses the world's single seeded
//!   source, in queue order
//!
//! # Example
//!
//! ```
//! use gopherlife_core::settings::WorldSettings;
//! use gopherlife_core::world::World;
//!
//! let settings = WorldSettings {
//!     width: 40,
//!     height: 40,
//!     initial_population: 20,
//!     food_count: 100,
//!     seed: 7,
//!     ..WorldSettings::default()
//! };
//! let mut world = World::new(settings).unwrap();
//! assert_eq!(world.population(), 20);
//!
//! for _ in 0..10 {
//!     assert!(world.advance_one_tick().unwrap());
//! }
//! assert_eq!(world.tick(), 10);
//!
//! world.toggle_pause();
//! assert!(!world.advance_one_tick().unwrap());
//! assert_eq!(world.tick(), 10);
//! ```

use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use burrow::{chebyshev, ring_len, ring_offset, Coord, PartitionedGrid, Rect, Tile, TileStore};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, debug_span, info, trace, warn};

use crate::action::{Action, ActionQueue, ActionSender};
use crate::behavior::{Behavior, DecisionContext, ForagingBehavior};
use crate::diagnostics::{Diagnostics, TickCounters};
use crate::entity::{FoodItem, Gender, Gopher, GopherId, LifeState};
use crate::error::{AgentError, WorldError};
use crate::names::cute_name;
use crate::settings::WorldSettings;
use crate::world_view::{WorldGrid, WorldView};

/// Random tiles tried when placing a newborn or respawned food.
pub const PLACEMENT_ATTEMPTS: usize = 64;

type Decision = Result<Option<Action>, AgentError>;

// =============================================================================
// World
// =============================================================================

/// A gopher world.
pub struct World {
    settings: WorldSettings,
    grid: WorldGrid,
    /// Live gophers, in admission order.
    registry: Vec<Gopher>,
    /// Second registry buffer, swapped in each tick.
    spare: Vec<Gopher>,
    queue: ActionQueue,
    behavior: Arc<dyn Behavior>,
    rng: ChaCha8Rng,
    tick: u64,
    paused: bool,
    birth_counter: u32,
    next_id: u64,
    selected: Option<GopherId>,
    diagnostics: Diagnostics,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("settings", &self.settings)
            .field("tick", &self.tick)
            .field("paused", &self.paused)
            .field("population", &self.registry.len())
            .field("food", &self.grid.food_count())
            .field("behavior", &self.behavior)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Build and seed a world of foraging gophers.
    ///
    /// # Errors
    ///
    /// [`WorldError::Settings`] if the settings do not validate.
    pub fn new(settings: WorldSettings) -> Result<Self, WorldError> {
        Self::with_behavior(settings, Arc::new(ForagingBehavior))
    }

    /// Build and seed a world whose gophers run `behavior`.
    ///
    /// Seeding places `initial_population` gophers and `food_count` food items
    /// on distinct random tiles and selects the first gopher.
    ///
    /// # Errors
    ///
    /// [`WorldError::Settings`] if the settings do not validate.
    pub fn with_behavior(
        settings: WorldSettings,
        behavior: Arc<dyn Behavior>,
    ) -> Result<Self, WorldError> {
        settings.validate()?;

        let grid = PartitionedGrid::new(
            settings.width,
            settings.height,
            settings.search.cell_width,
            settings.search.cell_height,
        )?;

        let mut world = Self {
            queue: ActionQueue::new(settings.action_queue_capacity()),
            rng: ChaCha8Rng::seed_from_u64(settings.seed),
            registry: Vec::with_capacity(settings.initial_population),
            spare: Vec::new(),
            grid,
            behavior,
            tick: 0,
            paused: false,
            birth_counter: 0,
            next_id: 0,
            selected: None,
            diagnostics: Diagnostics::default(),
            settings,
        };
        world.seed()?;

        info!(
            width = world.settings.width,
            height = world.settings.height,
            gophers = world.registry.len(),
            food = world.grid.food_count(),
            seed = world.settings.seed,
            behavior = world.behavior.name(),
            "created world"
        );
        Ok(world)
    }

    fn seed(&mut self) -> Result<(), WorldError> {
        let gophers = self.settings.initial_population;
        let wanted = gophers + self.settings.food_count;
        if wanted == 0 {
            return Ok(());
        }

        let bounds = self.grid.bounds();
        let picks = index::sample(&mut self.rng, self.settings.area(), wanted);
        for (n, slot) in picks.iter().enumerate() {
            let at = bounds.coord_at(slot);
            if n < gophers {
                self.spawn_gopher_at(at)?;
            } else {
                self.place_food(at)?;
            }
        }

        self.selected = self.registry.first().map(Gopher::id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Run one tick.
    ///
    /// Returns `Ok(false)` without doing anything while paused.
    ///
    /// # Errors
    ///
    /// [`WorldError::QueueSaturated`] if the action queue overflows. The
    /// world is unusable afterwards.
    pub fn advance_one_tick(&mut self) -> Result<bool, WorldError> {
        if self.paused {
            return Ok(false);
        }

        let span = debug_span!("tick", tick = self.tick);
        let _guard = span.enter();
        let started = Instant::now();
        let mut counters = TickCounters::default();

        let mut active = std::mem::take(&mut self.registry);

        let compute_started = Instant::now();
        let decisions = self.dispatch(&mut active);
        self.diagnostics.compute.lap_since(compute_started);
        debug!(decisions = decisions.len(), "decisions collected");

        let apply_started = Instant::now();
        if let Err(err) = self
            .enqueue_decisions(&mut active, decisions, &mut counters)
            .and_then(|()| self.schedule_birth(&active))
        {
            self.registry = active;
            return Err(err);
        }
        let queued = self.queue.len();
        let newborns = self.apply_pending(&mut active, &mut counters);
        self.diagnostics.apply.lap_since(apply_started);
        debug!(
            queued,
            rejected = counters.rejected_actions,
            "actions applied"
        );

        self.admit(active, newborns, &mut counters);
        self.tick += 1;
        self.diagnostics.tick.lap_since(started);

        debug!(
            population = self.registry.len(),
            births = counters.births,
            deaths = counters.deaths,
            eaten = counters.food_eaten,
            failures = counters.compute_failures,
            "tick complete"
        );
        self.diagnostics.finish_tick(counters);
        Ok(true)
    }

    /// Run every decision in parallel. Output order matches `active`.
    fn dispatch(&self, active: &mut [Gopher]) -> Vec<Decision> {
        let view = WorldView::new(&self.grid, &self.settings, self.tick);
        let behavior = self.behavior.as_ref();
        let seed = self.settings.seed;
        let tick = self.tick;

        active
            .par_iter_mut()
            .map(|gopher| {
                let id = gopher.id();
                panic::catch_unwind(AssertUnwindSafe(|| {
                    decide_one(behavior, &view, gopher, seed, tick)
                }))
                .unwrap_or_else(|payload| {
                    Err(AgentError::Panicked {
                        id,
                        message: panic_message(payload.as_ref()),
                    })
                })
            })
            .collect()
    }

    fn enqueue_decisions(
        &mut self,
        active: &mut [Gopher],
        decisions: Vec<Decision>,
        counters: &mut TickCounters,
    ) -> Result<(), WorldError> {
        for (gopher, decision) in active.iter_mut().zip(decisions) {
            match decision {
                Ok(action) if !gopher.is_decayed() => {
                    if let Some(action) = action {
                        self.queue.enqueue(action)?;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    counters.compute_failures += 1;
                    warn!(id = %gopher.id(), error = %err, "gopher decision failed, removing it");
                    gopher.decay();
                }
            }
            if gopher.is_decayed() {
                self.queue.enqueue(Action::RemoveGopher {
                    id: gopher.id(),
                    at: gopher.position(),
                })?;
            }
        }
        Ok(())
    }

    fn schedule_birth(&mut self, active: &[Gopher]) -> Result<(), WorldError> {
        let rate = self.settings.birth_rate;
        if rate == 0 {
            return Ok(());
        }
        self.birth_counter += 1;
        if self.birth_counter < rate {
            return Ok(());
        }
        self.birth_counter = 0;

        let population = active.iter().filter(|g| !g.is_decayed()).count();
        if population >= self.settings.max_population {
            debug!(population, "population cap reached, no birth");
            return Ok(());
        }
        let parent = active
            .iter()
            .find(|g| g.state == LifeState::Mating && !g.is_decayed())
            .map(Gopher::id);
        self.queue.enqueue(Action::SpawnGopher { parent })
    }

    fn apply_pending(&mut self, active: &mut [Gopher], counters: &mut TickCounters) -> Vec<Gopher> {
        let index: HashMap<GopherId, usize> = active
            .iter()
            .enumerate()
            .map(|(i, gopher)| (gopher.id(), i))
            .collect();
        let mut apply = Apply {
            active,
            index: &index,
            newborns: Vec::new(),
            counters,
        };

        while let Some(action) = self.queue.pop() {
            if !self.apply(&action, &mut apply) {
                apply.counters.rejected_actions += 1;
                trace!(?action, "action rejected");
            }
        }
        apply.newborns
    }

    /// Rebuild the registry: survivors in order, then newborns.
    fn admit(&mut self, mut active: Vec<Gopher>, newborns: Vec<Gopher>, counters: &mut TickCounters) {
        let mut next = std::mem::take(&mut self.spare);
        next.clear();
        next.reserve(active.len() + newborns.len());

        for gopher in active.drain(..) {
            if gopher.is_decayed() {
                // Normally already gone through RemoveGopher.
                let at = gopher.position();
                if self.grid.tile(at).and_then(Tile::agent) == Some(&gopher.id()) {
                    self.grid.remove_agent(at);
                }
                if self.selected == Some(gopher.id()) {
                    self.selected = None;
                }
                counters.deaths += 1;
            } else {
                next.push(gopher);
            }
        }
        next.extend(newborns);

        self.spare = active;
        self.registry = next;
    }

    // -------------------------------------------------------------------------
    // Apply
    // -------------------------------------------------------------------------

    /// Execute one action. `false` if its preconditions no longer held.
    fn apply(&mut self, action: &Action, ctx: &mut Apply<'_>) -> bool {
        match *action {
            Action::MoveGopher { id, from, to } => self.apply_move(ctx, id, from, to),
            Action::ConsumeFood { id, from, food_at } => self.apply_eat(ctx, id, from, food_at),
            Action::RemoveGopher { id, at } => {
                if self.grid.tile(at).and_then(Tile::agent) == Some(&id) {
                    self.grid.remove_agent(at);
                }
                if let Some(gopher) = ctx.gopher_mut(id) {
                    gopher.decay();
                }
                if self.selected == Some(id) {
                    self.selected = None;
                }
                true
            }
            Action::SpawnGopher { parent } => self.apply_birth(ctx, parent),
            Action::SelectAt(at) => {
                self.selected = self.grid.tile(at).and_then(Tile::agent).copied();
                true
            }
            Action::SelectRandom => {
                let live: Vec<GopherId> = ctx
                    .active
                    .iter()
                    .filter(|g| !g.is_decayed())
                    .map(Gopher::id)
                    .collect();
                self.selected = if live.is_empty() {
                    None
                } else {
                    Some(live[self.rng.gen_range(0..live.len())])
                };
                true
            }
            Action::Unselect => {
                self.selected = None;
                true
            }
        }
    }

    fn apply_move(&mut self, ctx: &mut Apply<'_>, id: GopherId, from: Coord, to: Coord) -> bool {
        let Some(gopher) = ctx.gopher_mut(id) else {
            return false;
        };
        if gopher.is_decayed() || gopher.position() != from || chebyshev(from, to) > 1 {
            return false;
        }
        if from == to {
            return true;
        }
        if self.grid.tile(from).and_then(Tile::agent) != Some(&id) || !self.grid.is_vacant(to) {
            return false;
        }

        self.grid.remove_agent(from);
        if let Err(err) = self.grid.insert_agent(to, id) {
            warn!(%id, error = %err, "move failed after vacancy check");
            let _ = self.grid.insert_agent(from, id);
            return false;
        }
        gopher.set_position(to);
        true
    }

    fn apply_eat(&mut self, ctx: &mut Apply<'_>, id: GopherId, from: Coord, food_at: Coord) -> bool {
        let Some(gopher) = ctx.gopher_mut(id) else {
            return false;
        };
        if gopher.is_decayed() || gopher.position() != from || chebyshev(from, food_at) != 1 {
            return false;
        }
        if self.grid.tile(from).and_then(Tile::agent) != Some(&id) {
            return false;
        }
        let Some(food) = self.grid.remove_food(food_at) else {
            return false;
        };

        self.grid.remove_agent(from);
        if let Err(err) = self.grid.insert_agent(food_at, id) {
            warn!(%id, error = %err, "could not step onto eaten food");
            // Put the gopher back where it was; the food is eaten either way.
            let _ = self.grid.insert_agent(from, id);
        } else {
            gopher.set_position(food_at);
        }
        gopher.eat(food, &self.settings.gopher);
        ctx.counters.food_eaten += 1;

        if self.settings.respawn_food && self.respawn_food_near(food_at) {
            ctx.counters.food_respawned += 1;
        }
        true
    }

    fn apply_birth(&mut self, ctx: &mut Apply<'_>, parent: Option<GopherId>) -> bool {
        let population = ctx.active.iter().filter(|g| !g.is_decayed()).count() + ctx.newborns.len();
        if population >= self.settings.max_population {
            return false;
        }

        let parent_at = parent
            .and_then(|id| ctx.gopher_mut(id))
            .filter(|g| !g.is_decayed() && g.state == LifeState::Mating)
            .map(|g| g.position());
        let spot = parent_at
            .and_then(|at| self.free_neighbour(at))
            .or_else(|| self.random_free_tile());
        let Some(at) = spot else {
            ctx.counters.dropped_births += 1;
            warn!(population, "no free tile for newborn, birth dropped");
            return false;
        };

        let newborn = self.new_gopher(at);
        if let Err(err) = self.grid.insert_agent(at, newborn.id()) {
            ctx.counters.dropped_births += 1;
            warn!(error = %err, "newborn placement failed, birth dropped");
            return false;
        }

        if parent_at.is_some() {
            if let Some(parent) = parent.and_then(|id| ctx.gopher_mut(id)) {
                parent.give_birth(&self.settings.gopher);
            }
        }
        trace!(id = %newborn.id(), %at, ?parent, "gopher born");
        ctx.newborns.push(newborn);
        ctx.counters.births += 1;
        true
    }

    fn free_neighbour(&self, at: Coord) -> Option<Coord> {
        (0..ring_len(1))
            .map(|k| at + ring_offset(1, k))
            .find(|&to| self.grid.is_vacant(to))
    }

    fn random_free_tile(&mut self) -> Option<Coord> {
        let bounds = self.grid.bounds();
        let area = bounds.area();
        (0..PLACEMENT_ATTEMPTS)
            .map(|_| bounds.coord_at(self.rng.gen_range(0..area)))
            .find(|&at| self.grid.is_vacant(at))
    }

    /// Place a food item on a random free tile of the square window
    /// centered on `center`.
    fn respawn_food_near(&mut self, center: Coord) -> bool {
        let side = self.settings.respawn_window;
        let window = Rect::new(center - Coord::splat(side / 2), side, side);
        let area = window.area();
        let picks = index::sample(&mut self.rng, area, area.min(PLACEMENT_ATTEMPTS));

        for slot in picks.iter() {
            let at = window.coord_at(slot);
            if self.grid.is_vacant(at) {
                return self.place_food(at).is_ok();
            }
        }
        trace!(%center, "no free tile to respawn food");
        false
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    fn new_gopher(&mut self, at: Coord) -> Gopher {
        let id = GopherId::new(self.next_id);
        self.next_id += 1;
        let name = cute_name(&mut self.rng);
        let gender = Gender::random(&mut self.rng);
        Gopher::new(id, name, gender, at, self.settings.gopher.initial_energy)
    }

    /// Put a fresh gopher on `at` and add it to the registry.
    ///
    /// # Errors
    ///
    /// [`PlacementError`](burrow::PlacementError) if `at` is outside the
    /// world or occupied.
    pub fn spawn_gopher_at(&mut self, at: Coord) -> Result<GopherId, burrow::PlacementError> {
        if !self.grid.bounds().contains(at) {
            return Err(burrow::PlacementError::OutOfBounds(at));
        }
        if !self.grid.is_vacant(at) {
            return Err(burrow::PlacementError::Occupied(at));
        }
        let gopher = self.new_gopher(at);
        let id = gopher.id();
        self.grid.insert_agent(at, id)?;
        self.registry.push(gopher);
        Ok(id)
    }

    /// Put a food item on `at`.
    ///
    /// # Errors
    ///
    /// [`PlacementError`](burrow::PlacementError) if `at` is outside the
    /// world or occupied.
    pub fn place_food(&mut self, at: Coord) -> Result<(), burrow::PlacementError> {
        self.grid
            .insert_food(at, FoodItem::new(self.settings.gopher.food_nutrition))
    }

    // -------------------------------------------------------------------------
    // Controller interface
    // -------------------------------------------------------------------------

    /// Pause or resume. Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// True while paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Currently selected gopher.
    #[must_use]
    pub fn selected_gopher(&self) -> Option<&Gopher> {
        self.selected.and_then(|id| self.gopher(id))
    }

    /// Select the gopher on `at`, or clear the selection if there is none.
    pub fn select_entity(&mut self, at: Coord) -> Option<&Gopher> {
        self.selected = self.grid.tile(at).and_then(Tile::agent).copied();
        self.selected_gopher()
    }

    /// Select a random live gopher.
    pub fn select_random_gopher(&mut self) -> Option<&Gopher> {
        self.selected = if self.registry.is_empty() {
            None
        } else {
            let pick = self.rng.gen_range(0..self.registry.len());
            Some(self.registry[pick].id())
        };
        self.selected_gopher()
    }

    /// Clear the selection.
    pub fn unselect_gopher(&mut self) {
        self.selected = None;
    }

    /// Queue an action for the next apply phase.
    ///
    /// # Errors
    ///
    /// [`WorldError::QueueSaturated`] if the queue is full.
    pub fn enqueue_external_action(&self, action: Action) -> Result<(), WorldError> {
        self.queue.enqueue(action)
    }

    /// Handle for queueing actions from another thread.
    #[must_use]
    pub fn action_sender(&self) -> ActionSender {
        self.queue.sender()
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// World settings.
    #[must_use]
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Ticks run so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Tile at `at`, `None` outside the world.
    #[must_use]
    pub fn tile(&self, at: Coord) -> Option<&Tile<GopherId, FoodItem>> {
        self.grid.tile(at)
    }

    /// The occupancy grid.
    #[must_use]
    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    /// Live gophers in registry order.
    pub fn gophers(&self) -> impl Iterator<Item = &Gopher> + '_ {
        self.registry.iter()
    }

    /// Gopher by id.
    #[must_use]
    pub fn gopher(&self, id: GopherId) -> Option<&Gopher> {
        self.registry.iter().find(|g| g.id() == id)
    }

    /// Mutable gopher by id, for setting up scenarios between ticks.
    ///
    /// Position is not exposed; gophers only move through actions.
    pub fn gopher_mut(&mut self, id: GopherId) -> Option<&mut Gopher> {
        self.registry.iter_mut().find(|g| g.id() == id)
    }

    /// Number of live gophers.
    #[must_use]
    pub fn population(&self) -> usize {
        self.registry.len()
    }

    /// Food items on the grid.
    #[must_use]
    pub fn food_count(&self) -> usize {
        self.grid.food_count()
    }

    /// Timing and counters.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub(crate) fn selected_id(&self) -> Option<GopherId> {
        self.selected
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Mutable state threaded through the apply phase.
struct Apply<'a> {
    active: &'a mut [Gopher],
    index: &'a HashMap<GopherId, usize>,
    newborns: Vec<Gopher>,
    counters: &'a mut TickCounters,
}

impl Apply<'_> {
    fn gopher_mut(&mut self, id: GopherId) -> Option<&mut Gopher> {
        let slot = *self.index.get(&id)?;
        self.active.get_mut(slot)
    }
}

/// Vitals, sanity checks, then the behavior.
fn decide_one(
    behavior: &dyn Behavior,
    view: &WorldView<'_>,
    gopher: &mut Gopher,
    seed: u64,
    tick: u64,
) -> Decision {
    if gopher.is_decayed() {
        return Ok(None);
    }
    let at = gopher.position();
    if view.gopher_at(at) != Some(gopher.id()) {
        return Err(AgentError::Displaced {
            id: gopher.id(),
            at,
        });
    }
    if gopher.live_one_tick(&view.settings().gopher) {
        return Ok(None);
    }

    let mut ctx = DecisionContext::new(tick, decision_seed(seed, tick, gopher.id()));
    behavior.decide(&mut ctx, gopher, view)
}

/// Seed for one decision's random source.
///
/// Derived by hashing (seed, tick, gopher), so it does not depend on which
/// thread runs the decision.
fn decision_seed(seed: u64, tick: u64, id: GopherId) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    tick.hash(&mut hasher);
    id.hash(&mut hasher);
    hasher.finish()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_settings() -> WorldSettings {
        WorldSettings {
            width: 30,
            height: 30,
            initial_population: 10,
            max_population: 50,
            food_count: 40,
            seed: 3,
            ..WorldSettings::default()
        }
    }

    mod setup_tests {
        use super::*;

        #[test]
        fn seeding_places_everything() {
            let world = World::new(small_settings()).unwrap();
            assert_eq!(world.population(), 10);
            assert_eq!(world.grid().agent_count(), 10);
            assert_eq!(world.food_count(), 40);
            assert_eq!(
                world.selected_gopher().map(Gopher::id),
                world.gophers().next().map(Gopher::id)
            );
            for gopher in world.gophers() {
                assert_eq!(
                    world.tile(gopher.position()),
                    Some(&Tile::Agent(gopher.id()))
                );
            }
        }

        #[test]
        fn invalid_settings_are_rejected() {
            let settings = WorldSettings {
                width: -1,
                ..small_settings()
            };
            assert!(matches!(
                World::new(settings),
                Err(WorldError::Settings(_))
            ));
        }

        #[test]
        fn spawn_rejects_occupied_tiles() {
            let settings = WorldSettings {
                initial_population: 0,
                food_count: 0,
                ..small_settings()
            };
            let mut world = World::new(settings).unwrap();
            let id = world.spawn_gopher_at(Coord::new(2, 2)).unwrap();
            assert_eq!(world.gopher(id).map(Gopher::position), Some(Coord::new(2, 2)));
            assert!(world.spawn_gopher_at(Coord::new(2, 2)).is_err());
            assert!(world.place_food(Coord::new(2, 2)).is_err());
            assert!(world.spawn_gopher_at(Coord::new(30, 0)).is_err());
            assert_eq!(world.population(), 1);
        }
    }

    mod controller_tests {
        use super::*;

        #[test]
        fn pause_stops_the_clock() {
            let mut world = World::new(small_settings()).unwrap();
            assert!(world.toggle_pause());
            assert!(!world.advance_one_tick().unwrap());
            assert_eq!(world.tick(), 0);
            assert!(!world.toggle_pause());
            assert!(world.advance_one_tick().unwrap());
            assert_eq!(world.tick(), 1);
        }

        #[test]
        fn selection_by_tile() {
            let mut world = World::new(small_settings()).unwrap();
            let target = world.gophers().nth(3).cloned().unwrap();
            let picked = world.select_entity(target.position()).map(Gopher::id);
            assert_eq!(picked, Some(target.id()));

            world.unselect_gopher();
            assert!(world.selected_gopher().is_none());
            assert!(world.select_random_gopher().is_some());
        }

        #[test]
        fn queued_selection_applies_next_tick() {
            let mut world = World::new(small_settings()).unwrap();
            world.unselect_gopher();
            world.action_sender().send(Action::SelectRandom).unwrap();
            assert!(world.selected_gopher().is_none());

            world.advance_one_tick().unwrap();
            assert!(world.selected_gopher().is_some());

            world.enqueue_external_action(Action::Unselect).unwrap();
            world.advance_one_tick().unwrap();
            assert!(world.selected_gopher().is_none());
        }

        #[test]
        fn external_removal_kills_a_gopher() {
            let mut world = World::new(small_settings()).unwrap();
            let victim = world.gophers().next().cloned().unwrap();
            world
                .enqueue_external_action(Action::RemoveGopher {
                    id: victim.id(),
                    at: victim.position(),
                })
                .unwrap();
            world.advance_one_tick().unwrap();
            assert!(world.gopher(victim.id()).is_none());
            assert!(world.diagnostics().last.deaths >= 1);
        }
    }

    #[test]
    fn decision_seeds_differ_per_gopher_and_tick() {
        let a = decision_seed(1, 0, GopherId::new(0));
        assert_eq!(a, decision_seed(1, 0, GopherId::new(0)));
        assert_ne!(a, decision_seed(1, 0, GopherId::new(1)));
        assert_ne!(a, decision_seed(1, 1, GopherId::new(0)));
        assert_ne!(a, decision_seed(2, 0, GopherId::new(0)));
    }

    #[test]
    fn panic_messages_are_extracted() {
        let caught = panic::catch_unwind(|| panic!("boom {}", 1)).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "boom 1");
        let caught = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "static");
    }
}
