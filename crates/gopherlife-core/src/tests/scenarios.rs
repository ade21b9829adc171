//! Hand-built worlds with known outcomes.

use std::sync::Arc;

use burrow::{Coord, Tile};
use proptest::prelude::*;

use crate::action::Action;
use crate::behavior::{Behavior, DecisionContext};
use crate::entity::{Gopher, LifeState};
use crate::error::{AgentError, WorldError};
use crate::settings::WorldSettings;
use crate::world::World;
use crate::world_view::WorldView;

use super::helpers::{assert_consistent, busy_settings, spawn_with_energy, tiny_settings, tiny_world};

// =============================================================================
// Test Behaviors
// =============================================================================

/// Panics for odd ids, fails for id 2, idles otherwise.
struct Faulty;

impl Behavior for Faulty {
    fn name(&self) -> &str {
        "faulty"
    }

    fn decide(
        &self,
        _ctx: &mut DecisionContext,
        gopher: &mut Gopher,
        _view: &WorldView<'_>,
    ) -> Result<Option<Action>, AgentError> {
        let id = gopher.id();
        match id.as_u64() {
            n if n % 2 == 1 => panic!("gopher {n} exploded"),
            2 => Err(AgentError::Displaced {
                id,
                at: gopher.position(),
            }),
            _ => Ok(None),
        }
    }
}

/// Never moves.
struct Idle;

impl Behavior for Idle {
    fn name(&self) -> &str {
        "idle"
    }

    fn decide(
        &self,
        _ctx: &mut DecisionContext,
        _gopher: &mut Gopher,
        _view: &WorldView<'_>,
    ) -> Result<Option<Action>, AgentError> {
        Ok(None)
    }
}

// =============================================================================
// Foraging
// =============================================================================

#[test]
fn adjacent_food_is_eaten_in_one_tick() {
    let mut world = tiny_world();
    let id = world.spawn_gopher_at(Coord::new(1, 2)).unwrap();
    world.place_food(Coord::new(1, 3)).unwrap();

    assert!(world.advance_one_tick().unwrap());

    assert_eq!(world.tile(Coord::new(1, 3)), Some(&Tile::Agent(id)));
    assert_eq!(world.tile(Coord::new(1, 2)), Some(&Tile::Empty));
    let gopher = world.gopher(id).unwrap();
    assert_eq!(gopher.position(), Coord::new(1, 3));
    assert_eq!(gopher.state, LifeState::Eating);
    assert_eq!(world.food_count(), 0);
    assert_eq!(world.diagnostics().last.food_eaten, 1);
}

#[test]
fn eaten_food_respawns_nearby() {
    let settings = WorldSettings {
        respawn_food: true,
        respawn_window: 4,
        ..tiny_settings()
    };
    let mut world = World::new(settings).unwrap();
    world.spawn_gopher_at(Coord::new(5, 5)).unwrap();
    world.place_food(Coord::new(5, 6)).unwrap();

    world.advance_one_tick().unwrap();

    assert_eq!(world.food_count(), 1);
    assert_eq!(world.diagnostics().last.food_respawned, 1);
    let at = world
        .grid()
        .cells()
        .flat_map(|cell| cell.food_locations())
        .next()
        .unwrap();
    assert!((at - Coord::new(5, 6)).abs().max_element() <= 2);
}

#[test]
fn hungry_gopher_walks_toward_food() {
    let mut world = tiny_world();
    let id = world.spawn_gopher_at(Coord::new(0, 0)).unwrap();
    world.place_food(Coord::new(4, 4)).unwrap();

    world.advance_one_tick().unwrap();
    assert_eq!(world.gopher(id).unwrap().position(), Coord::new(1, 1));
    assert_eq!(world.gopher(id).unwrap().state, LifeState::MovingTowardFood);

    for _ in 0..3 {
        world.advance_one_tick().unwrap();
    }
    assert_eq!(world.gopher(id).unwrap().position(), Coord::new(4, 4));
    assert_eq!(world.food_count(), 0);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn starving_gopher_dies_on_schedule() {
    let mut world = tiny_world();
    let id = spawn_with_energy(&mut world, 4, 4, 3);

    world.advance_one_tick().unwrap();
    world.advance_one_tick().unwrap();
    assert!(world.gopher(id).is_some());
    assert_eq!(world.gopher(id).unwrap().energy, 1);

    world.advance_one_tick().unwrap();
    assert!(world.gopher(id).is_none());
    assert_eq!(world.population(), 0);
    assert_eq!(world.grid().agent_count(), 0);
    assert_eq!(world.diagnostics().last.deaths, 1);
}

#[test]
fn birth_every_seventh_tick() {
    let settings = WorldSettings {
        birth_rate: 7,
        ..tiny_settings()
    };
    let mut world = World::new(settings).unwrap();

    for _ in 0..6 {
        world.advance_one_tick().unwrap();
    }
    assert_eq!(world.population(), 0);

    world.advance_one_tick().unwrap();
    assert_eq!(world.population(), 1);
    let newborn = world.gophers().next().unwrap();
    assert_eq!(newborn.age, 0);
    assert_eq!(world.diagnostics().last.births, 1);
    assert_consistent(&world);
}

#[test]
fn births_respect_population_cap() {
    let settings = WorldSettings {
        birth_rate: 1,
        max_population: 3,
        ..tiny_settings()
    };
    let mut world = World::new(settings).unwrap();
    for _ in 0..10 {
        world.advance_one_tick().unwrap();
    }
    assert_eq!(world.population(), 3);
}

#[test]
fn mating_gopher_parents_next_to_itself() {
    let settings = WorldSettings {
        birth_rate: 1,
        ..tiny_settings()
    };
    let mut world = World::new(settings).unwrap();
    let parent = spawn_with_energy(&mut world, 5, 5, 95);
    world.gopher_mut(parent).unwrap().age = 40;

    world.advance_one_tick().unwrap();

    assert_eq!(world.population(), 2);
    let parent = world.gopher(parent).unwrap();
    assert_eq!(parent.position(), Coord::new(5, 5));
    assert_eq!(parent.energy, 94 - 40);
    assert_eq!(parent.state, LifeState::Idle);

    let newborn = world.gophers().nth(1).unwrap();
    assert_eq!(newborn.position(), Coord::new(6, 5));
    assert_consistent(&world);
}

// =============================================================================
// Scheduler
// =============================================================================

#[test]
fn paused_world_makes_no_progress() {
    let mut world = tiny_world();
    let id = spawn_with_energy(&mut world, 3, 3, 10);
    world.toggle_pause();

    assert!(!world.advance_one_tick().unwrap());
    assert_eq!(world.tick(), 0);
    assert_eq!(world.gopher(id).unwrap().energy, 10);
}

#[test]
fn failing_decisions_remove_the_gopher() {
    let mut world = World::with_behavior(tiny_settings(), Arc::new(Faulty)).unwrap();
    for x in 0..4 {
        world.spawn_gopher_at(Coord::new(x * 2, 0)).unwrap();
    }

    assert!(world.advance_one_tick().unwrap());

    assert_eq!(world.population(), 1);
    assert_eq!(world.gophers().next().unwrap().id().as_u64(), 0);
    assert_eq!(world.diagnostics().last.compute_failures, 3);
    assert_eq!(world.diagnostics().last.deaths, 3);
    assert_consistent(&world);
}

#[test]
fn saturated_queue_is_an_error() {
    let settings = WorldSettings {
        max_population: 2,
        queue_capacity: Some(4),
        ..tiny_settings()
    };
    let mut world = World::new(settings).unwrap();
    spawn_with_energy(&mut world, 1, 1, 1);
    spawn_with_energy(&mut world, 7, 7, 1);

    for _ in 0..4 {
        world.enqueue_external_action(Action::Unselect).unwrap();
    }
    assert!(matches!(
        world.enqueue_external_action(Action::Unselect),
        Err(WorldError::QueueSaturated { capacity: 4 })
    ));
    assert!(matches!(
        world.advance_one_tick(),
        Err(WorldError::QueueSaturated { .. })
    ));
}

#[test]
fn external_actions_apply_at_next_tick() {
    let mut world = World::with_behavior(tiny_settings(), Arc::new(Idle)).unwrap();
    let id = world.spawn_gopher_at(Coord::new(2, 2)).unwrap();
    world.unselect_gopher();

    let sender = world.action_sender();
    std::thread::spawn(move || {
        sender.send(Action::SelectAt(Coord::new(2, 2))).unwrap();
        sender
            .send(Action::MoveGopher {
                id,
                from: Coord::new(2, 2),
                to: Coord::new(3, 2),
            })
            .unwrap();
        sender.send(Action::SpawnGopher { parent: None }).unwrap();
    })
    .join()
    .unwrap();

    assert!(world.selected_gopher().is_none());
    world.advance_one_tick().unwrap();

    assert_eq!(world.selected_gopher().map(Gopher::id), Some(id));
    assert_eq!(world.gopher(id).unwrap().position(), Coord::new(3, 2));
    assert_eq!(world.population(), 2);
    assert_consistent(&world);
}

#[test]
fn stale_moves_are_rejected() {
    let mut world = World::with_behavior(tiny_settings(), Arc::new(Idle)).unwrap();
    let a = world.spawn_gopher_at(Coord::new(2, 2)).unwrap();
    world.spawn_gopher_at(Coord::new(3, 2)).unwrap();

    // Occupied destination, wrong origin, too far.
    for (from, to) in [
        (Coord::new(2, 2), Coord::new(3, 2)),
        (Coord::new(1, 1), Coord::new(1, 2)),
        (Coord::new(2, 2), Coord::new(5, 5)),
    ] {
        world
            .enqueue_external_action(Action::MoveGopher { id: a, from, to })
            .unwrap();
    }
    world.advance_one_tick().unwrap();

    assert_eq!(world.gopher(a).unwrap().position(), Coord::new(2, 2));
    assert_eq!(world.diagnostics().last.rejected_actions, 3);
    assert_consistent(&world);
}

#[test]
fn diagnostics_track_phases() {
    let mut world = World::new(busy_settings(1)).unwrap();
    for _ in 0..3 {
        world.advance_one_tick().unwrap();
    }
    let diagnostics = world.diagnostics();
    assert_eq!(diagnostics.tick.laps(), 3);
    assert_eq!(diagnostics.compute.laps(), 3);
    assert_eq!(diagnostics.apply.laps(), 3);
    assert!(diagnostics.tick.total() >= diagnostics.compute.total());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Population changes only through births and deaths, and the grid
    /// always agrees with the registry.
    #[test]
    fn registry_is_conserved_across_ticks(seed in any::<u64>()) {
        let mut world = World::new(busy_settings(seed)).unwrap();
        assert_consistent(&world);

        for _ in 0..8 {
            let before = world.population();
            world.advance_one_tick().unwrap();
            let counters = world.diagnostics().last;
            prop_assert_eq!(
                world.population() as u64,
                before as u64 + counters.births - counters.deaths
            );
            prop_assert!(world.population() <= world.settings().max_population);
            assert_consistent(&world);
        }
    }
}
