//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One tick:
//! 1. input (at most one activation)
//! 2. physics: scroll the world, integrate the bird, collect contacts
//! 3. timers: spawns, despawns, the game-over roll
//! 4. drain contacts through the resolver

use super::collision::{self, roll_rotation};
use super::event::GameEvent;
use super::spawner;
use super::state::{GamePhase, GameState};
use super::timer::TimerKind;
use crate::persistence::BestScoreStore;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap/click/space
    pub activate: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick<S: BestScoreStore>(state: &mut GameState<S>, input: &TickInput, dt: f32) {
    if input.activate {
        state.activate();
    }

    // Nothing moves before the first activation
    if state.phase == GamePhase::Ready {
        return;
    }

    state.time_ticks += 1;

    let world_dt = dt * state.run_speed;
    let bird_dt = dt * state.registry.bird.speed;

    step_physics(state, dt, world_dt);
    run_timers(state, world_dt, bird_dt);
    collision::drain_contacts(state);
}

/// Move everything and queue the contacts the movement produced
fn step_physics<S: BestScoreStore>(state: &mut GameState<S>, dt: f32, world_dt: f32) {
    if world_dt > 0.0 {
        state.registry.advance_world(world_dt);
        emit_world_moves(state);
    }

    let gravity = state.config.gravity;
    let regions = state.registry.regions();
    let bird = &mut state.registry.bird;
    let before = (bird.pos, bird.rotation);

    bird.integrate(gravity, dt);
    let contacts = collision::detect_contacts(bird, &regions, &mut state.touching);
    collision::respond(bird, &regions);
    state.contacts.extend(contacts);

    let bird = &state.registry.bird;
    if (bird.pos, bird.rotation) != before {
        let moved = GameEvent::EntityMoved {
            id: bird.id,
            pos: bird.pos,
            rotation: bird.rotation,
        };
        state.emit(moved);
    }
}

fn emit_world_moves<S: BestScoreStore>(state: &mut GameState<S>) {
    let registry = &state.registry;
    let mut moves = Vec::new();

    for pair in registry.obstacles() {
        moves.push((pair.id, pair.pos()));
    }
    for item in registry.items() {
        moves.push((item.id, item.pos()));
    }
    let scroll = registry.ground_scroll.offset;
    for segment in registry.ground() {
        moves.push((segment.id, segment.bounds(scroll).center()));
    }
    let scroll = registry.cloud_scroll.offset;
    for cloud in registry.clouds() {
        moves.push((cloud.id, cloud.pos(scroll)));
    }

    for (id, pos) in moves {
        state.emit(GameEvent::EntityMoved {
            id,
            pos,
            rotation: 0.0,
        });
    }
}

/// Advance timers and apply whatever fired
fn run_timers<S: BestScoreStore>(state: &mut GameState<S>, world_dt: f32, bird_dt: f32) {
    let fired = state.scheduler.advance(world_dt, bird_dt);

    if let Some(remaining) = state.scheduler.remaining(TimerKind::BirdRoll) {
        let bird = &mut state.registry.bird;
        bird.rotation = roll_rotation(bird, remaining);
        let moved = GameEvent::EntityMoved {
            id: bird.id,
            pos: bird.pos,
            rotation: bird.rotation,
        };
        state.emit(moved);
    }

    for kind in fired {
        match kind {
            TimerKind::SpawnObstacle => {
                spawner::spawn_obstacle(state);
            }
            TimerKind::SpawnItem => {
                spawner::spawn_item(state);
            }
            TimerKind::Despawn(id) => {
                state.despawn(id);
            }
            TimerKind::BirdRoll => {
                let bird = &mut state.registry.bird;
                bird.rotation = bird.roll_target;
                bird.speed = 0.0;
                log::debug!("Bird settled (rotation {:.2})", bird.rotation);
                let moved = GameEvent::EntityMoved {
                    id: bird.id,
                    pos: bird.pos,
                    rotation: bird.rotation,
                };
                state.emit(moved);
            }
        }
    }
}
