//! Game state and run lifecycle
//!
//! `GameState` owns everything the sim mutates: the entity registry, the
//! timers, the score tracker, the RNG and the outgoing event buffer.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Contact;
use super::entity::{EntityId, EntityKind, Registry, RegionId};
use super::event::GameEvent;
use super::score::ScoreTracker;
use super::spawner;
use super::timer::{Scheduler, TimerKind};
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::persistence::{BestScoreStore, MemoryStore};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Static world, waiting for the first activation
    Ready,
    /// Scrolling, spawning, gravity and collisions active
    Playing,
    /// Run ended, world frozen
    GameOver,
    /// Transient: resetting before the next run
    Restarting,
}

/// Complete simulation state
#[derive(Debug)]
pub struct GameState<S = MemoryStore> {
    pub config: GameConfig,
    /// Seed the RNG was created from
    pub seed: u64,
    pub phase: GamePhase,
    pub registry: Registry,
    pub scheduler: Scheduler,
    pub scores: ScoreTracker<S>,
    /// Global scroll/spawn speed: 1 while playing, 0 when frozen
    pub run_speed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    /// Regions the bird touched at the end of the last physics step
    pub(crate) touching: BTreeSet<RegionId>,
    /// Contacts produced by physics, drained by the resolver
    pub(crate) contacts: Vec<Contact>,
    events: Vec<GameEvent>,
}

impl<S: BestScoreStore> GameState<S> {
    /// Validate the config and build the Ready scene
    pub fn new(config: GameConfig, store: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let registry = Registry::new(&config);

        let mut state = Self {
            seed,
            phase: GamePhase::Ready,
            registry,
            scheduler: Scheduler::new(),
            scores: ScoreTracker::new(store),
            run_speed: 0.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            touching: BTreeSet::new(),
            contacts: Vec::new(),
            events: Vec::new(),
            config,
        };

        state.announce_scene();
        state.emit_score();
        state.emit(GameEvent::RunStateChanged(GamePhase::Ready));
        log::info!("World ready (seed {})", seed);

        Ok(state)
    }

    /// Tell the renderer about the static scene
    fn announce_scene(&mut self) {
        let bird = &self.registry.bird;
        let mut created = vec![GameEvent::EntityCreated {
            id: bird.id,
            kind: EntityKind::Bird,
            pos: bird.pos,
            extent: bird.extent(),
        }];
        let scroll = self.registry.ground_scroll.offset;
        for segment in self.registry.ground() {
            let bounds = segment.bounds(scroll);
            created.push(GameEvent::EntityCreated {
                id: segment.id,
                kind: EntityKind::Ground,
                pos: bounds.center(),
                extent: bounds.size(),
            });
        }
        let scroll = self.registry.cloud_scroll.offset;
        for cloud in self.registry.clouds() {
            created.push(GameEvent::EntityCreated {
                id: cloud.id,
                kind: EntityKind::Cloud,
                pos: cloud.pos(scroll),
                extent: glam::Vec2::new(cloud.width, cloud.height),
            });
        }
        self.events.extend(created);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn emit_score(&mut self) {
        self.emit(GameEvent::ScoreChanged {
            score: self.scores.score(),
            item_score: self.scores.item_score(),
            best_score: self.scores.best_score(),
        });
    }

    /// Events buffered since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.emit(GameEvent::RunStateChanged(phase));
    }

    /// Remove a spawned entity and cancel its timers
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.scheduler.cancel_owned(id);
        match self.registry.remove(id) {
            Some(kind) => {
                log::debug!("Despawned {:?} {}", kind, id);
                self.emit(GameEvent::EntityRemoved { id });
                true
            }
            None => false,
        }
    }

    /// Handle the abstract "activate" input (tap/click)
    pub fn activate(&mut self) {
        match self.phase {
            GamePhase::Ready => {
                self.start_run();
                self.flap();
            }
            GamePhase::Playing => self.flap(),
            GamePhase::GameOver => {
                if self.registry.bird.is_settled() {
                    self.restart();
                } else {
                    log::debug!("Activate ignored: bird still rolling");
                }
            }
            GamePhase::Restarting => {}
        }
    }

    fn flap(&mut self) {
        let flap_velocity = self.config.flap_velocity;
        self.registry.bird.flap(flap_velocity);
    }

    /// Ready -> Playing: unfreeze the world and arm the spawners
    fn start_run(&mut self) {
        self.run_speed = 1.0;
        spawner::arm_obstacle_spawner(self);
        spawner::arm_item_spawner(self);
        self.emit(GameEvent::StartMusic);
        self.set_phase(GamePhase::Playing);
    }

    /// GameOver -> Restarting -> Playing
    fn restart(&mut self) {
        self.set_phase(GamePhase::Restarting);

        self.scores.reset_run();
        self.emit_score();

        self.registry.bird.reset(&self.config);
        self.scheduler.cancel(TimerKind::BirdRoll);
        let bird = &self.registry.bird;
        let moved = GameEvent::EntityMoved {
            id: bird.id,
            pos: bird.pos,
            rotation: bird.rotation,
        };
        self.emit(moved);

        for id in self.registry.clear_obstacles() {
            self.scheduler.cancel_owned(id);
            self.emit(GameEvent::EntityRemoved { id });
        }
        self.touching.clear();
        self.contacts.clear();

        self.run_speed = 1.0;
        self.emit(GameEvent::RestartMusic);
        self.set_phase(GamePhase::Playing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_state() -> GameState {
        let config = GameConfig {
            seed: Some(42),
            ..Default::default()
        };
        GameState::new(config, MemoryStore::new()).unwrap()
    }

    #[test]
    fn test_new_state_is_ready_and_static() {
        let state = new_state();
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.run_speed, 0.0);
        assert!(state.scheduler.is_empty());
        assert_eq!(
            state.events().last(),
            Some(&GameEvent::RunStateChanged(GamePhase::Ready))
        );
        let created = state
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::EntityCreated { .. }))
            .count();
        let expected = 1 + state.registry.ground().len() + state.registry.clouds().len();
        assert_eq!(created, expected);
    }

    #[test]
    fn test_invalid_config_rejected_at_startup() {
        let config = GameConfig {
            gap_fraction: 0.95,
            ..Default::default()
        };
        assert!(GameState::new(config, MemoryStore::new()).is_err());
    }

    #[test]
    fn test_activate_in_ready_starts_run() {
        let mut state = new_state();
        state.registry.bird.vel = glam::Vec2::new(0.0, -120.0);
        state.drain_events();

        state.activate();

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.run_speed, 1.0);
        assert_eq!(state.registry.bird.vel.y, state.config.flap_velocity);
        assert!(state.scheduler.is_pending(TimerKind::SpawnObstacle));
        assert!(state.scheduler.is_pending(TimerKind::SpawnItem));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::StartMusic));
        assert!(events.contains(&GameEvent::RunStateChanged(GamePhase::Playing)));
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = new_state();
        let b = new_state();
        assert_eq!(a.seed, b.seed);
        assert_eq!(a.seed, 42);
    }

    #[test]
    fn test_despawn_unknown_is_noop() {
        let mut state = new_state();
        state.drain_events();
        assert!(!state.despawn(EntityId(999)));
        assert!(state.events().is_empty());
    }
}
