//! Explicit timer records
//!
//! Every delayed or repeating behavior of the run is a timer advanced once
//! per tick. World timers run on the global run speed (frozen at game over),
//! bird timers run on the bird's own speed.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;

/// What happens when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    SpawnObstacle,
    SpawnItem,
    /// Travel finished, remove the entity
    Despawn(EntityId),
    /// Game-over roll finished
    BirdRoll,
}

impl TimerKind {
    /// Entity whose removal cancels the timer
    pub fn owner(&self) -> Option<EntityId> {
        match self {
            TimerKind::Despawn(id) => Some(*id),
            _ => None,
        }
    }
}

/// Which speed a timer's time is scaled by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clock {
    World,
    Bird,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timer {
    pub kind: TimerKind,
    pub clock: Clock,
    /// Seconds until the next firing
    pub remaining: f32,
    /// Re-arm interval; one-shot when `None`
    pub period: Option<f32>,
}

/// Pending timers in arming order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire once after `delay` seconds
    pub fn once(&mut self, kind: TimerKind, clock: Clock, delay: f32) {
        self.timers.push(Timer {
            kind,
            clock,
            remaining: delay,
            period: None,
        });
    }

    /// Fire on the next advance, then every `period` seconds
    pub fn repeat_now(&mut self, kind: TimerKind, clock: Clock, period: f32) {
        self.timers.push(Timer {
            kind,
            clock,
            remaining: 0.0,
            period: Some(period),
        });
    }

    /// Drop every timer of the given kind
    pub fn cancel(&mut self, kind: TimerKind) {
        self.timers.retain(|t| t.kind != kind);
    }

    /// Drop every timer owned by an entity
    pub fn cancel_owned(&mut self, id: EntityId) {
        self.timers.retain(|t| t.kind.owner() != Some(id));
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.timers.iter().any(|t| t.kind == kind)
    }

    /// Seconds left on the first timer of a kind
    pub fn remaining(&self, kind: TimerKind) -> Option<f32> {
        self.timers
            .iter()
            .find(|t| t.kind == kind)
            .map(|t| t.remaining)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advance all timers and collect the ones that fired, in arming order
    ///
    /// A repeating timer whose period elapsed several times in one step
    /// fires once per elapsed period.
    pub fn advance(&mut self, world_dt: f32, bird_dt: f32) -> Vec<TimerKind> {
        let mut fired = Vec::new();

        for timer in &mut self.timers {
            let dt = match timer.clock {
                Clock::World => world_dt,
                Clock::Bird => bird_dt,
            };
            timer.remaining -= dt;

            while timer.remaining <= 0.0 {
                fired.push(timer.kind);
                match timer.period {
                    Some(period) => timer.remaining += period,
                    None => break,
                }
            }
        }

        self.timers.retain(|t| t.period.is_some() || t.remaining > 0.0);
        fired
    }
}
