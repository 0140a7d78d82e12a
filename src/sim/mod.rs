//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entity;
pub mod event;
pub mod geom;
pub mod score;
pub mod spawner;
pub mod state;
pub mod step;
pub mod tick;
pub mod timer;

pub use collision::{Contact, ContactSide};
pub use entity::{
    Bird, Category, CategorySet, Cloud, EntityId, EntityKind, GroundSegment, Item, ObstaclePair,
    Region, RegionId, Registry,
};
pub use event::{Cue, GameEvent};
pub use geom::Rect;
pub use score::ScoreTracker;
pub use state::{GameState, GamePhase};
pub use step::FixedStep;
pub use tick::{TickInput, tick};
pub use timer::{Clock, Scheduler, Timer, TimerKind};
