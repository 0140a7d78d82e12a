//! Events surfaced to rendering and audio collaborators
//!
//! The sim never renders or plays anything itself. Hosts drain these after
//! each tick and map them to sprites and sounds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind};
use super::state::GamePhase;

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Item collected
    Pickup,
    /// Bird hit the ground or an obstacle
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    // === Rendering ===
    EntityCreated {
        id: EntityId,
        kind: EntityKind,
        pos: Vec2,
        /// Full width/height of the visual bounds
        extent: Vec2,
    },
    EntityRemoved {
        id: EntityId,
    },
    EntityMoved {
        id: EntityId,
        pos: Vec2,
        rotation: f32,
    },
    ScoreChanged {
        score: u64,
        item_score: u64,
        best_score: u64,
    },
    RunStateChanged(GamePhase),

    // === Audio ===
    PlayCue(Cue),
    StartMusic,
    StopMusic,
    /// Rewind background music to the start and play
    RestartMusic,
}

impl GameEvent {
    /// Whether the event is meant for the audio collaborator
    pub fn is_audio(&self) -> bool {
        matches!(
            self,
            GameEvent::PlayCue(_)
                | GameEvent::StartMusic
                | GameEvent::StopMusic
                | GameEvent::RestartMusic
        )
    }
}
