//! Flap Sim - simulation core for a side-scrolling obstacle game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `config`: Data-driven tuning, validated at startup
//! - `persistence`: Best-score storage backends
//! - `platform`: Browser/native platform glue (logging setup)

pub mod config;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod sim;

pub use config::GameConfig;
pub use error::{ConfigError, StoreError};
pub use persistence::{BestScoreStore, MemoryStore};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Extra distance at which a resting body still counts as touching
    pub const CONTACT_SLOP: f32 = 0.5;

    /// Persistence key for the best score
    pub const BEST_SCORE_KEY: &str = "BEST";
}
