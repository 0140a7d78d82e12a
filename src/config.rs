//! Game tuning
//!
//! Every constant of the run lives here so hosts can override it from JSON.
//! Missing fields fall back to their defaults. A config is validated once
//! when the world is built; an impossible layout never reaches the sim.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Simulation tuning (pixels, seconds, y axis pointing up)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Ground & scenery ===
    /// Height of the solid ground strip at the bottom of the screen
    pub ground_height: f32,
    pub ground_tile_width: f32,
    /// Seconds for the ground to scroll one tile width
    pub ground_scroll_secs: f32,
    pub cloud_tile_width: f32,
    pub cloud_tile_height: f32,
    /// Seconds for the clouds to scroll one tile width
    pub cloud_scroll_secs: f32,

    // === Bird ===
    pub bird_radius: f32,
    /// Start position as a fraction of the screen size
    pub bird_start_x: f32,
    pub bird_start_y: f32,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Upward velocity set by a flap (pixels/s)
    pub flap_velocity: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub obstacle_interval_secs: f32,
    /// Seconds for a pair to cross the screen plus its own width
    pub obstacle_travel_secs: f32,
    /// Gap height as a fraction of screen height
    pub gap_fraction: f32,
    /// Range of the gap center as a fraction of screen height
    pub gap_band_fraction: f32,

    // === Items ===
    pub item_size: f32,
    pub item_interval_secs: f32,
    /// Seconds for an item to travel twice the screen width
    pub item_travel_secs: f32,
    /// Range of the item offset on each axis as a fraction of the screen
    pub item_spread_fraction: f32,

    // === Game over ===
    /// Roll angle is `π × bird_y × roll_factor`; cosmetic, tune freely
    pub roll_factor: f32,
    pub roll_secs: f32,

    /// Fixed RNG seed (random per world when absent)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 375.0,
            screen_height: 667.0,

            ground_height: 112.0,
            ground_tile_width: 336.0,
            ground_scroll_secs: 5.0,
            cloud_tile_width: 200.0,
            cloud_tile_height: 60.0,
            cloud_scroll_secs: 20.0,

            bird_radius: 12.0,
            bird_start_x: 0.2,
            bird_start_y: 0.7,
            gravity: 600.0,
            flap_velocity: 300.0,

            obstacle_width: 52.0,
            obstacle_interval_secs: 3.5,
            obstacle_travel_secs: 4.0,
            gap_fraction: 1.0 / 6.0,
            gap_band_fraction: 0.25,

            item_size: 30.0,
            item_interval_secs: 2.0,
            item_travel_secs: 4.0,
            item_spread_fraction: 0.5,

            roll_factor: 0.01,
            roll_secs: 1.0,

            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject layouts the spawners could not honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("ground_tile_width", self.ground_tile_width),
            ("ground_scroll_secs", self.ground_scroll_secs),
            ("cloud_tile_width", self.cloud_tile_width),
            ("cloud_scroll_secs", self.cloud_scroll_secs),
            ("bird_radius", self.bird_radius),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_interval_secs", self.obstacle_interval_secs),
            ("obstacle_travel_secs", self.obstacle_travel_secs),
            ("item_size", self.item_size),
            ("item_interval_secs", self.item_interval_secs),
            ("item_travel_secs", self.item_travel_secs),
            ("roll_secs", self.roll_secs),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let fractions = [
            ("bird_start_x", self.bird_start_x),
            ("bird_start_y", self.bird_start_y),
            ("gap_fraction", self.gap_fraction),
            ("gap_band_fraction", self.gap_band_fraction),
            ("item_spread_fraction", self.item_spread_fraction),
        ];
        for (field, value) in fractions {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::FractionOutOfRange { field, value });
            }
        }

        let floor = self.ground_height.max(0.0);
        let ceiling = self.screen_height;

        let lowest = self.center_y() - self.gap_band() / 2.0 - self.gap_height() / 2.0;
        let highest = self.center_y() + self.gap_band() / 2.0 + self.gap_height() / 2.0;
        if lowest <= floor || highest >= ceiling {
            return Err(ConfigError::GapDoesNotFit {
                lowest,
                highest,
                floor,
                ceiling,
            });
        }

        let start_y = self.bird_start().y;
        if start_y - self.bird_radius <= floor || start_y >= ceiling {
            return Err(ConfigError::BirdOutOfBounds {
                y: start_y,
                floor,
                ceiling,
            });
        }

        Ok(())
    }

    /// Vertical center of the screen
    #[inline]
    pub fn center_y(&self) -> f32 {
        self.screen_height / 2.0
    }

    /// Constant opening between the two segments of a pair
    #[inline]
    pub fn gap_height(&self) -> f32 {
        self.screen_height * self.gap_fraction
    }

    /// Width of the band the gap center is drawn from
    #[inline]
    pub fn gap_band(&self) -> f32 {
        self.screen_height * self.gap_band_fraction
    }

    /// Leftward obstacle speed (pixels/s at run speed 1)
    pub fn obstacle_speed(&self) -> f32 {
        (self.screen_width + self.obstacle_width) / self.obstacle_travel_secs
    }

    /// Leftward item speed (pixels/s at run speed 1)
    pub fn item_speed(&self) -> f32 {
        self.screen_width * 2.0 / self.item_travel_secs
    }

    pub fn bird_start(&self) -> Vec2 {
        Vec2::new(
            self.screen_width * self.bird_start_x,
            self.screen_height * self.bird_start_y,
        )
    }

    /// Ground tiles needed to cover the screen while scrolling
    pub fn ground_tile_count(&self) -> usize {
        (self.screen_width / self.ground_tile_width) as usize + 2
    }

    pub fn cloud_tile_count(&self) -> usize {
        (self.screen_width / self.cloud_tile_width) as usize + 2
    }
}
