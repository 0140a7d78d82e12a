//! Error types
//!
//! The simulation itself never fails; errors only come from loading
//! configuration and from persistence backends.

use thiserror::Error;

/// Rejected configuration, reported once at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A field that must be finite and strictly positive was not
    #[error("{field} must be a finite positive number, got {value}")]
    NotPositive {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// A fraction of the screen fell outside (0, 1)
    #[error("{field} must be within (0, 1), got {value}")]
    FractionOutOfRange {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// Gap plus its random band does not fit between ground and screen top
    #[error(
        "obstacle gap does not fit: gap spans [{lowest}, {highest}] but playable area is [{floor}, {ceiling}]"
    )]
    GapDoesNotFit {
        /// Lowest possible bottom edge of the gap
        lowest: f32,
        /// Highest possible top edge of the gap
        highest: f32,
        /// Top of the ground
        floor: f32,
        /// Top of the screen
        ceiling: f32,
    },

    /// Bird start position is inside the ground or above the screen
    #[error("bird start height {y} is outside the playable area [{floor}, {ceiling}]")]
    BirdOutOfBounds {
        /// Start height in pixels
        y: f32,
        /// Top of the ground
        floor: f32,
        /// Top of the screen
        ceiling: f32,
    },

    /// Malformed JSON
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by a best-score backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying storage unavailable
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be parsed or written
    #[error("stored data is invalid: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O failure
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
