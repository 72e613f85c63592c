//! Configuration errors
//!
//! Only externally supplied configuration can fail. Geometry built from
//! in-code constants asserts instead, and the per-step path never errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric setting fell outside its allowed range
    #[error("{field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f32 },

    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("settings file: {0}")]
    Io(#[from] std::io::Error),
}
