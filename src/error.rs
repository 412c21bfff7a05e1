//! Error types for the store and the editing commands.
//!
//! The status engine itself never fails; these only cover reading and writing
//! the fleet database and rejecting bad edits.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Vehicle {0} not found")]
    VehicleNotFound(u64),

    #[error("Unit number '{0}' is already in use")]
    DuplicateUnit(String),

    #[error("Invalid date '{0}'. Use YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("New odometer {new} is lower than the current reading {current}")]
    OdometerRollback { current: i64, new: i64 },

    #[error("Invalid odometer reading {0}")]
    InvalidOdometer(i64),

    #[error("Interval {value} is too small (minimum {min})")]
    IntervalTooSmall { value: i64, min: i64 },

    #[error("Terminal UI failed: {0}")]
    Tui(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FleetError>;
