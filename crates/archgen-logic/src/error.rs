//! Structural error types.
//!
//! These are reserved for malformed inputs. Placement failures and policy
//! violations are reported as data (`UnplacedRoom`, `Finding`), never as
//! errors.

use thiserror::Error;

use crate::constants::RoomType;

/// Plot construction or envelope failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlotError {
    #[error("invalid plot dimensions: {width}×{length} (width and length must be positive)")]
    InvalidDimensions { width: f32, length: f32 },
    #[error("plot too small: {width}×{length}, minimum side is {min} m")]
    TooSmall { width: f32, length: f32, min: f32 },
    #[error("plot too large: {width}×{length}, maximum side is {max} m")]
    TooLarge { width: f32, length: f32, max: f32 },
    #[error("unbuildable plot: setbacks leave {width}×{length}, minimum side is {min} m")]
    Unbuildable { width: f32, length: f32, min: f32 },
    #[error("negative setback: {0}")]
    NegativeSetback(f32),
    #[error("unsupported plot shape {0:?}: only rectangles are supported")]
    UnsupportedShape(crate::plot::PlotShape),
}

/// Requirement input that cannot be expanded into a room program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequirementError {
    #[error("floor count {0} out of range 1..=10")]
    InvalidFloorCount(u32),
    #[error("bedroom count {0} exceeds 12")]
    TooManyBedrooms(u32),
    #[error("bathroom count {0} out of range 1..=12")]
    InvalidBathroomCount(u32),
    #[error("room spec {id} is malformed: {reason}")]
    MalformedRoom { id: String, reason: String },
    #[error("no room standard defined for {0}")]
    MissingStandard(RoomType),
}

/// Failure of a whole `solve` call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error(transparent)]
    Requirement(#[from] RequirementError),
    #[error("invalid solver config: {0:?}")]
    InvalidConfig(Vec<crate::config::ConfigError>),
    /// Raised inside the per-floor placement loop; caught by the floor
    /// solve and recorded as a critical log line.
    #[error("grid access out of range at row {row}, col {col}")]
    GridOutOfRange { row: usize, col: usize },
    #[error("occupancy grid of {rows}×{cols} cells exceeds the limit of {max}")]
    GridTooLarge { rows: usize, cols: usize, max: usize },
}

/// Rejection of an interactive edit. The input layout is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("room {room_id} not found on level {level}")]
    RoomNotFound { level: u32, room_id: String },
    #[error("edit rejected: {0}")]
    Rejected(String),
}
