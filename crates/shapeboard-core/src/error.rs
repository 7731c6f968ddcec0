//! Error types for canvas operations.

use crate::shapes::{ShapeId, ShapeKind};
use thiserror::Error;

/// A user action the engine refused to perform.
///
/// A rejected operation leaves the scene untouched. Callers are expected to
/// surface the message as a warning (toast, status line) and carry on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("Cannot drop a {kind} here: the spot is taken by {existing}")]
    DropOverlap { kind: ShapeKind, existing: ShapeId },
    #[error("Select at least 2 shapes to distribute ({selected} selected)")]
    TooFewToDistribute { selected: usize },
    #[error("Zoom {requested} is outside the allowed range [{min}, {max}]")]
    ZoomOutOfRange { requested: f64, min: f64, max: f64 },
    #[error("Select at least 2 shapes to group ({selected} selected)")]
    NothingToGroup { selected: usize },
}

/// Result type for operations the user can be refused.
pub type CanvasResult<T> = Result<T, Rejection>;

/// Errors raised while importing scene data.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Shape {id} is missing required field '{field}'")]
    MissingField { id: String, field: &'static str },
    #[error("Unsupported shape type: {0}")]
    UnknownKind(String),
    #[error("Image data is not a PNG, JPEG, WebP or SVG file")]
    InvalidImage,
    #[error("Shape id {0} appears more than once")]
    DuplicateId(String),
}

/// Result type for scene import.
pub type SceneResult<T> = Result<T, SceneError>;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
