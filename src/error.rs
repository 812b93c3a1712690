//! Error types for block geometry resolution.

use thiserror::Error;

/// Result type alias using GeometryError.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Main error type for model parsing, geometry building and scheduling.
#[derive(Error, Debug)]
pub enum GeometryError {
    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (CLI file access only).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Model JSON parsed but violates block model rules.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// An element could not be turned into geometry.
    #[error("Malformed element {index}: {reason}")]
    MalformedElement { index: usize, reason: String },

    /// Failed to flatten a model's parent chain.
    #[error("Model resolution error: {0}")]
    ModelResolution(String),

    /// Model inheritance chain too deep (circular reference protection).
    #[error("Model inheritance too deep (possible circular reference): {0}")]
    ModelInheritanceTooDeep(String),

    /// No usable variant in a blockstate definition.
    #[error("Blockstate resolution error: {0}")]
    BlockstateResolution(String),

    /// The background worker could not be started and inline fallback is disabled.
    #[error("Background geometry worker unavailable: {0}")]
    WorkerUnavailable(String),

    /// The scheduler was shut down before the request completed.
    #[error("Geometry scheduler has been shut down")]
    SchedulerShutdown,
}
