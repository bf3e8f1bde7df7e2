//! Error types for the Vitalspan engine
//!
//! The computation core itself has no fatal paths: missing inputs degrade to
//! zero-impact estimates and solver non-convergence returns a best-effort
//! result. These errors surface only at the storage, serialization, FFI, and
//! CLI boundaries.

use thiserror::Error;

/// Errors that can occur at the engine's boundaries
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Target store failure: {0}")]
    Storage(String),

    #[error("Unknown metric type: {0}")]
    UnknownMetric(String),

    #[error("Unknown reporting period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid improvement goal: {0}")]
    InvalidGoal(String),
}
