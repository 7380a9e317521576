//! # Pool Error Types
//!
//! Usage errors are returned synchronously from the pool API. Worker faults are
//! never returned here; they show up in [`crate::WorkerHealth`].

use prism_core::{RenderError, Token};
use thiserror::Error;

use crate::worker::WorkerId;

/// Errors returned by pool construction and the camera API.
#[derive(Error, Debug)]
pub enum PoolError {
    /// A camera with this token is already registered.
    #[error("camera {0} is already registered")]
    DuplicateCamera(Token),

    /// No camera with this token is registered.
    #[error("camera {0} is not registered")]
    UnknownCamera(Token),

    /// Rejected configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The OS refused to start a worker thread.
    #[error("failed to spawn {worker}: {source}")]
    Spawn {
        /// Worker that could not be spawned.
        worker: WorkerId,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A worker could not build its render context.
    #[error("{worker} failed to start: {source}")]
    WorkerStartup {
        /// Worker that failed.
        worker: WorkerId,
        /// Error reported by the render backend.
        #[source]
        source: RenderError,
    },

    /// A worker thread ended before reporting ready.
    #[error("{0} exited during startup")]
    WorkerExited(WorkerId),

    /// A worker did not report ready within the startup timeout.
    #[error("{0} did not start in time")]
    StartupTimeout(WorkerId),
}

impl PoolError {
    /// Returns true for caller mistakes (duplicate or unknown camera).
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::DuplicateCamera(_) | Self::UnknownCamera(_))
    }
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
