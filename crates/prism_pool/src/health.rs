//! # Worker Health & Statistics
//!
//! A worker that faults stops servicing its cameras. The fault is not
//! propagated anywhere; it is recorded here so the pool owner can notice.
//!
//! ```text
//! Starting ──> Running ──> Stopped
//!    │            │
//!    └────────────┴──> Faulted(reason)
//! ```

use crate::worker::WorkerId;

/// Lifecycle state of one worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkerHealth {
    /// Thread spawned, render context not built yet.
    Starting,
    /// Looping normally.
    Running,
    /// Loop ended on an error or panic. Cameras on this worker are dark.
    Faulted(String),
    /// Loop ended on request.
    Stopped,
}

impl WorkerHealth {
    /// Returns true if the worker is, or is about to be, servicing cameras.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }

    /// Returns true if the worker died on an error.
    #[must_use]
    pub fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted(_))
    }
}

/// Point-in-time counters of one worker.
///
/// Counters are read without synchronization across fields, so a snapshot
/// taken while the worker runs can mix two adjacent passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerStats {
    /// Which worker.
    pub worker: WorkerId,
    /// Cameras attached as of the last drain.
    pub cameras: usize,
    /// Visuals instantiated as of the last drain.
    pub visuals: usize,
    /// Completed photography passes.
    pub passes: u64,
    /// Snapshots handed to sinks.
    pub snapshots: u64,
    /// Camera visits skipped because the camera was off.
    pub skipped: u64,
}
