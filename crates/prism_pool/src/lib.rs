//! # PRISM Snapshot Pool
//!
//! Off-screen "render as a service" for many concurrent consumers.
//!
//! A shared scene is mirrored into several workers. Each worker is a dedicated
//! thread with its own render context, photographing the cameras placed on it
//! and handing every snapshot to that camera's sink.
//!
//! ## Architecture
//!
//! ```text
//!                     ┌───────────────────────────┐
//!   add_visual ──────>│        SnapshotPool       │
//!   add_camera ──────>│  routing: token -> worker │
//!                     └─────┬─────────┬─────────┬─┘
//!                  broadcast│ least-loaded      │
//!                           ▼         ▼         ▼
//!                     ┌─────────┐┌─────────┐┌─────────┐
//!                     │worker-0 ││worker-1 ││worker-2 │
//!                     │ context ││ context ││ context │
//!                     │ cameras ││ cameras ││ cameras │
//!                     └────┬────┘└────┬────┘└────┬────┘
//!                          ▼          ▼          ▼
//!                        sinks      sinks      sinks
//! ```
//!
//! ## Guarantees
//!
//! 1. **Isolation** - a worker that errors or panics stops alone; see
//!    [`WorkerHealth`]
//! 2. **Per-worker FIFO** - commands to one worker apply in enqueue order
//! 3. **No blocking** - pool calls only enqueue or scan worker counts
//!
//! No ordering holds across workers: two workers may photograph different
//! versions of the scene at the same instant.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod health;
pub mod placement;
pub mod pool;
mod worker;

pub use config::PoolConfig;
pub use error::{PoolError, PoolResult};
pub use health::{WorkerHealth, WorkerStats};
pub use placement::least_loaded;
pub use pool::{ContentOf, ImageOf, ShutdownReport, SnapshotPool};
pub use worker::WorkerId;

pub use prism_core::{
    Camera, CameraPose, Pose, PoseSource, Quaternion, RenderBackend, RenderContext, RenderError,
    RenderResult, Token, Vec3, Visual,
};
