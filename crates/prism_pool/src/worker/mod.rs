//! # Workers
//!
//! A worker is one dedicated OS thread that owns one render context for the
//! pool's whole lifetime. The pool talks to it only through its inbox.
//!
//! ```text
//!  any thread ──┐
//!  any thread ──┼──> [unbounded inbox] ──> worker thread ──> render context
//!  any thread ──┘                                │
//!                                                └──> camera sinks
//! ```
//!
//! The loop body runs inside a failure boundary: an error or panic ends this
//! worker only, and is recorded as [`WorkerHealth::Faulted`].

mod command;
mod pacing;
mod shared;
mod state;

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use prism_core::{RenderBackend, RenderContext, RenderError, RenderResult};

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};
use crate::health::{WorkerHealth, WorkerStats};

pub(crate) use command::Command;
use pacing::Pacing;
use shared::WorkerShared;
use state::WorkerState;

/// Index of a worker within its pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerId(usize);

impl WorkerId {
    /// Creates a worker id from its index.
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// How a worker thread ended during shutdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Exit {
    Joined,
    TimedOut,
}

/// Pool-side handle to a running worker.
pub(crate) struct WorkerHandle<R: RenderContext> {
    id: WorkerId,
    inbox: Sender<Command<R>>,
    shared: Arc<WorkerShared>,
    thread: JoinHandle<()>,
    /// Never sent on; disconnects when the worker thread drops its end.
    exited: Receiver<()>,
}

/// A spawned worker that has not confirmed its render context yet.
pub(crate) struct PendingWorker<R: RenderContext> {
    handle: WorkerHandle<R>,
    ready: Receiver<RenderResult<()>>,
}

impl<R: RenderContext + 'static> PendingWorker<R> {
    /// Spawns the worker thread. The render context is built on that thread.
    pub(crate) fn spawn<B>(id: WorkerId, backend: Arc<B>, config: &PoolConfig) -> PoolResult<Self>
    where
        B: RenderBackend<Context = R>,
    {
        let (inbox, commands) = unbounded();
        let (ready_tx, ready) = bounded(1);
        let (exit_tx, exited) = bounded::<()>(0);
        let shared = Arc::new(WorkerShared::new(id));
        let pacing = Pacing::for_worker(config, id.index());

        let thread_shared = Arc::clone(&shared);
        let thread = thread::Builder::new()
            .name(format!("{}-{}", config.thread_name_prefix, id.index()))
            .spawn(move || {
                let _exit = exit_tx;
                worker_main(id, &*backend, &commands, &thread_shared, pacing, &ready_tx);
            })
            .map_err(|source| PoolError::Spawn { worker: id, source })?;

        Ok(Self {
            handle: WorkerHandle {
                id,
                inbox,
                shared,
                thread,
                exited,
            },
            ready,
        })
    }

    /// Waits until the worker reports its render context built.
    ///
    /// On failure the worker is left to the caller to stop.
    pub(crate) fn await_ready(self, deadline: Instant) -> Result<WorkerHandle<R>, (WorkerHandle<R>, PoolError)> {
        let id = self.handle.id;
        let timeout = deadline.saturating_duration_since(Instant::now());
        match self.ready.recv_timeout(timeout) {
            Ok(Ok(())) => Ok(self.handle),
            Ok(Err(source)) => Err((self.handle, PoolError::WorkerStartup { worker: id, source })),
            Err(RecvTimeoutError::Timeout) => Err((self.handle, PoolError::StartupTimeout(id))),
            Err(RecvTimeoutError::Disconnected) => Err((self.handle, PoolError::WorkerExited(id))),
        }
    }

    pub(crate) fn into_handle(self) -> WorkerHandle<R> {
        self.handle
    }
}

impl<R: RenderContext> WorkerHandle<R> {
    pub(crate) fn id(&self) -> WorkerId {
        self.id
    }

    /// Non-blocking append. A command for a dead worker is dropped.
    pub(crate) fn enqueue(&self, command: Command<R>) {
        if let Err(err) = self.inbox.send(command) {
            tracing::warn!(worker = %self.id, command = ?err.0, "worker inbox closed, command dropped");
        }
    }

    pub(crate) fn camera_count(&self) -> usize {
        self.shared.camera_count()
    }

    pub(crate) fn health(&self) -> WorkerHealth {
        self.shared.health()
    }

    pub(crate) fn stats(&self) -> WorkerStats {
        self.shared.stats()
    }

    /// Raises the stop signal. The worker sees it at the top of its loop or
    /// before its next snapshot.
    pub(crate) fn request_stop(&self) {
        self.shared.request_stop();
    }

    /// Waits for the thread until `deadline`, then lets go of it either way.
    pub(crate) fn join(self, deadline: Instant) -> Exit {
        let Self {
            id,
            inbox,
            thread,
            exited,
            ..
        } = self;
        // Closing the inbox wakes an idle worker immediately.
        drop(inbox);

        let timeout = deadline.saturating_duration_since(Instant::now());
        match exited.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(worker = %id, "worker did not stop in time, detaching");
                Exit::TimedOut
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                // The thread body has returned; join only reaps it.
                let _ = thread.join();
                Exit::Joined
            }
        }
    }
}

/// Thread body: build the context, report ready, loop inside the failure
/// boundary, record how it ended.
fn worker_main<B: RenderBackend>(
    id: WorkerId,
    backend: &B,
    commands: &Receiver<Command<B::Context>>,
    shared: &Arc<WorkerShared>,
    mut pacing: Pacing,
    ready: &Sender<RenderResult<()>>,
) {
    let built = catch_unwind(AssertUnwindSafe(|| backend.create_context(id.index())))
        .unwrap_or_else(|payload| {
            Err(RenderError::Backend(format!(
                "panic while creating render context: {}",
                panic_message(payload.as_ref())
            )))
        });

    let context = match built {
        Ok(context) => context,
        Err(err) => {
            tracing::error!(worker = %id, error = %err, "render context creation failed");
            shared.set_health(WorkerHealth::Faulted(err.to_string()));
            let _ = ready.send(Err(err));
            return;
        }
    };

    shared.set_health(WorkerHealth::Running);
    let _ = ready.send(Ok(()));
    tracing::info!(worker = %id, "worker started");

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut state = WorkerState::new(context, Arc::clone(shared));
        state.run(commands, &mut pacing)
    }));

    let health = match outcome {
        Ok(Ok(())) => {
            tracing::info!(worker = %id, "worker stopped");
            WorkerHealth::Stopped
        }
        Ok(Err(err)) => {
            tracing::error!(worker = %id, error = %err, "worker faulted");
            WorkerHealth::Faulted(err.to_string())
        }
        Err(payload) => {
            let reason = format!("panic: {}", panic_message(payload.as_ref()));
            tracing::error!(worker = %id, %reason, "worker faulted");
            WorkerHealth::Faulted(reason)
        }
    };
    shared.set_health(health);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
