//! # Snapshot Pool
//!
//! The coordinator. It owns a fixed set of workers and routes work to them:
//!
//! ```text
//! add_visual(v)    ──> every worker inbox         (broadcast)
//! remove_visual(t) ──> every worker inbox         (broadcast)
//! add_camera(c)    ──> least-loaded worker inbox  (routing table += c)
//! remove_camera(t) ──> owner's inbox              (routing table -= t, now)
//! ```
//!
//! Placement reads the routing table, not the workers: each worker's
//! reservation count moves together with the table, so back-to-back adds
//! spread out even before any worker has drained its inbox. The counts a
//! worker publishes itself lag behind and only feed [`SnapshotPool::camera_counts`]
//! and the stats.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use prism_core::{Camera, RenderBackend, RenderContext, Token, Visual};

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};
use crate::health::{WorkerHealth, WorkerStats};
use crate::placement::least_loaded;
use crate::worker::{Command, Exit, PendingWorker, WorkerHandle, WorkerId};

/// Content payload type accepted by a pool over backend `B`.
pub type ContentOf<B> = <<B as RenderBackend>::Context as RenderContext>::Content;

/// Snapshot type produced by a pool over backend `B`.
pub type ImageOf<B> = <<B as RenderBackend>::Context as RenderContext>::Image;

struct Route<I> {
    worker: WorkerId,
    camera: Arc<Camera<I>>,
}

/// Token -> owner map plus the number of routed cameras per worker.
struct Routing<I> {
    routes: HashMap<Token, Route<I>>,
    reserved: Vec<usize>,
}

impl<I> Routing<I> {
    fn new(worker_count: usize) -> Self {
        Self {
            routes: HashMap::new(),
            reserved: vec![0; worker_count],
        }
    }

    fn clear(&mut self) {
        self.routes.clear();
        self.reserved.iter_mut().for_each(|count| *count = 0);
    }
}

/// What happened to the workers during shutdown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Workers whose threads exited within the timeout.
    pub joined: usize,
    /// Workers still running when the timeout elapsed; they were detached.
    pub timed_out: Vec<WorkerId>,
}

impl ShutdownReport {
    /// Returns true if every worker exited in time.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.timed_out.is_empty()
    }
}

/// Multi-worker off-screen snapshot pool.
///
/// All methods take `&self` and may be called from any thread. They never
/// wait on a worker.
///
/// ## Usage
///
/// ```rust,ignore
/// let pool = SnapshotPool::new(PoolConfig::with_workers(4), backend)?;
///
/// pool.add_visual(Visual::new_static(Token::new(1), terrain));
/// let owner = pool.add_camera(Arc::new(agent_camera))?;
///
/// // ...
/// pool.remove_camera(Token::new(100))?;
/// let report = pool.shutdown();
/// ```
pub struct SnapshotPool<B: RenderBackend> {
    config: PoolConfig,
    workers: Vec<WorkerHandle<B::Context>>,
    routing: Mutex<Routing<ImageOf<B>>>,
}

impl<B: RenderBackend> SnapshotPool<B> {
    /// Starts `config.worker_count` workers, each building its own render
    /// context from `backend` on its own thread.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid or any single worker fails to start.
    /// Workers that did start are stopped before the error is returned.
    pub fn new(config: PoolConfig, backend: B) -> PoolResult<Self> {
        config.validate()?;
        let backend = Arc::new(backend);

        let mut pending = Vec::with_capacity(config.worker_count);
        for index in 0..config.worker_count {
            match PendingWorker::spawn(WorkerId::new(index), Arc::clone(&backend), &config) {
                Ok(worker) => pending.push(worker),
                Err(err) => {
                    let handles = pending.into_iter().map(PendingWorker::into_handle).collect();
                    Self::stop_workers(handles, &config);
                    return Err(err);
                }
            }
        }

        let deadline = Instant::now() + config.startup_timeout();
        let mut workers = Vec::with_capacity(config.worker_count);
        let mut failure = None;
        for worker in pending {
            if failure.is_some() {
                workers.push(worker.into_handle());
                continue;
            }
            match worker.await_ready(deadline) {
                Ok(handle) => workers.push(handle),
                Err((handle, err)) => {
                    workers.push(handle);
                    failure = Some(err);
                }
            }
        }

        if let Some(err) = failure {
            tracing::error!(error = %err, "pool startup failed");
            Self::stop_workers(workers, &config);
            return Err(err);
        }

        tracing::info!(workers = config.worker_count, "snapshot pool started");
        let routing = Mutex::new(Routing::new(workers.len()));
        Ok(Self {
            config,
            workers,
            routing,
        })
    }

    /// Broadcasts a Visual to every worker.
    ///
    /// Tokens are not checked: adding a token twice replaces the earlier
    /// Visual inside each worker.
    pub fn add_visual(&self, visual: Visual<ContentOf<B>>) {
        tracing::debug!(visual = %visual.token(), "broadcasting visual");
        for worker in &self.workers {
            worker.enqueue(Command::AddVisual(visual.clone()));
        }
    }

    /// Broadcasts removal of the Visual with `token` to every worker.
    pub fn remove_visual(&self, token: Token) {
        tracing::debug!(visual = %token, "broadcasting visual removal");
        for worker in &self.workers {
            worker.enqueue(Command::RemoveVisual(token));
        }
    }

    /// Places a Camera on the worker with the fewest routed cameras.
    ///
    /// Returns the chosen worker. The camera starts being photographed once
    /// that worker drains its inbox.
    ///
    /// # Errors
    ///
    /// [`PoolError::DuplicateCamera`] if the token is already registered.
    pub fn add_camera(&self, camera: Arc<Camera<ImageOf<B>>>) -> PoolResult<WorkerId> {
        let token = camera.token();
        let mut routing = self.routing.lock();
        if routing.routes.contains_key(&token) {
            return Err(PoolError::DuplicateCamera(token));
        }

        let Some(index) = least_loaded(routing.reserved.iter().copied()) else {
            return Err(PoolError::InvalidConfig("pool has no workers".to_string()));
        };
        let worker = &self.workers[index];

        worker.enqueue(Command::AddCamera(Arc::clone(&camera)));
        routing.reserved[index] += 1;
        routing.routes.insert(
            token,
            Route {
                worker: worker.id(),
                camera,
            },
        );
        tracing::debug!(camera = %token, worker = %worker.id(), "camera placed");
        Ok(worker.id())
    }

    /// Unregisters a Camera and tells its owner to drop it.
    ///
    /// The token is free again as soon as this returns, even though the owner
    /// may still photograph the camera until its next drain.
    ///
    /// # Errors
    ///
    /// [`PoolError::UnknownCamera`] if the token is not registered.
    pub fn remove_camera(&self, token: Token) -> PoolResult<WorkerId> {
        let mut routing = self.routing.lock();
        let route = routing
            .routes
            .remove(&token)
            .ok_or(PoolError::UnknownCamera(token))?;
        routing.reserved[route.worker.index()] -= 1;
        self.workers[route.worker.index()].enqueue(Command::RemoveCamera(route.camera));
        tracing::debug!(camera = %token, worker = %route.worker, "camera removed");
        Ok(route.worker)
    }

    /// Worker currently routed for `token`.
    #[must_use]
    pub fn owner_of(&self, token: Token) -> Option<WorkerId> {
        self.routing.lock().routes.get(&token).map(|route| route.worker)
    }

    /// All registered camera tokens, sorted.
    #[must_use]
    pub fn camera_tokens(&self) -> Vec<Token> {
        let mut tokens: Vec<_> = self.routing.lock().routes.keys().copied().collect();
        tokens.sort_unstable();
        tokens
    }

    /// Number of workers.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Per-worker camera counts as last published by each worker.
    #[must_use]
    pub fn camera_counts(&self) -> Vec<usize> {
        self.workers.iter().map(WorkerHandle::camera_count).collect()
    }

    /// Per-worker counters.
    #[must_use]
    pub fn worker_stats(&self) -> Vec<WorkerStats> {
        self.workers.iter().map(WorkerHandle::stats).collect()
    }

    /// Health of every worker, in worker order.
    #[must_use]
    pub fn health(&self) -> Vec<WorkerHealth> {
        self.workers.iter().map(WorkerHandle::health).collect()
    }

    /// Health of one worker.
    #[must_use]
    pub fn worker_health(&self, worker: WorkerId) -> Option<WorkerHealth> {
        self.workers.get(worker.index()).map(WorkerHandle::health)
    }

    /// Workers whose loop died on an error or panic.
    #[must_use]
    pub fn faulted_workers(&self) -> Vec<WorkerId> {
        self.workers
            .iter()
            .filter(|worker| worker.health().is_faulted())
            .map(WorkerHandle::id)
            .collect()
    }

    /// Configuration the pool was started with.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Stops every worker, waiting at most `shutdown_timeout` in total.
    ///
    /// Workers still running at the deadline are detached; their threads
    /// release their render contexts whenever their current render returns.
    pub fn shutdown(mut self) -> ShutdownReport {
        self.shutdown_workers()
    }

    fn shutdown_workers(&mut self) -> ShutdownReport {
        self.routing.lock().clear();
        let workers = std::mem::take(&mut self.workers);
        if workers.is_empty() {
            return ShutdownReport::default();
        }
        let report = Self::stop_workers(workers, &self.config);
        tracing::info!(
            joined = report.joined,
            timed_out = report.timed_out.len(),
            "snapshot pool shut down"
        );
        report
    }

    fn stop_workers(workers: Vec<WorkerHandle<B::Context>>, config: &PoolConfig) -> ShutdownReport {
        for worker in &workers {
            worker.request_stop();
        }

        let deadline = Instant::now() + config.shutdown_timeout();
        let mut report = ShutdownReport::default();
        for worker in workers {
            let id = worker.id();
            match worker.join(deadline) {
                Exit::Joined => report.joined += 1,
                Exit::TimedOut => report.timed_out.push(id),
            }
        }
        report
    }
}

impl<B: RenderBackend> Drop for SnapshotPool<B> {
    fn drop(&mut self) {
        self.shutdown_workers();
    }
}
