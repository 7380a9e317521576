//! State a worker publishes to the pool.
//!
//! Written by the worker thread, read by any thread. Only `stop` flows the
//! other way.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::WorkerId;
use crate::health::{WorkerHealth, WorkerStats};

pub(crate) struct WorkerShared {
    id: WorkerId,
    stop: AtomicBool,
    camera_count: AtomicUsize,
    visual_count: AtomicUsize,
    passes: AtomicU64,
    snapshots: AtomicU64,
    skipped: AtomicU64,
    health: Mutex<WorkerHealth>,
}

impl WorkerShared {
    pub(crate) fn new(id: WorkerId) -> Self {
        Self {
            id,
            stop: AtomicBool::new(false),
            camera_count: AtomicUsize::new(0),
            visual_count: AtomicUsize::new(0),
            passes: AtomicU64::new(0),
            snapshots: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            health: Mutex::new(WorkerHealth::Starting),
        }
    }

    #[inline]
    pub(crate) fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    #[inline]
    pub(crate) fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Optimistic: lags behind the inbox until the worker drains it.
    #[inline]
    pub(crate) fn camera_count(&self) -> usize {
        self.camera_count.load(Ordering::Acquire)
    }

    pub(crate) fn publish_counts(&self, cameras: Option<usize>, visuals: usize) {
        if let Some(cameras) = cameras {
            self.camera_count.store(cameras, Ordering::Release);
        }
        self.visual_count.store(visuals, Ordering::Release);
    }

    pub(crate) fn record_pass(&self, snapshots: u64, skipped: u64) {
        self.passes.fetch_add(1, Ordering::Relaxed);
        self.snapshots.fetch_add(snapshots, Ordering::Relaxed);
        self.skipped.fetch_add(skipped, Ordering::Relaxed);
    }

    pub(crate) fn set_health(&self, health: WorkerHealth) {
        *self.health.lock() = health;
    }

    pub(crate) fn health(&self) -> WorkerHealth {
        self.health.lock().clone()
    }

    pub(crate) fn stats(&self) -> WorkerStats {
        WorkerStats {
            worker: self.id,
            cameras: self.camera_count(),
            visuals: self.visual_count.load(Ordering::Acquire),
            passes: self.passes.load(Ordering::Relaxed),
            snapshots: self.snapshots.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}
