//! Probed mock renderer shared by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use prism_pool::{
    Camera, CameraPose, Pose, PoolConfig, RenderBackend, RenderContext, RenderError, RenderResult,
    Token, Vec3,
};

/// What one worker's context has done.
#[derive(Default)]
pub struct WorkerProbe {
    pub renders_started: AtomicU64,
    pub renders: AtomicU64,
    pub pose_writes: AtomicU64,
    pub scene: Mutex<BTreeSet<Token>>,
    pub fail_renders: AtomicBool,
    pub render_delay_ms: AtomicU64,
}

pub struct Probe {
    pub workers: Vec<WorkerProbe>,
}

impl Probe {
    pub fn new(worker_count: usize) -> Arc<Self> {
        Arc::new(Self {
            workers: (0..worker_count).map(|_| WorkerProbe::default()).collect(),
        })
    }

    pub fn total_renders(&self) -> u64 {
        self.workers
            .iter()
            .map(|w| w.renders.load(Ordering::Relaxed))
            .sum()
    }

    pub fn scene(&self, worker: usize) -> BTreeSet<Token> {
        self.workers[worker].scene.lock().clone()
    }
}

/// Snapshot produced by the mock: which worker rendered it and at what size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub worker: usize,
    pub pixel_size: u32,
}

pub struct MockContext {
    worker: usize,
    probe: Arc<Probe>,
    next_handle: u64,
    handles: HashMap<u64, Token>,
}

impl RenderContext for MockContext {
    type Content = String;
    type Handle = u64;
    type Image = Frame;

    fn instantiate(&mut self, token: Token, content: &String) -> RenderResult<u64> {
        if content == "poison" {
            return Err(RenderError::InvalidContent {
                token,
                reason: "poisoned payload".to_string(),
            });
        }
        self.next_handle += 1;
        self.handles.insert(self.next_handle, token);
        self.probe.workers[self.worker].scene.lock().insert(token);
        Ok(self.next_handle)
    }

    fn release(&mut self, handle: u64) {
        if let Some(token) = self.handles.remove(&handle) {
            self.probe.workers[self.worker].scene.lock().remove(&token);
        }
    }

    fn apply_pose(&mut self, handle: &u64, _pose: Pose) -> RenderResult<()> {
        if !self.handles.contains_key(handle) {
            return Err(RenderError::UnknownHandle);
        }
        self.probe.workers[self.worker]
            .pose_writes
            .fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn render(&mut self, _view: &CameraPose, pixel_size: NonZeroU32) -> RenderResult<Frame> {
        let probe = &self.probe.workers[self.worker];
        probe.renders_started.fetch_add(1, Ordering::Relaxed);
        let delay = probe.render_delay_ms.load(Ordering::Relaxed);
        if delay > 0 {
            thread::sleep(Duration::from_millis(delay));
        }
        if probe.fail_renders.load(Ordering::Relaxed) {
            return Err(RenderError::Backend("injected render failure".to_string()));
        }
        probe.renders.fetch_add(1, Ordering::Relaxed);
        Ok(Frame {
            worker: self.worker,
            pixel_size: pixel_size.get(),
        })
    }
}

pub struct MockBackend {
    pub probe: Arc<Probe>,
    pub fail_startup: Option<usize>,
}

impl RenderBackend for MockBackend {
    type Context = MockContext;

    fn create_context(&self, worker_index: usize) -> RenderResult<MockContext> {
        if self.fail_startup == Some(worker_index) {
            return Err(RenderError::Backend("no device".to_string()));
        }
        Ok(MockContext {
            worker: worker_index,
            probe: Arc::clone(&self.probe),
            next_handle: 0,
            handles: HashMap::new(),
        })
    }
}

/// Fast-pacing config for tests.
pub fn config(workers: usize) -> PoolConfig {
    PoolConfig {
        worker_count: workers,
        idle_backoff_min_ms: 1,
        idle_backoff_max_ms: 3,
        pass_interval_us: 200,
        shutdown_timeout_ms: 2_000,
        ..PoolConfig::default()
    }
}

pub fn backend(workers: usize) -> (MockBackend, Arc<Probe>) {
    let probe = Probe::new(workers);
    (
        MockBackend {
            probe: Arc::clone(&probe),
            fail_startup: None,
        },
        probe,
    )
}

/// Camera that counts snapshots and remembers which worker rendered the last one.
pub struct CameraProbe {
    pub delivered: AtomicUsize,
    pub last_worker: AtomicUsize,
}

pub fn camera(token: u64, pixel_size: u32) -> (Arc<Camera<Frame>>, Arc<CameraProbe>) {
    let probe = Arc::new(CameraProbe {
        delivered: AtomicUsize::new(0),
        last_worker: AtomicUsize::new(usize::MAX),
    });
    let sink = Arc::clone(&probe);
    let camera = Camera::new(
        Token::new(token),
        NonZeroU32::new(pixel_size).unwrap(),
        || CameraPose::at(Vec3::new(0.0, 5.0, 10.0)),
        move |frame: Frame| {
            sink.last_worker.store(frame.worker, Ordering::Relaxed);
            sink.delivered.fetch_add(1, Ordering::Relaxed);
        },
    );
    (Arc::new(camera), probe)
}

/// Polls `condition` until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    condition()
}

pub const PATIENCE: Duration = Duration::from_secs(5);
