//! # Snapshot Pool Benchmark
//!
//! Measures the caller-side cost of the pool API:
//! 1. Least-loaded placement scan over worker counts
//! 2. Visual broadcast (one enqueue per worker)
//! 3. Camera add + remove round trip through the routing table
//!
//! Run with: `cargo bench --package prism_pool`

#![allow(missing_docs)]

use std::num::NonZeroU32;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use prism_pool::{
    least_loaded, Camera, CameraPose, Pose, PoolConfig, RenderContext, RenderResult,
    SnapshotPool, Token, Visual,
};

/// Renderer that does nothing, so only pool overhead is measured.
struct NullContext;

impl RenderContext for NullContext {
    type Content = ();
    type Handle = ();
    type Image = ();

    fn instantiate(&mut self, _token: Token, _content: &()) -> RenderResult<()> {
        Ok(())
    }

    fn release(&mut self, _handle: ()) {}

    fn apply_pose(&mut self, _handle: &(), _pose: Pose) -> RenderResult<()> {
        Ok(())
    }

    fn render(&mut self, _view: &CameraPose, _pixel_size: NonZeroU32) -> RenderResult<()> {
        Ok(())
    }
}

fn null_pool(workers: usize) -> SnapshotPool<impl prism_pool::RenderBackend<Context = NullContext>> {
    let backend = |_: usize| -> RenderResult<NullContext> { Ok(NullContext) };
    match SnapshotPool::new(PoolConfig::with_workers(workers), backend) {
        Ok(pool) => pool,
        Err(err) => panic!("benchmark pool failed to start: {err}"),
    }
}

fn bench_least_loaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("least_loaded");

    for workers in [4_usize, 16, 64] {
        let counts: Vec<usize> = (0..workers).map(|i| (i * 7919) % 13).collect();
        group.bench_with_input(BenchmarkId::from_parameter(workers), &counts, |b, counts| {
            b.iter(|| black_box(least_loaded(counts.iter().copied())));
        });
    }

    group.finish();
}

fn bench_visual_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("visual_broadcast");

    for workers in [1_usize, 4, 8] {
        let pool = null_pool(workers);
        let mut next = 0_u64;
        group.bench_function(BenchmarkId::from_parameter(workers), |b| {
            b.iter(|| {
                next += 1;
                pool.add_visual(Visual::new_static(Token::new(next), ()));
            });
        });
        let _ = pool.shutdown();
    }

    group.finish();
}

fn bench_camera_round_trip(c: &mut Criterion) {
    let pool = null_pool(4);
    let camera = Arc::new(
        Camera::new(
            Token::new(1),
            NonZeroU32::MIN,
            CameraPose::default,
            |()| {},
        )
        .with_on(false),
    );

    c.bench_function("camera_add_remove", |b| {
        b.iter(|| {
            let owner = pool.add_camera(Arc::clone(&camera));
            black_box(owner.is_ok());
            black_box(pool.remove_camera(Token::new(1)).is_ok());
        });
    });

    let _ = pool.shutdown();
}

criterion_group!(
    benches,
    bench_least_loaded,
    bench_visual_broadcast,
    bench_camera_round_trip
);
criterion_main!(benches);
