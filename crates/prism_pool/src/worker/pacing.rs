//! Loop pacing: jittered idle sleep and the pause between passes.
//!
//! Each worker draws its idle interval from its own seeded RNG, so a pool of
//! idle workers does not wake up in lockstep.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::PoolConfig;

pub(crate) struct Pacing {
    rng: ChaCha8Rng,
    idle_min_ms: u64,
    idle_max_ms: u64,
    pass_interval: Duration,
}

impl Pacing {
    pub(crate) fn for_worker(config: &PoolConfig, index: usize) -> Self {
        let seed = config.jitter_seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            idle_min_ms: config.idle_backoff_min_ms,
            idle_max_ms: config.idle_backoff_max_ms,
            pass_interval: config.pass_interval(),
        }
    }

    /// Next idle interval, uniform in `[min, max]` milliseconds.
    pub(crate) fn idle_backoff(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(self.idle_min_ms..=self.idle_max_ms))
    }

    pub(crate) fn pass_pause(&self) {
        if self.pass_interval.is_zero() {
            std::thread::yield_now();
        } else {
            std::thread::sleep(self.pass_interval);
        }
    }
}
