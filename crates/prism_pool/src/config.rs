//! # Pool Configuration
//!
//! Loaded once at startup, usually from TOML:
//!
//! ```toml
//! worker_count = 8
//! idle_backoff_min_ms = 5
//! idle_backoff_max_ms = 20
//! shutdown_timeout_ms = 1000
//! ```
//!
//! Missing keys fall back to [`PoolConfig::default`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, PoolResult};

/// Configuration for a snapshot pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of worker threads (fixed for the pool's lifetime).
    pub worker_count: usize,
    /// Lower bound of the idle sleep of a worker with no cameras (ms).
    pub idle_backoff_min_ms: u64,
    /// Upper bound of the idle sleep of a worker with no cameras (ms, at least 1).
    pub idle_backoff_max_ms: u64,
    /// Pause between two photography passes (us). 0 = yield only.
    pub pass_interval_us: u64,
    /// Total time `shutdown()` waits for workers to exit (ms).
    pub shutdown_timeout_ms: u64,
    /// Time construction waits for all workers to build their render contexts (ms).
    pub startup_timeout_ms: u64,
    /// Seed for the per-worker idle jitter.
    pub jitter_seed: u64,
    /// Worker thread names are `{prefix}-{index}`.
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            idle_backoff_min_ms: 5,
            idle_backoff_max_ms: 20,
            pass_interval_us: 0,
            shutdown_timeout_ms: 1_000,
            startup_timeout_ms: 5_000,
            jitter_seed: 0x5052_4953_4D00_0001,
            thread_name_prefix: "prism-worker".to_string(),
        }
    }
}

impl PoolConfig {
    /// Default configuration with `worker_count` workers.
    #[must_use]
    pub fn with_workers(worker_count: usize) -> Self {
        Self {
            worker_count,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] on a syntax error or a rejected value.
    pub fn from_toml_str(source: &str) -> PoolResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| PoolError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> PoolResult<()> {
        if self.worker_count == 0 {
            return Err(PoolError::InvalidConfig(
                "worker_count must be at least 1".to_string(),
            ));
        }
        if self.idle_backoff_min_ms > self.idle_backoff_max_ms {
            return Err(PoolError::InvalidConfig(format!(
                "idle_backoff_min_ms ({}) exceeds idle_backoff_max_ms ({})",
                self.idle_backoff_min_ms, self.idle_backoff_max_ms
            )));
        }
        if self.idle_backoff_max_ms == 0 {
            return Err(PoolError::InvalidConfig(
                "idle_backoff_max_ms must be at least 1".to_string(),
            ));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(PoolError::InvalidConfig(
                "thread_name_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Pause between passes.
    #[must_use]
    pub fn pass_interval(&self) -> Duration {
        Duration::from_micros(self.pass_interval_us)
    }

    /// Bounded wait used by shutdown.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// Bounded wait for worker startup.
    #[must_use]
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PoolConfig::default().validate().is_ok());
        assert_eq!(PoolConfig::with_workers(2).worker_count, 2);
    }

    #[test]
    fn test_toml_partial_document() {
        let config = PoolConfig::from_toml_str(
            r#"
            worker_count = 8
            idle_backoff_max_ms = 50
            thread_name_prefix = "eyes"
            "#,
        )
        .unwrap();

        assert_eq!(config.worker_count, 8);
        assert_eq!(config.idle_backoff_min_ms, 5);
        assert_eq!(config.idle_backoff_max_ms, 50);
        assert_eq!(config.thread_name_prefix, "eyes");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_rejects_zero_workers() {
        let err = PoolConfig::from_toml_str("worker_count = 0").unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_inverted_backoff() {
        let config = PoolConfig {
            idle_backoff_min_ms: 30,
            idle_backoff_max_ms: 10,
            ..PoolConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_backoff() {
        let err = PoolConfig::from_toml_str(
            r#"
            idle_backoff_min_ms = 0
            idle_backoff_max_ms = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(ref msg) if msg.contains("idle_backoff_max_ms")));

        let lower_zero = PoolConfig {
            idle_backoff_min_ms: 0,
            idle_backoff_max_ms: 1,
            ..PoolConfig::default()
        };
        assert!(lower_zero.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_syntax() {
        assert!(PoolConfig::from_toml_str("worker_count = [").is_err());
    }
}
