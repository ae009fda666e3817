//! Bounded retry with exponential backoff for connection probes.
//!
//! Retries live here and nowhere else: operation-level failures degrade
//! to the fallback instead of retrying.

use std::time::Duration;

use tracing::warn;

use argus_core::config::StoreConfig;
use argus_core::errors::ArgusResult;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            max_attempts: config.connect_max_attempts.max(1),
            base_delay: Duration::from_millis(config.connect_base_delay_ms),
            max_delay: Duration::from_millis(config.connect_max_delay_ms),
        }
    }

    /// Run `f` up to `max_attempts` times, doubling the delay between
    /// attempts. Only connection failures are retried; any other error
    /// returns immediately.
    pub fn run<T>(&self, operation: &str, mut f: impl FnMut() -> ArgusResult<T>) -> ArgusResult<T> {
        let mut delay = self.base_delay;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match f() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_connection_failure() && attempt < self.max_attempts => {
                    warn!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "connection failed, retrying"
                    );
                    std::thread::sleep(delay);
                    delay = (delay * 2).min(self.max_delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_core::errors::StoreError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    fn connection_error() -> argus_core::errors::ArgusError {
        StoreError::ConnectionFailed {
            endpoint: "http://h".into(),
            reason: "refused".into(),
        }
        .into()
    }

    #[test]
    fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = quick_policy(3).run("probe", || {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(connection_error())
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: ArgusResult<()> = quick_policy(3).run("probe", || {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(connection_error())
        });
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn non_connection_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: ArgusResult<()> = quick_policy(5).run("probe", || {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::CollectionNotFound { name: "c".into() }.into())
        });
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
