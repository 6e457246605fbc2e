//! Bounded condition polling.
//!
//! Every wait in the crate goes through [`poll_until`]: a condition is
//! re-evaluated every poll interval until it yields a value or the timeout
//! elapses. Stale-element and not-actionable errors raised by the condition
//! count as "not yet"; any other error aborts the wait.

use crate::config::Timeouts;
use crate::result::{TackleError, TackleResult};
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        let timeouts = Timeouts::default();
        Self::new(timeouts.lookup_ms, timeouts.poll_interval_ms)
    }
}

impl WaitOptions {
    /// Create wait options
    #[must_use]
    pub const fn new(timeout_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            timeout_ms,
            poll_interval_ms,
        }
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Outcome of a successful wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of condition evaluations
    pub polls: u32,
    /// What was waited for
    pub waited_for: String,
}

// =============================================================================
// POLLING
// =============================================================================

/// Poll `check` until it yields `Some`, or fail with [`TackleError::Timeout`]
pub async fn poll_until<T, F, Fut>(
    options: WaitOptions,
    waited_for: &str,
    mut check: F,
) -> TackleResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TackleResult<Option<T>>>,
{
    let start = Instant::now();
    let mut polls: u32 = 0;
    loop {
        polls += 1;
        match check().await {
            Ok(Some(value)) => {
                tracing::trace!(waited_for, polls, elapsed_ms = ?start.elapsed(), "condition met");
                return Ok(value);
            }
            Ok(None) => {}
            Err(e) if e.is_transient() => {
                tracing::trace!(waited_for, error = %e, "transient failure while polling");
            }
            Err(e) => return Err(e),
        }
        if start.elapsed() >= options.timeout() {
            return Err(TackleError::Timeout {
                ms: options.timeout_ms,
                waited_for: waited_for.to_string(),
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

/// Poll a boolean condition until it holds
pub async fn wait_for<F, Fut>(
    options: WaitOptions,
    waited_for: &str,
    mut check: F,
) -> TackleResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TackleResult<bool>>,
{
    let start = Instant::now();
    let mut polls: u32 = 0;
    let polls_ref = &mut polls;
    poll_until(options, waited_for, || {
        *polls_ref += 1;
        let fut = check();
        async move { Ok(fut.await?.then_some(())) }
    })
    .await?;
    Ok(WaitResult {
        elapsed: start.elapsed(),
        polls,
        waited_for: waited_for.to_string(),
    })
}

/// Poll `sample` until it returns the same value for at least `window`
///
/// With a zero window two consecutive equal samples are enough.
pub async fn wait_until_stable<T, F, Fut>(
    options: WaitOptions,
    window: Duration,
    waited_for: &str,
    mut sample: F,
) -> TackleResult<T>
where
    T: PartialEq + Clone,
    F: FnMut() -> Fut,
    Fut: Future<Output = TackleResult<T>>,
{
    let last: Mutex<Option<(T, Instant)>> = Mutex::new(None);
    let last = &last;
    poll_until(options, waited_for, || {
        let fut = sample();
        async move {
            let current = fut.await?;
            let now = Instant::now();
            let mut slot = last.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.take() {
                Some((value, since)) if value == current => {
                    if now.duration_since(since) >= window {
                        return Ok(Some(current));
                    }
                    *slot = Some((value, since));
                }
                _ => *slot = Some((current, now)),
            }
            Ok(None)
        }
    })
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> WaitOptions {
        WaitOptions::new(200, 1)
    }

    mod poll_tests {
        use super::*;

        #[tokio::test]
        async fn test_returns_first_value() {
            let calls = AtomicU32::new(0);
            let value = poll_until(fast(), "third call", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok((n >= 2).then_some(n)) }
            })
            .await
            .unwrap();
            assert_eq!(value, 2);
        }

        #[tokio::test]
        async fn test_times_out() {
            let err = poll_until::<(), _, _>(WaitOptions::new(20, 5), "never", || async {
                Ok(None)
            })
            .await
            .unwrap_err();
            assert!(matches!(err, TackleError::Timeout { ms: 20, .. }));
        }

        #[tokio::test]
        async fn test_stale_is_retried() {
            let calls = AtomicU32::new(0);
            let value = poll_until(fast(), "recover", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(TackleError::StaleElement { id: "x".into() })
                    } else {
                        Ok(Some(n))
                    }
                }
            })
            .await
            .unwrap();
            assert_eq!(value, 1);
        }

        #[tokio::test]
        async fn test_hard_error_aborts() {
            let err = poll_until::<(), _, _>(fast(), "boom", || async {
                Err(TackleError::driver("socket closed"))
            })
            .await
            .unwrap_err();
            assert!(matches!(err, TackleError::Driver { .. }));
        }
    }

    mod wait_for_tests {
        use super::*;

        #[tokio::test]
        async fn test_counts_polls() {
            let calls = AtomicU32::new(0);
            let result = wait_for(fast(), "fourth", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n == 3) }
            })
            .await
            .unwrap();
            assert_eq!(result.polls, 4);
            assert_eq!(result.waited_for, "fourth");
        }
    }

    mod stability_tests {
        use super::*;

        #[tokio::test]
        async fn test_settles_after_changes_stop() {
            let calls = AtomicU32::new(0);
            let value = wait_until_stable(fast(), Duration::ZERO, "rows", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n.min(3)) }
            })
            .await
            .unwrap();
            assert_eq!(value, 3);
            assert!(calls.load(Ordering::SeqCst) >= 5);
        }

        #[tokio::test]
        async fn test_never_stable_times_out() {
            let calls = AtomicU32::new(0);
            let err = wait_until_stable(WaitOptions::new(15, 1), Duration::ZERO, "flapping", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n) }
            })
            .await
            .unwrap_err();
            assert!(matches!(err, TackleError::Timeout { .. }));
        }
    }
}
