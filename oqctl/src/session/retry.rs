//! Retry with linear backoff
// (c) 2026 oqctl developers

use std::time::Duration;

use tracing::debug;

/// How hard to try
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt. The n-th failure waits `n * base_delay`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt
    #[must_use]
    pub fn single() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// How long to wait after failed attempt number `attempt` (1-based)
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Something that wants to know when a retry is about to happen.
///
/// Purely informational; it cannot influence the backoff.
pub trait RetryObserver: Send + Sync {
    /// Called just before attempt `failed + 1` of `max`, after the backoff delay.
    fn retrying(&self, failed: u32, max: u32);
}

impl<F> RetryObserver for F
where
    F: Fn(u32, u32) + Send + Sync,
{
    fn retrying(&self, failed: u32, max: u32) {
        self(failed, max);
    }
}

/// Runs `f` until it produces a reply or the policy is exhausted.
///
/// Any reply at all ends the loop, even one that reads like a failure; only an absent reply
/// is retried. There is no delay after the final attempt.
pub async fn with_retry<F, Fut>(
    mut f: F,
    policy: RetryPolicy,
    observer: Option<&dyn RetryObserver>,
) -> Option<String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<String>>,
{
    let max = policy.attempts();
    for attempt in 1..=max {
        if let Some(reply) = f().await {
            return Some(reply);
        }
        if attempt == max {
            break;
        }
        let delay = policy.delay_after(attempt);
        debug!("attempt {attempt}/{max} got no reply; retrying in {delay:?}");
        tokio::time::sleep(delay).await;
        if let Some(obs) = observer {
            obs.retrying(attempt, max);
        }
    }
    debug!("giving up after {max} attempt(s)");
    None
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tokio::time::Instant;

    use super::{RetryObserver, RetryPolicy, with_retry};

    #[test]
    fn delays_grow_linearly() {
        let p = RetryPolicy::default();
        assert_eq!(p.delay_after(1), Duration::from_secs(1));
        assert_eq!(p.delay_after(2), Duration::from_secs(2));
        assert_eq!(RetryPolicy::single().max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn two_failures_then_success() {
        let start = Instant::now();
        let calls = Mutex::new(Vec::new());
        let notes = Mutex::new(Vec::new());
        let observer = |failed: u32, max: u32| notes.lock().unwrap().push((failed, max));
        let observer: &dyn RetryObserver = &observer;

        let result = with_retry(
            || {
                let mut calls = calls.lock().unwrap();
                calls.push(start.elapsed());
                let reply = (calls.len() == 3).then(|| "done".to_string());
                async move { reply }
            },
            RetryPolicy::default(),
            Some(observer),
        )
        .await;

        assert_eq!(result.as_deref(), Some("done"));
        assert_eq!(
            *calls.lock().unwrap(),
            [
                Duration::ZERO,
                Duration::from_secs(1),
                Duration::from_secs(3)
            ]
        );
        assert_eq!(*notes.lock().unwrap(), [(1, 3), (2, 3)]);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_without_trailing_delay() {
        let start = Instant::now();
        let mut calls = 0;
        let result = with_retry(
            || {
                calls += 1;
                async { None }
            },
            RetryPolicy::default(),
            None,
        )
        .await;
        assert_eq!(result, None);
        assert_eq!(calls, 3);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn any_reply_stops_immediately() {
        let mut calls = 0;
        let result = with_retry(
            || {
                calls += 1;
                async { Some("ERROR: write failed".to_string()) }
            },
            RetryPolicy::default(),
            None,
        )
        .await;
        assert_eq!(result.as_deref(), Some("ERROR: write failed"));
        assert_eq!(calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_tries_once() {
        let mut calls = 0;
        let policy = RetryPolicy {
            max_attempts: 0,
            base_delay: Duration::from_millis(5),
        };
        let _ = with_retry(
            || {
                calls += 1;
                async { None }
            },
            policy,
            None,
        )
        .await;
        assert_eq!(calls, 1);
    }
}
