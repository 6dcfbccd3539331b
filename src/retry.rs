//! Bounded retries with backoff.
//!
//! A [`RetryPolicy`] says how many attempts an operation gets and how long to
//! wait between them. Which errors are worth retrying is decided per call
//! site, so the same policy type serves both "retry on 429" and "never retry".

use std::{fmt::Display, future::Future, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `0` behaves like `1`.
    pub max_attempts: u32,
    /// Wait after failed attempt `n` is `backoff * n`.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Policy for pages behind a rate limiter: 5 attempts, 3s, 6s, 9s, 12s apart.
    pub const fn rate_limited() -> Self {
        Self::new(5, Duration::from_secs(3))
    }

    /// Delay after failed attempt number `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }

    /// Run `op` until it succeeds, fails with an error `retryable` rejects,
    /// or the attempts run out. The last error is returned as is.
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, E, Op, Fut, P>(&self, label: &str, mut op: Op, retryable: P) -> Result<T, E>
    where
        Op: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let mut attempt = 1u32;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && retryable(&e) => {
                    let wait = self.delay(attempt);
                    log::warn!(
                        "[{}] attempt {}/{} failed ({}), retrying in {:?}",
                        label,
                        attempt,
                        self.max_attempts,
                        e,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
