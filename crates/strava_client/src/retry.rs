use std::time::Duration;

/// A simple retry policy with exponential backoff and jitter.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Run `f` until it succeeds, `should_retry` rejects the error, or the
    /// retry budget is spent.
    pub async fn retry_async<F, Fut, T, E, P>(&self, should_retry: P, mut f: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut attempt = 0u32;
        loop {
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries || !should_retry(&e) {
                        return Err(e);
                    }
                    // exponential backoff with jitter
                    let max_delay = self.base_delay * (1u32 << attempt.min(16));
                    let max_ms = max_delay.as_millis() as u64;
                    let delay = if max_ms == 0 {
                        Duration::ZERO
                    } else {
                        Duration::from_millis(rand::random_range(0..max_ms))
                    };
                    tracing::warn!(attempt, error = %e, ?delay, "request failed, retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
