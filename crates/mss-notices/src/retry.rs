use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// How often a failing call is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `None` retries forever.
    pub max_attempts: Option<u32>,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn bounded(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
            delay,
        }
    }

    pub fn unbounded(delay: Duration) -> Self {
        Self {
            max_attempts: None,
            delay,
        }
    }

    fn is_last(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempt >= max)
    }
}

/// The last error seen once a bounded policy ran out of attempts.
#[derive(Debug, thiserror::Error)]
#[error("gave up after {attempts} attempt(s): {source}")]
pub struct RetryExhausted<E: std::error::Error + 'static> {
    pub attempts: u32,
    #[source]
    pub source: E,
}

/// Runs `op` until it succeeds, fails with an error `transient` rejects, or
/// `policy` runs out of attempts.
///
/// `op` receives the 1-based attempt number. Every retried failure is logged at
/// warn level and followed by `policy.delay`.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    transient: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, RetryExhausted<E>>
where
    E: std::error::Error + 'static,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !transient(&e) => {
                log::error!("{what} failed ({}), not retrying: {e}", progress(policy, attempt));
                return Err(RetryExhausted {
                    attempts: attempt,
                    source: e,
                });
            }
            Err(e) if policy.is_last(attempt) => {
                log::error!("{what} failed ({}): {e}", progress(policy, attempt));
                return Err(RetryExhausted {
                    attempts: attempt,
                    source: e,
                });
            }
            Err(e) => {
                log::warn!(
                    "{what} failed ({}): {e}. Retrying in {:?}",
                    progress(policy, attempt),
                    policy.delay
                );
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
                attempt += 1;
            }
        }
    }
}

fn progress(policy: &RetryPolicy, attempt: u32) -> impl Display {
    match policy.max_attempts {
        Some(max) => format!("attempt {attempt}/{max}"),
        None => format!("attempt {attempt}"),
    }
}
