use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Retries after the first attempt.
pub const MAX_RETRIES: u32 = 3;

/// Delay before retry number `retry` (0-based): `base * 2^retry`.
pub fn backoff_delay(base: Duration, retry: u32) -> Duration {
    base * 2u32.pow(retry)
}

/// Run `op` until it succeeds or `MAX_RETRIES` retries are spent.
///
/// Every error is retried the same way. The error from the final attempt is
/// returned as-is.
pub async fn with_backoff<T, E, F, Fut>(base_delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut retry = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if retry < MAX_RETRIES => {
                let delay = backoff_delay(base_delay, retry);
                warn!(
                    error = %err,
                    retry = retry + 1,
                    max_retries = MAX_RETRIES,
                    delay_ms = delay.as_millis() as u64,
                    "attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                retry += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
