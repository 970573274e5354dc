use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use reqwest::StatusCode;
use tokio::time::sleep;
use tracing::debug;

/// Exponential backoff with up to 25% jitter.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
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

    fn delay(&self, attempt: usize) -> Duration {
        let multiplier = 1u32.checked_shl(attempt as u32).unwrap_or(u32::MAX);
        let base = self.base_delay.saturating_mul(multiplier);

        let max_jitter_ms = (base.as_millis() / 4).min(u128::from(u64::MAX)) as u64;
        if max_jitter_ms == 0 {
            return base;
        }
        base + Duration::from_millis(rand::thread_rng().gen_range(0..=max_jitter_ms))
    }
}

fn is_retriable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

fn is_retriable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

/// Send a request, retrying transient failures. Non-retriable error statuses
/// are returned as responses for the caller to report.
pub(super) async fn send_with_retry(
    policy: RetryPolicy,
    mut make_request: impl FnMut() -> reqwest::RequestBuilder,
) -> Result<reqwest::Response> {
    let mut attempt = 0;

    loop {
        let last_attempt = attempt >= policy.max_retries;

        match make_request().send().await {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) if is_retriable_status(response.status()) && !last_attempt => {
                let delay = policy.delay(attempt);
                debug!(
                    "Request failed with status {}; retrying in {:?} (attempt {}/{})",
                    response.status(),
                    delay,
                    attempt + 1,
                    policy.max_retries + 1
                );
                sleep(delay).await;
            }
            Ok(response) => return Ok(response),
            Err(err) if is_retriable_error(&err) && !last_attempt => {
                let delay = policy.delay(attempt);
                debug!(
                    "Request error: {}; retrying in {:?} (attempt {}/{})",
                    err,
                    delay,
                    attempt + 1,
                    policy.max_retries + 1
                );
                sleep(delay).await;
            }
            Err(err) => {
                return Err(anyhow::Error::new(err))
                    .with_context(|| format!("Request failed after {} attempt(s)", attempt + 1));
            }
        }

        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_grows_exponentially() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        };

        let first = policy.delay(0);
        let third = policy.delay(2);
        assert!(first >= Duration::from_millis(100) && first <= Duration::from_millis(125));
        assert!(third >= Duration::from_millis(400) && third <= Duration::from_millis(500));
    }

    #[test]
    fn test_no_retry_policy_has_no_delay() {
        assert_eq!(RetryPolicy::none().delay(0), Duration::ZERO);
    }

    #[test]
    fn test_retriable_statuses() {
        assert!(is_retriable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retriable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retriable_status(StatusCode::NOT_FOUND));
        assert!(!is_retriable_status(StatusCode::UNAUTHORIZED));
    }
}
