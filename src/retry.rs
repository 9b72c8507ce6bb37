//! Retry logic with exponential backoff and jitter
//!
//! [`RetryConfig`] holds the pure policy: which failures are worth another
//! attempt and how long to wait. [`RetryState`] applies it to one logical call.
//! [`retry_with_backoff`] and [`retry_blocking`] drive an operation through
//! that state and differ only in how they wait between attempts.

use crate::error::{Error, Result};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration for API requests
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry
    pub base_delay: Duration,

    /// Upper bound for computed delays
    pub max_delay: Duration,

    /// Backoff multiplier (exponential growth)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that never retries
    pub fn disabled() -> Self {
        Self::default().with_max_retries(0)
    }

    /// Set maximum number of retries
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the delay before the first retry
    pub fn with_base_delay(mut self, duration: Duration) -> Self {
        self.base_delay = duration;
        self
    }

    /// Set maximum delay between retries
    pub fn with_max_delay(mut self, duration: Duration) -> Self {
        self.max_delay = duration;
        self
    }

    /// Set backoff multiplier for exponential growth
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Whether a failure on the given 0-based attempt deserves another try.
    ///
    /// Only timeouts, connection failures, server errors and rate limits are
    /// retried, and never once `attempt` has reached `max_retries`.
    pub fn should_retry(&self, attempt: u32, error: &Error) -> bool {
        attempt < self.max_retries && error.is_retryable()
    }

    /// Exponential backoff without jitter: `base * multiplier^attempt`, capped
    /// at `max_delay`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.capped(self.raw_backoff_secs(attempt))
    }

    /// Delay before the next attempt.
    ///
    /// A server `Retry-After` hint is returned as-is. Otherwise the backoff gets
    /// up to 10% random jitter added before clamping to `max_delay`.
    pub fn compute_delay(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        if let Some(seconds) = retry_after {
            return Duration::from_secs(seconds);
        }

        let max = self.max_delay_secs();
        let delay = self.raw_backoff_secs(attempt);
        if !delay.is_finite() || delay >= max {
            return self.max_delay;
        }

        let jitter = if delay > 0.0 {
            rand::thread_rng().gen_range(0.0..0.1 * delay)
        } else {
            0.0
        };

        self.capped(delay + jitter)
    }

    /// Convert to a `Duration` no larger than `max_delay`. Values too large to
    /// represent saturate to `max_delay`.
    fn capped(&self, secs: f64) -> Duration {
        Duration::try_from_secs_f64(secs)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    fn raw_backoff_secs(&self, attempt: u32) -> f64 {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        (self.base_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent)).max(0.0)
    }

    fn max_delay_secs(&self) -> f64 {
        self.max_delay.as_secs_f64()
    }
}

/// Retry bookkeeping for a single logical call.
///
/// Created fresh for every call and dropped when it returns; nothing in it is
/// shared between calls.
#[derive(Debug)]
pub struct RetryState<'a> {
    config: &'a RetryConfig,
    attempt: u32,
    last_error: Option<Error>,
    delays: Vec<Duration>,
}

impl<'a> RetryState<'a> {
    pub fn new(config: &'a RetryConfig) -> Self {
        Self {
            config,
            attempt: 0,
            last_error: None,
            delays: Vec::new(),
        }
    }

    /// Current 0-based attempt number
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Delays chosen so far, one per retry
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Record a failed attempt.
    ///
    /// Returns the delay to wait before the next attempt, or `None` when the
    /// call should give up.
    pub fn record_failure(&mut self, error: Error) -> Option<Duration> {
        let delay = if self.config.should_retry(self.attempt, &error) {
            let delay = self
                .config
                .compute_delay(self.attempt, error.retry_after());
            warn!(
                "Request failed: {}. Retrying in {:.2}s (attempt {}/{})",
                error,
                delay.as_secs_f64(),
                self.attempt + 1,
                self.config.max_retries
            );
            self.delays.push(delay);
            self.attempt += 1;
            Some(delay)
        } else {
            debug!(
                "Not retrying after attempt {}: {}",
                self.attempt + 1,
                error
            );
            None
        };

        self.last_error = Some(error);
        delay
    }

    /// The error to surface once the loop has stopped.
    ///
    /// The last captured failure is returned unchanged, so callers see the real
    /// cause. [`Error::RetryExhausted`] is only produced if nothing was captured.
    pub fn into_error(self) -> Error {
        match self.last_error {
            Some(error) => error,
            None => Error::RetryExhausted {
                attempts: self.config.max_retries,
                source: Box::new(Error::Api {
                    message: "Unknown error occurred".to_string(),
                    status: None,
                    body: None,
                }),
            },
        }
    }
}

/// Execute an async operation with retry logic
///
/// Waiting uses `tokio::time::sleep`, so dropping the returned future cancels
/// the call at its current await point without further attempts.
///
/// # Example
///
/// ```rust,no_run
/// use screencraft::retry::{retry_with_backoff, RetryConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RetryConfig::new().with_max_retries(5);
///
/// let result = retry_with_backoff(&config, || async {
///     // Your API call here
///     Ok::<_, screencraft::Error>("success")
/// }).await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry_with_backoff<F, Fut, T>(config: &RetryConfig, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut state = RetryState::new(config);

    loop {
        match operation().await {
            Ok(result) => {
                if state.attempt() > 0 {
                    debug!("Request succeeded after {} attempts", state.attempt() + 1);
                }
                return Ok(result);
            }
            Err(error) => match state.record_failure(error) {
                Some(delay) => tokio::time::sleep(delay).await,
                None => return Err(state.into_error()),
            },
        }
    }
}

/// Blocking counterpart of [`retry_with_backoff`]; waits with `std::thread::sleep`.
pub fn retry_blocking<F, T>(config: &RetryConfig, mut operation: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let mut state = RetryState::new(config);

    loop {
        match operation() {
            Ok(result) => {
                if state.attempt() > 0 {
                    debug!("Request succeeded after {} attempts", state.attempt() + 1);
                }
                return Ok(result);
            }
            Err(error) => match state.record_failure(error) {
                Some(delay) => std::thread::sleep(delay),
                None => return Err(state.into_error()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn server_error() -> Error {
        Error::Server {
            status: 503,
            message: "Service unavailable".into(),
            body: None,
        }
    }

    fn rate_limited(retry_after: Option<u64>) -> Error {
        Error::RateLimit {
            message: "slow down".into(),
            retry_after,
            body: None,
        }
    }

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_delay, Duration::from_secs(1));
        assert_eq!(config.max_delay, Duration::from_secs(30));
        assert_eq!(config.backoff_multiplier, 2.0);
    }

    #[test]
    fn test_config_builder() {
        let config = RetryConfig::new()
            .with_max_retries(5)
            .with_base_delay(Duration::from_millis(250))
            .with_max_delay(Duration::from_secs(10))
            .with_backoff_multiplier(3.0);

        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_delay, Duration::from_millis(250));
        assert_eq!(config.max_delay, Duration::from_secs(10));
        assert_eq!(config.backoff_multiplier, 3.0);
    }

    #[test]
    fn test_should_retry_stops_at_budget() {
        let config = RetryConfig::default();
        let retryable = [
            server_error(),
            rate_limited(None),
            Error::Timeout("t".into()),
            Error::Connection("c".into()),
        ];
        for error in &retryable {
            assert!(config.should_retry(0, error));
            assert!(config.should_retry(2, error));
            assert!(!config.should_retry(3, error));
            assert!(!config.should_retry(10, error));
        }
    }

    #[test]
    fn test_should_retry_terminal_kinds() {
        let config = RetryConfig::default();
        let terminal = [
            Error::Authentication {
                message: "bad key".into(),
                body: None,
            },
            Error::validation("bad", "quality"),
            Error::NotFound {
                message: "gone".into(),
                body: None,
            },
            Error::Webhook("bad payload".into()),
        ];
        for error in &terminal {
            for attempt in 0..5 {
                assert!(!config.should_retry(attempt, error));
            }
        }
    }

    #[test]
    fn test_backoff_grows_until_capped() {
        let config = RetryConfig::new().with_max_delay(Duration::from_secs(5));

        assert_eq!(config.backoff(0), Duration::from_secs(1));
        assert_eq!(config.backoff(1), Duration::from_secs(2));
        assert_eq!(config.backoff(2), Duration::from_secs(4));
        assert_eq!(config.backoff(3), Duration::from_secs(5));
        assert_eq!(config.backoff(40), Duration::from_secs(5));

        let mut previous = Duration::ZERO;
        for attempt in 0..20 {
            let current = config.backoff(attempt);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_compute_delay_jitter_bounds() {
        let config = RetryConfig::default();
        for attempt in 0..4 {
            let base = config.backoff(attempt).as_secs_f64();
            for _ in 0..50 {
                let delay = config.compute_delay(attempt, None).as_secs_f64();
                assert!(delay >= base, "{} < {}", delay, base);
                assert!(delay < base * 1.1 + 1e-9, "{} too large", delay);
            }
        }
    }

    #[test]
    fn test_compute_delay_clamped() {
        let config = RetryConfig::new()
            .with_max_delay(Duration::from_secs(5))
            .with_backoff_multiplier(10.0);

        assert_eq!(config.compute_delay(2, None), Duration::from_secs(5));
        assert_eq!(config.compute_delay(500, None), Duration::from_secs(5));
    }

    #[test]
    fn test_uncapped_max_delay() {
        let config = RetryConfig::new().with_max_delay(Duration::MAX);

        assert_eq!(config.backoff(3), Duration::from_secs(8));
        assert_eq!(config.backoff(70), Duration::MAX);
        assert_eq!(config.compute_delay(70, None), Duration::MAX);
        assert_eq!(config.compute_delay(u32::MAX, None), Duration::MAX);

        let delay = config.compute_delay(2, None);
        assert!(delay >= Duration::from_secs(4) && delay < Duration::from_millis(4401));
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let config = RetryConfig::new().with_max_delay(Duration::from_secs(2));

        assert_eq!(config.compute_delay(0, Some(5)), Duration::from_secs(5));
        assert_eq!(config.compute_delay(3, Some(1)), Duration::from_secs(1));
    }

    #[test]
    fn test_state_records_delays() {
        let config = RetryConfig::new().with_max_retries(2);
        let mut state = RetryState::new(&config);

        assert!(state.record_failure(server_error()).is_some());
        assert_eq!(state.record_failure(rate_limited(Some(7))), Some(Duration::from_secs(7)));
        assert_eq!(state.record_failure(server_error()), None);

        assert_eq!(state.attempt(), 2);
        assert_eq!(state.delays().len(), 2);
        assert!(matches!(state.into_error(), Error::Server { status: 503, .. }));
    }

    #[test]
    fn test_state_without_failure() {
        let config = RetryConfig::default();
        let state = RetryState::new(&config);
        assert!(state.last_error().is_none());
        assert!(matches!(
            state.into_error(),
            Error::RetryExhausted { attempts: 3, .. }
        ));
    }

    #[tokio::test]
    async fn test_retry_succeeds_first_attempt() {
        let config = RetryConfig::new();
        let call_count = Arc::new(AtomicU32::new(0));
        let count = call_count.clone();

        let result = retry_with_backoff(&config, || {
            let count = count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Error>("success")
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_after_failures() {
        let config = RetryConfig::new();
        let call_count = Arc::new(AtomicU32::new(0));
        let count = call_count.clone();

        let result = retry_with_backoff(&config, || {
            let count = count.clone();
            async move {
                let current = count.fetch_add(1, Ordering::SeqCst) + 1;
                if current < 3 {
                    Err(server_error())
                } else {
                    Ok::<_, Error>("success")
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_fails_non_retryable() {
        let config = RetryConfig::new();
        let call_count = Arc::new(AtomicU32::new(0));
        let count = call_count.clone();

        let result = retry_with_backoff(&config, || {
            let count = count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Err::<String, _>(Error::Authentication {
                    message: "Bad key".into(),
                    body: None,
                })
            }
        })
        .await;

        assert!(matches!(result, Err(Error::Authentication { .. })));
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhausts_attempts() {
        let config = RetryConfig::new().with_max_retries(2);
        let call_count = Arc::new(AtomicU32::new(0));
        let count = call_count.clone();

        let result = retry_with_backoff(&config, || {
            let count = count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Err::<String, _>(server_error())
            }
        })
        .await;

        // The typed failure surfaces, not RetryExhausted
        assert!(matches!(result, Err(Error::Server { .. })));
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_blocking_retry_exhausts_attempts() {
        let config = RetryConfig::new()
            .with_max_retries(2)
            .with_base_delay(Duration::from_millis(1));
        let mut calls = 0;

        let result = retry_blocking(&config, || {
            calls += 1;
            Err::<(), _>(Error::Connection("refused".into()))
        });

        assert!(matches!(result, Err(Error::Connection(_))));
        assert_eq!(calls, 3);
    }
}
