//! Per-call retry policy: counts, backoff, and the status forcelist.
//!
//! A [`RetryPolicy`] is derived from [`CallOptions`](crate::CallOptions) at
//! the start of every call and dropped when the call finishes. It governs
//! three independent limits: total retries on forcelisted statuses,
//! connection-error retries, and the redirect limit handed to the transport.

use http::{Method, StatusCode};
use std::time::Duration;

/// Default number of retries on forcelisted statuses.
pub const DEFAULT_RETRIES: u32 = 20;

/// Default backoff factor in seconds.
pub const DEFAULT_BACKOFF: f64 = 0.3;

/// Status codes retried by default. Gateway and origin errors only; 4xx
/// responses always fail immediately.
pub const DEFAULT_STATUS_FORCELIST: &[u16] =
    &[500, 502, 503, 504, 520, 521, 522, 523, 524, 525, 527, 530];

/// Default maximum number of HTTP redirects followed per attempt.
pub const DEFAULT_MAX_HTTP_REDIRECTS: usize = 10;

/// Default maximum number of connection errors retried per call.
pub const DEFAULT_MAX_CONN_ERRORS: u32 = 10;

/// The resolved retry configuration for a single call.
///
/// Backoff between attempts grows as `backoff * 2^(attempt - 1)` seconds,
/// with no jitter.
///
/// # Examples
///
/// ```
/// use plateau::RetryPolicy;
/// use http::{Method, StatusCode};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert!(policy.should_retry_status(StatusCode::BAD_GATEWAY, &Method::GET));
/// assert!(!policy.should_retry_status(StatusCode::BAD_REQUEST, &Method::GET));
/// assert_eq!(policy.delay_for_attempt(2), Duration::from_secs_f64(0.6));
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total retries to perform on forcelisted statuses.
    pub retries: u32,
    /// Backoff factor applied between attempts, in seconds.
    pub backoff: f64,
    /// Status codes that trigger a retry rather than immediate failure.
    pub status_forcelist: Vec<u16>,
    /// Methods eligible for status-driven retries.
    pub retry_on_methods: Vec<Method>,
    /// Maximum HTTP redirects followed per attempt.
    pub max_http_redirects: usize,
    /// Maximum connection errors retried per call.
    pub max_conn_errors: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            backoff: DEFAULT_BACKOFF,
            status_forcelist: DEFAULT_STATUS_FORCELIST.to_vec(),
            retry_on_methods: vec![Method::GET, Method::PUT, Method::DELETE, Method::POST],
            max_http_redirects: DEFAULT_MAX_HTTP_REDIRECTS,
            max_conn_errors: DEFAULT_MAX_CONN_ERRORS,
        }
    }
}

impl RetryPolicy {
    /// Returns `true` if a response with `status` should be retried for a
    /// request issued with `method`.
    ///
    /// Both gates must pass: the status must be in the forcelist and the
    /// method must be in the retryable set.
    pub fn should_retry_status(&self, status: StatusCode, method: &Method) -> bool {
        self.status_forcelist.contains(&status.as_u16())
            && self.retry_on_methods.contains(method)
    }

    /// Returns the backoff delay before retry attempt `attempt` (1-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2f64.powi(attempt.saturating_sub(1) as i32);
        Duration::from_secs_f64(self.backoff * factor)
    }
}
