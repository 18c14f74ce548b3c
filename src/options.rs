//! Per-call options: method, path segments, headers, body data, retry knobs.

use crate::{Error, RetryPolicy};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::time::Duration;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for a single API call.
///
/// Every field except `method` and `path` has a default; callers override
/// any subset through the `with_*` builders. The path must be a non-empty
/// ordered sequence of segments; this is validated by the executor before
/// any network I/O.
///
/// # Examples
///
/// ```
/// use plateau::CallOptions;
/// use http::Method;
/// use std::time::Duration;
///
/// let options = CallOptions::new(Method::GET, ["resources", "abc123"])
///     .with_param("format", "csv")
///     .with_timeout(Duration::from_secs(30))
///     .with_retries(5);
/// ```
#[derive(Debug, Clone)]
pub struct CallOptions {
    /// The HTTP method. Must be one of GET, DELETE, PUT, POST.
    pub method: Method,

    /// Ordered path segments, joined under the configured host and prefix.
    pub path: Vec<String>,

    /// Additional headers for this call. `Authorization` and `User-Agent`
    /// are always overwritten by the client configuration.
    pub headers: HeaderMap,

    /// Request parameters: the query string for GET/DELETE, the JSON body
    /// for PUT/POST when no form `data` is supplied.
    pub params: serde_json::Map<String, serde_json::Value>,

    /// Form-encoded body for PUT/POST. When present, `params` is not sent
    /// as the body.
    pub data: Option<Vec<(String, String)>>,

    /// Total retries on forcelisted statuses.
    pub retries: u32,

    /// Backoff factor in seconds.
    pub backoff: f64,

    /// Status codes retried rather than failed.
    pub status_forcelist: Vec<u16>,

    /// Methods eligible for status-driven retries.
    pub retry_on_methods: Vec<Method>,

    /// Maximum HTTP redirects followed per attempt.
    pub max_http_redirects: usize,

    /// Per-attempt timeout. Not cumulative across retries.
    pub timeout: Duration,

    /// Maximum connection errors retried per call.
    pub max_conn_errors: u32,
}

impl CallOptions {
    /// Creates options for `method` on the given path segments.
    pub fn new<I, S>(method: Method, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let defaults = RetryPolicy::default();
        Self {
            method,
            path: path.into_iter().map(Into::into).collect(),
            headers: HeaderMap::new(),
            params: serde_json::Map::new(),
            data: None,
            retries: defaults.retries,
            backoff: defaults.backoff,
            status_forcelist: defaults.status_forcelist,
            retry_on_methods: defaults.retry_on_methods,
            max_http_redirects: defaults.max_http_redirects,
            timeout: DEFAULT_TIMEOUT,
            max_conn_errors: defaults.max_conn_errors,
        }
    }

    /// Adds a header to the call.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Config(format!("Invalid header name: {e}")))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Config(format!("Invalid header value: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Adds a request parameter.
    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Adds multiple request parameters.
    pub fn with_params(
        mut self,
        params: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) -> Self {
        self.params.extend(params);
        self
    }

    /// Sets a form-encoded body for PUT/POST calls.
    pub fn with_form(mut self, data: impl IntoIterator<Item = (String, String)>) -> Self {
        self.data = Some(data.into_iter().collect());
        self
    }

    /// Sets the number of retries on forcelisted statuses.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the backoff factor in seconds.
    pub fn with_backoff(mut self, backoff: f64) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replaces the set of retried status codes.
    pub fn with_status_forcelist(mut self, forcelist: impl Into<Vec<u16>>) -> Self {
        self.status_forcelist = forcelist.into();
        self
    }

    /// Replaces the set of methods eligible for status-driven retries.
    pub fn with_retry_on_methods(mut self, methods: impl Into<Vec<Method>>) -> Self {
        self.retry_on_methods = methods.into();
        self
    }

    /// Sets the redirect limit per attempt.
    pub fn with_max_http_redirects(mut self, max: usize) -> Self {
        self.max_http_redirects = max;
        self
    }

    /// Sets the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection-error retry limit per call.
    pub fn with_max_conn_errors(mut self, max: u32) -> Self {
        self.max_conn_errors = max;
        self
    }

    /// Derives the retry policy scoped to this call.
    pub(crate) fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            backoff: self.backoff,
            status_forcelist: self.status_forcelist.clone(),
            retry_on_methods: self.retry_on_methods.clone(),
            max_http_redirects: self.max_http_redirects,
            max_conn_errors: self.max_conn_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry;

    #[test]
    fn test_defaults_match_policy_defaults() {
        let options = CallOptions::new(Method::GET, ["resources"]);

        assert_eq!(options.retries, retry::DEFAULT_RETRIES);
        assert_eq!(options.backoff, retry::DEFAULT_BACKOFF);
        assert_eq!(options.status_forcelist, retry::DEFAULT_STATUS_FORCELIST);
        assert_eq!(options.timeout, DEFAULT_TIMEOUT);
        assert_eq!(options.max_conn_errors, retry::DEFAULT_MAX_CONN_ERRORS);
        assert!(options.data.is_none());
    }

    #[test]
    fn test_builders_override_subset() {
        let options = CallOptions::new(Method::POST, ["resources"])
            .with_param("name", "report.csv")
            .with_retries(2)
            .with_backoff(0.0)
            .with_status_forcelist([503])
            .with_max_conn_errors(0);

        assert_eq!(options.params["name"], "report.csv");
        let policy = options.retry_policy();
        assert_eq!(policy.retries, 2);
        assert_eq!(policy.status_forcelist, vec![503]);
        assert_eq!(policy.max_conn_errors, 0);
    }

    #[test]
    fn test_with_header_rejects_invalid_name() {
        let result = CallOptions::new(Method::GET, ["resources"]).with_header("bad header", "v");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
