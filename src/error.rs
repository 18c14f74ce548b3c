//! Error types for Plateau API calls.
//!
//! Every failure surfaces to the caller as exactly one of the variants below.
//! Transport errors are classified once, at the executor boundary; retries
//! happen beneath that boundary and are invisible except as added latency.

use http::StatusCode;

/// The error type for Plateau API calls.
///
/// # Examples
///
/// ```no_run
/// use plateau::{CallOptions, Client, ClientConfig, Error};
/// use http::Method;
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new(ClientConfig::builder().api_key("sk-test").build()?);
/// let options = CallOptions::new(Method::GET, ["resources", "abc123"]);
///
/// match client.call::<serde_json::Value>(options).await {
///     Ok(fetched) => println!("ok: {:?}", fetched.into_one().map(|h| h.raw_response)),
///     Err(Error::NotFound { body }) => eprintln!("no such resource: {body}"),
///     Err(Error::Api { status, body }) => eprintln!("API error {status}: {body}"),
///     Err(e) => eprintln!("transport error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed call input: missing or empty path, unsupported method,
    /// invalid chunk size. Raised before any network I/O and never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Protocol-level HTTP failure, including exceeding the redirect limit.
    #[error("HTTP protocol error: {0}")]
    Http(#[source] reqwest::Error),

    /// Connect-phase failure, including proxy negotiation and TLS errors.
    #[error("connection error: {0}")]
    Connection(#[source] reqwest::Error),

    /// Connect-phase or read-phase timeout exceeded.
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// The server responded 404. Carries the decoded JSON error body.
    #[error("resource not found: {body}")]
    NotFound {
        /// The decoded JSON error body.
        body: serde_json::Value,
    },

    /// The server responded with a non-success status other than 404.
    #[error("API error {status}: {body}")]
    Api {
        /// The HTTP status code.
        status: StatusCode,
        /// The decoded JSON error body.
        body: serde_json::Value,
    },

    /// Invalid client or call configuration (bad header values, missing API
    /// key, unusable proxy URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// A response body could not be decoded as JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// An invalid URL was provided for the API host.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Local I/O failure while writing a downloaded stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the HTTP status code if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            _ => None,
        }
    }

    /// Returns the decoded JSON error body if this error carries one.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            Error::Api { body, .. } | Error::NotFound { body } => Some(body),
            _ => None,
        }
    }
}

/// Classifies a transport-level `reqwest` failure into the taxonomy.
///
/// Timeouts are checked first: a connect timeout is both a connect error and
/// a timeout, and the timeout classification wins.
pub(crate) fn classify(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(err)
    } else if err.is_connect() {
        Error::Connection(err)
    } else {
        // Redirect-limit errors and everything else at the protocol layer.
        Error::Http(err)
    }
}

/// A specialized `Result` type for Plateau API calls.
pub type Result<T> = std::result::Result<T, Error>;
