//! The request executor for the Plateau API.
//!
//! [`Client`] builds the request URL, injects the bearer token and user
//! agent, scopes a fresh transport with the call's retry policy, executes
//! the exchange, classifies transport failures, and dispatches on the HTTP
//! status code.

use crate::error::{classify, Error, Result};
use crate::models::Fetched;
use crate::response::{RawFetch, RawResponse};
use crate::{urls, CallOptions, RetryPolicy};
use http::{header, HeaderMap, HeaderValue, Method};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

/// Statuses that take the success path.
const SUCCESS_STATUSES: [u16; 4] = [200, 201, 202, 206];

/// An API client for the Plateau data platform.
///
/// The client owns an immutable [`ClientConfig`](crate::ClientConfig) and is
/// cheap to clone; clones share the configuration. Each call scopes its own
/// transport, so concurrent calls from multiple tasks are safe.
///
/// # Examples
///
/// ```no_run
/// use plateau::{CallOptions, Client, ClientConfig};
/// use http::Method;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Resource {
///     id: String,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), plateau::Error> {
/// let client = Client::new(ClientConfig::builder().api_key("sk-test").build()?);
///
/// let fetched = client
///     .call::<Resource>(CallOptions::new(Method::GET, ["resources", "abc123"]))
///     .await?;
///
/// if let Some(resource) = fetched.into_one() {
///     println!("{} -> {}", resource.id, resource.name);
///     println!("raw payload: {}", resource.raw_response);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: crate::ClientConfig,
}

/// A received response after status dispatch, before body consumption.
enum Outcome {
    Success(reqwest::Response),
    NoContent,
}

impl Client {
    /// Creates a client from an immutable configuration.
    pub fn new(config: crate::ClientConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner { config }),
        }
    }

    /// The configuration this client was created with.
    pub fn config(&self) -> &crate::ClientConfig {
        &self.inner.config
    }

    /// Executes a call and hydrates the JSON response into `M`.
    ///
    /// A JSON object hydrates into [`Fetched::One`]; a JSON array hydrates
    /// one object per element, order preserved, into [`Fetched::Many`]; a
    /// 204 response becomes [`Fetched::NoContent`] without body parsing.
    /// Each hydrated object carries a clone of this client and the full
    /// decoded payload.
    pub async fn call<M>(&self, options: CallOptions) -> Result<Fetched<M>>
    where
        M: DeserializeOwned,
    {
        match self.execute(&options).await? {
            Outcome::NoContent => Ok(Fetched::NoContent),
            Outcome::Success(response) => {
                let body = response.text().await.map_err(classify)?;
                let payload: serde_json::Value = serde_json::from_str(&body)?;
                Fetched::hydrate(self.clone(), payload)
            }
        }
    }

    /// Executes a call and returns the response handle unconsumed.
    ///
    /// This is the streaming path: the returned [`RawResponse`] exposes the
    /// body as chunk and line streams. A 204 response becomes
    /// [`RawFetch::NoContent`].
    pub async fn call_raw(&self, options: CallOptions) -> Result<RawFetch> {
        match self.execute(&options).await? {
            Outcome::NoContent => Ok(RawFetch::NoContent),
            Outcome::Success(response) => Ok(RawFetch::Response(RawResponse::new(response))),
        }
    }

    /// Hydrating GET with default options.
    pub async fn get<M, I, S>(&self, path: I) -> Result<Fetched<M>>
    where
        M: DeserializeOwned,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.call(CallOptions::new(Method::GET, path)).await
    }

    /// Hydrating DELETE with default options.
    pub async fn delete<M, I, S>(&self, path: I) -> Result<Fetched<M>>
    where
        M: DeserializeOwned,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.call(CallOptions::new(Method::DELETE, path)).await
    }

    /// Hydrating POST sending `params` as the JSON body.
    pub async fn post<M, I, S>(
        &self,
        path: I,
        params: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Fetched<M>>
    where
        M: DeserializeOwned,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.call(CallOptions::new(Method::POST, path).with_params(params))
            .await
    }

    /// Hydrating PUT sending `params` as the JSON body.
    pub async fn put<M, I, S>(
        &self,
        path: I,
        params: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Fetched<M>>
    where
        M: DeserializeOwned,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.call(CallOptions::new(Method::PUT, path).with_params(params))
            .await
    }

    /// Runs the exchange: validation, transport setup, retry loop, and
    /// status dispatch.
    async fn execute(&self, options: &CallOptions) -> Result<Outcome> {
        validate(options)?;

        let url = urls::build_url(
            self.inner.config.api_host(),
            self.inner.config.api_prefix(),
            &options.path,
        )?;
        let headers = self.merged_headers(options)?;
        let policy = options.retry_policy();

        // One transport per call: dropped on every exit path, no connection
        // reuse across calls.
        let transport = self.build_transport(&policy)?;

        let mut status_retries: u32 = 0;
        let mut conn_errors: u32 = 0;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            tracing::debug!(
                method = %options.method,
                url = %url,
                attempt = attempt,
                "executing API request"
            );

            let request = build_request(&transport, options, &url, &headers);

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if policy.should_retry_status(status, &options.method)
                        && status_retries < policy.retries
                    {
                        status_retries += 1;
                        let delay = policy.delay_for_attempt(status_retries);
                        tracing::warn!(
                            status = status.as_u16(),
                            retry = status_retries,
                            delay_ms = delay.as_millis() as u64,
                            "retrying on forcelisted status"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    tracing::info!(
                        status = status.as_u16(),
                        attempts = attempt,
                        "received API response"
                    );
                    return dispatch(response).await;
                }
                Err(err) => {
                    let err = classify(err);

                    if matches!(err, Error::Connection(_)) && conn_errors < policy.max_conn_errors
                    {
                        conn_errors += 1;
                        let delay = policy.delay_for_attempt(conn_errors);
                        tracing::warn!(
                            error = %err,
                            retry = conn_errors,
                            delay_ms = delay.as_millis() as u64,
                            "retrying after connection error"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    tracing::warn!(
                        error = %err,
                        method = %options.method,
                        url = %url,
                        attempts = attempt,
                        "request failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Merges caller headers with the mandatory auth and user-agent headers.
    /// Caller-supplied values for those two keys are overwritten.
    fn merged_headers(&self, options: &CallOptions) -> Result<HeaderMap> {
        let mut headers = options.headers.clone();

        let token = format!("Bearer {}", self.inner.config.api_key());
        let token = HeaderValue::try_from(token)
            .map_err(|e| Error::Config(format!("API key is not a valid header value: {e}")))?;
        let user_agent = HeaderValue::try_from(self.inner.config.user_agent())
            .map_err(|e| Error::Config(format!("user agent is not a valid header value: {e}")))?;

        headers.insert(header::AUTHORIZATION, token);
        headers.insert(header::USER_AGENT, user_agent);
        Ok(headers)
    }

    /// Builds the per-call transport carrying the redirect limit and the
    /// configured proxies.
    fn build_transport(&self, policy: &RetryPolicy) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(policy.max_http_redirects));

        if let Some(proxies) = self.inner.config.proxies() {
            if let Some(http_proxy) = &proxies.http {
                let proxy = reqwest::Proxy::http(http_proxy)
                    .map_err(|e| Error::Config(format!("invalid HTTP proxy: {e}")))?;
                builder = builder.proxy(proxy);
            }
            if let Some(https_proxy) = &proxies.https {
                let proxy = reqwest::Proxy::https(https_proxy)
                    .map_err(|e| Error::Config(format!("invalid HTTPS proxy: {e}")))?;
                builder = builder.proxy(proxy);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build transport: {e}")))
    }
}

/// Local precondition checks; fail before any network I/O.
fn validate(options: &CallOptions) -> Result<()> {
    if options.path.is_empty() {
        return Err(Error::InvalidArgument(
            "path must be a non-empty sequence of segments".to_string(),
        ));
    }
    let supported = [Method::GET, Method::DELETE, Method::PUT, Method::POST];
    if supported.contains(&options.method) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "unsupported method {}: expected GET, DELETE, PUT, or POST",
            options.method
        )))
    }
}

/// Builds one attempt's request. GET/DELETE send `params` as the query
/// string; PUT/POST send `data` as a form body when present, otherwise
/// `params` as a JSON body. Never both.
fn build_request(
    transport: &reqwest::Client,
    options: &CallOptions,
    url: &Url,
    headers: &HeaderMap,
) -> reqwest::RequestBuilder {
    let mut request = transport
        .request(options.method.clone(), url.clone())
        .headers(headers.clone())
        .timeout(options.timeout);

    if options.method == Method::GET || options.method == Method::DELETE {
        if !options.params.is_empty() {
            request = request.query(&query_pairs(&options.params));
        }
    } else if let Some(data) = &options.data {
        request = request.form(data);
    } else {
        request = request.json(&options.params);
    }
    request
}

fn query_pairs(params: &serde_json::Map<String, serde_json::Value>) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Dispatches purely on the status code of a received response.
async fn dispatch(response: reqwest::Response) -> Result<Outcome> {
    let status = response.status();
    if SUCCESS_STATUSES.contains(&status.as_u16()) {
        return Ok(Outcome::Success(response));
    }
    if status == http::StatusCode::NO_CONTENT {
        return Ok(Outcome::NoContent);
    }

    let body = response.text().await.map_err(classify)?;
    let body: serde_json::Value = serde_json::from_str(&body)?;
    if status == http::StatusCode::NOT_FOUND {
        Err(Error::NotFound { body })
    } else {
        Err(Error::Api { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(method: Method, path: &[&str]) -> CallOptions {
        CallOptions::new(method, path.iter().copied())
    }

    #[test]
    fn test_validate_rejects_empty_path() {
        let result = validate(&options(Method::GET, &[]));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_validate_rejects_unsupported_method() {
        for method in [Method::PATCH, Method::HEAD, Method::OPTIONS] {
            let result = validate(&options(method, &["resources"]));
            assert!(matches!(result, Err(Error::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_validate_accepts_supported_methods() {
        for method in [Method::GET, Method::DELETE, Method::PUT, Method::POST] {
            assert!(validate(&options(method, &["resources"])).is_ok());
        }
    }

    #[test]
    fn test_query_pairs_stringify_non_string_values() {
        let mut params = serde_json::Map::new();
        params.insert("format".to_string(), "csv".into());
        params.insert("limit".to_string(), 25.into());

        let pairs = query_pairs(&params);
        assert!(pairs.contains(&("format".to_string(), "csv".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "25".to_string())));
    }

    #[test]
    fn test_mandatory_headers_overwrite_caller_values() {
        let config = crate::ClientConfig::builder()
            .api_key("sk-test")
            .build()
            .unwrap();
        let client = Client::new(config);

        let options = options(Method::GET, &["resources"])
            .with_header("Authorization", "Bearer forged")
            .unwrap()
            .with_header("X-Extra", "kept")
            .unwrap();

        let headers = client.merged_headers(&options).unwrap();
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer sk-test");
        assert!(headers
            .get(header::USER_AGENT)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("plateau/"));
        assert_eq!(headers.get("x-extra").unwrap(), "kept");
    }
}
