//! Client configuration: host, prefix, API key, user agent, proxies.
//!
//! A [`ClientConfig`] is immutable for the lifetime of the client that owns
//! it, which is what makes concurrent calls through a shared client safe.

use crate::{Error, Result};
use url::Url;

/// Default API host.
pub const DEFAULT_API_HOST: &str = "https://api.plateau.dev";

/// Default API path prefix.
pub const DEFAULT_API_PREFIX: &str = "v2";

const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Proxy URLs applied to every call's transport.
#[derive(Debug, Clone, Default)]
pub struct ProxyConfig {
    /// Proxy for plain HTTP requests.
    pub http: Option<String>,
    /// Proxy for HTTPS requests.
    pub https: Option<String>,
}

/// Long-lived, read-only connection settings for a [`Client`](crate::Client).
///
/// # Examples
///
/// ```
/// use plateau::ClientConfig;
///
/// # fn example() -> Result<(), plateau::Error> {
/// let config = ClientConfig::builder()
///     .api_host("https://api.plateau.dev")?
///     .api_prefix("v2")
///     .api_key("sk-test")
///     .build()?;
/// assert_eq!(config.api_prefix(), "v2");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_host: Url,
    api_prefix: String,
    api_key: String,
    user_agent: String,
    proxies: Option<ProxyConfig>,
}

impl ClientConfig {
    /// Creates a new builder with default host, prefix, and user agent.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Loads configuration from the environment.
    ///
    /// `PLATEAU_API_KEY` is required; `PLATEAU_API_HOST`,
    /// `PLATEAU_API_PREFIX`, `PLATEAU_USER_AGENT`, `PLATEAU_HTTP_PROXY`, and
    /// `PLATEAU_HTTPS_PROXY` override their defaults when set.
    pub fn from_env() -> Result<Self> {
        let mut builder = ClientConfigBuilder::new().api_key(
            std::env::var("PLATEAU_API_KEY")
                .map_err(|_| Error::Config("PLATEAU_API_KEY is not set".to_string()))?,
        );
        if let Ok(host) = std::env::var("PLATEAU_API_HOST") {
            builder = builder.api_host(host)?;
        }
        if let Ok(prefix) = std::env::var("PLATEAU_API_PREFIX") {
            builder = builder.api_prefix(prefix);
        }
        if let Ok(user_agent) = std::env::var("PLATEAU_USER_AGENT") {
            builder = builder.user_agent(user_agent);
        }
        let http_proxy = std::env::var("PLATEAU_HTTP_PROXY").ok();
        let https_proxy = std::env::var("PLATEAU_HTTPS_PROXY").ok();
        if http_proxy.is_some() || https_proxy.is_some() {
            builder = builder.proxies(ProxyConfig {
                http: http_proxy,
                https: https_proxy,
            });
        }
        builder.build()
    }

    /// The API host URL.
    pub fn api_host(&self) -> &Url {
        &self.api_host
    }

    /// The path prefix inserted between the host and call path segments.
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// The bearer token sent on every call.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The `User-Agent` value sent on every call.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The configured proxies, if any.
    pub fn proxies(&self) -> Option<&ProxyConfig> {
        self.proxies.as_ref()
    }
}

/// Builder for [`ClientConfig`].
pub struct ClientConfigBuilder {
    api_host: Url,
    api_prefix: String,
    api_key: Option<String>,
    user_agent: String,
    proxies: Option<ProxyConfig>,
}

impl ClientConfigBuilder {
    /// Creates a builder with default host, prefix, and user agent.
    pub fn new() -> Self {
        Self {
            // Parsing a known-good constant cannot fail.
            api_host: Url::parse(DEFAULT_API_HOST).expect("default API host is a valid URL"),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxies: None,
        }
    }

    /// Sets the API host.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn api_host(mut self, host: impl AsRef<str>) -> Result<Self> {
        self.api_host = Url::parse(host.as_ref())?;
        Ok(self)
    }

    /// Sets the API path prefix. An empty prefix mounts calls at the root.
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Sets the API key used for bearer authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the `User-Agent` value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets proxy URLs applied to every call's transport.
    pub fn proxies(mut self, proxies: ProxyConfig) -> Self {
        self.proxies = Some(proxies);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key was provided.
    pub fn build(self) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| Error::Config("API key is required".to_string()))?;

        Ok(ClientConfig {
            api_host: self.api_host,
            api_prefix: self.api_prefix,
            api_key,
            user_agent: self.user_agent,
            proxies: self.proxies,
        })
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::builder().api_key("sk-test").build().unwrap();

        assert_eq!(config.api_host().as_str(), "https://api.plateau.dev/");
        assert_eq!(config.api_prefix(), DEFAULT_API_PREFIX);
        assert_eq!(config.api_key(), "sk-test");
        assert!(config.user_agent().starts_with("plateau/"));
        assert!(config.proxies().is_none());
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let result = ClientConfig::builder().build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let result = ClientConfig::builder().api_host("not a url");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_from_env_reads_overrides() {
        std::env::set_var("PLATEAU_API_KEY", "sk-env");
        std::env::set_var("PLATEAU_API_HOST", "https://api.example.com");
        std::env::set_var("PLATEAU_API_PREFIX", "v3");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_key(), "sk-env");
        assert_eq!(config.api_host().as_str(), "https://api.example.com/");
        assert_eq!(config.api_prefix(), "v3");

        std::env::remove_var("PLATEAU_API_KEY");
        std::env::remove_var("PLATEAU_API_HOST");
        std::env::remove_var("PLATEAU_API_PREFIX");
    }
}
