//! # Plateau - API client for the Plateau data platform
//!
//! Plateau issues authenticated calls against the platform's REST backend,
//! applies a per-call retry/backoff policy, maps transport and server-side
//! failures into a typed error taxonomy, and hydrates JSON responses into
//! typed domain objects or streams them as raw content.
//!
//! ## Quick Start
//!
//! ```no_run
//! use plateau::{CallOptions, Client, ClientConfig};
//! use http::Method;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Resource {
//!     id: String,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), plateau::Error> {
//!     let config = ClientConfig::builder()
//!         .api_host("https://api.plateau.dev")?
//!         .api_key("sk-test")
//!         .build()?;
//!     let client = Client::new(config);
//!
//!     // Fetch and hydrate a single resource.
//!     let fetched = client
//!         .call::<Resource>(CallOptions::new(Method::GET, ["resources", "abc123"]))
//!         .await?;
//!     if let Some(resource) = fetched.into_one() {
//!         println!("{}: {}", resource.id, resource.name);
//!     }
//!
//!     // Delete a label; 204 comes back as a no-content marker.
//!     let deleted = client
//!         .call::<serde_json::Value>(CallOptions::new(
//!             Method::DELETE,
//!             ["resources", "abc123", "labels", "k1"],
//!         ))
//!         .await?;
//!     assert!(deleted.is_no_content());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! - **Typed calls** - [`Client::call`] decodes the JSON body and hydrates
//!   one object per payload (or per array element), each carrying the client
//!   and the full decoded payload.
//! - **Streaming calls** - [`Client::call_raw`] returns the response handle
//!   unconsumed; [`RawResponse`] exposes chunk and line streams.
//! - **Per-call retry policy** - forcelisted statuses, connection errors,
//!   and redirects have independent limits, resolved fresh from
//!   [`CallOptions`] for every call. Backoff is `backoff * 2^(n-1)` seconds.
//! - **Closed error taxonomy** - every failure reaches the caller as exactly
//!   one [`Error`] kind; retries are invisible except as latency.
//! - **Scoped transports** - each call builds and drops its own transport,
//!   trading connection reuse for isolation.
//!
//! ## Error Handling
//!
//! ```no_run
//! use plateau::{CallOptions, Client, ClientConfig, Error};
//! use http::Method;
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::new(ClientConfig::builder().api_key("sk-test").build()?);
//! match client
//!     .call::<serde_json::Value>(CallOptions::new(Method::GET, ["resources", "missing"]))
//!     .await
//! {
//!     Ok(fetched) => println!("found: {:?}", fetched.into_one().map(|h| h.raw_response)),
//!     Err(Error::NotFound { body }) => eprintln!("not found: {body}"),
//!     Err(Error::Api { status, body }) => eprintln!("API error {status}: {body}"),
//!     Err(Error::Timeout(_)) => eprintln!("timed out"),
//!     Err(e) => eprintln!("other error: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
pub mod models;
mod options;
mod response;
mod retry;
mod urls;

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder, ProxyConfig};
pub use error::{Error, Result};
pub use models::{Fetched, Hydrated};
pub use options::CallOptions;
pub use response::{ByteChunks, Lines, RawFetch, RawResponse, TextChunks};
pub use retry::RetryPolicy;
pub use urls::build_url;
