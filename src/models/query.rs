//! The query resource: streamed execution and download to local storage.

use super::{Hydrated, ResourceCommon};
use crate::response::{ByteChunks, RawFetch, TextChunks};
use crate::{CallOptions, Error, Result};
use futures_util::StreamExt;
use http::Method;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Streamed content must be consumed in multiples of this size.
pub const CHUNK_SIZE_UNIT: usize = 256 * 1024;

/// Default chunk size for streamed query content (10 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 10 * 1024 * 1024;

/// Returns `true` if `chunk_size` is a positive multiple of 256 KiB.
pub fn valid_chunk_size(chunk_size: usize) -> bool {
    chunk_size > 0 && chunk_size % CHUNK_SIZE_UNIT == 0
}

/// A saved query resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(flatten)]
    pub common: ResourceCommon,
    /// The query definition as stored by the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl Hydrated<Query> {
    fn content_options(
        &self,
        format: &str,
        params: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<CallOptions> {
        let mut options = CallOptions::new(
            Method::GET,
            ["resources", self.data.common.id.as_str(), "content"],
        )
        .with_header("Content-Type", "application/json")?
        .with_header("Accept", "*/*")?;
        if let Some(params) = params {
            options = options.with_params(params);
        }
        Ok(options.with_param("format", format))
    }

    /// Runs the query and streams its content as byte chunks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `chunk_size` is not a positive
    /// multiple of 256 KiB.
    pub async fn run(
        &self,
        format: &str,
        params: Option<serde_json::Map<String, serde_json::Value>>,
        chunk_size: usize,
    ) -> Result<ByteChunks> {
        if !valid_chunk_size(chunk_size) {
            return Err(Error::InvalidArgument(
                "chunk_size must be a positive multiple of 256 KiB".to_string(),
            ));
        }

        let options = self.content_options(format, params)?;
        match self.connection.call_raw(options).await? {
            RawFetch::Response(response) => Ok(response.bytes_chunks(chunk_size)),
            RawFetch::NoContent => Ok(ByteChunks::empty(chunk_size)),
        }
    }

    /// Runs the query and streams its content as text chunks.
    ///
    /// Same contract as [`run`](Self::run), with each chunk decoded as
    /// UTF-8 (invalid sequences replaced).
    pub async fn run_text(
        &self,
        format: &str,
        params: Option<serde_json::Map<String, serde_json::Value>>,
        chunk_size: usize,
    ) -> Result<TextChunks> {
        let chunks = self.run(format, params, chunk_size).await?;
        Ok(TextChunks::new(chunks))
    }

    /// Runs the query and writes its content line by line to `local_path`.
    ///
    /// Empty lines are skipped, matching the line-oriented write contract.
    /// Returns `true` once the file is fully written.
    pub async fn download(
        &self,
        local_path: impl AsRef<Path>,
        format: &str,
        params: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<bool> {
        let options = self.content_options(format, params)?;
        let fetch = self.connection.call_raw(options).await?;

        let mut file = tokio::fs::File::create(local_path.as_ref()).await?;
        if let RawFetch::Response(response) = fetch {
            let mut lines = response.lines();
            while let Some(line) = lines.next().await {
                let line = line?;
                if line.is_empty() {
                    continue;
                }
                file.write_all(line.as_bytes()).await?;
                file.write_all(b"\n").await?;
            }
        }
        file.flush().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_chunk_sizes() {
        assert!(valid_chunk_size(CHUNK_SIZE_UNIT));
        assert!(valid_chunk_size(DEFAULT_CHUNK_SIZE));
        assert!(valid_chunk_size(CHUNK_SIZE_UNIT * 3));
    }

    #[test]
    fn test_invalid_chunk_sizes() {
        assert!(!valid_chunk_size(0));
        assert!(!valid_chunk_size(1024));
        assert!(!valid_chunk_size(CHUNK_SIZE_UNIT + 1));
    }
}
