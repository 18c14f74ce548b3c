//! Raw response handles and lazy streaming consumption.
//!
//! A [`RawResponse`] is returned unconsumed when a call is made without a
//! model type, leaving the body available for buffered reads or for lazy,
//! finite, non-restartable streaming. Dropping a stream early drops the
//! underlying response and releases the connection.

use crate::error::{classify, Result};
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::pin::Pin;
use std::task::{Context, Poll};

type InnerStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Result of a call made without a model type.
#[derive(Debug)]
pub enum RawFetch {
    /// A success response with its body still unconsumed.
    Response(RawResponse),
    /// The server returned 204 No Content.
    NoContent,
}

impl RawFetch {
    /// Returns the response handle, or `None` for a 204 result.
    pub fn into_response(self) -> Option<RawResponse> {
        match self {
            RawFetch::Response(response) => Some(response),
            RawFetch::NoContent => None,
        }
    }

    /// Returns `true` if the server responded 204 No Content.
    pub fn is_no_content(&self) -> bool {
        matches!(self, RawFetch::NoContent)
    }
}

/// An unconsumed success response.
///
/// The handle can be drained in one piece with [`text`](Self::text) or
/// [`json`](Self::json), or consumed lazily with the streaming adapters.
#[derive(Debug)]
pub struct RawResponse {
    inner: reqwest::Response,
}

impl RawResponse {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Reads the full body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(classify)
    }

    /// Reads and decodes the full body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.inner.text().await.map_err(classify)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Consumes the body as a stream of byte chunks of `chunk_size` bytes.
    ///
    /// The final chunk may be shorter. The stream is finite and cannot be
    /// restarted; the connection stays open until the stream is drained or
    /// dropped.
    pub fn bytes_chunks(self, chunk_size: usize) -> ByteChunks {
        ByteChunks::new(
            Box::pin(self.inner.bytes_stream().map(|chunk| chunk.map_err(classify))),
            chunk_size,
        )
    }

    /// Consumes the body as a stream of text chunks of `chunk_size` bytes,
    /// decoded as UTF-8 with invalid sequences replaced.
    pub fn text_chunks(self, chunk_size: usize) -> TextChunks {
        TextChunks {
            inner: self.bytes_chunks(chunk_size),
        }
    }

    /// Consumes the body as a stream of lines, split on `\n` with a trailing
    /// `\r` trimmed, decoded as UTF-8 with invalid sequences replaced.
    pub fn lines(self) -> Lines {
        Lines {
            stream: Box::pin(self.inner.bytes_stream().map(|chunk| chunk.map_err(classify))),
            buffer: BytesMut::new(),
            done: false,
        }
    }
}

/// Lazy stream of fixed-size byte chunks over a response body.
pub struct ByteChunks {
    stream: InnerStream,
    buffer: BytesMut,
    chunk_size: usize,
    done: bool,
}

impl ByteChunks {
    pub(crate) fn new(stream: InnerStream, chunk_size: usize) -> Self {
        Self {
            stream,
            buffer: BytesMut::new(),
            chunk_size: chunk_size.max(1),
            done: false,
        }
    }

    /// A stream that yields nothing, used for bodiless responses.
    pub(crate) fn empty(chunk_size: usize) -> Self {
        Self::new(Box::pin(futures_util::stream::empty()), chunk_size)
    }
}

impl Stream for ByteChunks {
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if this.buffer.len() >= this.chunk_size {
                let chunk = this.buffer.split_to(this.chunk_size).freeze();
                return Poll::Ready(Some(Ok(chunk)));
            }
            if this.done {
                if this.buffer.is_empty() {
                    return Poll::Ready(None);
                }
                let rest = this.buffer.split().freeze();
                return Poll::Ready(Some(Ok(rest)));
            }
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => this.buffer.extend_from_slice(&bytes),
                Poll::Ready(Some(Err(e))) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => this.done = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Lazy stream of fixed-size text chunks over a response body.
pub struct TextChunks {
    inner: ByteChunks,
}

impl TextChunks {
    pub(crate) fn new(inner: ByteChunks) -> Self {
        Self { inner }
    }
}

impl Stream for TextChunks {
    type Item = Result<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(bytes))) => {
                Poll::Ready(Some(Ok(String::from_utf8_lossy(&bytes).into_owned())))
            }
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Lazy stream of lines over a response body.
pub struct Lines {
    stream: InnerStream,
    buffer: BytesMut,
    done: bool,
}

impl Lines {
    fn take_line(&mut self) -> Option<String> {
        let newline = self.buffer.iter().position(|&b| b == b'\n')?;
        let mut line = self.buffer.split_to(newline + 1);
        line.truncate(newline);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

impl Stream for Lines {
    type Item = Result<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(line) = this.take_line() {
                return Poll::Ready(Some(Ok(line)));
            }
            if this.done {
                if this.buffer.is_empty() {
                    return Poll::Ready(None);
                }
                // Final line without a trailing newline.
                let rest = this.buffer.split();
                return Poll::Ready(Some(Ok(String::from_utf8_lossy(&rest).into_owned())));
            }
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => this.buffer.extend_from_slice(&bytes),
                Poll::Ready(Some(Err(e))) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => this.done = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl std::fmt::Debug for ByteChunks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteChunks")
            .field("chunk_size", &self.chunk_size)
            .field("buffered", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn byte_stream(parts: &[&[u8]]) -> InnerStream {
        let items: Vec<Result<Bytes>> = parts
            .iter()
            .map(|part| Ok(Bytes::copy_from_slice(part)))
            .collect();
        Box::pin(stream::iter(items))
    }

    #[tokio::test]
    async fn test_rechunks_to_requested_size() {
        let mut chunks = ByteChunks::new(byte_stream(&[b"abcde", b"fgh", b"ij"]), 4);

        assert_eq!(chunks.next().await.unwrap().unwrap().as_ref(), b"abcd");
        assert_eq!(chunks.next().await.unwrap().unwrap().as_ref(), b"efgh");
        assert_eq!(chunks.next().await.unwrap().unwrap().as_ref(), b"ij");
        assert!(chunks.next().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_chunk_stream_ends_immediately() {
        let mut chunks = ByteChunks::empty(4);
        assert!(chunks.next().await.is_none());
    }

    #[tokio::test]
    async fn test_lines_split_across_chunks() {
        let mut lines = Lines {
            stream: byte_stream(&[b"alpha\nbe", b"ta\r\ngam", b"ma"]),
            buffer: BytesMut::new(),
            done: false,
        };

        assert_eq!(lines.next().await.unwrap().unwrap(), "alpha");
        assert_eq!(lines.next().await.unwrap().unwrap(), "beta");
        assert_eq!(lines.next().await.unwrap().unwrap(), "gamma");
        assert!(lines.next().await.is_none());
    }

    #[tokio::test]
    async fn test_lines_skip_nothing_but_keep_empty_lines() {
        let mut lines = Lines {
            stream: byte_stream(&[b"a\n\nb\n"]),
            buffer: BytesMut::new(),
            done: false,
        };

        assert_eq!(lines.next().await.unwrap().unwrap(), "a");
        assert_eq!(lines.next().await.unwrap().unwrap(), "");
        assert_eq!(lines.next().await.unwrap().unwrap(), "b");
        assert!(lines.next().await.is_none());
    }
}
