//! URL construction from host, prefix, and path segments.

use crate::{Error, Result};
use url::Url;

/// Composes the absolute request URL from the configured host, the API
/// prefix, and ordered path segments.
///
/// Segments are appended individually so reserved characters inside a
/// segment are percent-encoded rather than interpreted as path separators.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the segment list is empty, any
/// segment is empty, or the host cannot carry a path (e.g. `mailto:`).
pub fn build_url(base: &Url, prefix: &str, segments: &[String]) -> Result<Url> {
    if segments.is_empty() {
        return Err(Error::InvalidArgument(
            "path must be a non-empty sequence of segments".to_string(),
        ));
    }
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(Error::InvalidArgument(
            "path segments cannot be empty".to_string(),
        ));
    }

    let mut url = base.clone();
    {
        let mut parts = url.path_segments_mut().map_err(|_| {
            Error::InvalidArgument(format!("API host cannot carry a path: {base}"))
        })?;
        parts.pop_if_empty();
        for part in prefix.split('/').filter(|part| !part.is_empty()) {
            parts.push(part);
        }
        for segment in segments {
            parts.push(segment);
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.plateau.dev").unwrap()
    }

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_joins_prefix_and_segments() {
        let url = build_url(&base(), "v2", &segs(&["resources", "abc123"])).unwrap();
        assert_eq!(url.as_str(), "https://api.plateau.dev/v2/resources/abc123");
    }

    #[test]
    fn test_empty_prefix_is_skipped() {
        let url = build_url(&base(), "", &segs(&["resources"])).unwrap();
        assert_eq!(url.as_str(), "https://api.plateau.dev/resources");
    }

    #[test]
    fn test_prefix_slashes_are_normalized() {
        let url = build_url(&base(), "/v2/", &segs(&["resources"])).unwrap();
        assert_eq!(url.as_str(), "https://api.plateau.dev/v2/resources");
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        let url = build_url(&base(), "v2", &segs(&["resources", "a b/c"])).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.plateau.dev/v2/resources/a%20b%2Fc"
        );
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let result = build_url(&base(), "v2", &[]);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_segment_is_rejected() {
        let result = build_url(&base(), "v2", &segs(&["resources", ""]));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
