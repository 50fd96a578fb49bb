//! Remote resource fetching.
//!
//! Provides a blocking HTTP GET wrapper and `data:` URL decoding. Only the
//! CLI front end reaches for these; the conversion core never performs I/O.

use std::time::Duration;

use base64::Engine;
use reqwest::Url;
use thiserror::Error;

/// User-Agent header sent with all requests.
const USER_AGENT: &str = concat!("vellum/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Failure while fetching a remote resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed or the request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),
    /// The `data:` URL was malformed.
    #[error("invalid data URL: {0}")]
    DataUrl(String),
}

/// A parsed `data:` URL that can be decoded into raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Media type and parameters, e.g. `image/svg+xml;base64`.
    metadata: String,
    /// Everything after the first comma.
    payload: String,
}

impl DataUrl {
    /// Split a raw `data:` URL into metadata and payload.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] if the scheme or the comma separator is missing.
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let rest = raw
            .strip_prefix("data:")
            .ok_or_else(|| FetchError::DataUrl("missing data: scheme".to_string()))?;
        let (metadata, payload) = rest
            .split_once(',')
            .ok_or_else(|| FetchError::DataUrl("missing comma".to_string()))?;
        Ok(Self {
            metadata: metadata.to_string(),
            payload: payload.to_string(),
        })
    }

    /// Decode the payload into raw bytes.
    ///
    /// Base64 payloads are decoded; anything else is percent-decoded.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] if base64 decoding fails or a percent
    /// escape is malformed.
    pub fn decode(&self) -> Result<Vec<u8>, FetchError> {
        if self.metadata.ends_with(";base64") {
            base64::engine::general_purpose::STANDARD
                .decode(self.payload.trim())
                .map_err(|e| FetchError::DataUrl(format!("base64 decode error: {e}")))
        } else {
            percent_decode(&self.payload)
        }
    }
}

fn percent_decode(input: &str) -> Result<Vec<u8>, FetchError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input
                .get(i + 1..i + 3)
                .ok_or_else(|| FetchError::DataUrl("truncated percent escape".to_string()))?;
            let value = u8::from_str_radix(hex, 16)
                .map_err(|_| FetchError::DataUrl(format!("bad percent escape '%{hex}'")))?;
            out.push(value);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Fetch the body of an `http`/`https` URL.
///
/// Returns `Ok(None)` when `url` does not parse or names another scheme, so
/// callers can fall back to treating it as a local path.
///
/// # Errors
///
/// Returns a [`FetchError`] if the request fails or the response has a
/// non-success status.
pub fn fetch_from_url(url: &str) -> Result<Option<Vec<u8>>, FetchError> {
    let Ok(parsed) = Url::parse(url) else {
        return Ok(None);
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return Ok(None);
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()?;

    let response = client
        .get(parsed)
        .header("User-Agent", USER_AGENT)
        .send()?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    Ok(Some(response.bytes()?.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_base64() {
        let url = DataUrl::parse("data:image/svg+xml;base64,PHN2Zy8+").unwrap();
        assert_eq!(url.decode().unwrap(), b"<svg/>");
    }

    #[test]
    fn test_data_url_percent_encoded() {
        let url = DataUrl::parse("data:image/svg+xml,%3Csvg%2F%3E").unwrap();
        assert_eq!(url.decode().unwrap(), b"<svg/>");
    }

    #[test]
    fn test_data_url_missing_comma() {
        assert!(DataUrl::parse("data:image/png;base64").is_err());
    }

    #[test]
    fn test_non_http_scheme_is_not_fetched() {
        assert!(fetch_from_url("file:///tmp/a.svg").unwrap().is_none());
        assert!(fetch_from_url("not a url").unwrap().is_none());
    }
}
