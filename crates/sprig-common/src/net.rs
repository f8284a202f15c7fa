//! Fetch utilities for the sprig renderer.
//!
//! The rendering core never touches the network or the file system. This module
//! is the collaborator that materializes document and stylesheet text for it:
//! `http`/`https` through a blocking `reqwest` client, `file://` from disk, and
//! `data:` URLs decoded in place.
//!
//! Responses are never cached.

use std::collections::HashMap;
use std::time::Duration;

use base64::Engine;
use thiserror::Error;

/// User-Agent header sent with all requests.
const USER_AGENT: &str = "sprig/0.1 (toy browser)";

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of redirects followed before giving up.
const MAX_REDIRECTS: usize = 5;

/// A fetched resource: response headers (keys lowercased) plus the decoded body text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Response headers with lowercased names. Empty for `file:` and `data:` URLs.
    pub headers: HashMap<String, String>,
    /// Body decoded as UTF-8 text.
    pub body: String,
}

/// Errors produced while fetching a resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL scheme is not one of `http`, `https`, `file`, `data`.
    #[error("unknown scheme in '{0}'")]
    UnsupportedScheme(String),
    /// The server answered with a non-success status.
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// A `file:` URL could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A `data:` URL is malformed.
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),
}

/// A parsed `data:` URL that can be decoded into its payload text.
pub struct DataURL {
    /// The full raw `data:` URL string (e.g. `data:text/html,<p>hi</p>`).
    pub raw_data: String,
}

impl DataURL {
    /// Create a new `DataURL` from a raw data URL string.
    #[must_use]
    pub const fn new(raw_data: String) -> Self {
        Self { raw_data }
    }

    /// Decode the data URL payload into text.
    ///
    /// Payloads marked `;base64` are base64-decoded; anything else is taken
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidDataUrl`] if the URL has no `,` separator
    /// or base64 decoding fails.
    pub fn decode(&self) -> Result<String, FetchError> {
        let data_url = self.raw_data.trim_start_matches("data:");
        let Some((metadata, data)) = data_url.split_once(',') else {
            return Err(FetchError::InvalidDataUrl("missing comma".to_string()));
        };

        if metadata.ends_with(";base64") {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| FetchError::InvalidDataUrl(format!("base64 decode error: {e}")))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        } else {
            Ok(data.to_string())
        }
    }
}

/// Fetch a URL and return its headers and body text.
///
/// # Errors
///
/// Returns a [`FetchError`] if the scheme is unsupported, the request fails,
/// the response has a non-success status, or the body cannot be read.
pub fn fetch(url: &str) -> Result<Response, FetchError> {
    if url.starts_with("data:") {
        let body = DataURL::new(url.to_string()).decode()?;
        return Ok(Response {
            headers: HashMap::new(),
            body,
        });
    }

    if let Some(path) = url.strip_prefix("file://") {
        let body = std::fs::read_to_string(path).map_err(|source| FetchError::Io {
            path: path.to_string(),
            source,
        })?;
        return Ok(Response {
            headers: HashMap::new(),
            body,
        });
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        return fetch_remote(url);
    }

    Err(FetchError::UnsupportedScheme(url.to_string()))
}

/// Fetch an `http`/`https` URL, following up to [`MAX_REDIRECTS`] redirects.
fn fetch_remote(url: &str) -> Result<Response, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()?;

    let response = client.get(url).header("User-Agent", USER_AGENT).send()?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_ascii_lowercase(),
                String::from_utf8_lossy(value.as_bytes()).trim().to_string(),
            )
        })
        .collect();
    let body = response.text()?;

    Ok(Response { headers, body })
}
