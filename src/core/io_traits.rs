//! I/O traits for API access
//!
//! The resolver and live checker only see `JsonFetcher`, so they can be
//! tested on any platform with the mock below. The real HTTP client lives in
//! `host::http`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Why a request produced no usable data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network, DNS or TLS failure
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// Any status other than 200
    #[error("{url} returned non ok status: {status}")]
    HttpStatus { url: String, status: u16 },

    /// Body was not valid UTF-8 JSON
    #[error("invalid JSON from {url}: {message}")]
    Decode { url: String, message: String },

    /// Well-formed JSON without the expected fields
    #[error("missing data in response from {url}: {message}")]
    MissingData { url: String, message: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::HttpStatus { url, .. }
            | FetchError::Decode { url, .. }
            | FetchError::MissingData { url, .. } => url,
        }
    }
}

/// Outcome of a fetch that never fails the caller
///
/// `Empty` means the request worked but there was nothing to show (e.g. zero
/// matches); `Failed` means the request itself did not produce data.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Ready(T),
    Empty,
    Failed(FetchError),
}

impl<T> Fetched<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Fetched::Ready(value) => Some(value),
            _ => None,
        }
    }
}

// =============================================================================
// JSON FETCHER
// =============================================================================

/// Issue a GET request and return the decoded JSON body
pub trait JsonFetcher {
    fn fetch_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// Fetch and deserialize into a typed response
///
/// Shape mismatches are reported as `MissingData`.
pub fn fetch_typed<F, T>(fetcher: &F, url: &str) -> Result<T, FetchError>
where
    F: JsonFetcher + ?Sized,
    T: DeserializeOwned,
{
    let value = fetcher.fetch_json(url)?;
    serde_json::from_value(value).map_err(|e| FetchError::MissingData {
        url: url.to_string(),
        message: e.to_string(),
    })
}

// =============================================================================
// MOCK IMPLEMENTATIONS FOR TESTING
// =============================================================================
