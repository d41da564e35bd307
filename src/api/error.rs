//! Failure taxonomy for the remote API.
//!
//! Callers collapse every variant into a single "fetch failed" outcome; the
//! variants exist so logs say which stage broke.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// The configured base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL has no path to append endpoint segments to (e.g. `mailto:`).
    #[error("Base URL cannot carry a path: {0}")]
    CannotBeABase(String),

    /// Connection, TLS, timeout or body read failure.
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Any non-2xx response.
    #[error("HTTP {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Body was not the expected JSON shape.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Well-formed but empty where data is required.
    #[error("Empty result: {0}")]
    Empty(String),
}
