//! Error taxonomy for promptbench.
//!
//! Two layers:
//! - [`BackendError`] covers a single model invocation. The execution engine
//!   is the only place that turns one of these into a failed result.
//! - [`BenchError`] covers harness setup (fixtures, configuration,
//!   credentials). These are fatal to the run.

use std::path::PathBuf;

/// Errors raised by a model backend while serving one request.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The request could not be signed or built.
    #[error("request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

/// Harness-level errors. Any of these ends the run.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("failed to read fixture {path:?}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no credentials found for profile {profile}: {reason}")]
    Credentials { profile: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("http client error: {0}")]
    HttpClient(String),
}

/// Result type for harness setup operations.
pub type Result<T> = std::result::Result<T, BenchError>;
