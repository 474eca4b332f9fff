//! Error types for tenderwatch-sync.

use std::path::PathBuf;

use thiserror::Error;

use tenderwatch_core::{FollowerError, TagError};

/// All errors that can arise while talking to the tender server.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the in-memory follower store.
    #[error("follower state error: {0}")]
    Follower(#[from] FollowerError),

    /// A tag name rejected before any request was made.
    #[error("invalid tag: {0}")]
    Tag(#[from] TagError),

    /// The server answered with a non-2xx status.
    #[error("server rejected {url} with status {status}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// A 2xx response whose body could not be read or decoded.
    #[error("invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (request bodies).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The blocking request task panicked or was cancelled.
    #[error("request task failed: {0}")]
    Join(String),
}

/// All errors that can arise from loading or saving client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the offending file.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// No config file at the expected path.
    #[error("config not found at {path}; run `tenderwatch config init` first")]
    NotFound { path: PathBuf },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// `base_url` is not an absolute http(s) URL.
    #[error("base URL '{url}' must start with http:// or https://")]
    InvalidBaseUrl { url: String },

    /// An endpoint template lacks the `{{id}}` placeholder.
    #[error("endpoint template '{template}' has no {{id}} placeholder")]
    InvalidEndpoint { template: String },

    /// A zero request timeout would make every request fail immediately.
    #[error("timeout_secs must be at least 1, got {value}")]
    InvalidTimeout { value: u64 },
}

/// Convenience constructor for [`ConfigError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
