//! # tenderwatch-sync
//!
//! Persistence side of follower management: the [`TenderBackend`] seam,
//! its HTTP implementation, client configuration and the
//! [`FollowerSession`] that ties a follower store to a backend.

pub mod backend;
pub mod config;
pub mod csrf;
pub mod error;
pub mod http;
pub mod session;

pub use backend::TenderBackend;
pub use config::{ClientConfig, Endpoint, Endpoints};
pub use error::{ConfigError, SyncError};
pub use http::HttpBackend;
pub use session::{FollowerSession, SaveOutcome};
