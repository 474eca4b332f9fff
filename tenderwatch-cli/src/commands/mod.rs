pub mod config;
pub mod followers;
pub mod tender;

use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Result};

use tenderwatch_sync::{config as client_config, ClientConfig, ConfigError};

use crate::ConnectionArgs;

pub(crate) fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}

/// Config file values with command-line overrides applied.
///
/// A `--base-url` flag is enough to run without a config file.
pub(crate) fn resolve_config(connection: &ConnectionArgs) -> Result<ClientConfig> {
    let home = home_dir()?;
    let mut config = match client_config::load_at(&home) {
        Ok(config) => config,
        Err(ConfigError::NotFound { path }) => match &connection.base_url {
            Some(base_url) => ClientConfig::new(base_url.clone())?,
            None => {
                return Err(ConfigError::NotFound { path }).context("failed to load client config")
            }
        },
        Err(err) => return Err(err).context("failed to load client config"),
    };
    if let Some(base_url) = &connection.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(cookie) = &connection.cookie {
        config.cookie = Some(cookie.clone());
    }
    config.validate().context("invalid connection settings")?;
    Ok(config)
}

/// Drive a future to completion on a fresh single-threaded runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}
