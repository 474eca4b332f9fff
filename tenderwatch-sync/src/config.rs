//! Client configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.tenderwatch/
//!   config.yaml   (mode 0600 — holds the session cookie)
//! ```
//!
//! # API pattern
//!
//! As with every file-backed loader in this workspace, each function has an
//! explicit-home form (`fn_at(home: &Path, …)`) used by tests, and a
//! convenience form that derives home from `dirs::home_dir()`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tenderwatch_core::{TenderId, UserId};

use crate::error::{io_err, ConfigError};

pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// Server endpoint reached by a tender action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Followers,
    Favourite,
    Seen,
    Delete,
    Tag,
}

/// Path templates for each endpoint; `{id}` is replaced by the tender id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub followers: String,
    pub favourite: String,
    pub seen: String,
    pub delete: String,
    pub tag: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            followers: "/tenders/{id}/followers/".to_string(),
            favourite: "/tenders/favourite/{id}".to_string(),
            seen: "/tenders/seen/{id}".to_string(),
            delete: "/tenders/delete/{id}".to_string(),
            tag: "/tenders/tag/{id}".to_string(),
        }
    }
}

impl Endpoints {
    pub fn template(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Followers => &self.followers,
            Endpoint::Favourite => &self.favourite,
            Endpoint::Seen => &self.seen,
            Endpoint::Delete => &self.delete,
            Endpoint::Tag => &self.tag,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let templates = [
            &self.followers,
            &self.favourite,
            &self.seen,
            &self.delete,
            &self.tag,
        ];
        for template in templates {
            if !template.contains("{id}") {
                return Err(ConfigError::InvalidEndpoint {
                    template: template.clone(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Connection settings for the tender server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme and host, e.g. `https://tenders.example.org`.
    pub base_url: String,
    /// Raw `Cookie` header value (session + CSRF cookies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
    /// Name of the cookie carrying the CSRF token.
    #[serde(default = "default_csrf_cookie")]
    pub csrf_cookie: String,
    /// The acting user, for the "followed by me" indicator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub endpoints: Endpoints,
}

fn default_csrf_cookie() -> String {
    DEFAULT_CSRF_COOKIE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    /// Config with default endpoints for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            base_url: base_url.into(),
            cookie: None,
            csrf_cookie: default_csrf_cookie(),
            user_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            endpoints: Endpoints::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                value: self.timeout_secs,
            });
        }
        self.endpoints.validate()
    }

    /// Absolute URL of `endpoint` for `tender`.
    pub fn url_for(&self, endpoint: Endpoint, tender: TenderId) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let path = self
            .endpoints
            .template(endpoint)
            .replace("{id}", &tender.to_string());
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// `<home>/.tenderwatch/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".tenderwatch").join("config.yaml")
}

/// Load and validate the config under `home`.
///
/// Returns `ConfigError::NotFound` if absent, `ConfigError::Parse` (with
/// path) if malformed.
pub fn load_at(home: &Path) -> Result<ClientConfig, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Err(ConfigError::NotFound { path });
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let config: ClientConfig =
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })?;
    config.validate()?;
    Ok(config)
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<ClientConfig, ConfigError> {
    load_at(&home()?)
}

/// Atomically save `config` under `home`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, config: &ClientConfig) -> Result<PathBuf, ConfigError> {
    config.validate()?;
    let path = config_path_at(home);
    let Some(dir) = path.parent() else {
        return Err(io_err(
            path,
            std::io::Error::other("invalid config path"),
        ));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let yaml = serde_yaml::to_string(config)?;
    let tmp = path.with_extension("yaml.tmp");
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(path)
}

/// `save_at` convenience wrapper.
pub fn save(config: &ClientConfig) -> Result<PathBuf, ConfigError> {
    save_at(&home()?, config)
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
