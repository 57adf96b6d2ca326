//! Runtime configuration for an export run

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default Reader API base URL
pub const DEFAULT_API_BASE: &str = "https://readwise.io/api/v3/";

/// Environment variable holding the access token
pub const TOKEN_ENV_VAR: &str = "READWISE_TOKEN";

/// Configuration for one export run
///
/// Constructed once per run and passed explicitly to the client and exporter;
/// there is no process-wide state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Reader API (default: the hosted service)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Access token, sent as `Authorization: Token <token>` on every request.
    /// Never serialized.
    #[serde(skip)]
    pub token: String,

    /// Directory the markdown files and JSON backup are written to
    /// (default: "./output")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Fetch highlights for every document. One extra request per document,
    /// so noticeably slower on large libraries.
    #[serde(default)]
    pub with_highlights: bool,

    /// Category names to include; empty means all categories
    #[serde(default)]
    pub categories: Vec<String>,

    /// Per-request timeout (default: 30s). Expiry is fatal during pagination
    /// and degrades gracefully during highlight enrichment.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,

    /// Safety cap on pages fetched per location, guarding against a server
    /// that never returns a terminal cursor (default: 1000)
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: String::new(),
            output_dir: default_output_dir(),
            with_highlights: false,
            categories: Vec::new(),
            request_timeout: default_request_timeout(),
            max_pages: default_max_pages(),
        }
    }
}

impl Config {
    /// Build a default config with the token taken from `READWISE_TOKEN`
    ///
    /// # Errors
    /// Returns [`Error::Auth`] if the variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV_VAR).unwrap_or_default();
        if token.is_empty() {
            return Err(Error::Auth(format!(
                "{TOKEN_ENV_VAR} environment variable not set; get your token at https://readwise.io/access_token"
            )));
        }
        Ok(Self {
            token,
            ..Self::default()
        })
    }

    /// Validate the configuration before any network traffic
    ///
    /// # Errors
    /// Returns [`Error::Auth`] for a missing token and [`Error::Config`] for
    /// invalid settings.
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(Error::Auth("access token is empty".into()));
        }
        if self.max_pages == 0 {
            return Err(Error::Config {
                message: "max_pages must be at least 1".into(),
                key: Some("max_pages".into()),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(Error::Config {
                message: "request_timeout must be non-zero".into(),
                key: Some("request_timeout".into()),
            });
        }
        Ok(())
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_pages() -> usize {
    1000
}
