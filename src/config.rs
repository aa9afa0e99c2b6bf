//! Client configuration.
//!
//! Resolution order: explicit construction, then environment variables
//! (with `.env` support), then compiled defaults. The only state this
//! crate keeps on disk is the remembered-login marker, stored under
//! `state_dir`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

/// Application name used for the state directory path
const APP_NAME: &str = "hourbook-client";

/// Default API base used when `HOURBOOK_API_URL` is not set.
/// localhost rather than 127.0.0.1: the backend scopes its cookies to the
/// hostname, and mixing the two spellings breaks cookie round-trips.
const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// HTTP request timeout in seconds.
/// 30s allows for slow report exports while failing fast enough for good UX.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL every API path is appended to, e.g. `http://localhost:8000/api`.
    pub base_url: Url,
    /// Transport-level timeout applied to every request.
    pub request_timeout: Duration,
    /// Directory for client-local state (the remembered-login marker).
    pub state_dir: PathBuf,
}

impl Config {
    pub fn new(base_url: &str, request_timeout: Duration, state_dir: PathBuf) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        Ok(Self {
            base_url,
            request_timeout,
            state_dir,
        })
    }

    /// Load configuration from the environment, reading a `.env` file first
    /// if one is present.
    ///
    /// Recognized variables: `HOURBOOK_API_URL`, `HOURBOOK_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let base_url =
            std::env::var("HOURBOOK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = std::env::var("HOURBOOK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(
            &base_url,
            Duration::from_secs(timeout_secs),
            Self::default_state_dir()?,
        )
    }

    /// Absolute URL for an API path (`/employees/` and friends).
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Root of the backend origin: the base URL with its API path stripped.
    /// This is the fallback cookie-issuing endpoint.
    pub fn origin_url(&self) -> Url {
        let mut origin = self.base_url.clone();
        origin.set_path("/");
        origin
    }

    fn default_state_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }
}
