//! Connection settings for the portal backend
//!
//! Settings are loaded from (in order of priority):
//! 1. An explicit JSON file
//! 2. `portal.json` in the campus-portal config directory
//! 3. Environment variables (fallback, applied over defaults)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings filename in the config directory
const SETTINGS_FILE: &str = "portal.json";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SUPPORT_EMAIL_PATH: &str = "/send_support_email";

/// How to reach and authenticate against the portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSettings {
    /// Root URL of the portal (scheme, host, port)
    pub base_url: String,
    /// CSRF token; fetched from a page's meta tag when absent
    #[serde(default)]
    pub csrf_token: Option<String>,
    /// Raw `Cookie` header value carrying the login session
    #[serde(default)]
    pub session_cookie: Option<String>,
    /// Upper bound for any single request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Where the live-support form posts (injected by the page)
    #[serde(default = "default_support_email_url")]
    pub support_email_url: String,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_support_email_url() -> String {
    DEFAULT_SUPPORT_EMAIL_PATH.to_string()
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            csrf_token: None,
            session_cookie: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            support_email_url: default_support_email_url(),
        }
    }
}

impl PortalSettings {
    /// Load settings using the following priority:
    /// 1. `~/.config/campus-portal/portal.json`
    /// 2. Environment variables over defaults
    pub fn load() -> Result<Self> {
        if config::config_exists(SETTINGS_FILE) {
            return config::load_json(SETTINGS_FILE);
        }
        Ok(Self::from_env())
    }

    /// Load settings from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse portal settings JSON")
    }

    /// Defaults overridden by `PORTAL_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `PORTAL_*` key
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(url) = lookup("PORTAL_BASE_URL") {
            settings.base_url = url;
        }
        if let Some(token) = lookup("PORTAL_CSRF_TOKEN") {
            settings.csrf_token = Some(token);
        }
        if let Some(cookie) = lookup("PORTAL_SESSION_COOKIE") {
            settings.session_cookie = Some(cookie);
        }
        if let Some(secs) = lookup("PORTAL_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            settings.timeout_secs = secs;
        }
        if let Some(url) = lookup("PORTAL_SUPPORT_EMAIL_URL") {
            settings.support_email_url = url;
        }
        settings
    }

    /// Persist to the config directory
    pub fn save(&self) -> Result<()> {
        config::save_json(SETTINGS_FILE, self)
    }

    /// Get the default settings file path (~/.config/campus-portal/portal.json)
    pub fn default_settings_path() -> Option<PathBuf> {
        config::config_path(SETTINGS_FILE)
    }

    /// Request timeout; zero is treated as one second
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Builder method to override the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builder method to set the CSRF token
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }
}
