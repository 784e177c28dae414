//! Settings storage for the campus portal client
//!
//! Portal settings live under ~/.config/campus-portal/ unless
//! `CAMPUS_PORTAL_CONFIG_DIR` points somewhere else. The settings file can
//! carry a session cookie, so writes go through a temporary file and end up
//! readable by the owner only.
//!
//! Call [`init`] at startup so the directory exists before anything is saved.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Name of the directory under the platform config dir
pub const APP_DIR: &str = "campus-portal";

/// Environment variable overriding the settings directory
pub const DIR_ENV: &str = "CAMPUS_PORTAL_CONFIG_DIR";

/// Create the settings directory if needed and return its path.
pub fn init() -> Result<PathBuf> {
    let dir = ensure_config_dir()?;
    log::debug!("Portal settings directory: {}", dir.display());
    Ok(dir)
}

/// Get the portal settings directory
pub fn config_dir() -> Option<PathBuf> {
    config_dir_with(|name| std::env::var_os(name))
}

/// Resolve the settings directory with a custom environment lookup
///
/// A non-empty `CAMPUS_PORTAL_CONFIG_DIR` wins over the platform default.
pub fn config_dir_with(
    lookup: impl Fn(&str) -> Option<std::ffi::OsString>,
) -> Option<PathBuf> {
    match lookup(DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|p| p.join(APP_DIR)),
    }
}

/// Get the path to a file inside the settings directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|p| p.join(filename))
}

/// Load and parse a JSON file from the settings directory
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    let path = config_path(filename).with_context(|| {
        format!("Could not locate portal settings directory for {}", filename)
    })?;
    load_json_file(&path)
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read portal settings: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse portal settings: {}", path.display()))
}

/// Check if a file exists in the settings directory
pub fn config_exists(filename: &str) -> bool {
    config_path(filename).is_some_and(|p| p.is_file())
}

/// Ensure the settings directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir().with_context(|| {
        format!("Could not locate portal settings directory; set {}", DIR_ENV)
    })?;
    std::fs::create_dir_all(&dir).with_context(|| {
        format!("Failed to create portal settings directory: {}", dir.display())
    })?;
    Ok(dir)
}

/// Save a value as pretty JSON into the settings directory
pub fn save_json<T: Serialize>(filename: &str, value: &T) -> Result<()> {
    let dir = ensure_config_dir()?;
    save_json_file(&dir.join(filename), value)
}

/// Save a value as pretty JSON to an arbitrary path
///
/// The file is replaced in one rename, so a crash mid-write leaves the old
/// settings in place.
pub fn save_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize portal settings for {}", path.display()))?;

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    std::fs::write(&staging, content)
        .with_context(|| format!("Failed to write portal settings: {}", staging.display()))?;
    restrict_permissions(&staging)?;
    std::fs::rename(&staging, path)
        .with_context(|| format!("Failed to replace portal settings: {}", path.display()))?;
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to restrict permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
