//! Configuration management for vksync.
//!
//! All settings live in one [`Config`] value that `main` builds once and hands
//! to every component by reference. Values are resolved in this order:
//! 1. Command-line flags (highest priority)
//! 2. Environment variables (`VKSYNC_*`)
//! 3. A `.env` file in the working directory
//! 4. Built-in defaults

use std::{env, io::ErrorKind, num::NonZeroUsize, path::PathBuf};

pub const DEFAULT_APP_ID: &str = "3889070";
pub const DEFAULT_APP_SCOPE: &str = "audio,offline";
pub const DEFAULT_AUTH_URL: &str = "https://oauth.vk.com/authorize";
pub const DEFAULT_REDIRECT_URI: &str = "http://oauth.vk.com/blank.html";
pub const DEFAULT_API_URL: &str = "https://api.vkontakte.ru";
pub const DEFAULT_AUTH_FILE: &str = ".auth_data";
pub const DEFAULT_DESTINATION: &str = "vk_music";
pub const DEFAULT_ALBUM: &str = "vkMusic";

/// Runtime configuration shared by the authorizer, catalog client and
/// synchronizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Application identifier sent as `client_id` in the authorization URL.
    pub app_id: String,
    /// Comma separated permission scope requested during authorization.
    pub app_scope: String,
    /// Authorization dialog endpoint.
    pub auth_url: String,
    /// Redirect target of the implicit grant, the user copies it back.
    pub redirect_uri: String,
    /// Base URL of the method API, without trailing slash.
    pub api_url: String,
    /// Credential cache file.
    pub credentials_path: PathBuf,
    /// Directory holding the downloaded tracks.
    pub output_dir: PathBuf,
    /// Album tag written into every track.
    pub album: String,
    /// Size of the download and tagging worker pools.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            app_scope: DEFAULT_APP_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            credentials_path: PathBuf::from(DEFAULT_AUTH_FILE),
            output_dir: PathBuf::from(DEFAULT_DESTINATION),
            album: DEFAULT_ALBUM.to_string(),
            workers: default_workers(),
        }
    }
}

impl Config {
    /// Builds a configuration from the process environment, falling back to
    /// the built-in defaults for every unset variable.
    ///
    /// Call [`load_env`] first if values from a `.env` file should be visible.
    ///
    /// # Example
    ///
    /// ```
    /// let config = Config::from_env()
    ///     .with_output_dir("music")
    ///     .with_album("Mixtape");
    /// ```
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            app_id: env_or("VKSYNC_APP_ID", defaults.app_id),
            app_scope: env_or("VKSYNC_APP_SCOPE", defaults.app_scope),
            auth_url: env_or("VKSYNC_AUTH_URL", defaults.auth_url),
            redirect_uri: env_or("VKSYNC_REDIRECT_URI", defaults.redirect_uri),
            api_url: env_or("VKSYNC_API_URL", defaults.api_url)
                .trim_end_matches('/')
                .to_string(),
            credentials_path: env::var("VKSYNC_AUTH_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.credentials_path),
            output_dir: env::var("VKSYNC_DESTINATION")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            album: env_or("VKSYNC_ALBUM", defaults.album),
            workers: defaults.workers,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    /// Sets the worker pool size. Zero is bumped to one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

/// Loads environment variables from a `.env` file in the working directory.
///
/// A missing file is not an error, the defaults and the real environment
/// still apply. A file that exists but cannot be parsed is reported.
///
/// # Example
///
/// ```
/// use vksync::config;
///
/// if let Err(e) = config::load_env() {
///     eprintln!("Configuration error: {}", e);
/// }
/// ```
pub fn load_env() -> Result<(), String> {
    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Number of concurrent workers used when none is configured: the available
/// parallelism of the machine, or one if that cannot be determined.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn env_or(key: &str, default: String) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default,
    }
}
