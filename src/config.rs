//! Client configuration: backend base URL, where the session is persisted and
//! the request timeout. Defaults are overridden by environment variables and
//! then by command line flags. Configuration values are public; do not store
//! secrets here.

use crate::api::AppError;
use std::{env, path::PathBuf, time::Duration};
use url::Url;

pub const ENV_API_URL: &str = "AUTHSHELL_API_URL";
pub const ENV_SESSION_FILE: &str = "AUTHSHELL_SESSION_FILE";
pub const ENV_TIMEOUT_MS: &str = "AUTHSHELL_TIMEOUT_MS";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
/// Default request timeout (milliseconds) applied by the HTTP adapter.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: default_session_file(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl AppConfig {
    /// Loads the defaults and applies environment overrides.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();
        apply_overrides(&mut config, env_overrides());
        config
    }

    /// Applies explicit overrides, typically parsed from the command line.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        apply_overrides(&mut self, overrides);
        self
    }

    /// Checks that the API base URL is an absolute http(s) URL.
    ///
    /// # Errors
    /// Returns `AppError::Config` when the URL cannot be parsed or uses another scheme.
    pub fn validate(&self) -> Result<(), AppError> {
        let url = Url::parse(&self.api_base_url)
            .map_err(|err| AppError::Config(format!("Invalid API base URL: {err}")))?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::Config(format!(
                "Unsupported API URL scheme: {scheme}"
            ))),
        }
    }
}

/// Optional values layered on top of the defaults.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub session_file: Option<PathBuf>,
    pub request_timeout: Option<Duration>,
}

fn apply_overrides(config: &mut AppConfig, overrides: ConfigOverrides) {
    if let Some(value) = overrides.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = overrides.session_file {
        config.session_file = value;
    }
    if let Some(value) = overrides.request_timeout {
        config.request_timeout = value;
    }
}

fn env_overrides() -> ConfigOverrides {
    ConfigOverrides {
        api_base_url: read_env_value(ENV_API_URL),
        session_file: read_env_value(ENV_SESSION_FILE).map(PathBuf::from),
        request_timeout: read_env_value(ENV_TIMEOUT_MS)
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_millis),
    }
}

fn read_env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|value| normalize_value(&value))
}

pub(crate) fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `$XDG_DATA_HOME/authshell/session.json`, falling back to `~/.local/share`
/// and finally the working directory.
fn default_session_file() -> PathBuf {
    let base = env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    base.join("authshell").join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_value_trims_and_rejects_empty() {
        assert_eq!(normalize_value(""), None);
        assert_eq!(normalize_value("   "), None);
        assert_eq!(
            normalize_value("  https://api.authshell.dev "),
            Some("https://api.authshell.dev".to_string())
        );
    }

    #[test]
    fn load_uses_defaults_without_env() {
        temp_env::with_vars(
            [
                (ENV_API_URL, None::<&str>),
                (ENV_SESSION_FILE, None),
                (ENV_TIMEOUT_MS, None),
                ("XDG_DATA_HOME", Some("/tmp/data")),
            ],
            || {
                let config = AppConfig::load();
                assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
                assert_eq!(
                    config.session_file,
                    PathBuf::from("/tmp/data/authshell/session.json")
                );
                assert_eq!(config.request_timeout, Duration::from_millis(10_000));
            },
        );
    }

    #[test]
    fn load_applies_env_overrides_and_ignores_blank_values() {
        temp_env::with_vars(
            [
                (ENV_API_URL, Some("https://api.override")),
                (ENV_SESSION_FILE, Some("   ")),
                (ENV_TIMEOUT_MS, Some("2500")),
                ("XDG_DATA_HOME", Some("/tmp/data")),
            ],
            || {
                let config = AppConfig::load();
                assert_eq!(config.api_base_url, "https://api.override");
                assert_eq!(
                    config.session_file,
                    PathBuf::from("/tmp/data/authshell/session.json")
                );
                assert_eq!(config.request_timeout, Duration::from_millis(2500));
            },
        );
    }

    #[test]
    fn with_overrides_overwrites_only_present_values() {
        let config = AppConfig {
            api_base_url: "https://api.default".to_string(),
            session_file: PathBuf::from("/tmp/default.json"),
            request_timeout: Duration::from_secs(1),
        };

        let config = config.with_overrides(ConfigOverrides {
            api_base_url: Some("https://api.flag".to_string()),
            session_file: None,
            request_timeout: None,
        });

        assert_eq!(config.api_base_url, "https://api.flag");
        assert_eq!(config.session_file, PathBuf::from("/tmp/default.json"));
        assert_eq!(config.request_timeout, Duration::from_secs(1));
    }

    #[test]
    fn validate_rejects_bad_urls() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.api_base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        config.api_base_url = "ftp://files.tld".to_string();
        assert_eq!(
            config.validate(),
            Err(AppError::Config("Unsupported API URL scheme: ftp".to_string()))
        );
    }
}
