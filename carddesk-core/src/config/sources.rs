use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
///
/// ```toml
/// [backend]
/// url = "http://dispatch.local:8001"
/// request_timeout = "15s"
///
/// [scanner]
/// audible_confirmation = false
/// camera_feed = "/run/carddesk/codes.fifo"
/// ```
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub backend: FileBackendConfig,
    #[serde(default)]
    pub scanner: FileScannerConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileBackendConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Human readable duration, e.g. `"30s"` or `"1m 30s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileScannerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audible_confirmation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_feed: Option<PathBuf>,
}

pub const ENV_CONFIG_PATH: &str = "CARDDESK_CONFIG";
pub const ENV_BACKEND_URL: &str = "CARDDESK_BACKEND_URL";
pub const ENV_TIMEOUT_SECS: &str = "CARDDESK_TIMEOUT_SECS";
pub const ENV_AUDIBLE_CONFIRM: &str = "CARDDESK_AUDIBLE_CONFIRM";
pub const ENV_CAMERA_FEED: &str = "CARDDESK_CAMERA_FEED";

/// Configuration overrides read from the process environment.
///
/// Values are kept raw where they need validation so that a malformed
/// variable is reported instead of silently ignored.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub backend_url: Option<String>,
    pub timeout_secs: Option<String>,
    pub audible_confirmation: Option<String>,
    pub camera_feed: Option<PathBuf>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        Self {
            config_path: non_empty(ENV_CONFIG_PATH).map(PathBuf::from),
            backend_url: non_empty(ENV_BACKEND_URL),
            timeout_secs: non_empty(ENV_TIMEOUT_SECS),
            audible_confirmation: non_empty(ENV_AUDIBLE_CONFIRM),
            camera_feed: non_empty(ENV_CAMERA_FEED).map(PathBuf::from),
        }
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
