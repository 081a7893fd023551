//! Desk configuration.

pub mod loader;
pub mod sources;

use std::path::PathBuf;
use std::time::Duration;

pub use loader::{
    ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions, compose,
};
pub use sources::{
    EnvConfig, FileBackendConfig, FileConfig, FileScannerConfig,
};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Effective configuration of one desk session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    /// Backend root; a trailing `/api` is tolerated.
    pub backend_url: String,
    pub request_timeout: Duration,
    /// Play a cue for every accepted card.
    pub audible_confirmation: bool,
    /// Line feed written by an external barcode recognizer.
    pub camera_feed: Option<PathBuf>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            audible_confirmation: true,
            camera_feed: None,
        }
    }
}

impl DeskConfig {
    /// File form of this configuration, e.g. for `config show`.
    pub fn to_file_config(&self) -> FileConfig {
        FileConfig {
            backend: FileBackendConfig {
                url: Some(self.backend_url.clone()),
                request_timeout: Some(
                    humantime::format_duration(self.request_timeout).to_string(),
                ),
            },
            scanner: FileScannerConfig {
                audible_confirmation: Some(self.audible_confirmation),
                camera_feed: self.camera_feed.clone(),
            },
        }
    }
}
