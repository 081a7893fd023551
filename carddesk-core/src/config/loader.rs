use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tracing::{debug, info};

use super::DeskConfig;
use super::sources::{
    ENV_AUDIBLE_CONFIRM, ENV_TIMEOUT_SECS, EnvConfig, FileConfig, parse_bool,
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("carddesk.toml"),
        PathBuf::from("config/carddesk.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

/// Resolves [`DeskConfig`] from `.env`, an optional TOML file and the
/// environment, in increasing order of precedence.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        self.load_with_env(EnvConfig::gather(), env_file_loaded)
    }

    /// Same as [`ConfigLoader::load`] but with an already gathered
    /// environment and without touching `.env`.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let config = compose(file_config, &env)?;

        match &config_path {
            Some(path) => info!(path = %path.display(), "configuration loaded"),
            None => debug!("no configuration file, using defaults and environment"),
        }

        Ok(ConfigLoad {
            config,
            config_path,
            env_file_loaded,
        })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        // Explicit and environment paths must exist; defaults are optional.
        let (path, required) = if let Some(explicit) = &self.options.config_path
        {
            (explicit.clone(), true)
        } else if let Some(from_env) = &env.config_path {
            (from_env.clone(), true)
        } else if let Some(found) = DEFAULT_CONFIG_LOCATIONS
            .iter()
            .find(|candidate| candidate.exists())
        {
            (found.clone(), false)
        } else {
            return Ok((None, None));
        };

        if !path.exists() {
            if required {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

pub fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge file values and environment overrides over the defaults.
pub fn compose(
    file: Option<FileConfig>,
    env: &EnvConfig,
) -> Result<DeskConfig, ConfigLoadError> {
    let defaults = DeskConfig::default();
    let FileConfig {
        backend: file_backend,
        scanner: file_scanner,
    } = file.unwrap_or_default();

    let backend_url = env
        .backend_url
        .clone()
        .or(file_backend.url)
        .map(|url| url.trim().to_string())
        .unwrap_or(defaults.backend_url);
    if backend_url.is_empty() {
        return Err(ConfigLoadError::InvalidValue {
            key: "backend.url",
            value: backend_url,
            reason: "must not be empty".into(),
        });
    }

    let request_timeout = match (&env.timeout_secs, &file_backend.request_timeout)
    {
        (Some(raw), _) => parse_timeout_secs(raw)?,
        (None, Some(raw)) => parse_timeout_human(raw)?,
        (None, None) => defaults.request_timeout,
    };

    let audible_confirmation = match &env.audible_confirmation {
        Some(raw) => {
            parse_bool(raw).ok_or_else(|| ConfigLoadError::InvalidValue {
                key: ENV_AUDIBLE_CONFIRM,
                value: raw.clone(),
                reason: "expected true/false".into(),
            })?
        }
        None => file_scanner
            .audible_confirmation
            .unwrap_or(defaults.audible_confirmation),
    };

    let camera_feed = env.camera_feed.clone().or(file_scanner.camera_feed);

    Ok(DeskConfig {
        backend_url,
        request_timeout,
        audible_confirmation,
        camera_feed,
    })
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigLoadError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigLoadError::InvalidValue {
            key: ENV_TIMEOUT_SECS,
            value: raw.to_string(),
            reason: "expected a positive number of seconds".into(),
        }),
    }
}

fn parse_timeout_human(raw: &str) -> Result<Duration, ConfigLoadError> {
    match humantime::parse_duration(raw) {
        Ok(timeout) if !timeout.is_zero() => Ok(timeout),
        Ok(_) => Err(ConfigLoadError::InvalidValue {
            key: "backend.request_timeout",
            value: raw.to_string(),
            reason: "must be greater than zero".into(),
        }),
        Err(err) => Err(ConfigLoadError::InvalidValue {
            key: "backend.request_timeout",
            value: raw.to_string(),
            reason: err.to_string(),
        }),
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: DeskConfig,
    /// File the configuration was read from, if any.
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
