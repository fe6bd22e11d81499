use crate::prelude::*;
use ghrepos_core::config::{parse_config_file, resolve_layer, FileConfig};
use ghrepos_core::github::{DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an alternative config file
pub const CONFIG_PATH_ENV: &str = "GHREPOS_CONFIG";

/// Fallback token variable, read when neither `--api-key` nor `GITHUB_API_KEY` is set
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Connection settings for the GitHub REST API
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    pub url: String,
    pub key: String,
    pub version: String,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("url", &self.url)
            .field("key", &"***")
            .field("version", &self.version)
            .finish()
    }
}

/// Values coming from CLI flags or their `env` fallbacks
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub key: Option<String>,
    pub version: Option<String>,
}

impl GitHubConfig {
    pub fn new(
        url: impl Into<String>,
        key: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
            version: version.into(),
        }
    }

    /// Load configuration: defaults, then the config file, then the environment, then CLI flags
    pub fn load(overrides: ConfigOverrides) -> std::result::Result<Self, Error> {
        let file = match config_path() {
            Some(path) => read_file_config(&path)?,
            None => FileConfig::default(),
        };

        Self::resolve(file, std::env::var(GITHUB_TOKEN_ENV).ok(), overrides)
    }

    /// Merge the layers without touching the filesystem or environment
    pub fn resolve(
        file: FileConfig,
        github_token: Option<String>,
        overrides: ConfigOverrides,
    ) -> std::result::Result<Self, Error> {
        let FileConfig { github } = file;

        let url = resolve_layer([Some(DEFAULT_BASE_URL.to_string()), github.url, overrides.url])
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let version = resolve_layer([
            Some(DEFAULT_API_VERSION.to_string()),
            github.version,
            overrides.version,
        ])
        .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let key = resolve_layer([github.key, github_token, overrides.key])
            .ok_or(Error::MissingApiKey)?;

        Ok(Self::new(url, key, version))
    }
}

/// `$GHREPOS_CONFIG`, or `<config dir>/ghrepos/config.toml`
pub fn config_path() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs_next::config_dir().map(|dir| dir.join("ghrepos").join("config.toml")),
    }
}

/// Read and parse a config file. A missing file yields an empty config.
pub fn read_file_config(path: &Path) -> std::result::Result<FileConfig, Error> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No config file at {}", path.display());
            return Ok(FileConfig::default());
        }
        Err(source) => {
            return Err(Error::ConfigRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    log::debug!("Loaded config file {}", path.display());

    parse_config_file(&contents).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })
}
