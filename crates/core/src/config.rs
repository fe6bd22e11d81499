//! Config file parsing
//!
//! The shell reads the file; this module only turns its contents into
//! [`FileConfig`] and layers optional values on top of each other.

use serde::Deserialize;

/// Error type for config file parsing
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level layout of `config.toml`
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub github: GitHubSection,
}

/// `[github]` table. Every key is optional.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GitHubSection {
    pub url: Option<String>,
    pub key: Option<String>,
    pub version: Option<String>,
}

/// Parse the contents of a config file
pub fn parse_config_file(contents: &str) -> Result<FileConfig, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Pick the highest-precedence non-blank value
///
/// Layers are given lowest precedence first.
pub fn resolve_layer<I>(layers: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    layers
        .into_iter()
        .flatten()
        .filter(|v| !v.trim().is_empty())
        .last()
}
