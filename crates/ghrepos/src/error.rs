use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(
        "GitHub API key not configured. Set GITHUB_API_KEY or GITHUB_TOKEN, pass --api-key, or add `key` under [github] in the config file"
    )]
    MissingApiKey,

    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: ghrepos_core::config::ConfigError,
    },
}
