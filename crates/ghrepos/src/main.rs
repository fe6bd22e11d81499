use crate::prelude::*;
use clap::Parser;

mod config;
mod error;
mod github;
mod prelude;
mod repos;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "List a GitHub user's repositories, one page at a time"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// GitHub REST API base URL
    #[clap(long, env = "GITHUB_API_URL", global = true)]
    base_url: Option<String>,

    /// GitHub API key (falls back to GITHUB_TOKEN)
    #[clap(long, env = "GITHUB_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// GitHub REST API version sent as X-GitHub-Api-Version
    #[clap(long, env = "GITHUB_API_VERSION", global = true)]
    api_version: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "GHREPOS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    pub fn config_overrides(&self) -> crate::config::ConfigOverrides {
        crate::config::ConfigOverrides {
            url: self.base_url.clone(),
            key: self.api_key.clone(),
            version: self.api_version.clone(),
        }
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Repository listing operations
    Repos(crate::repos::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Repos(sub_app) => crate::repos::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
