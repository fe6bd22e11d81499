use crate::config::GitHubConfig;
use crate::github::GitHubApi;
use crate::prelude::{println, *};

pub mod list;

#[derive(Debug, clap::Parser)]
#[command(name = "repos")]
#[command(about = "GitHub repository listing")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List a user's repositories
    #[clap(name = "list")]
    List(list::ListOptions),
}

/// Module entry point
pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = GitHubConfig::load(global.config_overrides())?;
    let api = GitHubApi::new(config).map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

    if global.verbose {
        println!("GitHub API Base: {}", api.config().url);
        println!("GitHub API Version: {}", api.config().version);
        println!();
    }

    match app.command {
        Commands::List(options) => list::run(options, &api).await,
    }
}
