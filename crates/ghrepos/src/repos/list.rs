use crate::github::{GitHubApi, ListError, RepositoryPage};
use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use ghrepos_core::github::merge_pages;
use indicatif::{ProgressBar, ProgressStyle};

/// Options for listing a user's repositories
#[derive(Debug, clap::Args, Clone)]
pub struct ListOptions {
    /// GitHub username whose repositories are listed
    #[arg(value_name = "USERNAME")]
    pub username: String,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Number of repositories per page
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u32).range(1..))]
    pub per_page: u32,

    /// Keep following pages while GitHub advertises a next one
    #[arg(long)]
    pub all: bool,

    /// Upper bound on requests made by --all
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of one or more page requests
#[derive(Debug, Clone, PartialEq)]
pub struct ListOutcome {
    /// `None` when the user does not exist
    pub result: Option<RepositoryPage>,
    /// Last page number that was requested successfully
    pub last_page: u32,
}

/// Helper to set spinner message if spinner is present
fn set_spinner_msg(spinner: Option<&ProgressBar>, msg: impl Into<String>) {
    if let Some(s) = spinner {
        s.set_message(msg.into());
    }
}

/// Fetch up to `max_pages` pages, starting at `page`
///
/// Requests are sequential and stop as soon as a page comes back without a
/// `rel="next"` link. A 404 on the first page yields `result: None`; a 404 on
/// a later page ends the walk with `has_more_items = false`.
pub async fn collect_pages(
    api: &GitHubApi,
    username: &str,
    page: u32,
    per_page: u32,
    max_pages: u32,
    spinner: Option<&ProgressBar>,
) -> std::result::Result<ListOutcome, ListError> {
    set_spinner_msg(
        spinner,
        format!("Fetching repositories for {} (page {})...", username, page),
    );

    let Some(mut acc) = api
        .list_repositories_by_username(username, page, per_page)
        .await?
    else {
        return Ok(ListOutcome {
            result: None,
            last_page: page,
        });
    };

    let mut last_page = page;

    while acc.has_more_items && last_page - page + 1 < max_pages {
        let Some(next) = last_page.checked_add(1) else {
            log::debug!("Page {} is the last addressable page", last_page);
            break;
        };
        set_spinner_msg(
            spinner,
            format!("Fetching repositories for {} (page {})...", username, next),
        );

        match api
            .list_repositories_by_username(username, next, per_page)
            .await?
        {
            Some(next_page) => acc = merge_pages(acc, next_page),
            None => {
                log::debug!("Page {} vanished while paginating", next);
                acc.has_more_items = false;
                break;
            }
        }

        last_page = next;
    }

    Ok(ListOutcome {
        result: Some(acc),
        last_page,
    })
}

pub async fn run(options: ListOptions, api: &GitHubApi) -> Result<()> {
    let max_pages = if options.all { options.max_pages } else { 1 };

    let spinner = (!options.json).then(new_spinner);
    let outcome = collect_pages(
        api,
        &options.username,
        options.page,
        options.per_page,
        max_pages,
        spinner.as_ref(),
    )
    .await;

    // Clear the spinner before printing output
    if let Some(s) = &spinner {
        s.finish_and_clear();
    }

    let outcome = outcome?;

    if options.json {
        println!("{}", format_outcome_json(&outcome)?);
        return Ok(());
    }

    let Some(page) = &outcome.result else {
        eprintln!(
            "{}",
            format!("User '{}' not found.", options.username).yellow()
        );
        return Ok(());
    };

    println!(
        "\nFound {} repository(ies) for {}:\n",
        page.items.len().to_string().bold(),
        options.username.bright_white()
    );

    if page.items.is_empty() {
        println!("No repositories on this page.");
    } else {
        build_table(page).printstd();
    }

    if let Some(command) = next_page_command(&options, &outcome) {
        eprintln!();
        eprintln!(
            "{}",
            "More repositories available. To fetch the next page, run:".cyan()
        );
        eprintln!("  {}", command);
    }

    Ok(())
}

fn new_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Convert the outcome to JSON. A missing user serializes as `null`.
fn format_outcome_json(outcome: &ListOutcome) -> Result<String> {
    serde_json::to_string_pretty(&outcome.result)
        .map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn build_table(page: &RepositoryPage) -> prettytable::Table {
    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row![
        "Name".bold().cyan(),
        "Owner".bold().cyan(),
        "Fork".bold().cyan()
    ]);

    for repo in &page.items {
        let fork = if repo.fork {
            "yes".bright_yellow()
        } else {
            "no".normal()
        };

        table.add_row(prettytable::row![
            repo.name.bright_white(),
            repo.owner.login.bright_magenta(),
            fork
        ]);
    }

    table
}

/// Command that fetches the page after the last one shown
fn next_page_command(options: &ListOptions, outcome: &ListOutcome) -> Option<String> {
    let page = outcome.result.as_ref()?;
    if !page.has_more_items {
        return None;
    }

    let next = outcome.last_page.checked_add(1)?;

    Some(format!(
        "ghrepos repos list {} --page {} --per-page {}",
        options.username, next, options.per_page
    ))
}
