use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::core::AppConfig;
use crate::github::{DateRange, GitHubClient, RangeQuery};
use crate::grid::ContributionCalendar;

/// Fetch a calendar from GitHub
pub async fn fetch_calendar(
    config: &AppConfig,
    username: &str,
    range: &RangeQuery,
) -> Result<ContributionCalendar> {
    let range = DateRange::resolve(range, Utc::now())?;
    let client = GitHubClient::new(&config.github_api_url, &config.github_token);
    client.fetch_calendar(username, &range).await
}

/// Fetch a calendar and write it as a JSON snapshot to `out` or stdout
pub async fn run(
    config: &AppConfig,
    username: &str,
    range: &RangeQuery,
    out: Option<&Path>,
) -> Result<()> {
    let calendar = fetch_calendar(config, username, range).await?;
    let json = serde_json::to_string_pretty(&calendar)?;

    match out {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
            tracing::info!(
                "Saved {} weeks for {} to {}",
                calendar.weeks().len(),
                username,
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
