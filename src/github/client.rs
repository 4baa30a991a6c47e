//! GitHub GraphQL client for a user's contribution calendar

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use reqwest::{Client, header};
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use super::range::DateRange;
use crate::grid::{ContributionCalendar, ContributionDay, GridError, reshape};

pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";

const CONTRIBUTIONS_QUERY: &str = r#"
query($username: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $username) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            contributionCount
            date
          }
        }
      }
    }
  }
}
"#;

/// GraphQL answered but there is no such login
#[derive(Error, Debug)]
#[error("GitHub user not found: {0}")]
pub struct UserNotFound(pub String);

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    user: Option<User>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct User {
    contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: ProviderCalendar,
}

/// Calendar exactly as the GraphQL API shapes it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCalendar {
    pub total_contributions: u64,
    pub weeks: Vec<ProviderWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderWeek {
    #[serde(default)]
    pub contribution_days: Vec<ProviderDay>,
}

/// Loosely typed so that one bad day doesn't fail the whole response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDay {
    pub contribution_count: Option<Value>,
    pub date: Option<String>,
}

impl ProviderDay {
    fn read(&self, position: usize) -> Result<ContributionDay, GridError> {
        let malformed = |reason: String| GridError::MalformedDay { position, reason };

        let count = self
            .contribution_count
            .as_ref()
            .ok_or_else(|| malformed("missing contributionCount".to_string()))?;
        let count = count
            .as_u64()
            .ok_or_else(|| malformed(format!("contributionCount is not a count: {}", count)))?;

        let date = self
            .date
            .as_deref()
            .ok_or_else(|| malformed("missing date".to_string()))?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| malformed(format!("bad date {:?}: {}", date, e)))?;

        Ok(ContributionDay::new(date, count))
    }
}

impl ProviderCalendar {
    /// Flatten the provider's weeks and regroup them into full weeks.
    ///
    /// Days that can't be read are logged and left as empty cells. The
    /// provider's total is kept since it may cover a wider window than
    /// the days returned.
    pub fn into_calendar(self) -> Result<ContributionCalendar, GridError> {
        let days = self
            .weeks
            .iter()
            .flat_map(|week| week.contribution_days.iter())
            .enumerate()
            .map(|(position, day)| match day.read(position) {
                Ok(day) => Some(day),
                Err(e) => {
                    tracing::warn!("Skipping day: {}", e);
                    None
                }
            });

        Ok(reshape(days)?.with_total_count(self.total_contributions))
    }
}

#[derive(Clone, Debug)]
pub struct GitHubClient {
    api_url: String,
    token: String,
    http: Client,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            token: token.to_string(),
            http: Client::new(),
        }
    }

    /// Fetch and reshape the contribution calendar for `username`
    pub async fn fetch_calendar(
        &self,
        username: &str,
        range: &DateRange,
    ) -> Result<ContributionCalendar> {
        tracing::debug!(
            "Fetching contributions for {} from {} to {}",
            username,
            range.from_iso(),
            range.to_iso()
        );

        let body = json!({
            "query": CONTRIBUTIONS_QUERY,
            "variables": {
                "username": username,
                "from": range.from_iso(),
                "to": range.to_iso(),
            }
        });

        let res = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .header(header::USER_AGENT, concat!("contribgrid/", env!("CARGO_PKG_VERSION")))
            .json(&body)
            .send()
            .await
            .context("GitHub GraphQL request failed")?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("GitHub GraphQL request failed: {} ({})", status, text);
        }

        let resp: GraphQlResponse =
            serde_json::from_str(&text).context("Unexpected GitHub GraphQL response")?;

        if let Some(errors) = resp.errors
            && !errors.is_empty()
        {
            // A missing login comes back as an error next to `user: null`
            if resp.data.as_ref().is_some_and(|d| d.user.is_none()) {
                return Err(UserNotFound(username.to_string()).into());
            }
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            anyhow::bail!("GitHub GraphQL errors: {}", messages.join("; "));
        }

        let user = resp
            .data
            .and_then(|d| d.user)
            .ok_or_else(|| UserNotFound(username.to_string()))?;

        // Reported as an upstream failure, never as the caller's invalid input
        let calendar = user
            .contributions_collection
            .contribution_calendar
            .into_calendar()
            .map_err(|e| anyhow!("GitHub returned an unusable calendar: {}", e))?;

        tracing::debug!(
            "Fetched {} weeks ({} contributions) for {}",
            calendar.weeks().len(),
            calendar.total_count(),
            username
        );

        Ok(calendar)
    }
}
