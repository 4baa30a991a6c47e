use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::github::DEFAULT_API_URL;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub github_token: String,
    pub github_api_url: String,
    pub cache_ttl: Duration,
    pub static_dir: String,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let github_token = env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .context("Missing env var GITHUB_TOKEN")?;
        let github_api_url = env::var("CONTRIBGRID_GITHUB_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let cache_ttl_secs = match env::var("CONTRIBGRID_CACHE_TTL_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid CONTRIBGRID_CACHE_TTL_SECS: {:?}", raw))?,
            Err(_) => DEFAULT_CACHE_TTL_SECS,
        };
        let static_dir =
            env::var("CONTRIBGRID_STATIC_DIR").unwrap_or_else(|_| "./public".to_string());
        let allowed_origins = env::var("CONTRIBGRID_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        Ok(Self {
            github_token,
            github_api_url,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            static_dir,
            allowed_origins,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
