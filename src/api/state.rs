use std::sync::{Arc, RwLock};

use crate::core::AppConfig;
use crate::github::{CalendarCache, GitHubClient};

pub type SharedState = Arc<RwLock<AppState>>;

pub struct AppState {
    pub config: AppConfig,
    pub github: GitHubClient,
    // Recently fetched calendars keyed by login and date range
    pub cache: CalendarCache,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let github = GitHubClient::new(&config.github_api_url, &config.github_token);
        let cache = CalendarCache::new(config.cache_ttl);
        Self {
            config,
            github,
            cache,
        }
    }
}
