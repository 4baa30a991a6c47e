use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::PeriodicJob;
use crate::api::SharedState;

/// Never prune more often than this
const MIN_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub struct PruneCalendarCache {
    every: Duration,
}

impl PruneCalendarCache {
    pub fn for_ttl(ttl: Duration) -> Self {
        Self {
            every: ttl.max(MIN_INTERVAL),
        }
    }
}

#[async_trait]
impl PeriodicJob for PruneCalendarCache {
    fn interval(&self) -> Duration {
        self.every
    }

    async fn run_job(&self, state: &SharedState) {
        let dropped = match state.write() {
            Ok(mut state) => state.cache.prune_expired(Instant::now()),
            Err(e) => {
                tracing::error!("Unable to prune calendar cache: {}", e);
                return;
            }
        };

        if dropped > 0 {
            tracing::debug!("Pruned {} expired calendars", dropped);
        }
    }
}
