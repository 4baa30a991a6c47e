//! Background jobs that run on a fixed interval for the life of the server

mod prune_cache;

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::SharedState;

pub use prune_cache::PruneCalendarCache;

#[async_trait]
pub trait PeriodicJob: Debug + Send + Sync {
    fn interval(&self) -> Duration;

    async fn run_job(&self, state: &SharedState);
}

/// Run `job` every `job.interval()` on its own tokio task. The first
/// run happens one interval after spawning.
pub fn spawn_periodic_job<J>(state: SharedState, job: J)
where
    J: PeriodicJob + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(job.interval());
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            tracing::debug!("Running job {:?}", job);
            job.run_job(&state).await;
        }
    });
}
