//! Keyed, expiring store of fetched contribution calendars

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use super::range::DateRange;
use crate::grid::ContributionCalendar;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub username: String,
    pub range: DateRange,
}

impl CacheKey {
    /// Logins are case-insensitive on GitHub
    pub fn new(username: &str, range: DateRange) -> Self {
        Self {
            username: username.to_ascii_lowercase(),
            range,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    calendar: ContributionCalendar,
    fetched_at: Instant,
}

/// Calendars live for `ttl` after they were fetched. A zero TTL turns
/// the cache off.
///
/// Alongside the entries it hands out one fetch lock per key, so that
/// concurrent misses for the same calendar wait on a single upstream
/// request instead of each making their own.
#[derive(Debug)]
pub struct CalendarCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
    in_flight: HashMap<CacheKey, Arc<Mutex<()>>>,
}

impl CalendarCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
            in_flight: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.fetched_at) < self.ttl
    }

    pub fn get(&self, key: &CacheKey, now: Instant) -> Option<ContributionCalendar> {
        self.entries
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.calendar.clone())
    }

    pub fn insert(&mut self, key: CacheKey, calendar: ContributionCalendar, now: Instant) {
        if !self.is_enabled() {
            return;
        }
        self.entries.insert(
            key,
            CacheEntry {
                calendar,
                fetched_at: now,
            },
        );
    }

    /// Drop one entry so the next request refetches it
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Lock to hold while fetching `key`. Every caller asking for the
    /// same key before [`CalendarCache::release_fetch_lock`] gets the
    /// same lock.
    pub fn fetch_lock(&mut self, key: &CacheKey) -> Arc<Mutex<()>> {
        Arc::clone(self.in_flight.entry(key.clone()).or_default())
    }

    pub fn release_fetch_lock(&mut self, key: &CacheKey) {
        self.in_flight.remove(key);
    }

    /// Remove every expired entry, returning how many were dropped.
    /// Fetch locks nobody holds any more are dropped too.
    pub fn prune_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.fetched_at) < ttl);
        self.in_flight.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
