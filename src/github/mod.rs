//! Fetching contribution calendars from GitHub

pub mod cache;
pub mod client;
pub mod range;

pub use cache::{CacheKey, CalendarCache};
pub use client::{DEFAULT_API_URL, GitHubClient, UserNotFound};
pub use range::{DateRange, RangeQuery};
