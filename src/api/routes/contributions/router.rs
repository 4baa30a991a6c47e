//! Router for the contributions API

use std::sync::LazyLock;
use std::time::Instant;

use anyhow::anyhow;
use axum::{
    Router,
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use axum_extra::extract::Query;
use chrono::Utc;
use http::header;
use regex::Regex;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::SharedState;
use crate::github::{CacheKey, DateRange};
use crate::grid::{
    ContributionCalendar, GridError, GridRenderer, RenderOptions, Renderer, SvgRenderer,
};

/// GitHub logins: alphanumerics and single hyphens, at most 39 chars
static LOGIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9]|-[A-Za-z0-9]){0,38}$").unwrap()
});

fn validate_login(username: &str) -> Result<(), GridError> {
    if username.len() <= 39 && LOGIN_RE.is_match(username) {
        Ok(())
    } else {
        Err(GridError::InvalidInput(format!(
            "not a GitHub login: {:?}",
            username
        )))
    }
}

/// Serve from the cache when fresh, otherwise fetch and store.
///
/// `refresh` drops any cached entry first. Misses for the same key
/// queue on the key's fetch lock so only the first one reaches GitHub;
/// the rest find its result when they get the lock.
async fn load_calendar(
    state: &SharedState,
    username: &str,
    range: DateRange,
    refresh: bool,
) -> anyhow::Result<ContributionCalendar> {
    let key = CacheKey::new(username, range.clone());

    let (github, fetch_lock) = {
        let mut state = state.write().map_err(|_| anyhow!("State lock poisoned"))?;
        if refresh && state.cache.invalidate(&key) {
            tracing::debug!("Dropped cached calendar for {}", username);
        }
        if let Some(calendar) = state.cache.get(&key, Instant::now()) {
            tracing::debug!("Cache hit for {}", username);
            return Ok(calendar);
        }
        (state.github.clone(), state.cache.fetch_lock(&key))
    };

    let _fetching = fetch_lock.lock().await;

    let cached = state
        .read()
        .map_err(|_| anyhow!("State lock poisoned"))?
        .cache
        .get(&key, Instant::now());
    if let Some(calendar) = cached {
        tracing::debug!("Cache filled while waiting for {}", username);
        return Ok(calendar);
    }

    let fetched = github.fetch_calendar(username, &range).await;

    let mut state = state.write().map_err(|_| anyhow!("State lock poisoned"))?;
    state.cache.release_fetch_lock(&key);
    let calendar = fetched?;
    state.cache.insert(key, calendar.clone(), Instant::now());

    Ok(calendar)
}

/// `refresh=true` or `refresh=1` bypasses the cache for one request
fn wants_refresh(query: &public::RefreshQuery) -> bool {
    query
        .refresh
        .as_deref()
        .map(str::trim)
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Parse everything from the request before touching the network
async fn prepare(
    state: &SharedState,
    username: &str,
    range: &public::RangeQuery,
    render: &public::RenderQuery,
    refresh: &public::RefreshQuery,
) -> Result<(ContributionCalendar, RenderOptions), ApiError> {
    validate_login(username)?;
    let options = RenderOptions::from_query(render)?;
    let range = DateRange::resolve(range, Utc::now())?;
    let calendar = load_calendar(state, username, range, wants_refresh(refresh)).await?;
    Ok((calendar, options))
}

/// Structured grid for client-side charts
async fn grid_handler(
    State(state): State<SharedState>,
    Path(username): Path<String>,
    Query(range): Query<public::RangeQuery>,
    Query(render): Query<public::RenderQuery>,
    Query(refresh): Query<public::RefreshQuery>,
) -> Result<Json<public::RenderedGrid>, ApiError> {
    let (calendar, options) = prepare(&state, &username, &range, &render, &refresh).await?;
    Ok(Json(GridRenderer.render(&calendar, &options)))
}

/// Standalone SVG image
async fn svg_handler(
    State(state): State<SharedState>,
    Path(username): Path<String>,
    Query(range): Query<public::RangeQuery>,
    Query(render): Query<public::RenderQuery>,
    Query(refresh): Query<public::RefreshQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (calendar, options) = prepare(&state, &username, &range, &render, &refresh).await?;
    let svg = SvgRenderer::default().render(&calendar, &options);
    Ok(([(header::CONTENT_TYPE, public::SVG_CONTENT_TYPE)], svg))
}

/// Create the contributions router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/{username}", axum::routing::get(grid_handler))
        .route("/{username}/svg", axum::routing::get(svg_handler))
}
