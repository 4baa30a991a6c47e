//! Public types for the contributions API

pub use crate::github::RangeQuery;
pub use crate::grid::{RenderQuery, RenderedGrid};
use serde::Deserialize;

/// Skip the cache and fetch again
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RefreshQuery {
    pub refresh: Option<String>,
}

/// Content type of the SVG endpoint
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";
