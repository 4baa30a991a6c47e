//! API routes module

pub mod contributions;

use axum::Router;

use crate::api::state::SharedState;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Contribution grid routes
        .nest("/contributions", contributions::router())
}
