use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use axum::middleware;
use axum::{Router, extract::Request, response::Response};
use http::{HeaderValue, Method, header};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::routes;
use crate::api::state::{AppState, SharedState};
use crate::core::AppConfig;
use crate::jobs::{PruneCalendarCache, spawn_periodic_job};

/// How many consecutive ports to try when the requested one is taken
const PORT_ATTEMPTS: u16 = 10;

async fn set_static_cache_control(request: Request, next: middleware::Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
}

pub fn app(config: &AppConfig, shared_state: SharedState) -> Router {
    Router::new()
        // API routes
        .nest("/api", routes::router())
        // Static site
        .fallback_service(
            ServiceBuilder::new()
                .layer(middleware::from_fn(set_static_cache_control))
                .service(
                    ServeDir::new(&config.static_dir)
                        .precompressed_br()
                        .precompressed_gzip(),
                ),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins))
        .with_state(Arc::clone(&shared_state))
}

/// Bind the first free port starting at `port`
async fn bind_available(host: &str, port: u16) -> Result<TcpListener> {
    let end = port.saturating_add(PORT_ATTEMPTS);
    let mut last_err = None;
    for candidate in port..end {
        match TcpListener::bind((host, candidate)).await {
            Ok(listener) => return Ok(listener),
            Err(e) => {
                tracing::warn!("Port {} unavailable: {}", candidate, e);
                last_err = Some(e);
            }
        }
    }
    let err = last_err.context("No ports to try")?;
    Err(err).with_context(|| format!("No available port in {}..{}", port, end))
}

// Run the server
pub async fn serve(host: String, port: u16, config: AppConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format! {
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                }
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app_state = AppState::new(config.clone());
    let shared_state = Arc::new(RwLock::new(app_state));
    let app = app(&config, Arc::clone(&shared_state));

    let listener = bind_available(&host, port).await?;

    tracing::info!("Server started. Listening on {}", listener.local_addr()?);

    // Expired calendars are dropped in the background
    if !config.cache_ttl.is_zero() {
        spawn_periodic_job(
            Arc::clone(&shared_state),
            PruneCalendarCache::for_ttl(config.cache_ttl),
        );
    }

    axum::serve(listener, app).await?;

    Ok(())
}
