//! Sensors Web Service
//!
//! REST API over a [`SensorStore`] backend. The store is constructed once
//! and injected into the router state, so the in-memory and SQLite
//! variants serve the same routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod error;
mod routes;

pub use crate::config::ServiceConfig;
pub use crate::error::ApiError;

use sensor_store::{MemoryStore, SensorStore};
use storage::SqliteStore;

/// Application state shared across handlers.
pub struct AppState {
    /// Injected storage backend.
    pub store: Arc<dyn SensorStore>,
    /// Version string.
    pub version: String,
    /// Start time.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state around a store.
    pub fn new(store: Arc<dyn SensorStore>) -> Self {
        Self {
            store,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route(
            "/api/v1/sensor-types",
            post(routes::sensor_types::add).get(routes::sensor_types::find),
        )
        .route("/api/v1/sensors", post(routes::sensors::add).get(routes::sensors::find))
        .route(
            "/api/v1/sensor-readings",
            post(routes::readings::add).get(routes::readings::find),
        )
        .route("/api/v1/store", delete(clear_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler.
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// Clear every collection in the backing store.
async fn clear_handler(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.store.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Initialize logging.
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Build the configured store and serve until shutdown.
pub async fn run_server(config: ServiceConfig) -> anyhow::Result<()> {
    let store: Arc<dyn SensorStore> = match &config.database_url {
        Some(url) => Arc::new(SqliteStore::connect(url).await?),
        None => Arc::new(MemoryStore::new()),
    };
    let state = Arc::new(AppState::new(store));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("starting sensors web service on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
