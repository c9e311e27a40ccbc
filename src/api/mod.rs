//! Enrollview REST API
//!
//! HTTP API layer serving the dashboard views, built with Axum.
//!
//! # Endpoints
//!
//! ## Dataset
//! - `POST /api/v1/dataset?file_name=` - Upload a spreadsheet (raw body)
//! - `DELETE /api/v1/dataset` - Drop the upload
//! - `GET /api/v1/dataset` - Active dataset summary
//! - `GET /api/v1/years` - Ordered school years
//!
//! ## Views
//! - `GET /api/v1/views/national` - SHS enrollment vs infrastructure
//! - `GET /api/v1/views/regional` - Congestion trends in focus regions
//! - `GET /api/v1/views/sector?year_a=&year_b=` - Public vs private enrollment
//! - `GET /api/v1/views/ranking?year=` - Regions ranked by congestion
//! - `GET /api/v1/views/raw` - SHS rows with the derived ratio
//! - `GET /api/v1/dashboard?ranking_year=&year_a=&year_b=` - All views
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,no_run
//! use enrollview::api::{serve, AppState};
//! use enrollview::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     serve(AppState::new(&config)).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Dataset routes, with the upload size as body limit
        .route(
            "/dataset",
            get(routes::dataset::get_dataset)
                .post(routes::dataset::upload_dataset)
                .delete(routes::dataset::clear_dataset),
        )
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .route("/years", get(routes::dataset::list_years))
        // View routes
        .route("/views/national", get(routes::views::national))
        .route("/views/regional", get(routes::views::regional))
        .route("/views/sector", get(routes::views::sector))
        .route("/views/ranking", get(routes::views::ranking))
        .route("/views/raw", get(routes::views::raw))
        .route("/dashboard", get(routes::views::dashboard));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config);
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive when no origins are configured
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Enrollview API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Enrollview API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
