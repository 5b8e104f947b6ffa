//! ExamTrack API Server implementation
//!
//! HTTP REST API server using Axum. Exposes upload, exam listing, rankings,
//! student reports and riser/faller comparisons over one record store.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::config::AppConfig;
use crate::store::RecordStore;
use crate::tracker::Tracker;

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub app: AppConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            app: AppConfig::default(),
        }
    }
}

/// Shared application state
pub struct AppState<S: RecordStore> {
    pub version: String,
    pub tracker: Tracker<S>,
}

impl<S: RecordStore> AppState<S> {
    pub fn new(tracker: Tracker<S>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            tracker,
        }
    }
}

/// Build the router over any record store
pub fn router<S: RecordStore + 'static>(state: Arc<AppState<S>>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root::<S>))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version::<S>))
        // Core API endpoints
        .route("/api/v1/upload", post(handlers::upload::<S>))
        .route("/api/v1/exams", post(handlers::exams::<S>))
        .route("/api/v1/rankings", post(handlers::rankings::<S>))
        .route("/api/v1/student", post(handlers::student::<S>))
        .route("/api/v1/movers", post(handlers::movers::<S>))
        // State and middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server over the configured SQLite database
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "examtrack=info,tower_http=info".into()),
        )
        .init();

    let database = config.app.database.clone();
    let tracker = Tracker::open(config.app)?;
    let app = router(Arc::new(AppState::new(tracker)));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("📝 ExamTrack API Server starting on http://{}", addr);
    info!("   Database: {}", database.display());
    info!("   Endpoints: /api/v1/upload, /api/v1/exams, /api/v1/rankings, /api/v1/student, /api/v1/movers");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("ExamTrack API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
