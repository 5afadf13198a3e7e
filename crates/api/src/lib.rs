//! Water Dashboard API Server
//!
//! REST API behind the household water dashboard: usage and pH submission,
//! recent-entry tables, usage trends, quality status and sample sources.

use axum::{extract::State, routing::get, Json, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod settings;
mod error;
mod routes;

pub use settings::DashboardConfig;
pub use error::ApiError;

use reading_validator::Validator;
use water_store::{Record, TableStore, WaterStore};

/// Default number of rows in the recent-entries tables
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Application state shared across handlers
pub struct AppState {
    /// CSV-backed stores
    pub store: WaterStore,
    /// Submission checks
    pub validator: Validator,
    /// Rows returned by the recent-entries tables when no limit is given
    pub recent_limit: usize,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state over an initialized store
    pub fn new(store: WaterStore) -> Self {
        Self {
            store,
            validator: Validator::default(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics: None,
        }
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

/// State handle passed to every route
pub type SharedState = Arc<RwLock<AppState>>;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub usage_store: ComponentHealth,
    pub quality_store: ComponentHealth,
}

/// Individual store health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    pub path: String,
    pub record_count: Option<usize>,
}

impl ComponentHealth {
    fn probe<R: Record>(table: &TableStore<R>) -> Self {
        let path = table.path().display().to_string();
        match table.load_all() {
            Ok(loaded) => Self {
                status: "ok".to_string(),
                path,
                record_count: Some(loaded.records.len()),
            },
            Err(e) => {
                warn!("Health probe failed: {}", e);
                Self {
                    status: "error".to_string(),
                    path,
                    record_count: None,
                }
            }
        }
    }

    fn is_ok(&self) -> bool {
        self.record_count.is_some()
    }
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route(
            "/api/v1/usage",
            get(routes::usage::get_usage).post(routes::usage::save_usage),
        )
        .route(
            "/api/v1/usage/households",
            get(routes::usage::get_households),
        )
        .route("/api/v1/usage/trend", get(routes::usage::get_trend))
        .route(
            "/api/v1/quality",
            get(routes::quality::get_quality).post(routes::quality::save_quality),
        )
        .route("/api/v1/quality/status", get(routes::quality::get_status))
        .route("/api/v1/sources", get(routes::sources::get_sources))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let state = state.read().await;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let components = ComponentStatus {
        usage_store: ComponentHealth::probe(state.store.usage()),
        quality_store: ComponentHealth::probe(state.store.quality()),
    };
    let status = if components.usage_store.is_ok() && components.quality_store.is_ok() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components,
    })
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<SharedState>) -> String {
    let state = state.read().await;
    state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

/// Initialize logging
pub fn init_logging(json: bool) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let builder = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
}

/// Create the data files and serve the API until shutdown.
///
/// Failing to create the data files is fatal: nothing could ever be saved.
pub async fn run_server(config: DashboardConfig) -> anyhow::Result<()> {
    let store = WaterStore::new(&config.store_config());
    store.ensure_initialized()?;

    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Metrics recorder unavailable: {}", e);
            None
        }
    };

    let state = AppState::new(store)
        .with_recent_limit(config.recent_limit)
        .with_metrics(metrics);
    let app = create_router(Arc::new(RwLock::new(state)));

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
