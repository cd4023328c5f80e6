//! HTTP surface: generate, download and list reports over axum.
//!
//! Handlers are thin. Each one moves the synchronous library call onto
//! [`tokio::task::spawn_blocking`] and maps [`ReportError`] onto a status
//! code through [`ApiError`].
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET | `/` | service banner |
//! | GET | `/health` | liveness |
//! | GET | `/api/v1/reports/generate` | [`RenderedArtifact`] JSON |
//! | GET | `/api/v1/reports/download/{filename}` | PDF bytes |
//! | GET | `/api/v1/reports/list` | `{"reports": [ArtifactInfo…]}` |

use crate::config::{ReportConfig, ServerConfig};
use crate::diagnostics::TracingDiagnostics;
use crate::error::ReportError;
use crate::generate;
use crate::output::{ArtifactInfo, RenderedArtifact};
use crate::store;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ReportConfig>,
}

impl AppState {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// ── Errors ───────────────────────────────────────────────────────────────

/// Handler error; renders as `{"detail": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// A library failure, mapped by variant.
    Report(ReportError),
    /// The blocking task panicked or was cancelled.
    Internal(String),
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        Self::Report(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::Report(ReportError::DataSourceMissing { ref path }) => {
                warn!("Sales data file not found: {}", path.display());
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (
                    StatusCode::NOT_FOUND,
                    format!(
                        "Sales data file not found. Please ensure {name} exists in the data directory."
                    ),
                )
            }
            Self::Report(ref e) if e.is_data_error() => {
                warn!("Invalid sales data: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            Self::Report(ReportError::ArtifactNotFound { .. }) => {
                (StatusCode::NOT_FOUND, "Report file not found.".to_string())
            }
            Self::Report(ref e @ ReportError::Storage { .. }) => {
                error!("Report storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error retrieving reports list.".to_string(),
                )
            }
            Self::Report(ref e) => {
                error!("Report generation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred while generating the report.".to_string(),
                )
            }
            Self::Internal(ref msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Run a blocking library call off the async worker threads.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ReportError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
        .map_err(ApiError::from)
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "Sales Report API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": "/api/v1/reports",
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "sales-report-api" }))
}

async fn generate_report(State(state): State<AppState>) -> Result<Json<RenderedArtifact>, ApiError> {
    let config = Arc::clone(&state.config);
    let artifact = blocking(move || generate::generate_report(&config, &TracingDiagnostics)).await?;
    info!("Report generated successfully: {}", artifact.filename);
    Ok(Json(artifact))
}

async fn download_report(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let config = Arc::clone(&state.config);
    let name = filename.clone();
    let bytes = blocking(move || store::read_artifact(&config.reports_dir, &name)).await?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename={filename}"))
        .map_err(|e| ApiError::Internal(format!("bad header value: {e}")))?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

#[derive(Serialize)]
struct ReportList {
    reports: Vec<ArtifactInfo>,
}

async fn list_reports(State(state): State<AppState>) -> Result<Json<ReportList>, ApiError> {
    let config = Arc::clone(&state.config);
    let reports =
        blocking(move || store::list_artifacts(&config.reports_dir, &config.download_base)).await?;
    Ok(Json(ReportList { reports }))
}

// ── Router ───────────────────────────────────────────────────────────────

/// Build the application router with CORS and request tracing.
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {:?}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/v1/reports/generate", get(generate_report))
        .route("/api/v1/reports/download/{filename}", get(download_report))
        .route("/api/v1/reports/list", get(list_reports))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn run(config: ReportConfig, server: ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server.bind).await?;
    info!("Sales report API listening on http://{}", listener.local_addr()?);
    info!("  data source: {}", config.source_path().display());
    info!("  reports dir: {}", config.reports_dir.display());

    let app = router(AppState::new(config), &server);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
