//! HTTP Server for the hospivot API.
//!
//! Every request carries the spreadsheet and reruns the whole pipeline;
//! nothing is kept between requests.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | POST   | `/api/upload`     | Upload spreadsheet, get all results  |
//! | POST   | `/api/export`     | Upload spreadsheet, get the XLSX     |
//! | POST   | `/api/chart`      | Upload spreadsheet, get the SVG      |
//! | GET    | `/api/logs`       | SSE stream for real-time logs        |

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::UploadResponse;
use crate::chart::render_svg;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, ServerError, ServerResult};
use crate::export::export_download;
use crate::transform::{run_bytes, PipelineOutput};

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const SVG_MIME: &str = "image/svg+xml";

/// Shared, read-only server state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PipelineConfig>,
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config: Arc::new(config) }
    }
}

/// Build the application router.
///
/// With a `static_dir`, unmatched paths serve the built frontend.
pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/export", post(export))
        .route("/api/chart", post(chart))
        .route("/api/logs", get(sse_logs));

    app = match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app.route("/", get(health)),
    };

    app.layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(
    port: u16,
    static_dir: Option<PathBuf>,
    config: PipelineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = &static_dir {
        tracing::info!("Serving frontend from {}", dir.display());
    }
    let app = router(AppState::new(config), static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 hospivot server running on http://localhost:{}", port);
    tracing::info!("   POST /api/upload - Upload spreadsheet");
    tracing::info!("   POST /api/export - Download cleaned XLSX");
    tracing::info!("   POST /api/chart  - Hospitals chart (SVG)");
    tracing::info!("   GET  /api/logs   - SSE log stream");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "hospivot",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "export": "POST /api/export",
            "chart": "POST /api/chart",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // Lagged receivers skip what they missed
    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Full pipeline: preview, tables, chart and export metadata.
async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ServerResult<Json<UploadResponse>> {
    let (file_name, bytes) = read_file_field(multipart).await.map_err(report)?;
    log_info(format!(
        "📄 New upload: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    ));

    let config = state.config.clone();
    let response = blocking(move || {
        let output = run_bytes(&bytes, &config)?;
        let chart = render_svg(&output.hospitals);
        let download = export_download(&output.pivot, &config)?;
        Ok(UploadResponse::new(output, file_name, chart, download))
    })
    .await
    .map_err(report)?;

    if let Some(reason) = &response.chart_error {
        log_info(format!("No chart: {}", reason));
    }

    Ok(Json(response))
}

/// Cleaned pivot table as an XLSX attachment.
async fn export(State(state): State<AppState>, multipart: Multipart) -> ServerResult<Response> {
    let (_, bytes) = read_file_field(multipart).await.map_err(report)?;

    let config = state.config.clone();
    let download = blocking(move || {
        let output = run_bytes(&bytes, &config)?;
        Ok(export_download(&output.pivot, &config)?)
    })
    .await
    .map_err(report)?;

    Ok((
        [
            (header::CONTENT_TYPE, download.content_type.clone()),
            (header::CONTENT_DISPOSITION, download.content_disposition()),
        ],
        download.bytes,
    )
        .into_response())
}

/// Hospitals-only chart as an SVG document.
async fn chart(State(state): State<AppState>, multipart: Multipart) -> ServerResult<Response> {
    let (_, bytes) = read_file_field(multipart).await.map_err(report)?;

    let config = state.config.clone();
    let svg = blocking(move || {
        let output: PipelineOutput = run_bytes(&bytes, &config)?;
        Ok(render_svg(&output.hospitals)?)
    })
    .await
    .map_err(report)?;

    Ok(([(header::CONTENT_TYPE, SVG_MIME)], svg).into_response())
}

/// Read the `file` field of a multipart form.
async fn read_file_field(mut multipart: Multipart) -> ServerResult<(Option<String>, Vec<u8>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|s| s.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
            file_data = Some(data.to_vec());
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".into()))?;
    if bytes.is_empty() {
        return Err(ServerError::BadRequest("Uploaded file is empty".into()));
    }
    Ok((file_name, bytes))
}

/// Run CPU-bound pipeline work off the async executor.
async fn blocking<T, F>(work: F) -> ServerResult<T>
where
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}

fn report(err: ServerError) -> ServerError {
    log_error(err.to_string());
    err
}
