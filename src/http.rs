//! HTTP API for path lookups.
//!
//! Thin host layer over [`PathFinder`]: parses the two raw name strings,
//! maps a populated error field to 400 and everything else to 200.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{BeatpathError, Result};
use crate::service::{PathFinder, PathResult};

/// HTTP server wrapper
pub struct HttpServer {
    finder: Arc<PathFinder>,
    allowed_origins: Vec<String>,
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    finder: Arc<PathFinder>,
}

/// Path lookup request body. Missing or null fields are treated as empty
/// strings, which resolve to the unknown-team outcome rather than a parse
/// failure.
#[derive(Debug, Deserialize)]
struct PathRequest {
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
}

impl HttpServer {
    pub fn new(finder: PathFinder, allowed_origins: Vec<String>) -> Self {
        Self {
            finder: Arc::new(finder),
            allowed_origins,
        }
    }

    /// Run the HTTP server
    pub async fn run(&self, port: u16) -> Result<()> {
        let app = self.create_router();

        let addr = format!("0.0.0.0:{}", port);
        log::info!("Starting Beatpath HTTP server on http://{}", addr);
        log::info!("Path endpoint: http://{}/api/path", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            BeatpathError::Io(std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!("Failed to bind to {}: {}", addr, e),
            ))
        })?;

        axum::serve(listener, app).await.map_err(|e| {
            BeatpathError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("HTTP server error: {}", e),
            ))
        })?;

        Ok(())
    }

    /// Create the axum router
    fn create_router(&self) -> Router {
        // Build CORS layer.
        // - If allowed_origins is configured: restrict to that list.
        // - If empty (local dev): allow Any for convenience.
        let cors = if self.allowed_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<axum::http::HeaderValue> = self
                .allowed_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/api/path", post(handle_path))
            .route("/api/teams", get(handle_teams))
            .route("/health", get(handle_health))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
            .with_state(AppState {
                finder: Arc::clone(&self.finder),
            })
    }
}

/// Handle POST /api/path
async fn handle_path(State(state): State<AppState>, Json(request): Json<PathRequest>) -> Response {
    let from = request.from.unwrap_or_default();
    let to = request.to.unwrap_or_default();
    let result = state.finder.find_path(&from, &to).await.into_result();
    respond(result)
}

/// Map the result object onto the HTTP contract: a populated error field is
/// a client error, everything else is a success.
fn respond(result: PathResult) -> Response {
    if let Some(error) = result.error.as_deref() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": error })),
        )
            .into_response();
    }
    (StatusCode::OK, Json(result)).into_response()
}

/// Handle GET /api/teams (the enumeration the UI's picker is built from)
async fn handle_teams(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "teams": state.finder.team_names() })),
    )
        .into_response()
}

/// Handle health check endpoint
async fn handle_health() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": "beatpath",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
        .into_response()
}
