//! JSON-over-HTTP boundary.
//!
//! Thin axum layer over the orchestrator: handlers deserialize a request,
//! call exactly one orchestrator method and wrap the result. All policy
//! lives below this layer.

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::WorkflowError;
use crate::workflow::Orchestrator;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Build the full application router.
pub fn create_router(orchestrator: Arc<Orchestrator>) -> axum::Router {
    routes::router(AppState { orchestrator })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, orchestrator: Arc<Orchestrator>) -> anyhow::Result<()> {
    let app = create_router(orchestrator);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Response-side wrapper for workflow errors.
///
/// Payload shape is `{"error": {"kind": ..., "message": ...}}`; the kind
/// string is stable across releases, the message is for humans.
pub struct ApiError(pub WorkflowError);

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            WorkflowError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            WorkflowError::SessionNotFound(_) | WorkflowError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            WorkflowError::SourceUnavailable(_) | WorkflowError::GenerationFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            WorkflowError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            WorkflowError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(kind = self.0.kind(), "request failed: {}", self.0);
        } else {
            tracing::debug!(kind = self.0.kind(), "request rejected: {}", self.0);
        }

        let body = json!({
            "error": {
                "kind": self.0.kind(),
                "message": self.0.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

/// Shorthand for handler results.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
