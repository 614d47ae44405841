//! HTTP front end for the ingestion handler.
//!
//! # Routes
//!
//! - `POST /logs`, `POST /`: submit one log record
//! - `GET /healthz`: liveness report
//!
//! Bodies larger than `server.max_body_bytes` are answered with 413 before
//! reaching the handler.

use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use bytes::Bytes;
use serde_json::json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use logvault_ingest::{IngestHandler, IngestResponse, Notifier, ObjectStore};

use crate::health::{DaemonHealth, record_uptime};

/// Shared state for all routes.
pub struct AppState<S, N> {
    handler: IngestHandler<S, N>,
    start_time: Instant,
}

impl<S, N> Clone for AppState<S, N> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            start_time: self.start_time,
        }
    }
}

/// HTTP rendering of an [`IngestResponse`].
pub struct HttpResponse(pub IngestResponse);

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.body)).into_response()
    }
}

/// Build the router for `handler`.
pub fn router<S: ObjectStore, N: Notifier>(
    handler: IngestHandler<S, N>,
    max_body_bytes: usize,
    start_time: Instant,
) -> Router {
    let state = AppState {
        handler,
        start_time,
    };

    Router::new()
        .route("/", post(ingest::<S, N>))
        .route("/logs", post(ingest::<S, N>))
        .route("/healthz", get(healthz::<S, N>))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Serve `router` on `listener` until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish after cancellation.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            tracing::info!("http listener draining");
        })
        .await
        .map_err(|e| anyhow::anyhow!("http server failed: {}", e))
}

async fn ingest<S: ObjectStore, N: Notifier>(
    State(state): State<AppState<S, N>>,
    body: Bytes,
) -> Response {
    // Detached so that a client disconnect does not cancel a store write or publish.
    let handler = state.handler.clone();
    let task = tokio::spawn(async move { handler.handle(&body).await });

    match task.await {
        Ok(response) => HttpResponse(response).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "ingestion task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "ingestion task failed" })),
            )
                .into_response()
        }
    }
}

async fn healthz<S: ObjectStore, N: Notifier>(
    State(state): State<AppState<S, N>>,
) -> Json<DaemonHealth> {
    record_uptime(state.start_time);
    Json(DaemonHealth::new(
        state.start_time,
        state.handler.store().name(),
        state.handler.notifier().name(),
    ))
}
