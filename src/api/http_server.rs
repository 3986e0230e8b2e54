// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTTP serving shim
//!
//! One POST endpoint mapping text to its embedding, one GET endpoint for
//! liveness probing. The model handle is loaded before the listener binds
//! and injected through `AppState`; no hidden process-wide state.
//!
//! Lifecycle: Starting (load model) -> Ready (serve) -> ShuttingDown
//! (drain on ctrl-c) -> Stopped (caller releases the handle).

use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::embed::embed_handler;
use crate::embeddings::OnnxEmbeddingModel;

/// Router state carrying the injected model handle
///
/// The handle is `Some` for a serving process (set once during startup,
/// read-only afterwards) and `None` only for routers built in tests.
#[derive(Clone)]
pub struct AppState {
    model: Option<OnnxEmbeddingModel>,
}

impl AppState {
    pub fn new(model: OnnxEmbeddingModel) -> Self {
        Self { model: Some(model) }
    }

    /// State without a model, for exercising the router in tests
    pub fn new_for_test() -> Self {
        Self { model: None }
    }

    pub fn model(&self) -> Option<&OnnxEmbeddingModel> {
        self.model.as_ref()
    }
}

/// Body of GET /status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub status: String,
}

/// Builds the router with all routes and layers
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", post(embed_handler))
        .route("/status", get(status_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the listener and serves until a shutdown signal arrives
///
/// Returns after the graceful drain completes so the caller can release
/// the model handle on the normal shutdown path. A hard kill skips both.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// GET /status handler: constant liveness answer while the process serves
async fn status_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "200 OK".to_string(),
    })
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received, draining connections");
}
