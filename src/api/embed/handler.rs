// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST / HTTP handler
//!
//! Maps input text to its embedding using the model handle injected into
//! the router state. Adapter failures are translated to the explicit
//! error mapping at this boundary; nothing is retried.

use crate::api::embed::{EmbeddingRequest, EmbeddingResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use axum::extract::State;
use axum::Json;

/// POST / handler
///
/// # Request Body
/// ```json
/// {"input": "hello world"}
/// ```
///
/// # Response Body
/// ```json
/// {"fragment": {"input": "hello world"}, "embedding": [0.1, ...]}
/// ```
///
/// Malformed bodies never reach this function; the axum `Json` extractor
/// rejects them with a 4xx before the adapter is touched.
pub async fn embed_handler(
    State(state): State<AppState>,
    Json(request): Json<EmbeddingRequest>,
) -> Result<Json<EmbeddingResponse>, ApiError> {
    let model = state.model().ok_or(ApiError::ModelNotLoaded)?;

    let embedding = model
        .embed(&request.input)
        .await
        .map_err(|e| ApiError::Inference(e.to_string()))?;

    Ok(Json(EmbeddingResponse {
        fragment: request,
        embedding,
    }))
}
