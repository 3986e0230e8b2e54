// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire shape of every error the HTTP API returns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
}

/// API failure kinds with an explicit kind-to-status mapping
///
/// Each kind maps to exactly one status code; nothing collapses into a
/// generic catch-all. `ModelNotLoaded` cannot occur once the server is
/// ready (the model loads before the listener binds) but keeps the mapping
/// total for routers built without a model, e.g. in tests.
#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    ModelNotLoaded,
    Inference(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ModelNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            detail: self.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // The detail field carries the underlying message verbatim.
            ApiError::InvalidRequest(msg) => write!(f, "{}", msg),
            ApiError::ModelNotLoaded => write!(f, "embedding model not loaded"),
            ApiError::Inference(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
