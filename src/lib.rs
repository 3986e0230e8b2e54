// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod embeddings;
pub mod invocation;
pub mod models;
pub mod version;

// Re-export main types
pub use api::{create_app, embed_handler, ApiError, AppState, EmbeddingRequest, EmbeddingResponse, ErrorResponse};
pub use config::NodeConfig;
pub use embeddings::{EmbeddingError, OnnxEmbeddingModel};
pub use invocation::{handler, InvocationEvent};
pub use models::{ModelCache, ModelPaths};
