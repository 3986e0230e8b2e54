// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding model adapter.
//!
//! Wraps the all-MiniLM-L6-v2 sentence transformer behind a load / infer /
//! unload surface. The handle is created once per process and only read by
//! inference calls afterwards.

pub mod onnx_model;

pub use onnx_model::OnnxEmbeddingModel;

use thiserror::Error;

/// Failure kinds of the embedding adapter.
///
/// `Load` is fatal to startup (the serving process never becomes ready);
/// `Infer` is surfaced per-request and never retried.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Model weights or tokenizer missing, corrupt, or unreachable.
    #[error("model load failed: {0}")]
    Load(anyhow::Error),

    /// Inference failed on a well-formed handle.
    #[error("inference failed: {0}")]
    Infer(anyhow::Error),
}
