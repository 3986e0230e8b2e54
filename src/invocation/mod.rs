// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Single-invocation serving shim
//!
//! The serverless-style counterpart of the HTTP shim. One process-wide
//! model handle is initialized during the cold start (`init`, before the
//! first invocation is served) and reused across warm invocations;
//! `handler` maps one event to a serialized embedding.
//!
//! There is no unload path here: releasing resources is the invoking
//! runtime's job when it tears the environment down.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::config::NodeConfig;
use crate::embeddings::OnnxEmbeddingModel;
use crate::models::ModelCache;

/// Process-wide model handle, set once per cold start.
static MODEL: OnceCell<OnnxEmbeddingModel> = OnceCell::const_new();

/// The event shape handed to `handler`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvocationEvent {
    /// Text to embed
    pub input: String,
}

/// Cold-start initialization
///
/// Materializes the model cache and loads the handle into the
/// process-wide cell. Idempotent: warm environments that call it again
/// get the already-loaded handle. A failure here means the environment
/// never initializes — the cold-start equivalent of a fatal load error.
pub async fn init(config: &NodeConfig) -> Result<()> {
    MODEL
        .get_or_try_init(|| async {
            let cache = ModelCache::new(config.model_repo.clone(), config.cache_dir.clone());
            let paths = cache.ensure_local().await?;
            let model =
                OnnxEmbeddingModel::load(config.model_name(), &paths.model, &paths.tokenizer)
                    .await?;
            Ok::<_, anyhow::Error>(model)
        })
        .await?;
    Ok(())
}

/// Handles one invocation
///
/// Extracts `event.input`, runs inference on the shared handle, and
/// returns the vector serialized as a JSON-encoded array — a JSON string,
/// not a JSON value, so callers parse twice. Errors propagate to the
/// caller unretried, as a runtime-level invocation fault.
pub async fn handler(event: InvocationEvent) -> Result<String> {
    let model = MODEL
        .get()
        .context("embedding model not initialized; init() must run during cold start")?;

    let embedding = model.embed(&event.input).await?;
    encode_embedding(&embedding)
}

/// Serializes an embedding as the handler's string payload.
pub fn encode_embedding(embedding: &[f32]) -> Result<String> {
    serde_json::to_string(embedding).context("Failed to serialize embedding")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserialization() {
        let event: InvocationEvent = serde_json::from_str(r#"{"input": "hello"}"#).unwrap();
        assert_eq!(event.input, "hello");
    }

    #[test]
    fn test_event_missing_input_rejected() {
        assert!(serde_json::from_str::<InvocationEvent>(r#"{}"#).is_err());
    }

    #[test]
    fn test_encode_embedding_is_double_encoded() {
        let encoded = encode_embedding(&[0.5, -1.25, 0.0]).unwrap();

        // First parse: the payload is a plain string.
        // Second parse: the string's content is a JSON array of floats.
        let parsed: Vec<f32> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(parsed, vec![0.5, -1.25, 0.0]);

        // And embedding it in an outer JSON document keeps it a string.
        let outer = serde_json::to_value(&encoded).unwrap();
        assert!(outer.is_string());
    }

    #[tokio::test]
    async fn test_handler_before_init_fails() {
        // No test in this binary initializes the process-wide cell, so the
        // handler must refuse to serve.
        let result = handler(InvocationEvent {
            input: "hello".to_string(),
        })
        .await;

        let err = result.err().expect("handler must fail before init");
        assert!(err.to_string().contains("not initialized"));
    }
}
