// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! This module provides a wrapper around ONNX Runtime for running
//! the all-MiniLM-L6-v2 sentence transformer model.
//!
//! Features:
//! - ONNX model loading from the local model cache
//! - BERT tokenization
//! - Mean pooling over token embeddings
//! - 384-dimensional output vectors

use anyhow::{Context, Result};
use ndarray::{Array2, ArrayD, Axis};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::Tokenizer;
use tracing::info;

use super::EmbeddingError;

/// ONNX-based embedding model (all-MiniLM-L6-v2)
///
/// This struct is the process-wide model handle. It wraps ONNX Runtime to
/// provide 384-dimensional embeddings:
/// - BERT-based tokenizer
/// - Mean pooling over token embeddings, weighted by the attention mask
///
/// # Model Details
/// - Input: Text strings (up to 256 tokens)
/// - Output: 384-dimensional f32 vectors
/// - Provider: CPU (ONNX Runtime)
///
/// # Thread Safety
/// All fields are wrapped in Arc for cheap cloning; the session sits behind
/// a Mutex so concurrent requests can share one handle. `embed` touches no
/// per-handle mutable state outside that lock.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    /// ONNX Runtime session (wrapped in Arc<Mutex> for thread-safe shared access)
    session: Arc<Mutex<Session>>,

    /// BERT tokenizer
    tokenizer: Arc<Tokenizer>,

    /// Model name (e.g., "all-MiniLM-L6-v2")
    model_name: String,

    /// Output dimension (384 for all-MiniLM-L6-v2)
    dimension: usize,

    /// Maximum sequence length (256 for all-MiniLM-L6-v2)
    max_length: usize,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Loads the embedding model from local cache paths
    ///
    /// # Arguments
    /// - `model_name`: Display name (e.g., "all-MiniLM-L6-v2")
    /// - `model_path`: Path to ONNX model file (model.onnx)
    /// - `tokenizer_path`: Path to tokenizer JSON file (tokenizer.json)
    ///
    /// # Errors
    /// Returns `EmbeddingError::Load` if:
    /// - Model file not found or invalid
    /// - Tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - Model doesn't output 384 dimensions
    pub async fn load<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
    ) -> Result<Self, EmbeddingError> {
        Self::load_inner(model_name.into(), model_path.as_ref(), tokenizer_path.as_ref())
            .await
            .map_err(EmbeddingError::Load)
    }

    async fn load_inner(
        model_name: String,
        model_path: &Path,
        tokenizer_path: &Path,
    ) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        info!("Loading ONNX embedding model: {}", model_name);

        let mut session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load ONNX model from {}",
                model_path.display()
            ))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        // Validate the model outputs 384 dimensions by running a test inference.
        let encoding = tokenizer
            .encode("validation test", true)
            .map_err(|e| anyhow::anyhow!("Tokenizer validation failed: {}", e))?;

        let output = run_and_extract(&mut session, &encoding)?;
        let output_shape = output.shape();

        // Token-level output is [batch, seq_len, hidden_dim]
        if output_shape.len() != 3 || output_shape[2] != 384 {
            anyhow::bail!(
                "Model outputs unexpected dimensions: {:?} (expected [batch, seq_len, 384])",
                output_shape
            );
        }

        info!("✅ ONNX embedding model loaded successfully");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension: 384,
            max_length: 256,
        })
    }

    /// Generates the embedding for a single text
    ///
    /// Deterministic: the same text on the same handle yields the same
    /// vector. The handle is never mutated.
    ///
    /// # Returns
    /// - `Result<Vec<f32>>`: 384-dimensional embedding vector
    ///
    /// # Implementation
    /// 1. Tokenize input with the BERT tokenizer
    /// 2. Run ONNX inference
    /// 3. Mean-pool token embeddings, weighted by the attention mask
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_inner(text).map_err(EmbeddingError::Infer)
    }

    fn embed_inner(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let attention_mask = encoding.get_attention_mask().to_vec();

        // Lock the session for the duration of the run; per-request state is local.
        let output = {
            let mut session_guard = self.session.lock().unwrap();
            run_and_extract(&mut session_guard, &encoding)?
        };

        // Model outputs token-level embeddings: [batch, seq_len, hidden_dim].
        // Mean-pool over the sequence dimension, ignoring padding tokens.
        let batch_0 = output.index_axis(Axis(0), 0); // [seq_len, hidden_dim]
        let seq_len = batch_0.shape()[0];
        let hidden_dim = batch_0.shape()[1];

        let mut pooled = vec![0.0f32; hidden_dim];
        let mut sum_mask = 0.0f32;

        for i in 0..seq_len {
            let mask_value = attention_mask[i] as f32;
            sum_mask += mask_value;
            for j in 0..hidden_dim {
                pooled[j] += batch_0[[i, j]] * mask_value;
            }
        }

        for val in &mut pooled {
            *val /= sum_mask.max(1e-9);
        }

        if pooled.len() != self.dimension {
            anyhow::bail!(
                "Unexpected embedding dimension: {} (expected {})",
                pooled.len(),
                self.dimension
            );
        }

        Ok(pooled)
    }

    /// Releases this handle
    ///
    /// The backing session memory is freed once the last clone of the
    /// handle drops; calling this on the normal shutdown path makes the
    /// release explicit. Skipping it is a permitted no-op — the OS
    /// reclaims everything at process exit.
    pub fn unload(self) {
        info!("Releasing embedding model: {}", self.model_name);
    }

    /// Returns the output dimension of this model
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the model name
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the maximum input sequence length
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

/// Runs the session over one encoding with the standard BERT inputs and
/// returns the token-level output tensor as an owned array.
fn run_and_extract(session: &mut Session, encoding: &tokenizers::Encoding) -> Result<ArrayD<f32>> {
    let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
    let attention_mask: Vec<i64> = encoding
        .get_attention_mask()
        .iter()
        .map(|&m| m as i64)
        .collect();
    let token_type_ids = vec![0i64; input_ids.len()]; // all zeros for single-segment input

    let len = input_ids.len();
    let input_ids_array =
        Array2::from_shape_vec((1, len), input_ids).context("Failed to create input_ids array")?;
    let attention_mask_array = Array2::from_shape_vec((1, len), attention_mask)
        .context("Failed to create attention_mask array")?;
    let token_type_ids_array = Array2::from_shape_vec((1, len), token_type_ids)
        .context("Failed to create token_type_ids array")?;

    let outputs = session.run(ort::inputs![
        "input_ids" => Value::from_array(input_ids_array)?,
        "attention_mask" => Value::from_array(attention_mask_array)?,
        "token_type_ids" => Value::from_array(token_type_ids_array)?
    ])?;

    // Use index [0] instead of name since different exports may name the output differently
    let output_array = outputs[0]
        .try_extract_array::<f32>()
        .context("Failed to extract output tensor")?;

    Ok(output_array.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeConfig;
    use crate::models::ModelCache;

    async fn load_test_model() -> OnnxEmbeddingModel {
        let config = NodeConfig::from_env();
        let cache = ModelCache::new(config.model_repo.clone(), config.cache_dir.clone());
        let paths = cache.ensure_local().await.unwrap();
        OnnxEmbeddingModel::load("all-MiniLM-L6-v2", &paths.model, &paths.tokenizer)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_load_missing_files_is_load_error() {
        let result = OnnxEmbeddingModel::load(
            "all-MiniLM-L6-v2",
            Path::new("/nonexistent/model.onnx"),
            Path::new("/nonexistent/tokenizer.json"),
        )
        .await;

        assert!(matches!(result, Err(EmbeddingError::Load(_))));
    }

    #[tokio::test]
    #[ignore] // Only run if model files are downloaded
    async fn test_embed_dimension() {
        let model = load_test_model().await;
        assert_eq!(model.dimension(), 384);

        let embedding = model.embed("hello world").await.unwrap();
        assert_eq!(embedding.len(), 384);
    }

    #[tokio::test]
    #[ignore] // Only run if model files are downloaded
    async fn test_embed_deterministic() {
        let model = load_test_model().await;

        let first = model.embed("the same sentence").await.unwrap();
        let second = model.embed("the same sentence").await.unwrap();
        assert_eq!(first, second);

        let other = model.embed("a different sentence").await.unwrap();
        assert_ne!(first, other);
    }

    #[tokio::test]
    #[ignore] // Only run if model files are downloaded
    async fn test_embed_length_constant_across_inputs() {
        let model = load_test_model().await;

        for text in ["a", "hello world", "a considerably longer sentence with more tokens"] {
            let embedding = model.embed(text).await.unwrap();
            assert_eq!(embedding.len(), model.dimension());
        }
    }
}
