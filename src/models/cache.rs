// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Local model-weight cache
//!
//! Resolves the configured HuggingFace repo to on-disk `model.onnx` and
//! `tokenizer.json` paths inside the cache directory, downloading on first
//! run. The directory layout inside the cache is hf-hub's own; callers only
//! see the two resolved paths.

use anyhow::{Context, Result};
use hf_hub::api::tokio::ApiBuilder;
use std::path::PathBuf;
use tracing::info;

use crate::embeddings::EmbeddingError;

/// Filename of the ONNX export inside the model repo
const MODEL_FILE: &str = "onnx/model.onnx";

/// Filename of the tokenizer definition inside the model repo
const TOKENIZER_FILE: &str = "tokenizer.json";

/// Resolved local paths for one model
#[derive(Debug, Clone)]
pub struct ModelPaths {
    /// Path to the ONNX model file
    pub model: PathBuf,
    /// Path to the tokenizer JSON file
    pub tokenizer: PathBuf,
}

/// On-disk cache for a single named model
///
/// # Example
/// ```ignore
/// let cache = ModelCache::new(
///     "sentence-transformers/all-MiniLM-L6-v2".to_string(),
///     PathBuf::from("./models"),
/// );
/// let paths = cache.ensure_local().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ModelCache {
    /// HuggingFace repo id (e.g., "sentence-transformers/all-MiniLM-L6-v2")
    repo_id: String,

    /// Cache directory populated on first run
    cache_dir: PathBuf,
}

impl ModelCache {
    pub fn new(repo_id: String, cache_dir: PathBuf) -> Self {
        Self { repo_id, cache_dir }
    }

    /// Returns the cache directory this cache writes into
    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Resolves local paths for the model, downloading into the cache on
    /// first run
    ///
    /// # Errors
    /// Returns `EmbeddingError::Load` if the cache directory is unusable or
    /// the weights cannot be located or materialized — fatal to the serving
    /// process's startup sequence.
    pub async fn ensure_local(&self) -> Result<ModelPaths, EmbeddingError> {
        self.ensure_local_inner().await.map_err(EmbeddingError::Load)
    }

    async fn ensure_local_inner(&self) -> Result<ModelPaths> {
        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .context(format!(
                "Failed to create model cache directory {}",
                self.cache_dir.display()
            ))?;

        let api = ApiBuilder::new()
            .with_cache_dir(self.cache_dir.clone())
            .with_progress(false)
            .build()
            .context("Failed to initialize model hub client")?;

        let repo = api.model(self.repo_id.clone());

        // hf-hub checks the cache before touching the network, so warm
        // starts resolve without any download.
        let model = repo.get(MODEL_FILE).await.context(format!(
            "Failed to materialize {} from {}",
            MODEL_FILE, self.repo_id
        ))?;
        let tokenizer = repo.get(TOKENIZER_FILE).await.context(format!(
            "Failed to materialize {} from {}",
            TOKENIZER_FILE, self.repo_id
        ))?;

        info!(
            "Model cache ready: {} ({})",
            self.repo_id,
            self.cache_dir.display()
        );

        Ok(ModelPaths { model, tokenizer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_unusable_cache_path_is_load_error() {
        // A regular file where the cache directory should be makes the
        // cache path unreachable.
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a directory").unwrap();

        let cache = ModelCache::new(
            "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            file.path().to_path_buf(),
        );

        let result = cache.ensure_local().await;
        assert!(matches!(result, Err(EmbeddingError::Load(_))));
    }

    #[test]
    fn test_cache_dir_accessor() {
        let cache = ModelCache::new(
            "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            PathBuf::from("./models"),
        );
        assert_eq!(cache.cache_dir(), &PathBuf::from("./models"));
    }
}
