// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Node configuration
//!
//! Environment-driven settings shared by both serving shims. Defaults
//! match the reference deployment: port 8080, all-MiniLM-L6-v2 weights
//! cached under ./models.

use std::env;
use std::path::PathBuf;

/// Default HuggingFace repo for the embedding model
pub const DEFAULT_MODEL_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Default model cache directory
pub const DEFAULT_CACHE_DIR: &str = "./models";

/// Default HTTP API port
pub const DEFAULT_API_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    /// Port the HTTP shim binds on (API_PORT)
    pub api_port: u16,

    /// HuggingFace repo id of the embedding model (MODEL_REPO)
    pub model_repo: String,

    /// Model weight cache directory (MODEL_CACHE_DIR)
    pub cache_dir: PathBuf,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            api_port: DEFAULT_API_PORT,
            model_repo: DEFAULT_MODEL_REPO.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}

impl NodeConfig {
    /// Builds the configuration from environment variables, falling back
    /// to defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_API_PORT);

        let model_repo = env::var("MODEL_REPO").unwrap_or_else(|_| DEFAULT_MODEL_REPO.to_string());

        let cache_dir = env::var("MODEL_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CACHE_DIR));

        Self {
            api_port,
            model_repo,
            cache_dir,
        }
    }

    /// Short display name of the model, the last repo path segment
    /// (e.g., "all-MiniLM-L6-v2")
    pub fn model_name(&self) -> &str {
        self.model_repo
            .rsplit('/')
            .next()
            .unwrap_or(&self.model_repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.model_repo, "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(config.cache_dir, PathBuf::from("./models"));
    }

    #[test]
    fn test_model_name_is_last_segment() {
        let config = NodeConfig::default();
        assert_eq!(config.model_name(), "all-MiniLM-L6-v2");

        let config = NodeConfig {
            model_repo: "no-slash".to_string(),
            ..NodeConfig::default()
        };
        assert_eq!(config.model_name(), "no-slash");
    }
}
