// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbeddingResponse type for the POST / endpoint

use crate::api::embed::EmbeddingRequest;
use serde::{Deserialize, Serialize};

/// Response body for POST /
///
/// Echoes the request back as `fragment` alongside the embedding vector.
/// Constructed per request and discarded; nothing is persisted.
///
/// # Example
/// ```json
/// {
///   "fragment": {"input": "hello world"},
///   "embedding": [0.1, -0.2, ...]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// The request this embedding was computed for
    pub fragment: EmbeddingRequest,

    /// Fixed-length embedding vector (384 for all-MiniLM-L6-v2)
    pub embedding: Vec<f32>,
}

impl EmbeddingResponse {
    /// Returns the dimensionality of the embedded vector
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_shape() {
        let response = EmbeddingResponse {
            fragment: EmbeddingRequest {
                input: "hello world".to_string(),
            },
            embedding: vec![0.1, 0.2, 0.3],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["fragment"]["input"], "hello world");
        assert_eq!(json["embedding"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_dimension() {
        let response = EmbeddingResponse {
            fragment: EmbeddingRequest {
                input: "x".to_string(),
            },
            embedding: vec![0.0; 384],
        };
        assert_eq!(response.dimension(), 384);
    }
}
