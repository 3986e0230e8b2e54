// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbeddingRequest type for the POST / endpoint

use serde::{Deserialize, Serialize};

/// Request body for POST /
///
/// Validated only for presence and type of `input`; a body missing the
/// field (or carrying a non-string) is rejected by the serde layer before
/// any adapter call.
///
/// # Example
/// ```json
/// {"input": "hello world"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingRequest {
    /// Text to embed
    pub input: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialization() {
        let req: EmbeddingRequest = serde_json::from_str(r#"{"input": "hello world"}"#).unwrap();
        assert_eq!(req.input, "hello world");
    }

    #[test]
    fn test_missing_input_rejected() {
        let result = serde_json::from_str::<EmbeddingRequest>(r#"{}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_string_input_rejected() {
        let result = serde_json::from_str::<EmbeddingRequest>(r#"{"input": 42}"#);
        assert!(result.is_err());
    }
}
