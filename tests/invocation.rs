// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Integration tests for the invocation shim
//!
//! The handler's cold-start / warm-invocation cycle needs real model
//! files, so those tests are ignored unless the files are present.

use fabstir_embed_node::config::NodeConfig;
use fabstir_embed_node::invocation::{self, InvocationEvent};

#[test]
fn test_event_round_trip() {
    let event = InvocationEvent {
        input: "hello".to_string(),
    };
    let json = serde_json::to_string(&event).unwrap();
    assert_eq!(json, r#"{"input":"hello"}"#);

    let parsed: InvocationEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, event);
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_cold_start_and_warm_invocations() {
    let config = NodeConfig::from_env();
    invocation::init(&config).await.expect("cold start failed");

    // First invocation after the cold start.
    let output = invocation::handler(InvocationEvent {
        input: "hello".to_string(),
    })
    .await
    .unwrap();

    // The payload is a JSON string whose content is a JSON array: callers
    // parse twice.
    let embedding: Vec<f32> = serde_json::from_str(&output).unwrap();
    assert_eq!(embedding.len(), 384);

    // Warm invocation reuses the same handle and stays deterministic.
    let warm = invocation::handler(InvocationEvent {
        input: "hello".to_string(),
    })
    .await
    .unwrap();
    assert_eq!(output, warm);

    // init is idempotent within one environment.
    invocation::init(&config).await.unwrap();
}
