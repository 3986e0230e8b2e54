// Version information for the Fabstir Embed Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-embedding-serving-2025-08-04";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-08-04";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "onnx-embeddings",
    "http-api",
    "invocation-handler",
    "model-cache",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir Embed Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
