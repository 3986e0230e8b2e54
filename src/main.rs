// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use fabstir_embed_node::api::{self, AppState};
use fabstir_embed_node::config::NodeConfig;
use fabstir_embed_node::embeddings::OnnxEmbeddingModel;
use fabstir_embed_node::models::ModelCache;
use fabstir_embed_node::version;
use std::env;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("🚀 Starting {}", version::get_version_string());

    let config = NodeConfig::from_env();
    info!(
        "Model: {} (cache: {})",
        config.model_repo,
        config.cache_dir.display()
    );

    // Starting -> Ready: materialize the cache and load the handle before
    // binding the listener. A load failure here is fatal; the process
    // never becomes ready.
    let cache = ModelCache::new(config.model_repo.clone(), config.cache_dir.clone());
    let paths = cache.ensure_local().await?;
    let model =
        OnnxEmbeddingModel::load(config.model_name(), &paths.model, &paths.tokenizer).await?;

    let state = AppState::new(model.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));

    // Ready: serves until ctrl-c, then drains.
    api::serve(state, addr).await?;

    // ShuttingDown -> Stopped: runs once on the normal shutdown path only;
    // a hard kill never reaches this line.
    model.unload();
    info!("Node stopped");

    Ok(())
}
