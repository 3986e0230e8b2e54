// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Invocation driver
//!
//! Stands in for the hosting serverless runtime: performs the cold start,
//! then feeds events to the handler. One event via --event, or a stream of
//! newline-delimited events on stdin (warm invocations in the same
//! environment). Any unhandled failure exits non-zero, the equivalent of a
//! runtime-level invocation fault.

use anyhow::Result;
use clap::Parser;
use fabstir_embed_node::config::NodeConfig;
use fabstir_embed_node::invocation::{self, InvocationEvent};
use std::env;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "invoke", about = "Run the embedding handler for one or more events")]
struct Args {
    /// Inline event JSON, e.g. '{"input": "hello"}'; when omitted,
    /// newline-delimited events are read from stdin
    #[arg(long)]
    event: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = NodeConfig::from_env();

    // Cold start: the handle loads exactly once, before any event is served.
    invocation::init(&config).await?;
    info!("Cold start complete, handler ready");

    match args.event {
        Some(raw) => {
            let event: InvocationEvent = serde_json::from_str(&raw)?;
            println!("{}", invocation::handler(event).await?);
        }
        None => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                if line.trim().is_empty() {
                    continue;
                }
                let event: InvocationEvent = serde_json::from_str(&line)?;
                println!("{}", invocation::handler(event).await?);
            }
        }
    }

    Ok(())
}
