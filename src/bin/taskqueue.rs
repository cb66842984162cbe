//! Serves workflow tool calls over stdin and stdout.
//!
//! Usage:
//!
//! ```text
//! taskqueue [--store-path <PATH>] [--log-format pretty|json]
//! ```
//!
//! Each input line holds one JSON tool call such as:
//!
//! ```json
//! {"tool": "project", "params": {"action": "list", "arguments": {}}}
//! ```
//!
//! Each call produces exactly one output line holding the response
//! envelope. Blank lines are skipped. Logs go to stderr.

use clap::Parser;
use eyre::WrapErr;
use mockable::DefaultClock;
use std::sync::Arc;
use taskqueue::{
    config::Cli,
    logging,
    workflow::{
        adapters::JsonFileProjectStore, dispatch::ToolDispatcher, services::WorkflowService,
    },
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

type Dispatcher = ToolDispatcher<JsonFileProjectStore, DefaultClock>;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let config = Cli::parse().into_config()?;
    logging::init(config.log_format);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        store = %config.store_path,
        "taskqueue starting"
    );

    let store = Arc::new(JsonFileProjectStore::new(config.store_path));
    let service = WorkflowService::new(store, Arc::new(DefaultClock));
    let dispatcher = Arc::new(ToolDispatcher::new(service));
    serve(&dispatcher).await?;

    info!("stdin closed, taskqueue exiting");
    Ok(())
}

async fn serve(dispatcher: &Arc<Dispatcher>) -> eyre::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await.wrap_err("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let worker = Arc::clone(dispatcher);
        let response = tokio::task::spawn_blocking(move || worker.handle_line(&line))
            .await
            .wrap_err("tool call worker failed")?;
        let mut encoded = serde_json::to_vec(&response).wrap_err("failed to encode response")?;
        encoded.push(b'\n');
        stdout
            .write_all(&encoded)
            .await
            .wrap_err("failed to write response")?;
        stdout.flush().await.wrap_err("failed to flush stdout")?;
    }
    Ok(())
}
