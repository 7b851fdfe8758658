//! Raw method calls.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use offline_translator_core::{Dispatcher, MethodCall, MethodResponse};
use serde_json::Value;
use tokio::task::JoinSet;
use tracing::info;

use super::print_cache_stats;

pub async fn cmd_call(dispatcher: &Dispatcher, method: String, args: Option<String>) -> Result<bool> {
    let arguments = match args {
        Some(raw) => serde_json::from_str(&raw).context("--args is not valid JSON")?,
        None => Value::Null,
    };
    let response = dispatcher.handle(&MethodCall::new(method, arguments)).await;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(response.is_success())
}

/// Dispatches every call in `file` on its own task and prints the responses
/// in input order.
pub async fn cmd_batch(dispatcher: Arc<Dispatcher>, file: PathBuf) -> Result<bool> {
    let content = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let calls: Vec<MethodCall> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of method calls", file.display()))?;

    let start = Instant::now();
    let mut tasks = JoinSet::new();
    for (index, call) in calls.into_iter().enumerate() {
        let dispatcher = Arc::clone(&dispatcher);
        tasks.spawn(async move { (index, dispatcher.handle(&call).await) });
    }

    let mut responses: Vec<Option<MethodResponse>> = vec![None; tasks.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, response) = joined.context("Batch task failed")?;
        responses[index] = Some(response);
    }
    let responses: Vec<MethodResponse> = responses.into_iter().flatten().collect();

    info!(
        calls = responses.len(),
        failed = responses.iter().filter(|r| !r.is_success()).count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Batch finished"
    );

    println!("{}", serde_json::to_string_pretty(&responses)?);
    print_cache_stats(dispatcher.cache());
    Ok(true)
}
