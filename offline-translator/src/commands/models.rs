//! Language list and model management commands.

use anyhow::Result;
use offline_translator_core::{Dispatcher, MethodCall, MethodResponse};
use serde_json::{json, Value};

use crate::formatting::{print_key_value, print_success};

use super::report_failure;

async fn call_with_language(
    dispatcher: &Dispatcher,
    method: &str,
    language: &str,
) -> MethodResponse {
    let call = MethodCall::new(method, json!({ "language": language }));
    dispatcher.handle(&call).await
}

pub async fn cmd_languages(dispatcher: &Dispatcher) -> Result<bool> {
    let response = dispatcher
        .handle(&MethodCall::bare("getAvailableLanguages"))
        .await;

    if let MethodResponse::Success {
        result: Value::Array(languages),
    } = &response
    {
        for language in languages.iter().filter_map(Value::as_str) {
            println!("{}", language);
        }
    }
    Ok(report_failure(&response))
}

pub async fn cmd_download(dispatcher: &Dispatcher, language: String) -> Result<bool> {
    let response = call_with_language(dispatcher, "downloadLanguageModel", &language).await;
    let ok = report_failure(&response);
    if ok {
        print_success(&format!("Model for '{}' downloaded", language));
    }
    Ok(ok)
}

pub async fn cmd_status(dispatcher: &Dispatcher, language: String) -> Result<bool> {
    let response = call_with_language(dispatcher, "isLanguageDownloaded", &language).await;

    if let MethodResponse::Success { result } = &response {
        let state = if result.as_bool().unwrap_or(false) {
            "downloaded"
        } else {
            "not downloaded"
        };
        print_key_value(&format!("{}:", language), state);
    }
    Ok(report_failure(&response))
}

pub async fn cmd_delete(dispatcher: &Dispatcher, language: String) -> Result<bool> {
    let response = call_with_language(dispatcher, "deleteLanguageModel", &language).await;
    let ok = report_failure(&response);
    if ok {
        print_success(&format!("Model for '{}' deleted", language));
    }
    Ok(ok)
}
