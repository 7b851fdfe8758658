use anyhow::Result;
use offline_translator_core::{Dispatcher, MethodCall, MethodResponse};
use serde_json::json;

use super::report_failure;

pub async fn cmd_translate(
    dispatcher: &Dispatcher,
    text: String,
    from: String,
    to: String,
) -> Result<bool> {
    let call = MethodCall::new(
        "translate",
        json!({ "text": text, "fromLanguage": from, "toLanguage": to }),
    );
    let response = dispatcher.handle(&call).await;

    if let MethodResponse::Success { result } = &response {
        println!("{}", result.as_str().unwrap_or_default());
    }
    Ok(report_failure(&response))
}
