use std::sync::Arc;

use serde::Serialize;

use dolarvzla_core::{Assistant, HttpClient, MarketSnapshot, RateRouter, RatesConfig};

use crate::cli::AskArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct AskResponseData {
    question: String,
    answer: String,
}

pub async fn run(
    args: &AskArgs,
    router: &RateRouter,
    config: &RatesConfig,
    http_client: Arc<dyn HttpClient>,
) -> Result<CommandResult, CliError> {
    let question = args.question.join(" ").trim().to_owned();
    if question.is_empty() {
        return Err(CliError::InvalidInput(String::from("question must not be empty")));
    }

    let assistant = Assistant::from_config(config, http_client);
    // Without a key the answer is fixed, so skip resolving rates.
    let snapshot = if assistant.is_configured() {
        router.resolve().await
    } else {
        MarketSnapshot::unavailable()
    };
    let answer = assistant.ask(&question, &snapshot).await;

    let data = serde_json::to_value(AskResponseData { question, answer })?;
    Ok(CommandResult::ok(data))
}
