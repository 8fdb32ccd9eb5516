use serde::Serialize;

use dolarvzla_core::{ProviderId, RateRouter, RatesConfig};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SourcesResponseData {
    official: Vec<SourceEntry>,
    market: Option<SourceEntry>,
    ai_fallback_enabled: bool,
    gemini_model: String,
    timeout_ms: u64,
}

#[derive(Debug, Serialize)]
struct SourceEntry {
    id: ProviderId,
    origin: &'static str,
}

impl From<ProviderId> for SourceEntry {
    fn from(id: ProviderId) -> Self {
        Self {
            id,
            origin: id.origin_label(),
        }
    }
}

pub fn run(router: &RateRouter, config: &RatesConfig) -> Result<CommandResult, CliError> {
    let chain = router.source_chain();
    let data = serde_json::to_value(SourcesResponseData {
        ai_fallback_enabled: chain.official.contains(&ProviderId::Gemini),
        official: chain.official.into_iter().map(SourceEntry::from).collect(),
        market: chain.market.map(SourceEntry::from),
        gemini_model: config.gemini_model.clone(),
        timeout_ms: config.timeout_ms,
    })?;

    Ok(CommandResult::ok(data))
}
