use serde_json::json;
use tracing::debug;

use crate::data_source::{
    OfficialRateSource, OfficialRates, RateSource, SourceError, SourceFuture,
};
use crate::extraction::extract_rates;
use crate::llm::{GeminiClient, Prompt};
use crate::ProviderId;

const RATE_LOOKUP_PROMPT: &str = "Busca en la web la tasa oficial publicada hoy por el Banco \
Central de Venezuela (BCV) para el dólar estadounidense y el euro, en bolívares por unidad. \
Responde únicamente con un objeto JSON de la forma {\"usd\": <número>, \"eur\": <número>}.";

/// Emergency official-rate source: a web-search grounded model call.
///
/// Only consulted after the HTTP sources fail and only when a credential is
/// configured.
#[derive(Clone)]
pub struct GeminiSearchAdapter {
    client: GeminiClient,
    structured_output: bool,
}

impl GeminiSearchAdapter {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            structured_output: false,
        }
    }

    /// Also request a schema-constrained JSON answer.
    pub fn with_structured_output(mut self, enabled: bool) -> Self {
        self.structured_output = enabled;
        self
    }

    fn prompt(&self) -> Prompt {
        let prompt = Prompt::new(RATE_LOOKUP_PROMPT).with_web_search();
        if self.structured_output {
            prompt.with_response_schema(json!({
                "type": "object",
                "properties": {
                    "usd": {"type": "number"},
                    "eur": {"type": "number"}
                },
                "required": ["usd", "eur"]
            }))
        } else {
            prompt
        }
    }

    async fn fetch(&self) -> Result<OfficialRates, SourceError> {
        let generation = self.client.generate(&self.prompt()).await?;
        let extracted = extract_rates(&generation.text)?;
        debug!(stage = ?extracted.stage, citations = generation.citations.len(), "extracted rates from model output");

        Ok(OfficialRates::new(extracted.usd, extracted.eur, ProviderId::Gemini)?
            .with_attributions(generation.citations))
    }
}

impl RateSource for GeminiSearchAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }
}

impl OfficialRateSource for GeminiSearchAdapter {
    fn fetch_official<'a>(&'a self) -> SourceFuture<'a, OfficialRates> {
        Box::pin(self.fetch())
    }
}
