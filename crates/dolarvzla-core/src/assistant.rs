//! One-shot financial assistant.
//!
//! Every failure becomes a fixed user-facing message, so [`Assistant::ask`]
//! always returns text.

use std::sync::Arc;

use tracing::warn;

use crate::config::RatesConfig;
use crate::data_source::SourceErrorKind;
use crate::http_client::HttpClient;
use crate::llm::{GeminiClient, Prompt};
use crate::MarketSnapshot;

pub const ASSISTANT_NOT_CONFIGURED: &str =
    "⚠️ La IA no está lista. Configura tu API Key (DOLARVZLA_API_KEY) para usar el asistente.";
pub const ASSISTANT_FAILED: &str =
    "⚠️ Lo siento, no pude consultar al asistente en este momento. Intenta de nuevo más tarde.";
pub const ASSISTANT_EMPTY: &str = "No hay respuesta.";

#[derive(Clone)]
pub struct Assistant {
    client: GeminiClient,
}

impl Assistant {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &RatesConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self::new(
            GeminiClient::new(http_client, config.api_key.clone())
                .with_model(config.gemini_model.clone())
                .with_base_url(config.endpoints.gemini_base_url.clone())
                .with_timeout_ms(config.timeout_ms),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.client.has_credential()
    }

    pub async fn ask(&self, question: &str, snapshot: &MarketSnapshot) -> String {
        let prompt = Prompt::new(question).with_system(system_instruction(snapshot));

        match self.client.generate(&prompt).await {
            Ok(generation) if generation.text.trim().is_empty() => ASSISTANT_EMPTY.to_owned(),
            Ok(generation) => generation.text,
            Err(error) if error.kind() == SourceErrorKind::MissingCredential => {
                ASSISTANT_NOT_CONFIGURED.to_owned()
            }
            Err(error) => {
                warn!(code = error.code(), "assistant query failed: {}", error.message());
                ASSISTANT_FAILED.to_owned()
            }
        }
    }
}

fn system_instruction(snapshot: &MarketSnapshot) -> String {
    format!(
        "Eres un asistente financiero venezolano. Datos actuales: Dólar BCV: {}, Euro BCV: {}, \
         USDT: {}. Responde con amabilidad y precisión.",
        snapshot.usd_official.price, snapshot.eur_official.price, snapshot.usdt_market.price
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{block_on, ScriptedHttpClient};
    use serde_json::Value;

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot::new(36.8, 40.1, 55.5, "Fuente: DolarVzla", Vec::new())
            .expect("valid snapshot")
    }

    fn assistant(client: Arc<ScriptedHttpClient>, key: Option<&str>) -> Assistant {
        Assistant::new(GeminiClient::new(client, key.map(str::to_owned)))
    }

    #[test]
    fn missing_key_returns_fixed_message_without_network() {
        let client = Arc::new(ScriptedHttpClient::new());
        let assistant = assistant(client.clone(), None);

        let answer = block_on(assistant.ask("¿Cuánto está el dólar?", &snapshot()));

        assert!(!assistant.is_configured());
        assert_eq!(answer, ASSISTANT_NOT_CONFIGURED);
        assert_eq!(client.request_count(), 0);
    }

    #[test]
    fn answer_text_is_returned_and_prices_reach_the_system_instruction() {
        let client = Arc::new(ScriptedHttpClient::new().json(
            ":generateContent",
            r#"{"candidates": [{"content": {"parts": [{"text": "El dólar BCV está en 36,80 Bs."}]}}]}"#,
        ));

        let answer = block_on(assistant(client.clone(), Some("k")).ask("¿Dólar?", &snapshot()));
        assert_eq!(answer, "El dólar BCV está en 36,80 Bs.");

        let request = &client.recorded_requests()[0];
        let body: Value =
            serde_json::from_str(request.body.as_deref().expect("body")).expect("json body");
        let system = body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .expect("system instruction");
        assert!(system.contains("Dólar BCV: 36.8"));
        assert!(system.contains("Euro BCV: 40.1"));
        assert!(system.contains("USDT: 55.5"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "¿Dólar?");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn empty_answer_uses_placeholder() {
        let client = Arc::new(ScriptedHttpClient::new().json(
            ":generateContent",
            r#"{"candidates": [{"content": {"parts": []}}]}"#,
        ));

        let answer = block_on(assistant(client, Some("k")).ask("hola", &snapshot()));
        assert_eq!(answer, ASSISTANT_EMPTY);
    }

    #[test]
    fn upstream_failures_return_apology() {
        for client in [
            ScriptedHttpClient::new().status(":generateContent", 429),
            ScriptedHttpClient::new().transport_error(":generateContent"),
            ScriptedHttpClient::new().json(":generateContent", "not json"),
        ] {
            let answer = block_on(assistant(Arc::new(client), Some("k")).ask("hola", &snapshot()));
            assert_eq!(answer, ASSISTANT_FAILED);
        }
    }
}
