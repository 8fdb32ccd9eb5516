//! Gemini `generateContent` client.
//!
//! Requests go through the crate's [`HttpClient`] seam, so tests script the
//! transport exactly like they do for the rate adapters.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::data_source::SourceError;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::{Attribution, ProviderId};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";

const FALLBACK_CITATION_TITLE: &str = "Fuente BCV";
const FALLBACK_CITATION_URI: &str = "https://www.bcv.org.ve";

/// One prompt for the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub user: String,
    pub system: Option<String>,
    pub web_search: bool,
    /// Response schema; when set the model is asked for `application/json`.
    pub response_schema: Option<Value>,
}

impl Prompt {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            system: None,
            web_search: false,
            response_schema: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }

    pub fn with_response_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Model answer: concatenated text plus any grounding citations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Generation {
    pub text: String,
    pub citations: Vec<Attribution>,
}

/// Thin Gemini client holding an optional credential.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout_ms: u64,
}

impl GeminiClient {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: String::from(GEMINI_DEFAULT_MODEL),
            base_url: String::from(GEMINI_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Issues one completion call. A missing credential fails before any I/O.
    pub async fn generate(&self, prompt: &Prompt) -> Result<Generation, SourceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SourceError::missing_credential(ProviderId::Gemini));
        };

        let body = serde_json::to_string(&GenerateContentRequest::from_prompt(prompt))
            .map_err(|error| SourceError::malformed(format!("gemini request encoding failed: {error}")))?;
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url,
            urlencoding::encode(&self.model)
        );
        let request = HttpRequest::post(url)
            .with_auth(&HttpAuth::Header {
                name: String::from("x-goog-api-key"),
                value: api_key.to_owned(),
            })
            .with_json_body(body)
            .with_timeout_ms(self.timeout_ms);

        debug!(model = %self.model, web_search = prompt.web_search, "calling gemini");
        let response = self.http_client.execute(request).await.map_err(|error| {
            warn!("gemini request failed: {}", error.message());
            SourceError::transport(format!("gemini transport error: {}", error.message()))
        })?;

        if !response.is_success() {
            warn!(status = response.status, "gemini returned a non-success status");
            return Err(SourceError::status(ProviderId::Gemini, response.status));
        }

        let payload: GenerateContentResponse = serde_json::from_str(&response.body).map_err(|error| {
            warn!("gemini response parse failed: {error}");
            SourceError::malformed(format!("gemini returned invalid JSON: {error}"))
        })?;

        Ok(payload.into_generation())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &Prompt) -> Self {
        Self {
            contents: vec![Content::user(&prompt.user)],
            system_instruction: prompt.system.as_deref().map(Content::system),
            tools: if prompt.web_search {
                vec![Tool::default()]
            } else {
                Vec::new()
            },
            generation_config: prompt.response_schema.clone().map(|schema| GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<RequestPart>,
}

impl Content {
    fn user(text: &str) -> Self {
        Self {
            role: Some("user"),
            parts: vec![RequestPart {
                text: text.to_owned(),
            }],
        }
    }

    fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![RequestPart {
                text: text.to_owned(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Default, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Default, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uri: Option<String>,
}

impl GenerateContentResponse {
    fn into_generation(self) -> Generation {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Generation::default();
        };

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
            .trim()
            .to_owned();

        let citations = candidate
            .grounding_metadata
            .map(|metadata| {
                metadata
                    .grounding_chunks
                    .into_iter()
                    .map(|chunk| {
                        let web = chunk.web;
                        let title = web.as_ref().and_then(|web| web.title.clone());
                        let uri = web.and_then(|web| web.uri);
                        Attribution::new(
                            title.unwrap_or_else(|| FALLBACK_CITATION_TITLE.to_owned()),
                            uri.unwrap_or_else(|| FALLBACK_CITATION_URI.to_owned()),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        Generation { text, citations }
    }
}
