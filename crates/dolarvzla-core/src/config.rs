//! Runtime configuration for the rate pipeline and the assistant.
//!
//! Values come from environment variables with a project-prefixed primary and
//! generic fallbacks:
//!
//! | Field | Env var(s) | Default |
//! |-------|-----------|---------|
//! | `api_key` | `DOLARVZLA_API_KEY`, `GEMINI_API_KEY`, `API_KEY` | none |
//! | `gemini_model` | `DOLARVZLA_GEMINI_MODEL` | `gemini-2.5-flash` |
//! | `endpoints.gemini_base_url` | `DOLARVZLA_GEMINI_URL` | Gemini v1beta |
//! | `structured_output` | `DOLARVZLA_STRUCTURED_OUTPUT` | `false` |
//! | `timeout_ms` | `DOLARVZLA_TIMEOUT_MS` | `8000` |
//! | `refresh_interval` | `DOLARVZLA_REFRESH_SECS` | `300` s |
//!
//! Blank values are treated as unset.

use std::env;
use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::adapters::{DOLARAPI_BASE_URL, DOLARVZLA_ENDPOINT, YADIO_ENDPOINT};
use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::llm::{GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL};
use crate::ConfigError;

pub const DEFAULT_REFRESH_SECS: u64 = 300;

const API_KEY_VARS: [&str; 3] = ["DOLARVZLA_API_KEY", "GEMINI_API_KEY", "API_KEY"];
const MODEL_VAR: &str = "DOLARVZLA_GEMINI_MODEL";
const GEMINI_URL_VAR: &str = "DOLARVZLA_GEMINI_URL";
const STRUCTURED_OUTPUT_VAR: &str = "DOLARVZLA_STRUCTURED_OUTPUT";
const TIMEOUT_VAR: &str = "DOLARVZLA_TIMEOUT_MS";
const REFRESH_VAR: &str = "DOLARVZLA_REFRESH_SECS";

/// Upstream URLs, overridable for mirrors and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub dolarvzla: String,
    pub dolarapi_base_url: String,
    pub yadio: String,
    pub gemini_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            dolarvzla: String::from(DOLARVZLA_ENDPOINT),
            dolarapi_base_url: String::from(DOLARAPI_BASE_URL),
            yadio: String::from(YADIO_ENDPOINT),
            gemini_base_url: String::from(GEMINI_BASE_URL),
        }
    }
}

/// Explicit configuration handed to the router and assistant builders.
#[derive(Clone, PartialEq, Eq)]
pub struct RatesConfig {
    pub api_key: Option<String>,
    pub gemini_model: String,
    pub structured_output: bool,
    pub timeout_ms: u64,
    pub refresh_interval: Duration,
    pub endpoints: Endpoints,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            gemini_model: String::from(GEMINI_DEFAULT_MODEL),
            structured_output: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            endpoints: Endpoints::default(),
        }
    }
}

impl Debug for RatesConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatesConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("structured_output", &self.structured_output)
            .field("timeout_ms", &self.timeout_ms)
            .field("refresh_interval", &self.refresh_interval)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl RatesConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self {
            api_key: API_KEY_VARS.iter().find_map(|name| read(name)),
            ..Self::default()
        };

        if let Some(model) = read(MODEL_VAR) {
            config.gemini_model = model;
        }
        if let Some(url) = read(GEMINI_URL_VAR) {
            config.endpoints.gemini_base_url = url;
        }
        if let Some(flag) = read(STRUCTURED_OUTPUT_VAR) {
            config.structured_output = parse_flag(STRUCTURED_OUTPUT_VAR, &flag)?;
        }
        if let Some(value) = read(TIMEOUT_VAR) {
            config.timeout_ms = parse_positive(TIMEOUT_VAR, &value)?;
        }
        if let Some(value) = read(REFRESH_VAR) {
            config.refresh_interval = Duration::from_secs(parse_positive(REFRESH_VAR, &value)?);
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = if api_key.trim().is_empty() {
            None
        } else {
            Some(api_key)
        };
        self
    }

    pub fn with_gemini_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = model.into();
        self
    }

    pub fn with_structured_output(mut self, enabled: bool) -> Self {
        self.structured_output = enabled;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_owned(),
        }),
    }
}

fn parse_positive(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    let parsed = value.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: value.to_owned(),
    })?;
    if parsed == 0 {
        return Err(ConfigError::ZeroValue { name });
    }
    Ok(parsed)
}
