use std::sync::Arc;

use crate::data_source::{MarketRateSource, RateSource, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::ProviderId;

use super::{get_json, number_at};

pub const YADIO_ENDPOINT: &str = "https://api.yadio.io/rate/USD/VES";

/// Expresses a quote as bolívares per one USD-equivalent.
///
/// Values below 1 are read as "USD per bolívar" and inverted. Non-positive
/// or non-finite values are rejected.
pub fn normalize_quote_direction(rate: f64) -> Option<f64> {
    if !rate.is_finite() || rate <= 0.0 {
        return None;
    }
    if rate < 1.0 {
        Some(1.0 / rate)
    } else {
        Some(rate)
    }
}

/// USDT market-rate source.
#[derive(Clone)]
pub struct YadioAdapter {
    http_client: Arc<dyn HttpClient>,
    endpoint: String,
    timeout_ms: u64,
}

impl YadioAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            endpoint: String::from(YADIO_ENDPOINT),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn fetch(&self) -> Result<f64, SourceError> {
        let request = HttpRequest::get(&self.endpoint)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);
        let body = get_json(self.http_client.as_ref(), request, ProviderId::Yadio).await?;

        let raw = number_at(&body, &["/rate"])
            .ok_or_else(|| SourceError::malformed("yadio response has no positive 'rate' field"))?;
        normalize_quote_direction(raw)
            .ok_or_else(|| SourceError::malformed(format!("yadio returned an unusable rate: {raw}")))
    }
}

impl RateSource for YadioAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yadio
    }
}

impl MarketRateSource for YadioAdapter {
    fn fetch_usdt<'a>(&'a self) -> SourceFuture<'a, f64> {
        Box::pin(self.fetch())
    }
}
