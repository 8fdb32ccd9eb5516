use std::sync::Arc;

use crate::data_source::{
    OfficialRateSource, OfficialRates, RateSource, SourceError, SourceFuture,
};
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::ProviderId;

use super::{get_json, number_at};

pub const DOLARVZLA_ENDPOINT: &str = "https://api.dolarvzla.com/public/exchange-rate";

const USD_POINTERS: [&str; 3] = ["/usd", "/bcv/usd", "/dolar"];
const EUR_POINTERS: [&str; 3] = ["/eur", "/bcv/eur", "/euro"];

/// Primary official-rate source.
#[derive(Clone)]
pub struct DolarVzlaAdapter {
    http_client: Arc<dyn HttpClient>,
    endpoint: String,
    timeout_ms: u64,
}

impl DolarVzlaAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            endpoint: String::from(DOLARVZLA_ENDPOINT),
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

    async fn fetch(&self) -> Result<OfficialRates, SourceError> {
        let request = HttpRequest::get(&self.endpoint)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);
        let body = get_json(self.http_client.as_ref(), request, ProviderId::DolarVzla).await?;

        match (number_at(&body, &USD_POINTERS), number_at(&body, &EUR_POINTERS)) {
            (Some(usd), Some(eur)) => OfficialRates::new(usd, eur, ProviderId::DolarVzla),
            (usd, eur) => Err(SourceError::malformed(format!(
                "dolarvzla response is missing rates (usd present: {}, eur present: {})",
                usd.is_some(),
                eur.is_some()
            ))),
        }
    }
}

impl RateSource for DolarVzlaAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::DolarVzla
    }
}

impl OfficialRateSource for DolarVzlaAdapter {
    fn fetch_official<'a>(&'a self) -> SourceFuture<'a, OfficialRates> {
        Box::pin(self.fetch())
    }
}
