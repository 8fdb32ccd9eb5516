use std::sync::Arc;

use crate::data_source::{
    OfficialRateSource, OfficialRates, RateSource, SourceError, SourceFuture,
};
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::ProviderId;

use super::{get_json, number_at};

pub const DOLARAPI_BASE_URL: &str = "https://ve.dolarapi.com/v1";

/// Secondary official-rate source.
///
/// The dollar and euro legs are separate endpoints on the same provider, so
/// they are issued together and the adapter fails if either leg fails.
#[derive(Clone)]
pub struct DolarApiAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl DolarApiAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DOLARAPI_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn fetch(&self) -> Result<OfficialRates, SourceError> {
        let (usd, eur) = tokio::join!(
            self.fetch_average("dolares/oficial"),
            self.fetch_average("euros/oficial")
        );
        OfficialRates::new(usd?, eur?, ProviderId::DolarApi)
    }

    async fn fetch_average(&self, path: &str) -> Result<f64, SourceError> {
        let request = HttpRequest::get(format!("{}/{path}", self.base_url))
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);
        let body = get_json(self.http_client.as_ref(), request, ProviderId::DolarApi).await?;

        number_at(&body, &["/promedio"]).ok_or_else(|| {
            SourceError::malformed(format!("dolarapi {path} response has no 'promedio' field"))
        })
    }
}

impl RateSource for DolarApiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::DolarApi
    }
}

impl OfficialRateSource for DolarApiAdapter {
    fn fetch_official<'a>(&'a self) -> SourceFuture<'a, OfficialRates> {
        Box::pin(self.fetch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::test_support::{block_on, ScriptedHttpClient};

    #[test]
    fn combines_dollar_and_euro_legs() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .json("/dolares/oficial", r#"{"fuente": "oficial", "promedio": 36.71}"#)
                .json("/euros/oficial", r#"{"fuente": "oficial", "promedio": 39.88}"#),
        );
        let adapter = DolarApiAdapter::new(client.clone());

        let rates = block_on(adapter.fetch_official()).expect("rates should resolve");
        assert_eq!((rates.usd, rates.eur), (36.71, 39.88));
        assert_eq!(rates.origin, ProviderId::DolarApi);

        let mut urls = client
            .recorded_requests()
            .into_iter()
            .map(|request| request.url)
            .collect::<Vec<_>>();
        urls.sort();
        assert_eq!(
            urls,
            vec![
                "https://ve.dolarapi.com/v1/dolares/oficial",
                "https://ve.dolarapi.com/v1/euros/oficial",
            ]
        );
    }

    #[test]
    fn one_failed_leg_fails_the_adapter() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .json("/dolares/oficial", r#"{"promedio": 36.71}"#)
                .status("/euros/oficial", 500),
        );
        let adapter = DolarApiAdapter::new(client);

        let error = block_on(adapter.fetch_official()).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Status);
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .json("mirror.test/v1/dolares", r#"{"promedio": 36.0}"#)
                .json("mirror.test/v1/euros", r#"{"promedio": 39.0}"#),
        );
        let adapter = DolarApiAdapter::new(client).with_base_url("https://mirror.test/v1/");

        let rates = block_on(adapter.fetch_official()).expect("rates should resolve");
        assert_eq!(rates.usd, 36.0);
    }
}
