//! Rate source adapters.
//!
//! Each adapter performs one lookup against one provider and maps the answer
//! into [`OfficialRates`](crate::OfficialRates) or a USDT price. Field
//! extraction tolerates several response shapes by trying JSON pointers in a
//! fixed preference order.

mod dolarapi;
mod dolarvzla;
mod gemini;
mod yadio;

pub use dolarapi::{DolarApiAdapter, DOLARAPI_BASE_URL};
pub use dolarvzla::{DolarVzlaAdapter, DOLARVZLA_ENDPOINT};
pub use gemini::GeminiSearchAdapter;
pub use yadio::{normalize_quote_direction, YadioAdapter, YADIO_ENDPOINT};

use serde_json::Value;
use tracing::debug;

use crate::data_source::SourceError;
use crate::http_client::{HttpClient, HttpRequest};
use crate::ProviderId;

/// Executes `request` and decodes a successful body as JSON.
pub(crate) async fn get_json(
    http_client: &dyn HttpClient,
    request: HttpRequest,
    provider: ProviderId,
) -> Result<Value, SourceError> {
    debug!(provider = provider.as_str(), url = %request.url, "requesting rates");

    let response = http_client.execute(request).await.map_err(|error| {
        SourceError::transport(format!("{provider} transport error: {}", error.message()))
    })?;

    if !response.is_success() {
        return Err(SourceError::status(provider, response.status));
    }

    serde_json::from_str(&response.body)
        .map_err(|error| SourceError::malformed(format!("{provider} returned invalid JSON: {error}")))
}

/// Returns the first positive number found at `pointers`, in order.
///
/// Values may be JSON numbers or numeric strings.
pub(crate) fn number_at(value: &Value, pointers: &[&str]) -> Option<f64> {
    pointers
        .iter()
        .filter_map(|pointer| value.pointer(pointer))
        .filter_map(as_decimal)
        .find(|number| number.is_finite() && *number > 0.0)
}

fn as_decimal(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_decimal(text),
        _ => None,
    }
}

/// Parses `36.85`, `36,85`, `1.234,56` and `1,234.56` style decimals.
///
/// When both separators appear, the last one marks the decimals.
pub(crate) fn parse_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let normalized = match (trimmed.rfind(','), trimmed.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => trimmed.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => trimmed.replace(',', ""),
        _ => trimmed.replace(',', "."),
    };
    normalized.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_at_respects_pointer_preference_order() {
        let body = json!({ "bcv": { "usd": 36.5 }, "dolar": "37,1" });
        assert_eq!(number_at(&body, &["/usd", "/bcv/usd", "/dolar"]), Some(36.5));
        assert_eq!(number_at(&body, &["/usd", "/dolar"]), Some(37.1));
        assert_eq!(number_at(&body, &["/eur", "/euro"]), None);
    }

    #[test]
    fn number_at_skips_zero_and_non_numeric_values() {
        let body = json!({ "usd": 0, "bcv": { "usd": "n/a" }, "dolar": 38.2 });
        assert_eq!(number_at(&body, &["/usd", "/bcv/usd", "/dolar"]), Some(38.2));
    }

    #[test]
    fn parse_decimal_handles_local_separators() {
        assert_eq!(parse_decimal("36.85"), Some(36.85));
        assert_eq!(parse_decimal(" 36,85 "), Some(36.85));
        assert_eq!(parse_decimal("1.234,56"), Some(1234.56));
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn parse_decimal_takes_the_last_separator_as_decimal_mark() {
        assert_eq!(parse_decimal("1,234.56"), Some(1234.56));
        assert_eq!(parse_decimal("1.234,56"), Some(1234.56));
        assert_eq!(parse_decimal("1,234,567.5"), Some(1234567.5));
        assert_eq!(parse_decimal("1.234.567,5"), Some(1234567.5));
    }
}
