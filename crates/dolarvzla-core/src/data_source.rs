//! Rate source traits and the transient results they produce.
//!
//! Two adapter contracts exist, one per data stream:
//!
//! | Trait | Output | Implementations |
//! |-------|--------|-----------------|
//! | [`OfficialRateSource`] | [`OfficialRates`] | DolarVzla, DolarApi, Gemini search |
//! | [`MarketRateSource`] | `f64` (Bs per USDT) | Yadio |
//!
//! Adapters never panic past their boundary: every failure is returned as a
//! [`SourceError`] and the router reduces it to the sentinel.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{Attribution, ProviderId};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Network or transport failure before a response arrived.
    Transport,
    /// The upstream answered with a non-2xx status.
    Status,
    /// The body was not JSON or lacked the expected fields.
    MalformedResponse,
    /// The source needs a credential and none is configured.
    MissingCredential,
    /// The model answered but no rates could be extracted from its text.
    UnparsableOutput,
}

/// Structured source error used by router fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Transport, message)
    }

    pub fn status(provider: ProviderId, status: u16) -> Self {
        Self::new(
            SourceErrorKind::Status,
            format!("{provider} upstream returned status {status}"),
        )
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::MalformedResponse, message)
    }

    pub fn missing_credential(provider: ProviderId) -> Self {
        Self::new(
            SourceErrorKind::MissingCredential,
            format!("{provider} requires an API key and none is configured"),
        )
    }

    pub fn unparsable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::UnparsableOutput, message)
    }

    fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Transport => "source.transport",
            SourceErrorKind::Status => "source.status",
            SourceErrorKind::MalformedResponse => "source.malformed_response",
            SourceErrorKind::MissingCredential => "source.missing_credential",
            SourceErrorKind::UnparsableOutput => "source.unparsable_output",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Official USD/EUR rates returned by one adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct OfficialRates {
    pub usd: f64,
    pub eur: f64,
    pub origin: ProviderId,
    /// Citations supplied by the source itself (search grounding).
    pub attributions: Vec<Attribution>,
}

impl OfficialRates {
    /// Accepts the pair only when both values are finite and positive.
    pub fn new(usd: f64, eur: f64, origin: ProviderId) -> Result<Self, SourceError> {
        for (field, value) in [("usd", usd), ("eur", eur)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SourceError::malformed(format!(
                    "{origin} returned an implausible {field} rate: {value}"
                )));
            }
        }

        Ok(Self {
            usd,
            eur,
            origin,
            attributions: Vec::new(),
        })
    }

    pub fn with_attributions(mut self, attributions: Vec<Attribution>) -> Self {
        self.attributions = attributions;
        self
    }
}

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Identity shared by every rate adapter.
///
/// Implementations must be `Send + Sync` as the router shares them behind `Arc`.
pub trait RateSource: Send + Sync {
    /// Returns the unique provider identifier.
    fn id(&self) -> ProviderId;
}

/// Adapter that resolves the official BCV rates.
pub trait OfficialRateSource: RateSource {
    /// Performs the lookup. One call issues at most a small fixed number of requests.
    fn fetch_official<'a>(&'a self) -> SourceFuture<'a, OfficialRates>;
}

/// Adapter that resolves the USDT market rate in bolívares per unit.
pub trait MarketRateSource: RateSource {
    fn fetch_usdt<'a>(&'a self) -> SourceFuture<'a, f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn official_rates_reject_zero_and_non_finite_values() {
        let error = OfficialRates::new(0.0, 40.0, ProviderId::DolarApi).expect_err("zero usd");
        assert_eq!(error.kind(), SourceErrorKind::MalformedResponse);
        assert!(error.message().contains("usd"));

        let error =
            OfficialRates::new(36.0, f64::NAN, ProviderId::DolarApi).expect_err("nan eur");
        assert!(error.message().contains("eur"));
    }

    #[test]
    fn error_display_includes_code() {
        let error = SourceError::status(ProviderId::Yadio, 503);
        assert_eq!(
            error.to_string(),
            "yadio upstream returned status 503 (source.status)"
        );
    }
}
