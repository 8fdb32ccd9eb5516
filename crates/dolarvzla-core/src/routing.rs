//! Rate resolution pipeline.
//!
//! Official rates come from an ordered chain (DolarVzla, DolarApi, then the
//! search-grounded model when a key is configured) and the first success
//! wins. The USDT rate is resolved independently. Both outcomes are composed
//! into a [`MarketSnapshot`] that always has every field populated.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adapters::{DolarApiAdapter, DolarVzlaAdapter, GeminiSearchAdapter, YadioAdapter};
use crate::config::RatesConfig;
use crate::data_source::{
    MarketRateSource, OfficialRateSource, OfficialRates, RateSource, SourceError, SourceFuture,
};
use crate::domain::{SYNC_ERROR_LABEL, UNAVAILABLE};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::llm::GeminiClient;
use crate::{Attribution, MarketSnapshot, ProviderId, ValidationError};

/// One failed attempt inside a route.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFailure {
    pub source: ProviderId,
    pub error: SourceError,
}

/// Successful routed call.
#[derive(Debug, Clone)]
pub struct RouteSuccess<T> {
    pub data: T,
    pub selected_source: ProviderId,
    pub source_chain: Vec<ProviderId>,
    pub warnings: Vec<String>,
    pub errors: Vec<SourceFailure>,
    pub latency_ms: u64,
}

/// Failed routed call after exhausting candidates.
#[derive(Debug, Clone)]
pub struct RouteFailure {
    pub source_chain: Vec<ProviderId>,
    pub warnings: Vec<String>,
    pub errors: Vec<SourceFailure>,
    pub latency_ms: u64,
}

pub type RouteResult<T> = Result<RouteSuccess<T>, RouteFailure>;

/// Serializable summary of one routed call, without its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteReport {
    pub selected_source: Option<ProviderId>,
    pub source_chain: Vec<ProviderId>,
    pub warnings: Vec<String>,
    pub errors: Vec<FailureReport>,
    pub latency_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub source: ProviderId,
    pub code: &'static str,
    pub message: String,
}

impl From<&SourceFailure> for FailureReport {
    fn from(failure: &SourceFailure) -> Self {
        Self {
            source: failure.source,
            code: failure.error.code(),
            message: failure.error.message().to_owned(),
        }
    }
}

impl RouteReport {
    pub fn of<T>(result: &RouteResult<T>) -> Self {
        match result {
            Ok(success) => Self {
                selected_source: Some(success.selected_source),
                source_chain: success.source_chain.clone(),
                warnings: success.warnings.clone(),
                errors: success.errors.iter().map(FailureReport::from).collect(),
                latency_ms: success.latency_ms,
            },
            Err(failure) => Self {
                selected_source: None,
                source_chain: failure.source_chain.clone(),
                warnings: failure.warnings.clone(),
                errors: failure.errors.iter().map(FailureReport::from).collect(),
                latency_ms: failure.latency_ms,
            },
        }
    }
}

/// A snapshot together with how each stream was routed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub snapshot: MarketSnapshot,
    pub official: RouteReport,
    pub market: RouteReport,
}

/// Tries `sources` in order and returns the first success.
///
/// Later sources are never invoked once one succeeds. An empty slice is a
/// failure with an empty chain.
pub async fn first_success<'a, S, T, F>(sources: &'a [Arc<S>], mut invoke: F) -> RouteResult<T>
where
    S: RateSource + ?Sized,
    F: FnMut(&'a S) -> SourceFuture<'a, T>,
{
    let started = Instant::now();
    let mut source_chain = Vec::with_capacity(sources.len());
    let mut errors = Vec::new();

    for source in sources {
        let provider = source.id();
        source_chain.push(provider);
        debug!(source = %provider, "attempting source");

        match invoke(source.as_ref()).await {
            Ok(data) => {
                let mut warnings = Vec::new();
                if !errors.is_empty() {
                    info!(source = %provider, failed = errors.len(), "fallback source succeeded");
                    warnings.push(format!(
                        "source fallback succeeded with '{}' after {} failed attempt(s)",
                        provider.as_str(),
                        errors.len()
                    ));
                }

                return Ok(RouteSuccess {
                    data,
                    selected_source: provider,
                    source_chain,
                    warnings,
                    errors,
                    latency_ms: elapsed_ms(started),
                });
            }
            Err(error) => {
                warn!(source = %provider, code = error.code(), "source failed: {}", error.message());
                errors.push(SourceFailure {
                    source: provider,
                    error,
                });
            }
        }
    }

    Err(RouteFailure {
        source_chain,
        warnings: vec![String::from("all sources failed")],
        errors,
        latency_ms: elapsed_ms(started),
    })
}

/// Configured provider order, as reported by the `sources` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceChain {
    pub official: Vec<ProviderId>,
    pub market: Option<ProviderId>,
}

/// Ordered adapter registry for both data streams.
pub struct RateRouter {
    official: Vec<Arc<dyn OfficialRateSource>>,
    market: Option<Arc<dyn MarketRateSource>>,
}

impl RateRouter {
    pub fn new(
        official: Vec<Arc<dyn OfficialRateSource>>,
        market: Option<Arc<dyn MarketRateSource>>,
    ) -> Self {
        Self { official, market }
    }

    pub fn source_chain(&self) -> SourceChain {
        SourceChain {
            official: self.official.iter().map(|source| source.id()).collect(),
            market: self.market.as_ref().map(|source| source.id()),
        }
    }

    pub async fn route_official(&self) -> RouteResult<OfficialRates> {
        first_success(self.official.as_slice(), |source| source.fetch_official()).await
    }

    pub async fn route_usdt(&self) -> RouteResult<f64> {
        match &self.market {
            Some(market) => {
                first_success(std::slice::from_ref(market), |source| source.fetch_usdt()).await
            }
            None => Err(RouteFailure {
                source_chain: Vec::new(),
                warnings: vec![String::from("no market source configured")],
                errors: Vec::new(),
                latency_ms: 0,
            }),
        }
    }

    /// Runs one full resolution. Never fails: unresolved values fall back to
    /// the sentinel.
    pub async fn resolve(&self) -> MarketSnapshot {
        self.resolve_with_report().await.snapshot
    }

    /// Same as [`resolve`](Self::resolve), keeping the routing metadata.
    pub async fn resolve_with_report(&self) -> Resolution {
        let official = self.route_official().await;
        let usdt = self.route_usdt().await;
        let (official_report, market_report) = (RouteReport::of(&official), RouteReport::of(&usdt));

        let snapshot = compose_snapshot(
            official.ok().map(|success| success.data),
            usdt.ok().map(|success| success.data),
        )
        .unwrap_or_else(|error| {
            warn!("snapshot composition rejected: {error}");
            MarketSnapshot::unavailable()
        });

        Resolution {
            snapshot,
            official: official_report,
            market: market_report,
        }
    }
}

/// Builds the snapshot from whatever each stream resolved.
pub fn compose_snapshot(
    official: Option<OfficialRates>,
    usdt: Option<f64>,
) -> Result<MarketSnapshot, ValidationError> {
    let mut attributions = Vec::new();
    let (usd, eur, label) = match official {
        Some(rates) => {
            if rates.attributions.is_empty() {
                attributions.push(Attribution::bcv());
            } else {
                attributions.extend(rates.attributions);
            }
            (
                rates.usd,
                rates.eur,
                format!("Fuente: {}", rates.origin.origin_label()),
            )
        }
        None => {
            attributions.push(Attribution::bcv());
            (UNAVAILABLE, UNAVAILABLE, SYNC_ERROR_LABEL.to_owned())
        }
    };
    if usdt.is_some() {
        attributions.push(Attribution::yadio());
    }

    MarketSnapshot::new(usd, eur, usdt.unwrap_or(UNAVAILABLE), label, attributions)
}

/// Builder wiring production adapters from a [`RatesConfig`].
///
/// The model fallback is registered only when the config carries a key.
///
/// ```rust,ignore
/// use dolarvzla_core::{RateRouterBuilder, RatesConfig};
///
/// let router = RateRouterBuilder::new(RatesConfig::from_env()?).build();
/// let snapshot = router.resolve().await;
/// ```
pub struct RateRouterBuilder {
    config: RatesConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    enable_ai_fallback: bool,
}

impl RateRouterBuilder {
    pub fn new(config: RatesConfig) -> Self {
        Self {
            config,
            http_client: None,
            enable_ai_fallback: true,
        }
    }

    /// Replaces the default reqwest transport.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_ai_fallback_enabled(mut self, enabled: bool) -> Self {
        self.enable_ai_fallback = enabled;
        self
    }

    pub fn build(self) -> RateRouter {
        let http_client = self
            .http_client
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()) as Arc<dyn HttpClient>);
        let config = self.config;
        let endpoints = &config.endpoints;

        let mut official: Vec<Arc<dyn OfficialRateSource>> = vec![
            Arc::new(
                DolarVzlaAdapter::new(http_client.clone())
                    .with_endpoint(endpoints.dolarvzla.clone())
                    .with_timeout_ms(config.timeout_ms),
            ),
            Arc::new(
                DolarApiAdapter::new(http_client.clone())
                    .with_base_url(endpoints.dolarapi_base_url.clone())
                    .with_timeout_ms(config.timeout_ms),
            ),
        ];

        if self.enable_ai_fallback && config.has_credential() {
            let client = GeminiClient::new(http_client.clone(), config.api_key.clone())
                .with_model(config.gemini_model.clone())
                .with_base_url(endpoints.gemini_base_url.clone())
                .with_timeout_ms(config.timeout_ms);
            official.push(Arc::new(
                GeminiSearchAdapter::new(client).with_structured_output(config.structured_output),
            ));
        }

        let market: Arc<dyn MarketRateSource> = Arc::new(
            YadioAdapter::new(http_client)
                .with_endpoint(endpoints.yadio.clone())
                .with_timeout_ms(config.timeout_ms),
        );

        RateRouter::new(official, Some(market))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}
