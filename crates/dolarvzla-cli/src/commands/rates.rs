use serde::Serialize;

use dolarvzla_core::{market_spread, MarketSnapshot, RateRouter, RouteReport};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
pub(super) struct RatesResponseData<'a> {
    pub snapshot: &'a MarketSnapshot,
    /// USDT premium over the official dollar, in percent.
    pub market_spread_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<RoutingMeta<'a>>,
}

/// How each stream was routed: attempted chain, failures and latency.
#[derive(Debug, Serialize)]
pub(super) struct RoutingMeta<'a> {
    pub official: &'a RouteReport,
    pub market: &'a RouteReport,
}

impl<'a> RatesResponseData<'a> {
    pub fn new(snapshot: &'a MarketSnapshot) -> Self {
        Self {
            snapshot,
            market_spread_percent: market_spread(snapshot),
            meta: None,
        }
    }

    pub fn with_meta(mut self, official: &'a RouteReport, market: &'a RouteReport) -> Self {
        self.meta = Some(RoutingMeta { official, market });
        self
    }
}

pub async fn run(router: &RateRouter) -> Result<CommandResult, CliError> {
    let resolution = router.resolve_with_report().await;
    let data = serde_json::to_value(
        RatesResponseData::new(&resolution.snapshot)
            .with_meta(&resolution.official, &resolution.market),
    )?;

    Ok(CommandResult::ok(data).for_snapshot(&resolution.snapshot))
}
