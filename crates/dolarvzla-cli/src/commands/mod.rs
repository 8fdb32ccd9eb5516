mod ask;
mod convert;
mod rates;
mod sources;
mod watch;

use std::sync::Arc;

use dolarvzla_core::{HttpClient, MarketSnapshot, RateRouterBuilder, RatesConfig, ReqwestHttpClient};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    /// Payload to render; `None` when the command already printed its output.
    pub data: Option<Value>,
    /// Every official source failed for the snapshot this command used.
    pub snapshot_unavailable: bool,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data: Some(data),
            snapshot_unavailable: false,
        }
    }

    pub fn printed() -> Self {
        Self {
            data: None,
            snapshot_unavailable: false,
        }
    }

    pub fn for_snapshot(mut self, snapshot: &MarketSnapshot) -> Self {
        self.snapshot_unavailable = !snapshot.has_official_rates();
        self
    }
}

pub async fn run(cli: &Cli, config: RatesConfig) -> Result<CommandResult, CliError> {
    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let router = RateRouterBuilder::new(config.clone())
        .with_http_client(Arc::clone(&http_client))
        .build();

    match &cli.command {
        Command::Rates => rates::run(&router).await,
        Command::Convert(args) => convert::run(args, &router).await,
        Command::Ask(args) => ask::run(args, &router, &config, http_client).await,
        Command::Watch(args) => watch::run(args, router, &config, cli.format, cli.pretty).await,
        Command::Sources => sources::run(&router, &config),
    }
}
