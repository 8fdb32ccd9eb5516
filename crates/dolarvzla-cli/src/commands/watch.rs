use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use dolarvzla_core::{RateRouter, RatesConfig, RefreshHandle};

use crate::cli::{OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::rates::RatesResponseData;
use super::CommandResult;

pub async fn run(
    args: &WatchArgs,
    router: RateRouter,
    config: &RatesConfig,
    format: OutputFormat,
    pretty: bool,
) -> Result<CommandResult, CliError> {
    let config = match args.interval_secs {
        Some(0) => {
            return Err(CliError::InvalidInput(String::from(
                "--interval-secs must be greater than zero",
            )))
        }
        Some(secs) => config.clone().with_refresh_interval(Duration::from_secs(secs)),
        None => config.clone(),
    };
    let interval = config.refresh_interval;
    if args.count == Some(0) {
        return Err(CliError::InvalidInput(String::from("--count must be greater than zero")));
    }

    let handle = RefreshHandle::new(Arc::new(router));
    let mut receiver = handle.subscribe();
    let periodic = handle.spawn_periodic(interval);
    info!(interval_secs = interval.as_secs(), "watching rates");

    let mut printed = 0usize;
    let outcome = loop {
        if let Err(error) = receiver.changed().await {
            break Err(CliError::Refresh(error.to_string()));
        }
        let Some(snapshot) = receiver.borrow_and_update().clone() else {
            continue;
        };

        let rendered = serde_json::to_value(RatesResponseData::new(&snapshot))
            .map_err(CliError::from)
            .and_then(|data| output::render(&data, format, pretty));
        if let Err(error) = rendered {
            break Err(error);
        }
        if format == OutputFormat::Table {
            println!();
        }

        printed += 1;
        if args.count.is_some_and(|count| printed >= count) {
            // The exit status reflects the last snapshot printed.
            break Ok(CommandResult::printed().for_snapshot(&snapshot));
        }
    };

    periodic.abort();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;

    use dolarvzla_core::{HttpClient, HttpError, HttpRequest, HttpResponse, RateRouterBuilder};

    struct Offline;

    impl HttpClient for Offline {
        fn execute<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            Box::pin(async { Err(HttpError::new("offline")) })
        }
    }

    fn offline_router(config: &RatesConfig) -> RateRouter {
        RateRouterBuilder::new(config.clone())
            .with_http_client(Arc::new(Offline))
            .build()
    }

    #[tokio::test]
    async fn outage_during_watch_is_reported_in_the_result() {
        let config = RatesConfig::default();
        let args = WatchArgs {
            interval_secs: Some(60),
            count: Some(1),
        };

        let result = run(&args, offline_router(&config), &config, OutputFormat::Json, false)
            .await
            .expect("watch completes");

        assert!(result.data.is_none());
        assert!(result.snapshot_unavailable);
    }

    #[tokio::test]
    async fn zero_interval_is_rejected() {
        let config = RatesConfig::default();
        let args = WatchArgs {
            interval_secs: Some(0),
            count: Some(1),
        };

        let error = run(&args, offline_router(&config), &config, OutputFormat::Json, false)
            .await
            .err()
            .expect("zero interval rejected");
        assert!(matches!(error, CliError::InvalidInput(_)));
    }
}
