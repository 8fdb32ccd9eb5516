use serde::Serialize;

use dolarvzla_core::{compare, convert, format_amount, Comparison, CurrencyKey, RateRouter};

use crate::cli::ConvertArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ConvertResponseData {
    amount: f64,
    from: CurrencyKey,
    to: CurrencyKey,
    /// `None` when either rate is unavailable.
    result: Option<f64>,
    formatted: Option<String>,
    comparison: Option<Comparison>,
    last_update_label: String,
}

pub async fn run(args: &ConvertArgs, router: &RateRouter) -> Result<CommandResult, CliError> {
    if !args.amount.is_finite() || args.amount < 0.0 {
        return Err(CliError::InvalidInput(format!(
            "amount must be a non-negative number, got {}",
            args.amount
        )));
    }
    let from = args.from.parse::<CurrencyKey>()?;
    let to = args.to.parse::<CurrencyKey>()?;

    let snapshot = router.resolve().await;
    let result = convert(&snapshot, args.amount, from, to);
    let data = serde_json::to_value(ConvertResponseData {
        amount: args.amount,
        from,
        to,
        result,
        formatted: result.map(format_amount),
        comparison: compare(&snapshot, from, to),
        last_update_label: snapshot.last_update_label.clone(),
    })?;

    Ok(CommandResult::ok(data).for_snapshot(&snapshot))
}
