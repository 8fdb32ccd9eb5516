//! Currency conversion and gap analysis over a [`MarketSnapshot`].
//!
//! Every rate is expressed in bolívares, so a conversion goes through VES:
//! `amount * rate(from) / rate(to)`. Any computation that would divide by or
//! multiply with the unavailable sentinel yields `None`.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{MarketSnapshot, ValidationError, UNAVAILABLE};

/// Gap magnitude (in percent) below which a comparison is neutral.
const TREND_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurrencyKey {
    Ves,
    UsdBcv,
    EurBcv,
    Usdt,
}

impl CurrencyKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ves => "VES",
            Self::UsdBcv => "USD_BCV",
            Self::EurBcv => "EUR_BCV",
            Self::Usdt => "USDT",
        }
    }

    /// Currency code without the rate qualifier (`USD_BCV` is `USD`).
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ves => "VES",
            Self::UsdBcv => "USD",
            Self::EurBcv => "EUR",
            Self::Usdt => "USDT",
        }
    }

    /// Bolívares per unit, or `None` when the snapshot has no value for it.
    pub fn rate_in(self, snapshot: &MarketSnapshot) -> Option<f64> {
        let rate = match self {
            Self::Ves => return Some(1.0),
            Self::UsdBcv => snapshot.usd_official.price,
            Self::EurBcv => snapshot.eur_official.price,
            Self::Usdt => snapshot.usdt_market.price,
        };
        (rate > UNAVAILABLE).then_some(rate)
    }
}

impl Display for CurrencyKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyKey {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "ves" | "bs" => Ok(Self::Ves),
            "usd" | "usd_bcv" => Ok(Self::UsdBcv),
            "eur" | "eur_bcv" => Ok(Self::EurBcv),
            "usdt" => Ok(Self::Usdt),
            _ => Err(ValidationError::InvalidCurrency {
                value: value.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    fn from_diff(diff_percent: f64) -> Self {
        if diff_percent > TREND_THRESHOLD {
            Self::Up
        } else if diff_percent < -TREND_THRESHOLD {
            Self::Down
        } else {
            Self::Neutral
        }
    }
}

/// Percentage gap shown next to a conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub label: String,
    pub diff_percent: f64,
    pub trend: Trend,
}

impl Comparison {
    fn between(label: impl Into<String>, value: f64, reference: f64) -> Self {
        let diff_percent = (value - reference) / reference * 100.0;
        Self {
            label: label.into(),
            diff_percent,
            trend: Trend::from_diff(diff_percent),
        }
    }
}

pub fn convert(
    snapshot: &MarketSnapshot,
    amount: f64,
    from: CurrencyKey,
    to: CurrencyKey,
) -> Option<f64> {
    if !amount.is_finite() {
        return None;
    }
    Some(amount * from.rate_in(snapshot)? / to.rate_in(snapshot)?)
}

/// Gap for the `from -> to` pair.
///
/// Two foreign currencies compare directly. When one side is VES the gap
/// depends on the foreign side: the official dollar against USDT, USDT
/// against the official dollar, or the euro against the official dollar.
/// Identical keys have no comparison.
pub fn compare(snapshot: &MarketSnapshot, from: CurrencyKey, to: CurrencyKey) -> Option<Comparison> {
    if from == to {
        return None;
    }

    let usd = CurrencyKey::UsdBcv.rate_in(snapshot);
    let usdt = CurrencyKey::Usdt.rate_in(snapshot);
    let eur = CurrencyKey::EurBcv.rate_in(snapshot);

    let foreign = match (from, to) {
        (CurrencyKey::Ves, other) | (other, CurrencyKey::Ves) => other,
        _ => {
            return Some(Comparison::between(
                format!("vs {}", to.code()),
                from.rate_in(snapshot)?,
                to.rate_in(snapshot)?,
            ));
        }
    };

    match foreign {
        CurrencyKey::UsdBcv => Some(Comparison::between("Brecha vs USDT", usd?, usdt?)),
        CurrencyKey::Usdt => Some(Comparison::between("Brecha vs BCV", usdt?, usd?)),
        CurrencyKey::EurBcv => Some(Comparison::between("vs Dólar BCV", eur?, usd?)),
        CurrencyKey::Ves => None,
    }
}

/// USDT premium over the official dollar, in percent.
pub fn market_spread(snapshot: &MarketSnapshot) -> Option<f64> {
    let usd = CurrencyKey::UsdBcv.rate_in(snapshot)?;
    let usdt = CurrencyKey::Usdt.rate_in(snapshot)?;
    Some((usdt - usd) / usd * 100.0)
}

/// Formats an amount the way Venezuelan locales do: `.` groups thousands and
/// `,` separates decimals. Small values keep four decimals.
pub fn format_amount(value: f64) -> String {
    if value == 0.0 {
        return String::from("0,00");
    }
    if !value.is_finite() {
        return String::from("--");
    }

    let decimals = if value.abs() < 0.1 { 4 } else { 2 };
    let fixed = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped},{fraction}")
}
