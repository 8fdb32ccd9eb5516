use serde::{Deserialize, Serialize};

use crate::{UtcDateTime, ValidationError};

/// Price value meaning "could not be determined".
pub const UNAVAILABLE: f64 = 0.0;

/// Label shown when no official source produced a rate.
pub const SYNC_ERROR_LABEL: &str = "Error de sincronización";

/// Which of the three dashboard rates a `CurrencyRate` represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSlot {
    UsdOfficial,
    EurOfficial,
    UsdtMarket,
}

impl RateSlot {
    pub const ALL: [Self; 3] = [Self::UsdOfficial, Self::EurOfficial, Self::UsdtMarket];

    pub const fn label(self) -> &'static str {
        match self {
            Self::UsdOfficial => "Dólar BCV",
            Self::EurOfficial => "Euro BCV",
            Self::UsdtMarket => "USDT Binance",
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::UsdOfficial => "$",
            Self::EurOfficial => "€",
            Self::UsdtMarket => "₮",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::UsdOfficial => "fa-building-columns",
            Self::EurOfficial => "fa-euro-sign",
            Self::UsdtMarket => "fa-circle-dollar-to-slot",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::UsdOfficial => "blue",
            Self::EurOfficial => "indigo",
            Self::UsdtMarket => "emerald",
        }
    }

    /// Builds the rate card for this slot, validating the price.
    pub fn rate(self, price: f64) -> Result<CurrencyRate, ValidationError> {
        CurrencyRate::new(price, self.label(), self.symbol(), self.icon(), self.color())
    }

    pub fn unavailable(self) -> CurrencyRate {
        CurrencyRate {
            price: UNAVAILABLE,
            label: self.label().to_owned(),
            symbol: self.symbol().to_owned(),
            icon: self.icon().to_owned(),
            color: self.color().to_owned(),
        }
    }
}

/// One dashboard rate with its presentation hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub price: f64,
    pub label: String,
    pub symbol: String,
    pub icon: String,
    pub color: String,
}

impl CurrencyRate {
    pub fn new(
        price: f64,
        label: impl Into<String>,
        symbol: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if !price.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "price" });
        }
        if price < 0.0 {
            return Err(ValidationError::NegativeValue { field: "price" });
        }

        Ok(Self {
            price,
            label: label.into(),
            symbol: symbol.into(),
            icon: icon.into(),
            color: color.into(),
        })
    }

    pub fn is_available(&self) -> bool {
        self.price > UNAVAILABLE
    }
}

/// Source attribution shown next to the rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub title: String,
    pub uri: String,
}

impl Attribution {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }

    /// Fixed citation used when an official source provides none.
    pub fn bcv() -> Self {
        Self::new("BCV", "https://www.bcv.org.ve")
    }

    pub fn yadio() -> Self {
        Self::new("Yadio", "https://yadio.io")
    }
}

/// Fully-populated market view produced by one pipeline run.
///
/// A snapshot is never patched: every refresh builds a new one and the
/// consumer replaces the old value wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub usd_official: CurrencyRate,
    pub eur_official: CurrencyRate,
    pub usdt_market: CurrencyRate,
    pub last_update_label: String,
    pub attributions: Vec<Attribution>,
    pub fetched_at: UtcDateTime,
}

impl MarketSnapshot {
    pub fn new(
        usd: f64,
        eur: f64,
        usdt: f64,
        last_update_label: impl Into<String>,
        attributions: Vec<Attribution>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            usd_official: RateSlot::UsdOfficial.rate(usd)?,
            eur_official: RateSlot::EurOfficial.rate(eur)?,
            usdt_market: RateSlot::UsdtMarket.rate(usdt)?,
            last_update_label: last_update_label.into(),
            attributions,
            fetched_at: UtcDateTime::now(),
        })
    }

    /// Snapshot with every price set to the sentinel.
    pub fn unavailable() -> Self {
        Self {
            usd_official: RateSlot::UsdOfficial.unavailable(),
            eur_official: RateSlot::EurOfficial.unavailable(),
            usdt_market: RateSlot::UsdtMarket.unavailable(),
            last_update_label: SYNC_ERROR_LABEL.to_owned(),
            attributions: vec![Attribution::bcv()],
            fetched_at: UtcDateTime::now(),
        }
    }

    pub fn rate(&self, slot: RateSlot) -> &CurrencyRate {
        match slot {
            RateSlot::UsdOfficial => &self.usd_official,
            RateSlot::EurOfficial => &self.eur_official,
            RateSlot::UsdtMarket => &self.usdt_market,
        }
    }

    /// True when at least one official rate was resolved.
    pub fn has_official_rates(&self) -> bool {
        self.usd_official.is_available() || self.eur_official.is_available()
    }
}
