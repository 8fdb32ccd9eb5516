//! # Domain Models
//!
//! Canonical types for the DolarVZLA market view.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CurrencyRate`] | One rate card: price plus presentation hints |
//! | [`MarketSnapshot`] | The three rates, update label and attributions |
//! | [`Attribution`] | Source title and URI |
//! | [`RateSlot`] | Which dashboard rate a card represents |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! A price of `0` is the "unavailable" sentinel. Constructors reject
//! negative and non-finite prices, so every `CurrencyRate` holds either a
//! plausible rate or the sentinel.

mod rates;
mod timestamp;

pub use rates::{
    Attribution, CurrencyRate, MarketSnapshot, RateSlot, SYNC_ERROR_LABEL, UNAVAILABLE,
};
pub use timestamp::UtcDateTime;
