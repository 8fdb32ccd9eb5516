//! # DolarVZLA Core
//!
//! Exchange-rate resolution for the Venezuelan bolívar.
//!
//! ## Overview
//!
//! This crate resolves a [`MarketSnapshot`] holding three rates: the official
//! BCV dollar and euro, plus the USDT market rate. It provides:
//!
//! - **Rate adapters** for DolarVzla, DolarApi and Yadio over HTTP
//! - **Model fallback** that asks a search-grounded Gemini call for the
//!   official rates when every HTTP source fails
//! - **Routing** with an ordered first-success chain and sentinel composition
//! - **Assistant** answering one question with the current prices as context
//! - **Converter** for amounts and gaps between the four currency keys
//! - **Refresh loop** publishing snapshots through a watch channel
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (DolarVzla, DolarApi, Gemini search, Yadio) |
//! | [`assistant`] | One-shot assistant query |
//! | [`config`] | `RatesConfig` and its environment loader |
//! | [`convert`] | Conversion, gap comparison and amount formatting |
//! | [`data_source`] | Source traits and `SourceError` |
//! | [`domain`] | Snapshot, rate and attribution types |
//! | [`error`] | Core error types |
//! | [`extraction`] | Rate extraction from free-form model text |
//! | [`http_client`] | HTTP client abstraction |
//! | [`llm`] | Gemini `generateContent` client |
//! | [`refresh`] | Periodic and manual refresh |
//! | [`routing`] | Source routing and snapshot composition |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dolarvzla_core::{RateRouterBuilder, RatesConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = RateRouterBuilder::new(RatesConfig::from_env()?).build();
//!     let snapshot = router.resolve().await;
//!
//!     println!("{}: {:.2} Bs", snapshot.usd_official.label, snapshot.usd_official.price);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Refresh  │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Rate Router   │────▶│ Snapshot compose │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Rate Sources    │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ (reqwest)        │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Source failures never reach the caller of [`RateRouter::resolve`]: they
//! are logged and replaced with the `0` sentinel. Adapters report them as
//! [`SourceError`] values:
//!
//! ```rust
//! use dolarvzla_core::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::MissingCredential => "configure an API key",
//!         SourceErrorKind::Transport | SourceErrorKind::Status => "upstream unreachable",
//!         _ => "unexpected upstream answer",
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - The API key is read from the environment only and never logged
//! - All HTTP requests use TLS via reqwest

pub mod adapters;
pub mod assistant;
pub mod config;
pub mod convert;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod http_client;
pub mod llm;
pub mod refresh;
pub mod routing;
pub mod source;

#[cfg(test)]
mod test_support;

// Adapter implementations
pub use adapters::{
    normalize_quote_direction, DolarApiAdapter, DolarVzlaAdapter, GeminiSearchAdapter,
    YadioAdapter,
};

// Assistant
pub use assistant::{Assistant, ASSISTANT_EMPTY, ASSISTANT_FAILED, ASSISTANT_NOT_CONFIGURED};

// Configuration
pub use config::{Endpoints, RatesConfig};

// Converter
pub use convert::{compare, convert, format_amount, market_spread, Comparison, CurrencyKey, Trend};

// Source traits and types
pub use data_source::{
    MarketRateSource, OfficialRateSource, OfficialRates, RateSource, SourceError, SourceErrorKind,
    SourceFuture,
};

// Domain models
pub use domain::{
    Attribution, CurrencyRate, MarketSnapshot, RateSlot, UtcDateTime, SYNC_ERROR_LABEL,
    UNAVAILABLE,
};

// Error types
pub use error::{ConfigError, ValidationError};

// Extraction
pub use extraction::{extract_rates, ExtractedRates, ExtractionStage};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Model client
pub use llm::{GeminiClient, Generation, Prompt};

// Refresh loop
pub use refresh::{RefreshHandle, SnapshotReceiver, MIN_REFRESH_PERIOD};

// Routing types
pub use routing::{
    compose_snapshot, first_success, FailureReport, RateRouter, RateRouterBuilder, Resolution,
    RouteFailure, RouteReport, RouteResult, RouteSuccess, SourceChain, SourceFailure,
};

// Source identifiers
pub use source::ProviderId;
