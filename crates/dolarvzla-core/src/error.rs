use thiserror::Error;

/// Validation errors raised when constructing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("invalid currency '{value}', expected one of ves, usd, eur, usdt")]
    InvalidCurrency { value: String },
    #[error("invalid source '{value}', expected one of dolarvzla, dolarapi, gemini, yadio")]
    InvalidSource { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
}

/// Configuration errors raised while reading `RatesConfig` from the environment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {name} must be an unsigned integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("environment variable {name} must be a boolean (1/0/true/false), got '{value}'")]
    InvalidFlag { name: &'static str, value: String },
    #[error("{name} must be greater than zero")]
    ZeroValue { name: &'static str },
}
