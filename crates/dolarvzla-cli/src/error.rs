use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] dolarvzla_core::ValidationError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(#[from] dolarvzla_core::ConfigError),

    #[error("refresh loop stopped: {0}")]
    Refresh(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::InvalidInput(_) => 2,
            Self::Serialization(_) => 4,
            Self::Config(_) => 7,
            Self::Refresh(_) => 10,
            Self::Io(_) => 10,
        }
    }
}
