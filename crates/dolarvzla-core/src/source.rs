use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical provider identifiers used in routing chains and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    DolarVzla,
    DolarApi,
    Gemini,
    Yadio,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DolarVzla => "dolarvzla",
            Self::DolarApi => "dolarapi",
            Self::Gemini => "gemini",
            Self::Yadio => "yadio",
        }
    }

    /// Human-readable origin used in `Fuente: <origin>` labels.
    pub const fn origin_label(self) -> &'static str {
        match self {
            Self::DolarVzla => "DolarVzla",
            Self::DolarApi => "DolarApi",
            Self::Gemini => "BCV (Google Search)",
            Self::Yadio => "Yadio",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dolarvzla" => Ok(Self::DolarVzla),
            "dolarapi" => Ok(Self::DolarApi),
            "gemini" => Ok(Self::Gemini),
            "yadio" => Ok(Self::Yadio),
            other => Err(ValidationError::InvalidSource {
                value: other.to_owned(),
            }),
        }
    }
}
