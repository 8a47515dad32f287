use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Sampling granularity offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "M5")]
    FiveMinutes,
    #[serde(rename = "M30")]
    ThirtyMinutes,
    #[serde(rename = "H1")]
    SixtyMinutes,
    #[serde(rename = "D1")]
    Daily,
}

impl Resolution {
    pub const ALL: [Self; 4] = [
        Self::FiveMinutes,
        Self::ThirtyMinutes,
        Self::SixtyMinutes,
        Self::Daily,
    ];

    /// Dashboard label, also used as the interval handed to the analysis flow.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FiveMinutes => "M5",
            Self::ThirtyMinutes => "M30",
            Self::SixtyMinutes => "H1",
            Self::Daily => "D1",
        }
    }

    pub const fn is_intraday(self) -> bool {
        !matches!(self, Self::Daily)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::Daily
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "m5" | "5m" | "5min" => Ok(Self::FiveMinutes),
            "m30" | "30m" | "30min" => Ok(Self::ThirtyMinutes),
            "h1" | "1h" | "60m" | "60min" => Ok(Self::SixtyMinutes),
            "d1" | "1d" | "daily" => Ok(Self::Daily),
            _ => Err(ValidationError::InvalidResolution {
                value: value.trim().to_owned(),
            }),
        }
    }
}
