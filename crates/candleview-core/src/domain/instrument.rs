use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Resolution, Symbol, ValidationError};

/// Uppercase 3-letter currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Currencies offered by the dashboard pickers.
    pub const POPULAR: [&'static str; 9] =
        ["EUR", "USD", "JPY", "GBP", "CHF", "AUD", "CAD", "NZD", "CNY"];

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        let is_valid =
            normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

        if !is_valid {
            return Err(ValidationError::InvalidCurrency {
                value: input.to_owned(),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

/// Commodities the upstream exposes as dedicated functions.
///
/// The upstream code doubles as the request's `function` selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Commodity {
    Wti,
    Brent,
    NaturalGas,
    Copper,
    Aluminum,
    Wheat,
    Corn,
    Cotton,
    Sugar,
    Coffee,
    AllCommodities,
    Xau,
}

impl Commodity {
    pub const ALL: [Self; 12] = [
        Self::Wti,
        Self::Brent,
        Self::NaturalGas,
        Self::Copper,
        Self::Aluminum,
        Self::Wheat,
        Self::Corn,
        Self::Cotton,
        Self::Sugar,
        Self::Coffee,
        Self::AllCommodities,
        Self::Xau,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Self::Wti => "WTI",
            Self::Brent => "BRENT",
            Self::NaturalGas => "NATURAL_GAS",
            Self::Copper => "COPPER",
            Self::Aluminum => "ALUMINUM",
            Self::Wheat => "WHEAT",
            Self::Corn => "CORN",
            Self::Cotton => "COTTON",
            Self::Sugar => "SUGAR",
            Self::Coffee => "COFFEE",
            Self::AllCommodities => "ALL_COMMODITIES",
            Self::Xau => "XAU",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Wti => "West Texas Intermediate crude oil",
            Self::Brent => "Brent crude oil",
            Self::NaturalGas => "Henry Hub natural gas",
            Self::Copper => "Copper",
            Self::Aluminum => "Aluminum",
            Self::Wheat => "Wheat",
            Self::Corn => "Corn",
            Self::Cotton => "Cotton",
            Self::Sugar => "Sugar",
            Self::Coffee => "Coffee",
            Self::AllCommodities => "Global commodities index",
            Self::Xau => "Gold",
        }
    }
}

impl Display for Commodity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Commodity {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|commodity| commodity.code() == normalized)
            .ok_or_else(|| ValidationError::UnknownCommodity {
                value: value.trim().to_owned(),
            })
    }
}

/// Instrument class plus identifying symbol(s).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instrument {
    Equity { symbol: Symbol },
    Fx { base: CurrencyCode, quote: CurrencyCode },
    Commodity { commodity: Commodity },
}

impl Instrument {
    /// Label shown next to the chart: the ticker, `BASE/QUOTE`, or the commodity code.
    pub fn display_symbol(&self) -> String {
        match self {
            Self::Equity { symbol } => symbol.as_str().to_owned(),
            Self::Fx { base, quote } => format!("{base}/{quote}"),
            Self::Commodity { commodity } => commodity.code().to_owned(),
        }
    }

    pub const fn is_commodity(&self) -> bool {
        matches!(self, Self::Commodity { .. })
    }
}

/// Gateway input: what to fetch and at which resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    #[serde(flatten)]
    pub instrument: Instrument,
    pub resolution: Resolution,
}

impl Query {
    pub fn new(instrument: Instrument, resolution: Resolution) -> Self {
        Self {
            instrument,
            resolution,
        }
    }

    pub fn equity(symbol: &str, resolution: Resolution) -> Result<Self, ValidationError> {
        Ok(Self::new(
            Instrument::Equity {
                symbol: Symbol::parse(symbol)?,
            },
            resolution,
        ))
    }

    pub fn fx(base: &str, quote: &str, resolution: Resolution) -> Result<Self, ValidationError> {
        Ok(Self::new(
            Instrument::Fx {
                base: CurrencyCode::parse(base)?,
                quote: CurrencyCode::parse(quote)?,
            },
            resolution,
        ))
    }

    pub fn commodity(commodity: Commodity, resolution: Resolution) -> Self {
        Self::new(Instrument::Commodity { commodity }, resolution)
    }

    pub fn display_symbol(&self) -> String {
        self.instrument.display_symbol()
    }
}
