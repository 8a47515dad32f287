use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Characters that would split or terminate a query-string pair.
const QUERY_BREAKING: [char; 4] = ['&', '=', '?', '#'];

/// Equity ticker as the upstream expects it: trimmed and uppercased.
///
/// Listing conventions differ per exchange (`600104.SHH`, `BRK-B`, `^GSPC`), so
/// the only characters refused are whitespace and query-string delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        if let Some((index, ch)) = trimmed
            .chars()
            .enumerate()
            .find(|(_, ch)| ch.is_whitespace() || QUERY_BREAKING.contains(ch))
        {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_uppercases() {
        let parsed = Symbol::parse(" ibm ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "IBM");
    }

    #[test]
    fn accepts_exchange_listings_regardless_of_shape() {
        for (input, expected) in [
            ("shop.trt", "SHOP.TRT"),
            ("600104.shh", "600104.SHH"),
            ("000002.SHZ", "000002.SHZ"),
            ("3988.HKG", "3988.HKG"),
            ("brk-b", "BRK-B"),
            ("TSCO.LON", "TSCO.LON"),
        ] {
            let parsed = Symbol::parse(input).expect("listing should parse");
            assert_eq!(parsed.as_str(), expected);
        }
    }

    #[test]
    fn rejects_blank_symbol() {
        let err = Symbol::parse("   ").expect_err("must fail");
        assert_eq!(err, ValidationError::EmptySymbol);
    }

    #[test]
    fn rejects_query_breaking_characters() {
        assert_eq!(
            Symbol::parse("IBM&function=X").expect_err("must fail"),
            ValidationError::SymbolInvalidChar { ch: '&', index: 3 }
        );
        assert_eq!(
            Symbol::parse("BRK B").expect_err("must fail"),
            ValidationError::SymbolInvalidChar { ch: ' ', index: 3 }
        );
    }
}
