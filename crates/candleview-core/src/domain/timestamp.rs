use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::ValidationError;

/// RFC3339 timestamp guaranteed to be UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let parsed = OffsetDateTime::parse(input, &Rfc3339).map_err(|_| {
            ValidationError::TimestampNotUtc {
                value: input.to_owned(),
            }
        })?;

        Self::from_offset_datetime(parsed).map_err(|_| ValidationError::TimestampNotUtc {
            value: input.to_owned(),
        })
    }

    /// Parses the timestamp labels used as upstream series keys.
    ///
    /// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD HH:MM`, a bare `YYYY-MM-DD`
    /// (midnight) and RFC3339. Naive forms carry no zone and are read as UTC.
    pub fn parse_upstream(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let invalid = || ValidationError::InvalidTimestamp {
            value: input.to_owned(),
        };

        if let Ok(value) = PrimitiveDateTime::parse(
            trimmed,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        ) {
            return Ok(Self(value.assume_utc()));
        }

        if let Ok(value) = PrimitiveDateTime::parse(
            trimmed,
            format_description!("[year]-[month]-[day] [hour]:[minute]"),
        ) {
            return Ok(Self(value.assume_utc()));
        }

        if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
            return Ok(Self(date.midnight().assume_utc()));
        }

        let value = OffsetDateTime::parse(trimmed, &Rfc3339).map_err(|_| invalid())?;
        Ok(Self(value.to_offset(UtcOffset::UTC)))
    }

    pub fn from_offset_datetime(value: OffsetDateTime) -> Result<Self, ValidationError> {
        if value.offset() != UtcOffset::UTC {
            return Err(ValidationError::TimestampNotUtc {
                value: value
                    .format(&Rfc3339)
                    .unwrap_or_else(|_| String::from("<unformattable>")),
            });
        }

        Ok(Self(value))
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
