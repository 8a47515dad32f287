//! Response validation and normalization.
//!
//! Every reject-or-drop decision about an upstream payload lives here. The
//! checks run in a fixed order and the first match wins:
//! format → upstream error → `Note` → `Information` (throttle only if it reads
//! as a rate or quota limit) → missing key → per-entry parsing → empty.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::routing::{PayloadShape, Route};
use super::GatewayError;
use crate::{Candle, Series, UtcDateTime};

pub const ERROR_MESSAGE_FIELD: &str = "Error Message";
/// Per-minute throttle notice. Always a rate limit.
pub const THROTTLE_FIELD: &str = "Note";
/// General notice. Carries the quota notice but also terminal ones such as
/// premium-endpoint refusals.
pub const INFORMATION_FIELD: &str = "Information";
/// Lowercase phrases marking an `Information` notice as a rate or quota limit.
pub const RATE_LIMIT_MARKERS: [&str; 5] = [
    "rate limit",
    "call frequency",
    "requests per day",
    "calls per minute",
    "calls per day",
];

pub const OPEN_FIELD: &str = "1. open";
pub const HIGH_FIELD: &str = "2. high";
pub const LOW_FIELD: &str = "3. low";
pub const CLOSE_FIELD: &str = "4. close";

/// Placeholder the upstream uses for a missing commodity observation.
pub const MISSING_VALUE: &str = ".";

/// Parses a raw response body and normalizes it for `route`.
pub fn normalize_body(route: &Route, body: &str) -> Result<Series, GatewayError> {
    let payload: Value = serde_json::from_str(body).map_err(|error| {
        GatewayError::format(format!(
            "received invalid data format from upstream for '{}': {error}",
            route.display_symbol
        ))
    })?;
    normalize_payload(route, &payload)
}

/// Validates an already-decoded payload and converts it into a [`Series`].
pub fn normalize_payload(route: &Route, payload: &Value) -> Result<Series, GatewayError> {
    let Some(object) = payload.as_object() else {
        return Err(GatewayError::format(format!(
            "received invalid data format from upstream for '{}': expected a JSON object",
            route.display_symbol
        )));
    };

    if let Some(message) = object.get(ERROR_MESSAGE_FIELD) {
        let message = text_of(message);
        warn!(symbol = %route.display_symbol, "upstream reported an error");
        return Err(GatewayError::upstream(message));
    }

    if let Some(message) = object.get(THROTTLE_FIELD) {
        warn!(symbol = %route.display_symbol, "upstream throttled the request");
        return Err(GatewayError::rate_limited(text_of(message)));
    }

    if let Some(message) = object.get(INFORMATION_FIELD) {
        let message = text_of(message);
        if is_rate_limit_notice(&message) {
            warn!(symbol = %route.display_symbol, "upstream quota exhausted");
            return Err(GatewayError::rate_limited(message));
        }
        warn!(symbol = %route.display_symbol, "upstream refused the request");
        return Err(GatewayError::upstream(message));
    }

    let Some(data) = object.get(route.data_key) else {
        return Err(GatewayError::not_found(not_found_message(route, object)));
    };

    let candles = match route.shape {
        PayloadShape::OhlcMap => parse_ohlc_map(route, data)?,
        PayloadShape::ValueList => parse_value_list(route, data)?,
    };

    if candles.is_empty() {
        return Err(GatewayError::no_data(format!(
            "no data points were found for '{}'; the symbol may be invalid or no data is available for {}",
            route.display_symbol, route.resolution
        )));
    }

    Ok(Series::new(
        route.display_symbol.clone(),
        route.resolution,
        candles,
    ))
}

fn not_found_message(route: &Route, object: &Map<String, Value>) -> String {
    if route.is_commodity() {
        return format!(
            "could not find data for commodity '{}'; it may not be supported or the API limit was reached",
            route.display_symbol
        );
    }

    let keys = object.keys().map(String::as_str).collect::<Vec<_>>();
    format!(
        "could not find time series data for '{}'; the symbol may be invalid or the API limit was reached. available keys: {}",
        route.display_symbol,
        if keys.is_empty() {
            String::from("<none>")
        } else {
            keys.join(", ")
        }
    )
}

fn parse_ohlc_map(route: &Route, data: &Value) -> Result<Vec<Candle>, GatewayError> {
    let Some(entries) = data.as_object() else {
        return Err(GatewayError::format(format!(
            "unexpected data format for '{}': expected an object of time series",
            route.display_symbol
        )));
    };

    let candles = entries
        .iter()
        .filter_map(|(timestamp, point)| parse_ohlc_point(timestamp, point))
        .collect::<Vec<_>>();

    log_dropped(route, entries.len(), candles.len());
    Ok(candles)
}

fn parse_ohlc_point(timestamp: &str, point: &Value) -> Option<Candle> {
    let timestamp = UtcDateTime::parse_upstream(timestamp).ok()?;
    let fields = point.as_object()?;

    Some(Candle::new(
        timestamp,
        number_field(fields, OPEN_FIELD)?,
        number_field(fields, HIGH_FIELD)?,
        number_field(fields, LOW_FIELD)?,
        number_field(fields, CLOSE_FIELD)?,
    ))
}

fn parse_value_list(route: &Route, data: &Value) -> Result<Vec<Candle>, GatewayError> {
    let Some(points) = data.as_array() else {
        return Err(GatewayError::format(format!(
            "unexpected data format for commodity '{}': expected an array",
            route.display_symbol
        )));
    };

    let candles = points
        .iter()
        .filter_map(parse_value_point)
        .collect::<Vec<_>>();

    log_dropped(route, points.len(), candles.len());
    Ok(candles)
}

fn parse_value_point(point: &Value) -> Option<Candle> {
    let fields = point.as_object()?;
    let date = fields.get("date")?.as_str()?;
    let value = fields.get("value")?;

    if value.as_str().map(str::trim) == Some(MISSING_VALUE) {
        return None;
    }

    let timestamp = UtcDateTime::parse_upstream(date).ok()?;
    Some(Candle::flat(timestamp, number(value)?))
}

fn number_field(fields: &Map<String, Value>, name: &str) -> Option<f64> {
    fields.get(name).and_then(number)
}

/// Finite number from a JSON number or numeric string.
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

fn is_rate_limit_notice(message: &str) -> bool {
    let message = message.to_lowercase();
    RATE_LIMIT_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn log_dropped(route: &Route, total: usize, kept: usize) {
    if kept < total {
        debug!(
            symbol = %route.display_symbol,
            dropped = total - kept,
            kept,
            "dropped malformed upstream entries"
        );
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::gateway::GatewayErrorKind;
    use crate::{Commodity, Query, Resolution};

    fn equity_route() -> Route {
        Route::for_query(&Query::equity("IBM", Resolution::Daily).expect("valid"))
    }

    fn commodity_route() -> Route {
        Route::for_query(&Query::commodity(Commodity::Copper, Resolution::Daily))
    }

    #[test]
    fn number_accepts_strings_and_numbers_but_not_non_finite() {
        assert_eq!(number(&json!("189.3000")), Some(189.3));
        assert_eq!(number(&json!(" 12 ")), Some(12.0));
        assert_eq!(number(&json!(7.5)), Some(7.5));
        assert_eq!(number(&json!("NaN")), None);
        assert_eq!(number(&json!("inf")), None);
        assert_eq!(number(&json!("12abc")), None);
        assert_eq!(number(&json!(null)), None);
    }

    #[test]
    fn non_object_body_is_a_format_error() {
        let error = normalize_body(&equity_route(), "[1, 2, 3]").expect_err("must fail");
        assert_eq!(error.kind(), GatewayErrorKind::Format);

        let error = normalize_body(&equity_route(), "<html>").expect_err("must fail");
        assert_eq!(error.kind(), GatewayErrorKind::Format);
    }

    #[test]
    fn non_string_error_message_is_stringified() {
        let payload = json!({ "Error Message": { "code": 7 } });
        let error = normalize_payload(&equity_route(), &payload).expect_err("must fail");

        assert_eq!(error.kind(), GatewayErrorKind::Upstream);
        assert_eq!(error.message(), r#"{"code":7}"#);
    }

    #[test]
    fn quota_information_notice_is_a_throttle() {
        let notice = "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day.";
        let payload = json!({ "Information": notice });
        let error = normalize_payload(&equity_route(), &payload).expect_err("must fail");

        assert_eq!(error.kind(), GatewayErrorKind::RateLimited);
        assert_eq!(error.message(), notice);
        assert!(error.retryable());
    }

    #[test]
    fn premium_information_notice_is_terminal() {
        let notice = "Thank you for using Alpha Vantage! This is a premium endpoint. You may subscribe to any of the premium plans to instantly unlock all premium endpoints";
        let route = Route::for_query(
            &Query::fx("EUR", "USD", Resolution::FiveMinutes).expect("valid"),
        );
        let error = normalize_payload(&route, &json!({ "Information": notice }))
            .expect_err("must fail");

        assert_eq!(error.kind(), GatewayErrorKind::Upstream);
        assert_eq!(error.message(), notice);
        assert!(!error.retryable());
    }

    #[test]
    fn note_is_a_throttle_whatever_its_wording() {
        let payload = json!({ "Note": "please slow down", "Information": "This is a premium endpoint." });
        let error = normalize_payload(&equity_route(), &payload).expect_err("must fail");
        assert_eq!(error.kind(), GatewayErrorKind::RateLimited);
    }

    #[test]
    fn ohlc_map_with_wrong_shape_is_a_format_error() {
        let payload = json!({ "Time Series (Daily)": ["not", "an", "object"] });
        let error = normalize_payload(&equity_route(), &payload).expect_err("must fail");
        assert_eq!(error.kind(), GatewayErrorKind::Format);
    }

    #[test]
    fn commodity_with_wrong_shape_is_a_format_error() {
        let payload = json!({ "data": { "date": "2024-01-01", "value": "1" } });
        let error = normalize_payload(&commodity_route(), &payload).expect_err("must fail");
        assert_eq!(error.kind(), GatewayErrorKind::Format);
    }

    #[test]
    fn drops_entries_with_bad_timestamps_or_shapes() {
        let payload = json!({
            "Time Series (Daily)": {
                "2024-01-03": { "1. open": "3", "2. high": "3", "3. low": "3", "4. close": "3" },
                "not-a-date": { "1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1" },
                "2024-01-02": "flat string",
                "2024-01-01": { "1. open": "1", "2. high": "1", "3. low": "1" }
            }
        });

        let series = normalize_payload(&equity_route(), &payload).expect("one entry survives");
        assert_eq!(series.len(), 1);
        assert_eq!(series.candles()[0].close, 3.0);
    }

    #[test]
    fn commodity_points_become_flat_candles() {
        let payload = json!({
            "name": "Global Price of Copper",
            "data": [
                { "date": "2024-03-01", "value": "8500.5" },
                { "date": "2024-02-01", "value": "." },
                { "date": "2024-01-01", "value": "8300" },
                { "date": "2023-12-01" },
                { "value": "8100" }
            ]
        });

        let series = normalize_payload(&commodity_route(), &payload).expect("valid");
        let candles = series.candles();

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].timestamp.format_rfc3339(), "2024-01-01T00:00:00Z");
        assert_eq!(candles[1].open, 8500.5);
        assert_eq!(candles[1].high, 8500.5);
        assert_eq!(candles[1].low, 8500.5);
        assert_eq!(candles[1].close, 8500.5);
    }

    #[test]
    fn commodity_not_found_omits_key_listing() {
        let payload = json!({ "name": "unused" });
        let error = normalize_payload(&commodity_route(), &payload).expect_err("must fail");

        assert_eq!(error.kind(), GatewayErrorKind::NotFound);
        assert!(error.message().contains("COPPER"));
        assert!(!error.message().contains("available keys"));
    }
}
