//! Query → upstream request mapping.
//!
//! Equity and fx use parallel lookup tables keyed by resolution. Commodities
//! use the commodity code as the function name and are always fetched daily.

use crate::{Commodity, Instrument, Query, Resolution};

/// One row of a resolution lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSpec {
    pub function: &'static str,
    /// Sent as `interval` only for intraday functions.
    pub interval: Option<&'static str>,
    pub data_key: &'static str,
}

impl RouteSpec {
    const fn intraday(
        function: &'static str,
        interval: &'static str,
        data_key: &'static str,
    ) -> Self {
        Self {
            function,
            interval: Some(interval),
            data_key,
        }
    }

    const fn daily(function: &'static str, data_key: &'static str) -> Self {
        Self {
            function,
            interval: None,
            data_key,
        }
    }
}

/// Equity rows.
pub const fn equity_route(resolution: Resolution) -> RouteSpec {
    match resolution {
        Resolution::FiveMinutes => {
            RouteSpec::intraday("TIME_SERIES_INTRADAY", "5min", "Time Series (5min)")
        }
        Resolution::ThirtyMinutes => {
            RouteSpec::intraday("TIME_SERIES_INTRADAY", "30min", "Time Series (30min)")
        }
        Resolution::SixtyMinutes => {
            RouteSpec::intraday("TIME_SERIES_INTRADAY", "60min", "Time Series (60min)")
        }
        Resolution::Daily => RouteSpec::daily("TIME_SERIES_DAILY", "Time Series (Daily)"),
    }
}

/// Fx rows.
pub const fn fx_route(resolution: Resolution) -> RouteSpec {
    match resolution {
        Resolution::FiveMinutes => {
            RouteSpec::intraday("FX_INTRADAY", "5min", "Time Series FX (5min)")
        }
        Resolution::ThirtyMinutes => {
            RouteSpec::intraday("FX_INTRADAY", "30min", "Time Series FX (30min)")
        }
        Resolution::SixtyMinutes => {
            RouteSpec::intraday("FX_INTRADAY", "60min", "Time Series FX (60min)")
        }
        Resolution::Daily => RouteSpec::daily("FX_DAILY", "Time Series FX (Daily)"),
    }
}

pub const COMMODITY_INTERVAL: &str = "daily";
pub const COMMODITY_DATA_KEY: &str = "data";

/// Shape of the payload expected at the route's data key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Object of timestamp → ordinal-labelled OHLC fields.
    OhlcMap,
    /// Array of `{date, value}` points.
    ValueList,
}

/// Fully resolved upstream request for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub function: String,
    pub params: Vec<(&'static str, String)>,
    pub data_key: &'static str,
    pub shape: PayloadShape,
    pub display_symbol: String,
    pub resolution: Resolution,
}

impl Route {
    pub fn for_query(query: &Query) -> Self {
        let display_symbol = query.display_symbol();
        match &query.instrument {
            Instrument::Equity { symbol } => {
                let spec = equity_route(query.resolution);
                Self::from_spec(
                    spec,
                    vec![("symbol", symbol.as_str().to_owned())],
                    display_symbol,
                    query.resolution,
                )
            }
            Instrument::Fx { base, quote } => {
                let spec = fx_route(query.resolution);
                Self::from_spec(
                    spec,
                    vec![
                        ("from_symbol", base.as_str().to_owned()),
                        ("to_symbol", quote.as_str().to_owned()),
                    ],
                    display_symbol,
                    query.resolution,
                )
            }
            Instrument::Commodity { commodity } => {
                Self::commodity(*commodity, display_symbol, query.resolution)
            }
        }
    }

    fn from_spec(
        spec: RouteSpec,
        mut params: Vec<(&'static str, String)>,
        display_symbol: String,
        resolution: Resolution,
    ) -> Self {
        if let Some(interval) = spec.interval {
            params.push(("interval", interval.to_owned()));
        }
        Self {
            function: spec.function.to_owned(),
            params,
            data_key: spec.data_key,
            shape: PayloadShape::OhlcMap,
            display_symbol,
            resolution,
        }
    }

    fn commodity(commodity: Commodity, display_symbol: String, resolution: Resolution) -> Self {
        Self {
            function: commodity.code().to_owned(),
            params: vec![("interval", COMMODITY_INTERVAL.to_owned())],
            data_key: COMMODITY_DATA_KEY,
            shape: PayloadShape::ValueList,
            display_symbol,
            resolution,
        }
    }

    pub fn is_commodity(&self) -> bool {
        self.shape == PayloadShape::ValueList
    }

    /// Upstream URL with every parameter percent-encoded, `apikey` last.
    pub fn url(&self, base_url: &str, api_key: &str) -> String {
        let mut query = format!("function={}", urlencoding::encode(&self.function));
        for (name, value) in &self.params {
            query.push('&');
            query.push_str(name);
            query.push('=');
            query.push_str(&urlencoding::encode(value));
        }
        query.push_str("&apikey=");
        query.push_str(&urlencoding::encode(api_key));

        let separator = if base_url.contains('?') { '&' } else { '?' };
        format!("{base_url}{separator}{query}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equity_daily_omits_interval() {
        let query = Query::equity("IBM", Resolution::Daily).expect("valid");
        let route = Route::for_query(&query);

        assert_eq!(route.function, "TIME_SERIES_DAILY");
        assert_eq!(route.data_key, "Time Series (Daily)");
        assert!(route.params.iter().all(|(name, _)| *name != "interval"));
    }

    #[test]
    fn fx_intraday_carries_pair_and_interval() {
        let query = Query::fx("GBP", "JPY", Resolution::ThirtyMinutes).expect("valid");
        let route = Route::for_query(&query);

        assert_eq!(route.function, "FX_INTRADAY");
        assert_eq!(
            route.params,
            vec![
                ("from_symbol", String::from("GBP")),
                ("to_symbol", String::from("JPY")),
                ("interval", String::from("30min")),
            ]
        );
        assert_eq!(route.display_symbol, "GBP/JPY");
    }

    #[test]
    fn commodity_is_coerced_to_daily_for_every_resolution() {
        for resolution in Resolution::ALL {
            let route = Route::for_query(&Query::commodity(Commodity::Wti, resolution));

            assert_eq!(route.function, "WTI");
            assert_eq!(route.params, vec![("interval", String::from("daily"))]);
            assert_eq!(route.data_key, "data");
            assert_eq!(route.resolution, resolution);
            assert!(route.is_commodity());
        }
    }

    #[test]
    fn url_encodes_parameters_and_appends_key() {
        let query = Query::equity("BRK-B", Resolution::FiveMinutes).expect("valid");
        let url = Route::for_query(&query).url("https://example.test/query", "k&y");

        assert_eq!(
            url,
            "https://example.test/query?function=TIME_SERIES_INTRADAY&symbol=BRK-B&interval=5min&apikey=k%26y"
        );
    }

    #[test]
    fn url_respects_existing_query_string() {
        let query = Query::commodity(Commodity::Xau, Resolution::Daily);
        let url = Route::for_query(&query).url("http://localhost/query?datatype=json", "demo");

        assert!(url.starts_with("http://localhost/query?datatype=json&function=XAU"));
    }
}
