//! Contract tests for upstream request routing.
//!
//! Each row pins the function name, interval parameter and data key the
//! upstream expects for a given instrument class and resolution.

use candleview_core::gateway::routing::{equity_route, fx_route, PayloadShape};
use candleview_core::{Commodity, GatewayConfig, MarketDataGateway, Query, Resolution, Route};

struct Row {
    resolution: Resolution,
    function: &'static str,
    interval: Option<&'static str>,
    data_key: &'static str,
}

const EQUITY_TABLE: [Row; 4] = [
    Row {
        resolution: Resolution::FiveMinutes,
        function: "TIME_SERIES_INTRADAY",
        interval: Some("5min"),
        data_key: "Time Series (5min)",
    },
    Row {
        resolution: Resolution::ThirtyMinutes,
        function: "TIME_SERIES_INTRADAY",
        interval: Some("30min"),
        data_key: "Time Series (30min)",
    },
    Row {
        resolution: Resolution::SixtyMinutes,
        function: "TIME_SERIES_INTRADAY",
        interval: Some("60min"),
        data_key: "Time Series (60min)",
    },
    Row {
        resolution: Resolution::Daily,
        function: "TIME_SERIES_DAILY",
        interval: None,
        data_key: "Time Series (Daily)",
    },
];

const FX_TABLE: [Row; 4] = [
    Row {
        resolution: Resolution::FiveMinutes,
        function: "FX_INTRADAY",
        interval: Some("5min"),
        data_key: "Time Series FX (5min)",
    },
    Row {
        resolution: Resolution::ThirtyMinutes,
        function: "FX_INTRADAY",
        interval: Some("30min"),
        data_key: "Time Series FX (30min)",
    },
    Row {
        resolution: Resolution::SixtyMinutes,
        function: "FX_INTRADAY",
        interval: Some("60min"),
        data_key: "Time Series FX (60min)",
    },
    Row {
        resolution: Resolution::Daily,
        function: "FX_DAILY",
        interval: None,
        data_key: "Time Series FX (Daily)",
    },
];

fn param<'a>(route: &'a Route, name: &str) -> Option<&'a str> {
    route
        .params
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.as_str())
}

#[test]
fn equity_routes_match_upstream_contract() {
    for row in &EQUITY_TABLE {
        let spec = equity_route(row.resolution);
        assert_eq!(spec.function, row.function, "{}", row.resolution);
        assert_eq!(spec.interval, row.interval, "{}", row.resolution);
        assert_eq!(spec.data_key, row.data_key, "{}", row.resolution);

        let route = Route::for_query(&Query::equity("ibm", row.resolution).expect("valid"));
        assert_eq!(route.function, row.function);
        assert_eq!(route.data_key, row.data_key);
        assert_eq!(route.shape, PayloadShape::OhlcMap);
        assert_eq!(param(&route, "symbol"), Some("IBM"));
        assert_eq!(param(&route, "interval"), row.interval);
        assert_eq!(route.display_symbol, "IBM");
    }
}

#[test]
fn fx_routes_match_upstream_contract() {
    for row in &FX_TABLE {
        let spec = fx_route(row.resolution);
        assert_eq!(spec.function, row.function, "{}", row.resolution);
        assert_eq!(spec.interval, row.interval, "{}", row.resolution);
        assert_eq!(spec.data_key, row.data_key, "{}", row.resolution);

        let route =
            Route::for_query(&Query::fx("gbp", "jpy", row.resolution).expect("valid"));
        assert_eq!(route.function, row.function);
        assert_eq!(route.data_key, row.data_key);
        assert_eq!(param(&route, "from_symbol"), Some("GBP"));
        assert_eq!(param(&route, "to_symbol"), Some("JPY"));
        assert_eq!(param(&route, "interval"), row.interval);
        assert_eq!(route.display_symbol, "GBP/JPY");
    }
}

#[test]
fn commodity_routes_use_code_as_function_and_daily_interval() {
    for commodity in Commodity::ALL {
        for resolution in Resolution::ALL {
            let route = Route::for_query(&Query::commodity(commodity, resolution));

            assert_eq!(route.function, commodity.code());
            assert_eq!(param(&route, "interval"), Some("daily"));
            assert_eq!(route.data_key, "data");
            assert_eq!(route.shape, PayloadShape::ValueList);
            assert_eq!(route.display_symbol, commodity.code());
        }
    }
}

#[test]
fn built_request_targets_configured_base_url_with_key_last() {
    let gateway = MarketDataGateway::new(
        GatewayConfig::new("secret-key").with_base_url("http://127.0.0.1:9/query"),
    );
    let query = Query::fx("EUR", "USD", Resolution::ThirtyMinutes).expect("valid");

    let (_, request) = gateway.build_request(&query).expect("request");

    assert_eq!(
        request.url,
        "http://127.0.0.1:9/query?function=FX_INTRADAY&from_symbol=EUR&to_symbol=USD&interval=30min&apikey=secret-key"
    );
    assert!(!request.redacted_url().contains("secret-key"));
    assert!(!format!("{request:?}").contains("secret-key"));
}
