use std::str::FromStr;
use std::time::Instant;

use candleview_core::{
    fetch_with_retry, AnalysisRequest, Commodity, MarketDataGateway, Query, Resolution,
    RetryConfig, Series,
};
use serde::Serialize;
use serde_json::Value;

use crate::cli::{CommodityArgs, EquityArgs, FxArgs};
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SeriesResponseData<'a> {
    series: &'a Series,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
}

pub async fn equity(
    args: &EquityArgs,
    gateway: &MarketDataGateway,
    retry: &RetryConfig,
    with_prompt: bool,
) -> Result<CommandResult, CliError> {
    let resolution = Resolution::from_str(&args.resolution.resolution)?;
    let query = Query::equity(&args.symbol, resolution)?;
    fetch(&query, gateway, retry, with_prompt).await
}

pub async fn fx(
    args: &FxArgs,
    gateway: &MarketDataGateway,
    retry: &RetryConfig,
    with_prompt: bool,
) -> Result<CommandResult, CliError> {
    let resolution = Resolution::from_str(&args.resolution.resolution)?;
    let query = Query::fx(&args.base, &args.quote, resolution)?;
    fetch(&query, gateway, retry, with_prompt).await
}

pub async fn commodity(
    args: &CommodityArgs,
    gateway: &MarketDataGateway,
    retry: &RetryConfig,
    with_prompt: bool,
) -> Result<CommandResult, CliError> {
    let resolution = Resolution::from_str(&args.resolution.resolution)?;
    let commodity = Commodity::from_str(&args.code)?;
    let query = Query::commodity(commodity, resolution);

    let result = fetch(&query, gateway, retry, with_prompt).await?;
    if resolution.is_intraday() {
        return Ok(result.with_warning(format!(
            "commodities are published daily; {resolution} candles are daily observations"
        )));
    }
    Ok(result)
}

async fn fetch(
    query: &Query,
    gateway: &MarketDataGateway,
    retry: &RetryConfig,
    with_prompt: bool,
) -> Result<CommandResult, CliError> {
    let started = Instant::now();
    let outcome = fetch_with_retry(gateway, query, retry).await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match outcome {
        Ok(series) => {
            let prompt = if with_prompt {
                Some(AnalysisRequest::from_series(&series)?.render_prompt())
            } else {
                None
            };
            let data = serde_json::to_value(SeriesResponseData {
                series: &series,
                prompt,
            })?;
            Ok(CommandResult::ok(data)
                .with_latency(latency_ms)
                .with_subject(series.display_symbol.clone(), series.resolution))
        }
        Err(failure) => Ok(CommandResult::ok(Value::Null)
            .with_failure(failure)
            .with_latency(latency_ms)
            .with_subject(query.display_symbol(), query.resolution)),
    }
}
