use candleview_core::{Commodity, CurrencyCode};
use serde::Serialize;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CommodityEntry {
    code: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct CommoditiesResponseData {
    commodities: Vec<CommodityEntry>,
}

#[derive(Debug, Serialize)]
struct CurrenciesResponseData {
    currencies: Vec<&'static str>,
}

pub fn commodities() -> Result<CommandResult, CliError> {
    let commodities = Commodity::ALL
        .into_iter()
        .map(|commodity| CommodityEntry {
            code: commodity.code(),
            description: commodity.description(),
        })
        .collect();

    Ok(CommandResult::ok(serde_json::to_value(
        CommoditiesResponseData { commodities },
    )?))
}

pub fn currencies() -> Result<CommandResult, CliError> {
    let data = CurrenciesResponseData {
        currencies: CurrencyCode::POPULAR.to_vec(),
    };
    Ok(CommandResult::ok(serde_json::to_value(data)?))
}
