//! CLI argument definitions for CandleView.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `equity` | Fetch OHLC candles for a stock ticker |
//! | `fx` | Fetch OHLC candles for a currency pair |
//! | `commodity` | Fetch the daily series of a commodity |
//! | `commodities` | List supported commodity codes |
//! | `currencies` | List popular currency codes |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--with-prompt` | `false` | Attach the candlestick analysis prompt |
//! | `--retries` | `0` | Retries on throttle notices and transient failures |
//! | `--base-url` | upstream default | Override the upstream endpoint |
//! | `--timeout-ms` | transport default | Request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! candleview equity AAPL --resolution M5
//! candleview fx EUR USD --pretty
//! candleview commodity WTI --format table
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Candlestick market data from Alpha Vantage.
///
/// Reads the API key from `ALPHAVANTAGE_API_KEY`.
#[derive(Debug, Parser)]
#[command(
    name = "candleview",
    author,
    version,
    about = "Candlestick market data for equities, currency pairs and commodities"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Attach the rendered candlestick analysis prompt to the output.
    #[arg(long, global = true, default_value_t = false)]
    pub with_prompt: bool,

    /// Retries after a throttle notice or transient transport failure.
    #[arg(long, global = true, default_value_t = 0)]
    pub retries: u32,

    /// Upstream endpoint, overriding `CANDLEVIEW_BASE_URL`.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds, overriding `CANDLEVIEW_TIMEOUT_MS`.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Candle table for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch candles for a stock ticker.
    ///
    ///   candleview equity IBM
    ///   candleview equity AAPL --resolution M30
    Equity(EquityArgs),

    /// Fetch candles for a currency pair.
    ///
    ///   candleview fx EUR USD
    ///   candleview fx usd jpy --resolution H1
    Fx(FxArgs),

    /// Fetch the daily series of a commodity.
    ///
    ///   candleview commodity WTI
    ///   candleview commodity natural_gas --format table
    Commodity(CommodityArgs),

    /// List supported commodity codes.
    Commodities,

    /// List popular currency codes.
    Currencies,
}

/// Arguments shared by every series command.
#[derive(Debug, Args)]
pub struct ResolutionArg {
    /// Candle resolution: M5, M30, H1 or D1.
    #[arg(long, short = 'r', default_value = "D1")]
    pub resolution: String,
}

#[derive(Debug, Args)]
pub struct EquityArgs {
    /// Stock ticker (e.g., IBM, AAPL, BRK-B).
    pub symbol: String,

    #[command(flatten)]
    pub resolution: ResolutionArg,
}

#[derive(Debug, Args)]
pub struct FxArgs {
    /// Base currency code (e.g., EUR).
    pub base: String,

    /// Quote currency code (e.g., USD).
    pub quote: String,

    #[command(flatten)]
    pub resolution: ResolutionArg,
}

#[derive(Debug, Args)]
pub struct CommodityArgs {
    /// Commodity code (e.g., WTI, BRENT, COPPER).
    pub code: String,

    /// Accepted for symmetry; commodities are always fetched daily.
    #[command(flatten)]
    pub resolution: ResolutionArg,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_fx_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "candleview",
            "fx",
            "EUR",
            "USD",
            "--resolution",
            "H1",
            "--pretty",
            "--retries",
            "2",
        ])
        .expect("arguments should parse");

        assert!(cli.pretty);
        assert_eq!(cli.retries, 2);
        match cli.command {
            Command::Fx(args) => {
                assert_eq!(args.base, "EUR");
                assert_eq!(args.quote, "USD");
                assert_eq!(args.resolution.resolution, "H1");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn resolution_defaults_to_daily() {
        let cli = Cli::try_parse_from(["candleview", "equity", "IBM"]).expect("should parse");
        match cli.command {
            Command::Equity(args) => assert_eq!(args.resolution.resolution, "D1"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
