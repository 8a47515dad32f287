mod catalog;
mod series;

use std::time::Duration;

use candleview_core::{GatewayConfig, GatewayError, MarketDataGateway, Resolution, RetryConfig};
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::envelope::{Envelope, EnvelopeError, EnvelopeMeta};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub failure: Option<GatewayError>,
    pub latency_ms: u64,
    pub subject: Option<(String, Resolution)>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            failure: None,
            latency_ms: 0,
            subject: None,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_failure(mut self, failure: GatewayError) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_subject(mut self, display_symbol: impl Into<String>, resolution: Resolution) -> Self {
        self.subject = Some((display_symbol.into(), resolution));
        self
    }
}

/// Envelope to render, plus the gateway failure that decides the exit code.
pub struct CommandOutcome {
    pub envelope: Envelope<Value>,
    pub failure: Option<GatewayError>,
}

pub async fn run(cli: &Cli) -> Result<CommandOutcome, CliError> {
    let command_result = match &cli.command {
        Command::Equity(args) => series::equity(args, &gateway(cli), &retry(cli), cli.with_prompt).await?,
        Command::Fx(args) => series::fx(args, &gateway(cli), &retry(cli), cli.with_prompt).await?,
        Command::Commodity(args) => {
            series::commodity(args, &gateway(cli), &retry(cli), cli.with_prompt).await?
        }
        Command::Commodities => catalog::commodities()?,
        Command::Currencies => catalog::currencies()?,
    };

    let CommandResult {
        data,
        warnings,
        failure,
        latency_ms,
        subject,
    } = command_result;

    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), latency_ms);
    if let Some((display_symbol, resolution)) = subject {
        meta = meta.with_subject(display_symbol, resolution);
    }
    for warning in warnings {
        meta.push_warning(warning);
    }

    let errors = failure.iter().map(EnvelopeError::from).collect();
    Ok(CommandOutcome {
        envelope: Envelope::new(meta, data, errors),
        failure,
    })
}

fn gateway(cli: &Cli) -> MarketDataGateway {
    MarketDataGateway::new(gateway_config(cli, GatewayConfig::from_env()))
}

/// Applies flag overrides on top of `config`. A zero timeout is ignored, as it
/// is for `CANDLEVIEW_TIMEOUT_MS`.
fn gateway_config(cli: &Cli, mut config: GatewayConfig) -> GatewayConfig {
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(timeout_ms) = cli.timeout_ms.filter(|millis| *millis > 0) {
        config = config.with_timeout(Some(Duration::from_millis(timeout_ms)));
    }
    config
}

fn retry(cli: &Cli) -> RetryConfig {
    RetryConfig::exponential(cli.retries)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).expect("arguments should parse")
    }

    #[test]
    fn flags_override_environment_settings() {
        let cli = parse(&[
            "candleview",
            "equity",
            "IBM",
            "--base-url",
            "http://127.0.0.1:9/query",
            "--timeout-ms",
            "2500",
        ]);
        let base = GatewayConfig::new("key").with_timeout(Some(Duration::from_secs(30)));

        let config = gateway_config(&cli, base);

        assert_eq!(config.base_url, "http://127.0.0.1:9/query");
        assert_eq!(config.timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn zero_timeout_flag_keeps_the_existing_timeout() {
        let cli = parse(&["candleview", "fx", "EUR", "USD", "--timeout-ms", "0"]);

        let unset = gateway_config(&cli, GatewayConfig::new("key"));
        assert_eq!(unset.timeout, None);

        let from_env = gateway_config(
            &cli,
            GatewayConfig::new("key").with_timeout(Some(Duration::from_secs(5))),
        );
        assert_eq!(from_env.timeout, Some(Duration::from_secs(5)));
    }
}
