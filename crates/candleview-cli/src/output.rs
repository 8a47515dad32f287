use std::io::{self, Write};

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::envelope::Envelope;
use crate::error::CliError;

pub fn render(envelope: &Envelope<Value>, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => render_table(&mut out, envelope)?,
    }
    Ok(())
}

fn render_table(out: &mut impl Write, envelope: &Envelope<Value>) -> Result<(), CliError> {
    let meta = &envelope.meta;
    writeln!(out, "request_id  : {}", meta.request_id)?;
    writeln!(out, "generated_at: {}", meta.generated_at)?;
    writeln!(out, "latency_ms  : {}", meta.latency_ms)?;
    if let Some(symbol) = &meta.display_symbol {
        writeln!(out, "symbol      : {symbol}")?;
    }
    if let Some(resolution) = meta.resolution {
        writeln!(out, "resolution  : {resolution}")?;
    }

    if !meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    match envelope.data.pointer("/series/candles").and_then(Value::as_array) {
        Some(candles) => render_candles(out, candles)?,
        None if envelope.data.is_null() => {}
        None => {
            writeln!(out, "data:")?;
            for line in serde_json::to_string_pretty(&envelope.data)?.lines() {
                writeln!(out, "  {line}")?;
            }
        }
    }

    if let Some(prompt) = envelope.data.get("prompt").and_then(Value::as_str) {
        writeln!(out, "prompt:")?;
        for line in prompt.lines() {
            writeln!(out, "  {line}")?;
        }
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

fn render_candles(out: &mut impl Write, candles: &[Value]) -> Result<(), CliError> {
    writeln!(
        out,
        "{:<20}  {:>12}  {:>12}  {:>12}  {:>12}",
        "date", "open", "high", "low", "close"
    )?;
    for candle in candles {
        let date = candle.get("date").and_then(Value::as_str).unwrap_or("-");
        writeln!(
            out,
            "{:<20}  {:>12}  {:>12}  {:>12}  {:>12}",
            date,
            price(candle, "open"),
            price(candle, "high"),
            price(candle, "low"),
            price(candle, "close"),
        )?;
    }
    Ok(())
}

fn price(candle: &Value, field: &str) -> String {
    candle
        .get(field)
        .and_then(Value::as_f64)
        .map_or_else(|| String::from("-"), |value| format!("{value:.4}"))
}
