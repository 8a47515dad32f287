use serde::{Deserialize, Serialize};

use crate::{Resolution, UtcDateTime};

/// One OHLC point.
///
/// Price ordering (`low <= open/close <= high`) is not enforced: upstream rows
/// are taken as delivered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(rename = "date")]
    pub timestamp: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub const fn new(timestamp: UtcDateTime, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    /// Single-valued point, as delivered for commodities.
    pub const fn flat(timestamp: UtcDateTime, value: f64) -> Self {
        Self::new(timestamp, value, value, value, value)
    }
}

/// Candles for one instrument and resolution, strictly ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SeriesRecord")]
pub struct Series {
    pub display_symbol: String,
    pub resolution: Resolution,
    candles: Vec<Candle>,
}

/// Wire shape of [`Series`]; deserialized candles go back through `Series::new`.
#[derive(Deserialize)]
struct SeriesRecord {
    display_symbol: String,
    resolution: Resolution,
    candles: Vec<Candle>,
}

impl From<SeriesRecord> for Series {
    fn from(record: SeriesRecord) -> Self {
        Self::new(record.display_symbol, record.resolution, record.candles)
    }
}

impl Series {
    /// Builds a series, sorting by timestamp and keeping the first candle seen
    /// for any repeated instant.
    pub fn new(
        display_symbol: impl Into<String>,
        resolution: Resolution,
        mut candles: Vec<Candle>,
    ) -> Self {
        candles.sort_by_key(|candle| candle.timestamp);
        candles.dedup_by_key(|candle| candle.timestamp);
        Self {
            display_symbol: display_symbol.into(),
            resolution,
            candles,
        }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// The most recent `count` candles, oldest first.
    pub fn tail(&self, count: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(count);
        &self.candles[start..]
    }
}
