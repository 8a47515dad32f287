//! Hand-off to the candlestick summarization collaborator.
//!
//! The summarizer itself lives outside this crate behind [`CandlestickAnalyzer`].
//! This module shapes its input (the latest candles, interval label and display
//! symbol) and wires "fetch, then analyze" together in [`Dashboard`].

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::gateway::{GatewayError, MarketDataGateway};
use crate::{CoreError, Query, Series};

/// Number of trailing candles forwarded for analysis.
pub const ANALYSIS_WINDOW: usize = 50;

/// Input of the summarization flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// JSON array of `{date, open, high, low, close}` objects.
    pub graph_data: String,
    /// `M5`, `M30`, `H1` or `D1`.
    pub interval: String,
    pub symbol: String,
}

impl AnalysisRequest {
    pub fn from_series(series: &Series) -> Result<Self, CoreError> {
        Ok(Self {
            graph_data: serde_json::to_string(series.tail(ANALYSIS_WINDOW))?,
            interval: series.resolution.as_str().to_owned(),
            symbol: series.display_symbol.clone(),
        })
    }

    /// Prompt text for a general-purpose language model.
    pub fn render_prompt(&self) -> String {
        format!(
            "You are a financial analyst who specializes in reading candlestick charts.\n\
             \n\
             Review the candlestick data below for the given instrument and interval.\n\
             Point out notable candlestick patterns and the prevailing trend, then\n\
             summarize what they suggest.\n\
             \n\
             Symbol: {symbol}\n\
             Interval: {interval}\n\
             Data: {data}\n\
             \n\
             Keep the analysis short and specific.\n",
            symbol = self.symbol,
            interval = self.interval,
            data = self.graph_data,
        )
    }
}

/// Output of the summarization flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("analysis failed: {message}")]
pub struct AnalysisError {
    message: String,
}

impl AnalysisError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// External summarizer seam.
pub trait CandlestickAnalyzer: Send + Sync {
    fn analyze<'a>(
        &'a self,
        request: AnalysisRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Analysis, AnalysisError>> + Send + 'a>>;
}

/// Series plus its textual analysis, as shown side by side on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub series: Series,
    pub analysis: String,
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl DashboardError {
    /// Query-independent label used when the dashboard surfaces the failure.
    pub fn title(&self) -> DashboardErrorTitle {
        match self {
            Self::Gateway(_) | Self::Core(_) => DashboardErrorTitle::FetchFailed,
            Self::Analysis(_) => DashboardErrorTitle::AnalysisFailed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardErrorTitle {
    FetchFailed,
    AnalysisFailed,
}

impl Display for DashboardErrorTitle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FetchFailed => f.write_str("Error fetching data"),
            Self::AnalysisFailed => f.write_str("Error analyzing data"),
        }
    }
}

/// Fetch-then-analyze action backing one dashboard load.
#[derive(Clone)]
pub struct Dashboard {
    gateway: MarketDataGateway,
    analyzer: Arc<dyn CandlestickAnalyzer>,
}

impl Dashboard {
    pub fn new(gateway: MarketDataGateway, analyzer: Arc<dyn CandlestickAnalyzer>) -> Self {
        Self { gateway, analyzer }
    }

    pub async fn load(&self, query: &Query) -> Result<DashboardSnapshot, DashboardError> {
        let series = self.gateway.fetch(query).await?;
        let request = AnalysisRequest::from_series(&series)?;

        let analysis = self.analyzer.analyze(request).await.map_err(|error| {
            warn!(symbol = %series.display_symbol, %error, "candlestick analysis failed");
            error
        })?;

        Ok(DashboardSnapshot {
            series,
            analysis: analysis.analysis,
        })
    }
}
