//! # CandleView Core
//!
//! Market data gateway behind the CandleView dashboard.
//!
//! ## Overview
//!
//! - **Domain models** for queries, candles and series
//! - **Gateway** that routes a query to the upstream market-data API and
//!   normalizes the loosely-typed response into an ascending [`Series`]
//! - **Analysis hand-off** shaping the latest candles for a summarization flow
//! - **Caller-side retry** for throttled requests
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`analysis`] | Summarizer input, analyzer seam, fetch-then-analyze action |
//! | [`config`] | Injected gateway configuration |
//! | [`domain`] | Query, Candle, Series and value types |
//! | [`error`] | Core error types |
//! | [`gateway`] | Request routing, response validation, normalization |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`retry`] | Backoff and retry around the gateway |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use candleview_core::{GatewayConfig, MarketDataGateway, Query, Resolution};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = MarketDataGateway::new(GatewayConfig::from_env());
//!     let query = Query::fx("EUR", "USD", Resolution::Daily)?;
//!
//!     let series = gateway.fetch(&query).await?;
//!     if let Some(last) = series.last() {
//!         println!("{} close: {:.4}", series.display_symbol, last.close);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use candleview_core::{GatewayError, GatewayErrorKind};
//!
//! fn handle_error(error: GatewayError) {
//!     match error.kind() {
//!         GatewayErrorKind::RateLimited => {
//!             // Back off and ask again
//!         }
//!         GatewayErrorKind::NotFound => {
//!             // Likely a mistyped symbol
//!         }
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - The API key is injected through [`GatewayConfig`] and never logged
//! - Request URLs are redacted before they reach log output

pub mod analysis;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod retry;

pub use analysis::{
    Analysis, AnalysisError, AnalysisRequest, CandlestickAnalyzer, Dashboard, DashboardError,
    DashboardSnapshot, ANALYSIS_WINDOW,
};
pub use config::{ApiKey, GatewayConfig};
pub use domain::{
    Candle, Commodity, CurrencyCode, Instrument, Query, Resolution, Series, Symbol, UtcDateTime,
};
pub use error::{CoreError, ValidationError};
pub use gateway::{GatewayError, GatewayErrorKind, GatewayResult, MarketDataGateway, Route};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use retry::{fetch_with_retry, Backoff, RetryConfig};
