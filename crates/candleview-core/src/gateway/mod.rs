//! Market data gateway.
//!
//! Maps a [`Query`] to exactly one upstream request, validates the response and
//! normalizes it into an ascending [`Series`]. Every failure comes back as a
//! typed [`GatewayError`]; no retries happen here (see [`crate::retry`]).
//!
//! # Error priority
//!
//! When several conditions apply, the first in this list wins:
//!
//! | Kind | Raised when |
//! |------|-------------|
//! | `Configuration` | no API key; checked before any network call |
//! | `Transport` | transport failure or non-2xx status |
//! | `Format` | body is not a JSON object, or the data key has the wrong shape |
//! | `Upstream` | payload carries `Error Message`, or an `Information` notice that is not a limit |
//! | `RateLimited` | payload carries `Note`, or an `Information` rate/quota notice |
//! | `NotFound` | expected data key missing |
//! | `NoData` | every entry was dropped during normalization |

pub mod normalize;
pub mod routing;

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GatewayConfig;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{Query, Series};

pub use routing::{PayloadShape, Route, RouteSpec};

/// Gateway failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorKind {
    Configuration,
    Transport,
    Format,
    Upstream,
    RateLimited,
    NotFound,
    NoData,
}

impl GatewayErrorKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Configuration => "gateway.configuration",
            Self::Transport => "gateway.transport",
            Self::Format => "gateway.format",
            Self::Upstream => "gateway.upstream",
            Self::RateLimited => "gateway.rate_limited",
            Self::NotFound => "gateway.not_found",
            Self::NoData => "gateway.no_data",
        }
    }
}

/// Structured gateway error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    kind: GatewayErrorKind,
    message: String,
    status: Option<u16>,
    retryable: bool,
}

impl GatewayError {
    fn new(kind: GatewayErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            retryable,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Configuration, message, false)
    }

    pub fn transport(message: impl Into<String>, retryable: bool) -> Self {
        Self::new(GatewayErrorKind::Transport, message, retryable)
    }

    pub fn http_status(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::new(
                GatewayErrorKind::Transport,
                format!("upstream request failed with status {status}; check the symbol and API key"),
                status == 429 || status >= 500,
            )
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Format, message, false)
    }

    /// `message` is the upstream text, kept verbatim.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Upstream, message, false)
    }

    /// `message` is the upstream notice, kept verbatim.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::RateLimited, message, true)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::NotFound, message, false)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::NoData, message, false)
    }

    pub const fn kind(&self) -> GatewayErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status for `Transport` errors caused by a non-2xx response.
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Whether backing off and asking again may succeed.
    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for GatewayError {}

/// Result of one gateway call.
pub type GatewayResult = Result<Series, GatewayError>;

/// Stateless bridge between queries and the upstream market-data API.
///
/// Cheap to clone and safe to share; concurrent calls are independent.
#[derive(Clone)]
pub struct MarketDataGateway {
    http_client: Arc<dyn HttpClient>,
    config: GatewayConfig,
}

impl MarketDataGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let http_client = Arc::new(ReqwestHttpClient::new(&config.user_agent));
        Self::with_http_client(config, http_client)
    }

    pub fn with_http_client(config: GatewayConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Builds the upstream request for `query` without sending it.
    pub fn build_request(&self, query: &Query) -> Result<(Route, HttpRequest), GatewayError> {
        let api_key = self.config.api_key.as_ref().ok_or_else(|| {
            GatewayError::configuration(format!(
                "upstream API key is not configured; set {}",
                crate::config::API_KEY_ENV
            ))
        })?;

        let route = Route::for_query(query);
        let request = HttpRequest::get(route.url(&self.config.base_url, api_key.expose()))
            .with_header("accept", "application/json")
            .with_timeout(self.config.timeout);
        Ok((route, request))
    }

    /// Fetches and normalizes one series. Issues at most one upstream call.
    pub async fn fetch(&self, query: &Query) -> GatewayResult {
        let (route, request) = self.build_request(query)?;
        debug!(
            function = %route.function,
            symbol = %route.display_symbol,
            resolution = %route.resolution,
            url = %request.redacted_url(),
            "requesting series"
        );

        let response = self.http_client.execute(request).await.map_err(|error| {
            GatewayError::transport(
                format!("upstream transport error: {}", error.message()),
                error.retryable(),
            )
        })?;

        if !response.is_success() {
            return Err(GatewayError::http_status(response.status));
        }

        let series = normalize::normalize_body(&route, &response.body)?;
        debug!(
            symbol = %series.display_symbol,
            candles = series.len(),
            "series normalized"
        );
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(GatewayErrorKind::RateLimited.code(), "gateway.rate_limited");
        assert_eq!(GatewayErrorKind::NoData.code(), "gateway.no_data");
    }

    #[test]
    fn only_throttle_and_transient_transport_errors_are_retryable() {
        assert!(GatewayError::rate_limited("slow down").retryable());
        assert!(GatewayError::http_status(503).retryable());
        assert!(GatewayError::http_status(429).retryable());
        assert!(!GatewayError::http_status(404).retryable());
        assert!(!GatewayError::upstream("bad call").retryable());
        assert!(!GatewayError::not_found("missing").retryable());
        assert!(!GatewayError::configuration("no key").retryable());
    }

    #[test]
    fn http_status_error_carries_code() {
        let error = GatewayError::http_status(502);
        assert_eq!(error.kind(), GatewayErrorKind::Transport);
        assert_eq!(error.status(), Some(502));
        assert!(error.message().contains("502"));
    }

    #[test]
    fn display_appends_code() {
        let error = GatewayError::upstream("Invalid API call.");
        assert_eq!(error.to_string(), "Invalid API call. (gateway.upstream)");
    }

    #[test]
    fn build_request_without_key_is_a_configuration_error() {
        let gateway = MarketDataGateway::new(GatewayConfig::default());
        let query = Query::equity("IBM", crate::Resolution::Daily).expect("valid");

        let error = gateway.build_request(&query).expect_err("must fail");
        assert_eq!(error.kind(), GatewayErrorKind::Configuration);
    }
}
