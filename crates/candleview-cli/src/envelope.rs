use candleview_core::{GatewayError, Resolution, UtcDateTime};
use serde::{Deserialize, Serialize};

/// Standard response envelope for all `candleview` machine-readable outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn new(meta: EnvelopeMeta, data: T, errors: Vec<EnvelopeError>) -> Self {
        Self { meta, data, errors }
    }
}

/// Metadata attached to every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub generated_at: UtcDateTime,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(request_id: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            request_id: request_id.into(),
            generated_at: UtcDateTime::now(),
            latency_ms,
            display_symbol: None,
            resolution: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_subject(mut self, display_symbol: impl Into<String>, resolution: Resolution) -> Self {
        self.display_symbol = Some(display_symbol.into());
        self.resolution = Some(resolution);
        self
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// Structured error payload for failed responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&GatewayError> for EnvelopeError {
    fn from(error: &GatewayError) -> Self {
        Self {
            code: error.code().to_owned(),
            message: error.message().to_owned(),
            retryable: error.retryable(),
            status: error.status(),
        }
    }
}
