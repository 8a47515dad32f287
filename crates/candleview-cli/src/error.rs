use candleview_core::{CoreError, GatewayError, GatewayErrorKind, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Gateway(error) if error.kind() == GatewayErrorKind::Configuration => 3,
            Self::Gateway(_) => 4,
            Self::Core(CoreError::Validation(_)) => 2,
            Self::Core(CoreError::Gateway(_)) => 4,
            Self::Core(CoreError::Serialization(_)) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_separate_configuration_from_other_gateway_errors() {
        assert_eq!(
            CliError::from(GatewayError::configuration("no key")).exit_code(),
            3
        );
        assert_eq!(CliError::from(GatewayError::not_found("IBM")).exit_code(), 4);
        assert_eq!(
            CliError::from(ValidationError::EmptySymbol).exit_code(),
            2
        );
    }
}
