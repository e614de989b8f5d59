//! Error types for the content sifter.

use thiserror::Error;

/// Result type alias for sifter operations
pub type SifterResult<T> = Result<T, SifterError>;

/// Errors raised by the generation bridge, configuration and rule tables.
#[derive(Error, Debug)]
pub enum SifterError {
    #[error("Generation service error: {0}")]
    Generation(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Missing SIFTER_LLM_API_KEY or OPENROUTER_API_KEY")]
    MissingApiKey,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid rule catalog: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::ser::Error> for SifterError {
    fn from(err: toml::ser::Error) -> Self {
        SifterError::Config(config::ConfigError::Message(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_error_message() {
        let err = SifterError::Catalog("swap key 'x' is not banned".to_string());
        assert_eq!(err.to_string(), "Invalid rule catalog: swap key 'x' is not banned");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SifterError = io.into();
        assert!(matches!(err, SifterError::Io(_)));
    }
}
