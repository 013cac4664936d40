/// Error type for [`crate::config`] module. Captures errors related to loading
/// configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error loading from environment variable
    #[error("missing or non-unicode environment variable: {0}")]
    Var(String),
    /// Error parsing integer environment variable
    #[error("failed to parse environment variable: {0}")]
    Parse(#[from] std::num::ParseIntError),
    /// Error parsing boolean environment variable
    #[error("failed to parse boolean environment variable: {0}")]
    ParseBool(String),
    /// Error parsing URL from environment variable
    #[error("failed to parse URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ConfigError {
    /// Missing or non-unicode env var.
    pub fn missing(s: &str) -> Self {
        ConfigError::Var(s.to_string())
    }
}
