#![allow(missing_docs)]

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Gateway API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("API returned empty response")]
    EmptyResponse,

    #[error("API returned empty embedding data")]
    EmptyEmbedding,

    #[error("Failed to parse JSON object: {message}: {raw}")]
    InvalidJson { message: String, raw: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Tokenization error: {0}")]
    TokenizerError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl GatewayError {
    /// HTTP status code for API-level failures, if there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
