use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CountersClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Failed to call counters API (url={url}, body={payload}): {source}")]
    Transport {
        url: String,
        payload: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Counters API returned {status}: {message}")]
    Http { status: StatusCode, message: String },

    #[error("Invalid response from counters API: {0}")]
    InvalidResponse(String),
}

impl CountersClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CountersClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
