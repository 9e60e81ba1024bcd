use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("auth service answered {0}")]
    Rejected(StatusCode),
    #[error("malformed response: {0}")]
    InvalidResponse(String),
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Request(e) if e.is_timeout())
    }
}
