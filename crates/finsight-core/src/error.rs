//! Error types for Finsight

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The requested period has no block in the time series.
    #[error("Unknown period: {0}")]
    UnknownPeriod(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Service unreachable: {0}")]
    Unreachable(String),

    #[error("Upstream API error {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// True when the failure happened before any response was received
    /// (connection refused, DNS, timeout).
    pub fn is_transport(&self) -> bool {
        match self {
            Error::Unreachable(_) => true,
            Error::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
