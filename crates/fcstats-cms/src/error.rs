//! Errors raised by the CMS client

use fcstats_common::FcStatsError;

/// Errors from constructing or calling the CMS client
#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    #[error("invalid credentials: {0} is empty")]
    InvalidCredentials(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server error (HTTP {status}): {code} {message}")]
    Server {
        status: u16,
        code: String,
        message: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<CmsError> for FcStatsError {
    fn from(err: CmsError) -> Self {
        FcStatsError::Transport(err.to_string())
    }
}
