//! Error types for the stats gateway
//!
//! Every variant is terminal for the request that produced it. Nothing is
//! retried or recovered locally; the gateway turns each one into a failure
//! envelope.

use thiserror::Error;

/// Result type alias using FcStatsError
pub type Result<T> = std::result::Result<T, FcStatsError>;

/// Unified error type for stats operations
#[derive(Debug, Error)]
pub enum FcStatsError {
    /// The monitoring client could not be constructed at startup
    #[error("CMS client initialization error, {0}")]
    ClientInit(String),

    /// The DescribeMetricList call itself failed (network, auth, HTTP status)
    #[error("{0}")]
    Transport(String),

    /// The monitoring service answered but reported failure
    #[error("{0}")]
    Upstream(String),

    /// The datapoints payload did not have the expected shape
    #[error("failed to parse DescribeMetricList({metric}) result, {reason}")]
    Parse { metric: String, reason: String },
}

impl FcStatsError {
    /// Build a parse error for the given metric from a serde failure
    pub fn parse(metric: impl Into<String>, err: serde_json::Error) -> Self {
        FcStatsError::Parse {
            metric: metric.into(),
            reason: err.to_string(),
        }
    }

    /// Short machine-readable label, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            FcStatsError::ClientInit(_) => "client_init",
            FcStatsError::Transport(_) => "transport",
            FcStatsError::Upstream(_) => "upstream",
            FcStatsError::Parse { .. } => "parse",
        }
    }
}
