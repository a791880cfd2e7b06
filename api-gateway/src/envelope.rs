//! Uniform JSON response envelope

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fcstats_common::FcStatsError;
use serde::{Deserialize, Serialize};
use tracing::error;

/// `msg` of every successful response
pub const SUCCESS_MSG: &str = "success";

/// `{msg, data?, timestamp}` wrapper used for every response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Unix seconds
    pub timestamp: i64,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            msg: SUCCESS_MSG.to_string(),
            data: Some(data),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl Envelope<()> {
    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            data: None,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Handler error rendered as a 500 failure envelope
#[derive(Debug)]
pub struct ApiError(pub FcStatsError);

impl From<FcStatsError> for ApiError {
    fn from(err: FcStatsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(kind = self.0.kind(), error = %self.0, "Stats request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Envelope::failure(self.0.to_string())),
        )
            .into_response()
    }
}
