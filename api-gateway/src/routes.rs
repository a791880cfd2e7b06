//! Stats routes
//!
//! `GET /stats/service` and `GET /stats/function`. Any other path or
//! method gets an empty 404.

use std::any::Any;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fcstats_cms::{CmsClient, CmsError};
use fcstats_common::{FcStatsError, FunctionDuration, ServiceStats};
use fcstats_metering::StatsAggregator;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::envelope::{ApiError, Envelope};

/// Shared handler state
///
/// Holds the outcome of constructing the upstream client once at startup.
/// When that failed, every request reports the same initialization error.
#[derive(Clone)]
pub struct AppState {
    aggregator: Result<StatsAggregator, Arc<CmsError>>,
}

impl AppState {
    pub fn new(aggregator: StatsAggregator) -> Self {
        Self {
            aggregator: Ok(aggregator),
        }
    }

    /// State whose requests all fail with `err`
    pub fn with_init_error(err: CmsError) -> Self {
        Self {
            aggregator: Err(Arc::new(err)),
        }
    }

    /// State from the result of building the real client
    pub fn from_client(client: Result<CmsClient, CmsError>) -> Self {
        match client {
            Ok(client) => {
                info!(region = client.region_id(), "CMS client ready");
                Self::new(StatsAggregator::new(Arc::new(client)))
            }
            Err(err) => {
                error!(error = %err, "CMS client initialization failed");
                Self::with_init_error(err)
            }
        }
    }

    fn aggregator(&self) -> Result<&StatsAggregator, FcStatsError> {
        self.aggregator
            .as_ref()
            .map_err(|err| FcStatsError::ClientInit(err.to_string()))
    }
}

/// Build the gateway router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/stats/service", get(service_stats).fallback(not_found))
        .route("/stats/function", get(function_stats).fallback(not_found))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn service_stats(
    State(state): State<AppState>,
) -> Result<Json<Envelope<ServiceStats>>, ApiError> {
    let stats = state.aggregator()?.service_invocations().await?;
    Ok(Json(Envelope::success(stats)))
}

async fn function_stats(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<FunctionDuration>>>, ApiError> {
    let durations = state.aggregator()?.function_durations().await?;
    Ok(Json(Envelope::success(durations)))
}

/// Unsupported methods on a known path look the same as an unknown path
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!(panic = detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::failure("internal server error")),
    )
        .into_response()
}
