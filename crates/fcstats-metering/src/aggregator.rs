//! Monthly stats aggregator
//!
//! Each call issues exactly one DescribeMetricList query, parses the
//! datapoints and folds them. No caching, no retries.

use std::sync::Arc;

use fcstats_cms::{DescribeMetricListRequest, MetricsClient, Scheme};
use fcstats_common::{
    FcStatsError, FunctionDuration, FunctionDurationDatapoint, Result, ServiceInvocationDatapoint,
    ServiceStats,
};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::fold::{fold_function_durations, fold_service_invocations};
use crate::time_range::TimeRange;

/// Metric namespace of Function Compute
pub const NAMESPACE: &str = "acs_fc";

/// One bucket per day
pub const DAILY_PERIOD: u32 = 86_400;

/// Billable invocations per service
pub const SERVICE_BILLABLE_INVOCATIONS: &str = "ServiceBillableInvocations";

/// Average execution duration per function
pub const FUNCTION_AVG_DURATION: &str = "FunctionAvgDuration";

/// Runs the stats queries against an injected metrics client
#[derive(Clone)]
pub struct StatsAggregator {
    client: Arc<dyn MetricsClient>,
}

impl StatsAggregator {
    /// Create an aggregator over `client`
    pub fn new(client: Arc<dyn MetricsClient>) -> Self {
        Self { client }
    }

    /// Billable invocations for the current month
    pub async fn service_invocations(&self) -> Result<ServiceStats> {
        self.service_invocations_in(&TimeRange::current_month()).await
    }

    /// Billable invocations for an explicit window
    #[instrument(skip(self))]
    pub async fn service_invocations_in(&self, range: &TimeRange) -> Result<ServiceStats> {
        let payload = self.fetch(SERVICE_BILLABLE_INVOCATIONS, range).await?;
        let points: Vec<ServiceInvocationDatapoint> =
            parse_datapoints(SERVICE_BILLABLE_INVOCATIONS, &payload)?;

        let stats = fold_service_invocations(&points);
        debug!(
            datapoints = points.len(),
            services = stats.services.len(),
            total = stats.total_invocations,
            "Aggregated service invocations"
        );
        Ok(stats)
    }

    /// Mean function durations for the current month
    pub async fn function_durations(&self) -> Result<Vec<FunctionDuration>> {
        self.function_durations_in(&TimeRange::current_month()).await
    }

    /// Mean function durations for an explicit window
    #[instrument(skip(self))]
    pub async fn function_durations_in(&self, range: &TimeRange) -> Result<Vec<FunctionDuration>> {
        let payload = self.fetch(FUNCTION_AVG_DURATION, range).await?;
        let points: Vec<FunctionDurationDatapoint> =
            parse_datapoints(FUNCTION_AVG_DURATION, &payload)?;

        let durations = fold_function_durations(&points);
        debug!(
            datapoints = points.len(),
            functions = durations.len(),
            "Aggregated function durations"
        );
        Ok(durations)
    }

    /// Query `metric` and return its raw datapoints payload
    async fn fetch(&self, metric: &str, range: &TimeRange) -> Result<String> {
        let request = DescribeMetricListRequest::new(metric, NAMESPACE)
            .with_period(DAILY_PERIOD)
            .with_time_range(&range.start, &range.end)
            .with_scheme(Scheme::Https);

        debug!(metric, start = %range.start, end = %range.end, "Querying metric");

        let response = self.client.describe_metric_list(&request).await.map_err(|e| {
            warn!(metric, error = %e, "DescribeMetricList call failed");
            FcStatsError::from(e)
        })?;

        if !response.success {
            warn!(
                metric,
                code = %response.code,
                message = %response.message,
                "DescribeMetricList reported failure"
            );
            return Err(FcStatsError::Upstream(response.message));
        }

        Ok(response.datapoints)
    }
}

/// Decode a JSON-encoded datapoint array; `null` means no datapoints
fn parse_datapoints<T: DeserializeOwned>(metric: &str, payload: &str) -> Result<Vec<T>> {
    serde_json::from_str::<Option<Vec<T>>>(payload)
        .map(Option::unwrap_or_default)
        .map_err(|e| FcStatsError::parse(metric, e))
}
