//! # FC Stats CMS
//!
//! Client for the Cloud Monitor `DescribeMetricList` RPC.
//!
//! - [`MetricsClient`]: the seam the aggregators depend on
//! - [`CmsClient`]: signed HTTPS implementation against the real API
//! - [`signature`]: RPC request signing (HMAC-SHA1)

pub mod client;
pub mod error;
pub mod request;
pub mod signature;

pub use client::{CmsClient, CmsCredentials};
pub use error::CmsError;
pub use request::{DescribeMetricListRequest, DescribeMetricListResponse, Scheme};

use async_trait::async_trait;

/// API version of the metrics endpoint
pub const API_VERSION: &str = "2019-01-01";

/// Trait for metric query backends
#[async_trait]
pub trait MetricsClient: Send + Sync {
    /// Query one metric over a time range
    async fn describe_metric_list(
        &self,
        request: &DescribeMetricListRequest,
    ) -> Result<DescribeMetricListResponse, CmsError>;
}
