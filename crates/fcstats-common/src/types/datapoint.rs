//! Raw datapoints returned by DescribeMetricList
//!
//! The monitoring API returns its datapoints as a JSON-encoded string. Rows
//! carry more fields than we read (`userId`, `functionName` on service rows,
//! qualifiers); anything unknown is ignored.

use serde::{Deserialize, Serialize};

/// One `ServiceBillableInvocations` row: a service's count for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInvocationDatapoint {
    /// Period start (Unix millis)
    #[serde(default)]
    pub timestamp: i64,
    /// FC service name
    pub service_name: String,
    /// Sampled value; the API reports counts as floats
    #[serde(alias = "Value")]
    pub value: f64,
}

/// One `FunctionAvgDuration` row: a function's mean duration for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDurationDatapoint {
    /// Period start (Unix millis)
    #[serde(default)]
    pub timestamp: i64,
    /// FC service name
    pub service_name: String,
    /// Function name within the service
    pub function_name: String,
    /// Average duration in milliseconds
    #[serde(alias = "Value")]
    pub value: f64,
}

impl FunctionDurationDatapoint {
    /// Composite `service/function` key
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.service_name, self.function_name)
    }
}
