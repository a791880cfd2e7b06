//! DescribeMetricList request and response

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport scheme for the RPC call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

/// Query for one metric over a time window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeMetricListRequest {
    pub metric_name: String,
    pub namespace: String,
    /// Bucket size in seconds
    pub period: u32,
    /// `YYYY-MM-DD HH:MM:SS`
    pub start_time: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub end_time: String,
    pub scheme: Scheme,
}

impl DescribeMetricListRequest {
    /// Create a request for `metric_name` in `namespace`
    pub fn new(metric_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            metric_name: metric_name.into(),
            namespace: namespace.into(),
            period: 60,
            start_time: String::new(),
            end_time: String::new(),
            scheme: Scheme::Https,
        }
    }

    /// Set the bucket size
    pub fn with_period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    /// Set the query window
    pub fn with_time_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_time = start.into();
        self.end_time = end.into();
        self
    }

    /// Set the transport scheme
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Action-specific query parameters, excluding the common signed ones
    pub(crate) fn action_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Action", "DescribeMetricList".to_string()),
            ("MetricName", self.metric_name.clone()),
            ("Namespace", self.namespace.clone()),
            ("Period", self.period.to_string()),
            ("StartTime", self.start_time.clone()),
            ("EndTime", self.end_time.clone()),
        ]
    }
}

/// DescribeMetricList response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeMetricListResponse {
    pub code: String,
    pub success: bool,
    pub message: String,
    /// JSON-encoded array of datapoints
    pub datapoints: String,
    pub request_id: String,
    pub period: String,
    pub next_token: Option<String>,
}

impl DescribeMetricListResponse {
    /// A successful response carrying `datapoints`
    pub fn ok(datapoints: impl Into<String>) -> Self {
        Self {
            code: "200".to_string(),
            success: true,
            datapoints: datapoints.into(),
            ..Default::default()
        }
    }

    /// A response reporting failure with `message`
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_decodes_pascal_case() {
        let body = r#"{"Code":"200","Success":true,"Period":"86400","RequestId":"abc","Datapoints":"[]"}"#;
        let resp: DescribeMetricListResponse = serde_json::from_str(body).unwrap();
        assert!(resp.success);
        assert_eq!(resp.datapoints, "[]");
        assert_eq!(resp.request_id, "abc");
        assert_eq!(resp.message, "");
        assert_eq!(resp.next_token, None);
    }

    #[test]
    fn test_action_params() {
        let req = DescribeMetricListRequest::new("FunctionAvgDuration", "acs_fc")
            .with_period(86400)
            .with_time_range("2024-01-01 00:00:01", "2024-01-31 23:59:59");
        let params = req.action_params();
        assert!(params.contains(&("Period", "86400".to_string())));
        assert!(params.contains(&("Namespace", "acs_fc".to_string())));
        assert_eq!(req.scheme, Scheme::Https);
        assert_eq!(req.scheme.to_string(), "https");
    }
}
