//! Signed HTTP client for the Cloud Monitor RPC API

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::request::{DescribeMetricListRequest, DescribeMetricListResponse, Scheme};
use crate::signature::{self, SIGNATURE_METHOD, SIGNATURE_VERSION};
use crate::{CmsError, MetricsClient, API_VERSION};

/// Upstream request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Access key pair and region for the monitoring API
#[derive(Clone, Default)]
pub struct CmsCredentials {
    pub region_id: String,
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl CmsCredentials {
    pub fn new(
        region_id: impl Into<String>,
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
    ) -> Self {
        Self {
            region_id: region_id.into(),
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
        }
    }

    fn validate(&self) -> Result<(), CmsError> {
        if self.region_id.is_empty() {
            return Err(CmsError::InvalidCredentials("region id"));
        }
        if self.access_key_id.is_empty() {
            return Err(CmsError::InvalidCredentials("access key id"));
        }
        if self.access_key_secret.is_empty() {
            return Err(CmsError::InvalidCredentials("access key secret"));
        }
        Ok(())
    }
}

impl fmt::Debug for CmsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmsCredentials")
            .field("region_id", &self.region_id)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .finish()
    }
}

/// Cloud Monitor client
#[derive(Debug, Clone)]
pub struct CmsClient {
    credentials: CmsCredentials,
    http: reqwest::Client,
    /// Overrides `<scheme>://metrics.<region>.aliyuncs.com`
    endpoint: Option<String>,
}

impl CmsClient {
    /// Create a client; fails if any credential is empty
    pub fn new(credentials: CmsCredentials) -> Result<Self, CmsError> {
        credentials.validate()?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            credentials,
            http,
            endpoint: None,
        })
    }

    /// Send requests to `endpoint` (scheme and host) instead of the regional one
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into().trim_end_matches('/').to_string());
        self
    }

    pub fn region_id(&self) -> &str {
        &self.credentials.region_id
    }

    fn base_url(&self, scheme: Scheme) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("{}://metrics.{}.aliyuncs.com", scheme, self.credentials.region_id),
        }
    }

    /// Full signed query string for `request`
    fn signed_query(
        &self,
        request: &DescribeMetricListRequest,
        timestamp: &str,
        nonce: &str,
    ) -> Result<String, CmsError> {
        let mut params = request.action_params();
        params.extend([
            ("Version", API_VERSION.to_string()),
            ("Format", "JSON".to_string()),
            ("RegionId", self.credentials.region_id.clone()),
            ("AccessKeyId", self.credentials.access_key_id.clone()),
            ("SignatureMethod", SIGNATURE_METHOD.to_string()),
            ("SignatureVersion", SIGNATURE_VERSION.to_string()),
            ("SignatureNonce", nonce.to_string()),
            ("Timestamp", timestamp.to_string()),
        ]);

        let canonical = signature::canonical_query(&params);
        let string_to_sign = signature::string_to_sign("GET", &canonical);
        let sig = signature::sign(&self.credentials.access_key_secret, &string_to_sign)?;

        Ok(format!(
            "{}&Signature={}",
            canonical,
            signature::percent_encode(&sig)
        ))
    }
}

#[async_trait]
impl MetricsClient for CmsClient {
    #[instrument(skip(self, request), fields(metric = %request.metric_name))]
    async fn describe_metric_list(
        &self,
        request: &DescribeMetricListRequest,
    ) -> Result<DescribeMetricListResponse, CmsError> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let nonce = Uuid::new_v4().to_string();
        let query = self.signed_query(request, &timestamp, &nonce)?;
        let url = format!("{}/?{}", self.base_url(request.scheme), query);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<DescribeMetricListResponse>(&body) {
                Ok(err) => (err.code, err.message),
                Err(_) => (String::new(), body),
            };
            warn!(status = status.as_u16(), %code, "DescribeMetricList rejected");
            return Err(CmsError::Server {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let decoded: DescribeMetricListResponse =
            serde_json::from_str(&body).map_err(|e| CmsError::Decode(e.to_string()))?;
        debug!(request_id = %decoded.request_id, success = decoded.success, "DescribeMetricList answered");
        Ok(decoded)
    }
}
