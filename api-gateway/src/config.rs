//! Gateway configuration

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use fcstats_cms::{CmsClient, CmsCredentials, CmsError};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Seconds in-flight requests get to finish after a shutdown signal
    pub shutdown_grace_secs: u64,
    /// Cloud Monitor client settings
    pub cms: CmsSettings,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9000,
            shutdown_grace_secs: 5,
            cms: CmsSettings::default(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(host) = lookup("FC_SERVER_HOST") {
            cfg.host = host;
        }
        if let Some(port) = lookup("FC_SERVER_PORT") {
            match port.parse::<u16>() {
                Ok(p) => cfg.port = p,
                Err(_) => warn!(value = %port, default = cfg.port, "Ignoring invalid FC_SERVER_PORT"),
            }
        }
        if let Some(val) = lookup("FC_SHUTDOWN_GRACE_SECS") {
            match val.parse() {
                Ok(v) => cfg.shutdown_grace_secs = v,
                Err(_) => warn!(value = %val, "Ignoring invalid FC_SHUTDOWN_GRACE_SECS"),
            }
        }

        // Cloud Monitor settings
        if let Some(val) = lookup("REGION_ID") {
            cfg.cms.region_id = val;
        }
        if let Some(val) = lookup("ACCESS_KEY_ID") {
            cfg.cms.access_key_id = val;
        }
        if let Some(val) = lookup("ACCESS_KEY_SECRET") {
            cfg.cms.access_key_secret = val;
        }
        cfg.cms.endpoint = lookup("CMS_ENDPOINT").filter(|e| !e.is_empty());

        cfg
    }

    /// `host:port` to listen on
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Cloud Monitor client settings
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CmsSettings {
    pub region_id: String,
    pub access_key_id: String,
    pub access_key_secret: String,
    /// Endpoint override (scheme and host)
    pub endpoint: Option<String>,
}

impl CmsSettings {
    /// Construct the client these settings describe
    pub fn build_client(&self) -> std::result::Result<CmsClient, CmsError> {
        let client = CmsClient::new(CmsCredentials::new(
            self.region_id.clone(),
            self.access_key_id.clone(),
            self.access_key_secret.clone(),
        ))?;

        Ok(match &self.endpoint {
            Some(endpoint) => client.with_endpoint(endpoint.clone()),
            None => client,
        })
    }
}

impl fmt::Debug for CmsSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmsSettings")
            .field("region_id", &self.region_id)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
