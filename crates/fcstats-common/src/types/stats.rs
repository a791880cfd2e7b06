//! Aggregated views returned by the stats endpoints

use serde::{Deserialize, Serialize};

/// Billable invocations for one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInvocations {
    /// Service name
    pub name: String,
    /// Invocations counted toward billing
    pub invocations: i64,
}

/// Billable invocations across all services in the window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStats {
    /// Sum over all datapoints
    pub total_invocations: i64,
    /// One entry per distinct service
    pub services: Vec<ServiceInvocations>,
}

impl ServiceStats {
    /// Look up a service's invocations by name
    pub fn invocations_of(&self, name: &str) -> Option<i64> {
        self.services
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.invocations)
    }
}

/// Mean execution duration of one function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDuration {
    /// `service/function`
    pub name: String,
    /// Mean of all samples in the window (ms)
    pub duration: f64,
}
