//! # FC Stats Common
//!
//! Shared types and errors for the Function Compute stats gateway.
//!
//! ## Core Types
//!
//! - [`ServiceStats`]: billable invocations for the month, per service and in total
//! - [`FunctionDuration`]: mean execution duration per `service/function`
//! - [`ServiceInvocationDatapoint`]/[`FunctionDurationDatapoint`]: raw rows
//!   returned by the monitoring API
//!
//! ## Errors
//!
//! - [`FcStatsError`]: every failure a stats request can end in

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{FcStatsError, Result};
pub use types::{
    datapoint::{FunctionDurationDatapoint, ServiceInvocationDatapoint},
    stats::{FunctionDuration, ServiceInvocations, ServiceStats},
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
