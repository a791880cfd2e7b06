//! # FC Stats Metering
//!
//! Turns Cloud Monitor datapoints into the monthly views served by the
//! gateway:
//!
//! - [`TimeRange`]: the current-month query window
//! - [`StatsAggregator`]: one query per call, folded into [`ServiceStats`] or
//!   a list of [`FunctionDuration`]
//!
//! [`ServiceStats`]: fcstats_common::ServiceStats
//! [`FunctionDuration`]: fcstats_common::FunctionDuration

pub mod aggregator;
pub mod fold;
pub mod time_range;

pub use aggregator::{
    StatsAggregator, DAILY_PERIOD, FUNCTION_AVG_DURATION, NAMESPACE, SERVICE_BILLABLE_INVOCATIONS,
};
pub use fold::{fold_function_durations, fold_service_invocations};
pub use time_range::TimeRange;
