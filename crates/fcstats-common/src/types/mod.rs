//! Data types shared by the metering and gateway crates

pub mod datapoint;
pub mod stats;
