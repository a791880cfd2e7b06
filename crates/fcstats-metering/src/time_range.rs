//! Current-month query window
//!
//! The monitoring API takes local wall-clock strings. The window opens one
//! second after midnight on the 1st and closes at 23:59:59 on the last day.

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `[start, end]` window formatted as `YYYY-MM-DD HH:MM:SS`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    /// Window covering the current month in the local timezone
    pub fn current_month() -> Self {
        Self::for_month_of(Local::now().date_naive())
    }

    /// Window covering the month `date` falls in
    pub fn for_month_of(date: NaiveDate) -> Self {
        let first = date - Days::new(u64::from(date.day0()));
        let last = first + Months::new(1) - Days::new(1);

        Self {
            start: format!("{} 00:00:01", first.format(DATE_FORMAT)),
            end: format!("{} 23:59:59", last.format(DATE_FORMAT)),
        }
    }
}
