//! Wall-clock source for document timestamps.
//!
//! # Invariants
//! - Formatted values always use `TIMESTAMP_FORMAT` (`yyyy-MM-dd HH:mm:ss`).

use chrono::{Local, NaiveDateTime};

/// `strftime` layout of persisted `created_date` / `modified_date`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Time source used by repositories when stamping documents.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// Current time in the persisted timestamp layout.
    fn now_formatted(&self) -> String {
        format_timestamp(self.now())
    }
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}
