// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! All things time-related.

pub use chrono::{DateTime, Local, Utc};

/// Format of the timestamp embedded in export file names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Tells time and returns the time.
///
/// Generally you will want to retrieve time using [`SystemClock`],
/// but in tests you may want to implement a `Clock` with a fixed time.
pub trait Clock {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;

    /// The current local time as a file-name-safe timestamp with
    /// one-second granularity, e.g. `2025-07-04_13-05-59`.
    fn timestamp(&self) -> String {
        self.now()
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }
}

/// Interacts with the system clock to get the current time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
