//! Externally visible reference numbers (`POL-…`, `CLM-…`)

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Generates `<PREFIX>-<millis>` references that never repeat within a process
///
/// Two issuances inside the same millisecond would otherwise collide, so the
/// generator hands out `max(now, last + 1)`.
#[derive(Debug)]
pub struct ReferenceGenerator {
    prefix: &'static str,
    last: AtomicI64,
}

impl ReferenceGenerator {
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            last: AtomicI64::new(0),
        }
    }

    /// Returns the next reference number
    pub fn next(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(previous + 1);
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return format!("{}-{}", self.prefix, candidate),
                Err(actual) => previous = actual,
            }
        }
    }
}
