//! Server-side "default display days" value.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::config::DISPLAY_DAYS_RANGE;
use crate::error::{AppError, AppResult};

/// Shared display-days setting.
///
/// Every clone reads and writes the same value. Runtime changes live for the
/// process lifetime; a restart returns to `[listings] default_display_days`.
#[derive(Debug, Clone)]
pub struct ListingPolicy {
    display_days: Arc<AtomicI64>,
}

impl ListingPolicy {
    pub fn new(display_days: i64) -> AppResult<Self> {
        check_range(display_days)?;
        Ok(Self {
            display_days: Arc::new(AtomicI64::new(display_days)),
        })
    }

    pub fn display_days(&self) -> i64 {
        self.display_days.load(Ordering::Acquire)
    }

    /// Replaces the value and returns the previous one.
    pub fn set_display_days(&self, days: i64) -> AppResult<i64> {
        check_range(days)?;
        Ok(self.display_days.swap(days, Ordering::AcqRel))
    }
}

fn check_range(days: i64) -> AppResult<()> {
    if DISPLAY_DAYS_RANGE.contains(&days) {
        Ok(())
    } else {
        Err(AppError::invalid_argument(
            "default_display_days",
            format!(
                "must be between {} and {}, got {}",
                DISPLAY_DAYS_RANGE.start(),
                DISPLAY_DAYS_RANGE.end(),
                days
            ),
        ))
    }
}
