//! Staleness classification of branches by last-commit age.

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::Branch;

/// Default age after which a branch counts as stale: three 30-day months.
pub const DEFAULT_THRESHOLD_DAYS: u32 = 90;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Outcome of evaluating one branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staleness {
    pub is_stale: bool,
    /// Time since the head commit. Zero when the commit date was unusable.
    pub age: TimeDelta,
}

impl Staleness {
    fn unknown() -> Self {
        Self {
            is_stale: false,
            age: TimeDelta::zero(),
        }
    }

    /// Exact fractional age in days
    pub fn age_days(&self) -> f64 {
        self.age.num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY
    }

    /// Age rounded to whole days for display
    pub fn display_days(&self) -> String {
        format!("{:.0}", self.age_days())
    }
}

/// Classifies branches against a fixed age threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessEvaluator {
    threshold: TimeDelta,
}

impl Default for StalenessEvaluator {
    fn default() -> Self {
        Self::from_days(DEFAULT_THRESHOLD_DAYS)
    }
}

impl StalenessEvaluator {
    pub fn new(threshold: TimeDelta) -> Self {
        Self { threshold }
    }

    pub fn from_days(days: u32) -> Self {
        Self::new(TimeDelta::days(i64::from(days)))
    }

    pub fn threshold(&self) -> TimeDelta {
        self.threshold
    }

    /// Decide whether `branch` is stale as of `now`.
    ///
    /// A branch without a parsable RFC 3339 commit date is never stale.
    pub fn evaluate(&self, branch: &Branch, now: DateTime<Utc>) -> Staleness {
        let Some(raw) = branch.commit_date() else {
            tracing::debug!(branch = %branch.name, "branch has no commit date");
            return Staleness::unknown();
        };

        let committed = match DateTime::parse_from_rfc3339(raw) {
            Ok(date) => date.with_timezone(&Utc),
            Err(e) => {
                tracing::warn!(branch = %branch.name, date = raw, error = %e, "unparsable commit date");
                return Staleness::unknown();
            }
        };

        let age = now.signed_duration_since(committed);
        Staleness {
            is_stale: age > self.threshold,
            age,
        }
    }
}
