//! Payroll arithmetic
//!
//! Staff pay is derived from upload counts over the trailing pay period.
//! Count queries belong to the repository collaborator; this module is pure
//! arithmetic so it can be tested without a store.

use chrono::{DateTime, Duration, Utc};

/// Pay per regular document, in euro
pub const DOCUMENT_RATE_EUR: u64 = 2_000;

/// Pay per inspection report, in euro
pub const INSPECTION_RATE_EUR: u64 = 3_000;

/// Length of the pay period in days
pub const PAY_PERIOD_DAYS: i64 = 7;

/// Upload counts for one user over one pay period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentCounts {
    /// Regular documents uploaded
    pub documents: u64,
    /// Inspection reports uploaded
    pub inspections: u64,
}

/// Salary derived from upload counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryBreakdown {
    /// Pay earned from regular documents
    pub document_pay: u64,
    /// Pay earned from inspections
    pub inspection_pay: u64,
    /// Total pay
    pub total: u64,
}

/// Compute the salary for one pay period's counts
#[must_use]
pub fn weekly_salary(counts: DocumentCounts) -> SalaryBreakdown {
    let document_pay = counts.documents * DOCUMENT_RATE_EUR;
    let inspection_pay = counts.inspections * INSPECTION_RATE_EUR;
    SalaryBreakdown {
        document_pay,
        inspection_pay,
        total: document_pay + inspection_pay,
    }
}

/// Half-open time window counted for payroll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayPeriod {
    /// Window start (inclusive)
    pub start: DateTime<Utc>,
    /// Window end (exclusive)
    pub end: DateTime<Utc>,
}

impl PayPeriod {
    /// The trailing pay period ending at `now`
    #[must_use]
    pub fn trailing_week(now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(PAY_PERIOD_DAYS),
            end: now,
        }
    }

    /// Whether `at` falls inside this period
    #[inline]
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}
