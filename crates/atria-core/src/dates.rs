//! Calendar-date helpers used by the user aggregate.
//!
//! Real tenant time-zone and business-day resolution is owned by the
//! platform boundary; within this core both resolve to the current UTC
//! calendar date.

use chrono::{NaiveDate, Utc};

/// Current date in the tenant's locale. Stamped at user creation.
pub fn tenant_local_date() -> NaiveDate {
    Utc::now().date_naive()
}

/// Current business date. Stamped on password changes.
pub fn business_local_date() -> NaiveDate {
    Utc::now().date_naive()
}
