//! Permission domain model and well-known permission codes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wildcard permission — satisfies every specific permission check.
pub const ALL_FUNCTIONS: &str = "ALL_FUNCTIONS";

/// Read-only super permission, accepted by report, datatable, and
/// resource-level read checks.
pub const ALL_FUNCTIONS_READ: &str = "ALL_FUNCTIONS_READ";

/// Grants read access to every report.
pub const REPORTING_SUPER_USER: &str = "REPORTING_SUPER_USER";

/// Grants checker approval rights for every maker-checker function.
pub const CHECKER_SUPER_USER: &str = "CHECKER_SUPER_USER";

/// Exempts the holder from loan write-protection rules.
pub const BYPASS_LOAN_WRITE_PROTECTION: &str = "BYPASS_LOAN_WRITE_PROTECTION";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: Uuid,
    /// The capability code checked at authorization time
    /// (e.g. `READ_CLIENT`, `APPROVE_LOAN`).
    pub code: String,
    /// Functional grouping used by the admin UI (e.g. `portfolio`).
    pub grouping: String,
    pub description: String,
}

impl Permission {
    pub fn new(code: impl Into<String>, grouping: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            id: Uuid::new_v4(),
            description: code.clone(),
            code,
            grouping: grouping.into(),
        }
    }
}
