//! Takedown request status vocabulary.
//!
//! Unlike scan requests, takedown statuses are picked freely by an operator;
//! there is no transition table.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

pub const TAKEDOWN_PENDING: &str = "pending";
pub const TAKEDOWN_IN_PROCESS: &str = "in-process";
pub const TAKEDOWN_SUCCESS: &str = "success";
pub const TAKEDOWN_FAILED: &str = "failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TakedownStatus {
    Pending,
    InProcess,
    Success,
    Failed,
}

impl TakedownStatus {
    pub const ALL: [TakedownStatus; 4] = [
        TakedownStatus::Pending,
        TakedownStatus::InProcess,
        TakedownStatus::Success,
        TakedownStatus::Failed,
    ];

    /// Value stored in `takedown_requests.status`.
    pub fn as_str(self) -> &'static str {
        match self {
            TakedownStatus::Pending => TAKEDOWN_PENDING,
            TakedownStatus::InProcess => TAKEDOWN_IN_PROCESS,
            TakedownStatus::Success => TAKEDOWN_SUCCESS,
            TakedownStatus::Failed => TAKEDOWN_FAILED,
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            TakedownStatus::Pending => "Pending",
            TakedownStatus::InProcess => "In Process",
            TakedownStatus::Success => "Success",
            TakedownStatus::Failed => "Failed",
        }
    }

    /// Whether the takedown has reached an outcome (sets `completed_at`).
    pub fn is_completed(self) -> bool {
        matches!(self, TakedownStatus::Success | TakedownStatus::Failed)
    }
}

impl fmt::Display for TakedownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TakedownStatus {
    type Err = CoreError;

    /// Accepts either the stored value (`in-process`) or the label
    /// (`In Process`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TakedownStatus::ALL
            .into_iter()
            .find(|st| {
                st.as_str().eq_ignore_ascii_case(wanted) || st.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid takedown status '{wanted}'. Must be one of: Pending, In Process, Success, Failed"
                ))
            })
    }
}

/// Confirmation shown after an operator picks a new status.
pub fn status_change_notice(status: TakedownStatus) -> String {
    format!("The request status has been updated to {}.", status.label())
}

/// Confirmation shown after a DMCA notice is filed.
pub fn filing_notice(platform: &str) -> String {
    format!("The DMCA takedown notice has been submitted to {platform}.")
}

/// Local reference recorded when a notice is filed, e.g. `DMCA-42-20240101T120000`.
pub fn dmca_reference(takedown_id: DbId, filed_at: Timestamp) -> String {
    format!("DMCA-{takedown_id}-{}", filed_at.format("%Y%m%dT%H%M%S"))
}

/// Validate the operator-supplied fields of a new takedown request.
pub fn validate_new_takedown(url: &str, violation: &str) -> Result<(), CoreError> {
    if url.trim().is_empty() {
        return Err(CoreError::Validation("url must not be empty".to_string()));
    }
    if violation.trim().is_empty() {
        return Err(CoreError::Validation(
            "violation must not be empty".to_string(),
        ));
    }
    Ok(())
}
