//! Scan request lifecycle: status vocabulary, review actions and priorities.
//!
//! A request starts `pending` and is decided exactly once. Both `approved`
//! and `rejected` are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

/// Persisted status of a scan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Pending,
    Approved,
    Rejected,
}

impl ScanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ScanStatus::Pending => STATUS_PENDING,
            ScanStatus::Approved => STATUS_APPROVED,
            ScanStatus::Rejected => STATUS_REJECTED,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, ScanStatus::Pending)
    }

    /// Only `pending -> approved` and `pending -> rejected` are legal.
    pub fn can_transition_to(self, next: ScanStatus) -> bool {
        self == ScanStatus::Pending && next.is_terminal()
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(ScanStatus::Pending),
            STATUS_APPROVED => Ok(ScanStatus::Approved),
            STATUS_REJECTED => Ok(ScanStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid scan request status '{other}'"
            ))),
        }
    }
}

/// A reviewer's decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
        }
    }

    /// The status a request lands in after this action.
    pub fn target_status(self) -> ScanStatus {
        match self {
            ReviewAction::Approve => ScanStatus::Approved,
            ReviewAction::Reject => ScanStatus::Rejected,
        }
    }
}

/// Review priority requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    /// Case-insensitive. `normal` is accepted as an alias for `Medium`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" | "normal" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(CoreError::Validation(format!(
                "Invalid priority '{s}'. Must be one of: High, Medium, Low"
            ))),
        }
    }
}

/// Normalize reviewer notes: blank notes are stored as NULL.
pub fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes.and_then(|n| {
        let trimmed = n.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Trim purposes, dropping blank entries. Order is preserved.
pub fn clean_purposes(purposes: &[String]) -> Vec<String> {
    purposes
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Findings must carry a non-empty result text before they are persisted
/// as part of an approval.
pub fn validate_result_text(result: &str) -> Result<(), CoreError> {
    if result.trim().is_empty() {
        return Err(CoreError::Validation(
            "Scan result text is required to approve a request".to_string(),
        ));
    }
    Ok(())
}

/// Validate the user-provided fields of a new scan request.
pub fn validate_new_request(url: &str, content_type: &str) -> Result<(), CoreError> {
    if url.trim().is_empty() {
        return Err(CoreError::Validation("url must not be empty".to_string()));
    }
    if content_type.trim().is_empty() {
        return Err(CoreError::Validation(
            "content_type must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn actions_map_to_statuses() {
        assert_eq!(ReviewAction::Approve.target_status(), ScanStatus::Approved);
        assert_eq!(ReviewAction::Reject.target_status(), ScanStatus::Rejected);
        assert_eq!(ReviewAction::Approve.target_status().as_str(), "approved");
        assert_eq!(ReviewAction::Reject.target_status().as_str(), "rejected");
    }

    #[test]
    fn pending_moves_to_either_terminal_state() {
        assert!(ScanStatus::Pending.can_transition_to(ScanStatus::Approved));
        assert!(ScanStatus::Pending.can_transition_to(ScanStatus::Rejected));
        assert!(!ScanStatus::Pending.can_transition_to(ScanStatus::Pending));
    }

    #[test]
    fn terminal_states_never_move() {
        for from in [ScanStatus::Approved, ScanStatus::Rejected] {
            assert!(from.is_terminal());
            for to in [ScanStatus::Pending, ScanStatus::Approved, ScanStatus::Rejected] {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn status_parses_persisted_strings() {
        assert_eq!("pending".parse::<ScanStatus>().unwrap(), ScanStatus::Pending);
        assert_matches!("Pending".parse::<ScanStatus>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn action_deserializes_lowercase() {
        let action: ReviewAction = serde_json::from_str("\"approve\"").unwrap();
        assert_eq!(action, ReviewAction::Approve);
        assert!(serde_json::from_str::<ReviewAction>("\"flag\"").is_err());
    }

    #[test]
    fn priority_accepts_normal_alias() {
        assert_eq!("normal".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_matches!("urgent".parse::<Priority>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_notes_become_none() {
        assert_eq!(normalize_notes(Some("   ".into())), None);
        assert_eq!(normalize_notes(None), None);
        assert_eq!(
            normalize_notes(Some(" looks infringing ".into())),
            Some("looks infringing".to_string())
        );
    }

    #[test]
    fn purposes_drop_blanks_in_order() {
        let raw = vec!["Monitoring".to_string(), " ".to_string(), " Takedown ".to_string()];
        assert_eq!(clean_purposes(&raw), vec!["Monitoring", "Takedown"]);
    }

    #[test]
    fn empty_result_text_rejected() {
        assert!(validate_result_text("match found").is_ok());
        assert_matches!(validate_result_text("  "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn new_request_requires_url_and_content_type() {
        assert!(validate_new_request("https://x.com/v", "Video").is_ok());
        assert!(validate_new_request("", "Video").is_err());
        assert!(validate_new_request("https://x.com/v", " ").is_err());
    }
}
