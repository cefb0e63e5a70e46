//! Subscription plan tiers and the usage limits attached to each.
//!
//! The persisted enumeration is `Free` / `Pro` / `Enterprise`. The limits
//! mirror the tier table shown in the user-management view.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

pub const PLAN_FREE: &str = "Free";
pub const PLAN_PRO: &str = "Pro";
pub const PLAN_ENTERPRISE: &str = "Enterprise";

/// All valid plan values, in ascending tier order.
pub const VALID_PLANS: &[&str] = &[PLAN_FREE, PLAN_PRO, PLAN_ENTERPRISE];

/// A subscription tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Enterprise,
}

/// Usage ceilings granted by a plan. `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanLimits {
    pub scans: Option<i64>,
    pub takedowns: Option<i64>,
}

impl Plan {
    pub fn as_str(self) -> &'static str {
        match self {
            Plan::Free => PLAN_FREE,
            Plan::Pro => PLAN_PRO,
            Plan::Enterprise => PLAN_ENTERPRISE,
        }
    }

    pub fn limits(self) -> PlanLimits {
        match self {
            Plan::Free => PlanLimits {
                scans: Some(5),
                takedowns: Some(1),
            },
            Plan::Pro => PlanLimits {
                scans: Some(50),
                takedowns: Some(10),
            },
            Plan::Enterprise => PlanLimits {
                scans: Some(100),
                takedowns: None,
            },
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = CoreError;

    /// Plan names are matched exactly; `"pro"` is not a plan.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PLAN_FREE => Ok(Plan::Free),
            PLAN_PRO => Ok(Plan::Pro),
            PLAN_ENTERPRISE => Ok(Plan::Enterprise),
            other => Err(CoreError::Validation(format!(
                "Invalid plan '{other}'. Must be one of: {}",
                VALID_PLANS.join(", ")
            ))),
        }
    }
}

/// The ceiling already reached by `used` items, if any. `None` means one
/// more item still fits.
pub fn reached_limit(limit: Option<i64>, used: i64) -> Option<i64> {
    limit.filter(|&max| used >= max)
}

/// The error reported once a plan ceiling is reached.
pub fn quota_exceeded(resource: &str, used: i64, max: i64) -> CoreError {
    CoreError::Conflict(format!("Plan limit reached: {used} of {max} {resource} used"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_canonical_names() {
        assert_eq!("Free".parse::<Plan>().unwrap(), Plan::Free);
        assert_eq!("Pro".parse::<Plan>().unwrap(), Plan::Pro);
        assert_eq!("Enterprise".parse::<Plan>().unwrap(), Plan::Enterprise);
    }

    #[test]
    fn rejects_legacy_and_miscased_names() {
        for name in ["Demo", "Premium", "pro", "", "FREE"] {
            assert_matches!(name.parse::<Plan>(), Err(CoreError::Validation(_)));
        }
    }

    #[test]
    fn display_round_trips_through_as_str() {
        for plan in [Plan::Free, Plan::Pro, Plan::Enterprise] {
            assert_eq!(plan.to_string(), plan.as_str());
        }
    }

    #[test]
    fn enterprise_has_unlimited_takedowns() {
        assert_eq!(Plan::Enterprise.limits().takedowns, None);
        assert_eq!(Plan::Free.limits().scans, Some(5));
        assert_eq!(Plan::Pro.limits().takedowns, Some(10));
    }

    #[test]
    fn limit_reached_at_ceiling() {
        assert_eq!(reached_limit(Some(5), 4), None);
        assert_eq!(reached_limit(Some(5), 5), Some(5));
        assert_eq!(reached_limit(Some(1), 3), Some(1));
        assert_eq!(reached_limit(None, 10_000), None);
    }

    #[test]
    fn quota_error_is_conflict() {
        assert_matches!(
            quota_exceeded("scans", 5, 5),
            CoreError::Conflict(msg) if msg.contains("5 of 5 scans")
        );
    }

    #[test]
    fn default_plan_is_free() {
        assert_eq!(Plan::default(), Plan::Free);
    }
}
