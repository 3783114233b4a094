//! # Domain Adapters
//!
//! Fixed policy configurations of [`PhaseObserver`](crate::PhaseObserver)
//! for each watched resource kind. Adapters extract data; they add no
//! control flow of their own.
//!
//! Both kinds treat `Failed` as a failure-class and `Succeeded` as a
//! success-class terminal phase.

mod migration;
mod rolling;

pub use migration::{MigrationPolicy, MigrationStatusMonitor};
pub use rolling::{RollingMigrationsStatusMonitor, RollingPlanPolicy};

use crate::conditions::latest_condition;
use crate::primitives::{DEFAULT_FAILURE_REASON, PHASE_FAILED, PHASE_SUCCEEDED};
use crate::{Condition, FailureDescription, Phase, TerminalPhase};
use serde_json::Value as JsonValue;

/// Terminal phases shared by both resource kinds.
pub const MIGRATION_TERMINAL_PHASES: [TerminalPhase; 2] = [
    TerminalPhase::failure(PHASE_FAILED),
    TerminalPhase::success(PHASE_SUCCEEDED),
];

/// JSON string or `null`.
pub(crate) fn opt_str(value: Option<&str>) -> JsonValue {
    value.map_or(JsonValue::Null, JsonValue::from)
}

/// Describe a failure from status conditions.
///
/// Uses the latest condition for message and reason. `preferred_message`
/// wins over the condition message when present. Without either, the
/// message is `"<kind> <phase>"`.
pub(crate) fn describe_from_conditions(
    kind: &str,
    phase: Option<&Phase>,
    conditions: &[Condition],
    preferred_message: Option<&str>,
) -> FailureDescription {
    let latest = latest_condition(conditions);
    let message = preferred_message
        .or_else(|| latest.and_then(Condition::message))
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} {}", kind, Phase::label(phase)));
    let reason = latest
        .and_then(Condition::reason)
        .unwrap_or(DEFAULT_FAILURE_REASON)
        .to_string();

    FailureDescription {
        message,
        reason,
        timestamp: latest.and_then(|c| c.last_transition_time.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(message: &str, reason: &str, at: &str) -> Condition {
        Condition {
            message: Some(message.to_string()),
            reason: Some(reason.to_string()),
            last_transition_time: Some(at.to_string()),
            ..Condition::default()
        }
    }

    #[test]
    fn placeholder_without_conditions() {
        let d = describe_from_conditions("Migration", Some(&Phase::from("Failed")), &[], None);
        assert_eq!(d.message, "Migration Failed");
        assert_eq!(d.reason, "Unknown");
        assert_eq!(d.timestamp, None);
    }

    #[test]
    fn latest_condition_supplies_details() {
        let conditions = vec![
            condition("validated", "Ok", "2025-01-01T10:00:00Z"),
            condition("copy failed", "CopyError", "2025-01-01T11:00:00Z"),
        ];
        let d = describe_from_conditions("Migration", Some(&Phase::from("Failed")), &conditions, None);
        assert_eq!(d.message, "copy failed");
        assert_eq!(d.reason, "CopyError");
        assert_eq!(d.timestamp.as_deref(), Some("2025-01-01T11:00:00Z"));
    }

    #[test]
    fn preferred_message_wins() {
        let conditions = vec![condition("from condition", "R", "2025-01-01T10:00:00Z")];
        let d = describe_from_conditions("Plan", None, &conditions, Some("from status"));
        assert_eq!(d.message, "from status");
        assert_eq!(d.reason, "R");
    }

    #[test]
    fn empty_condition_message_falls_back() {
        let conditions = vec![Condition {
            message: Some(String::new()),
            ..Condition::default()
        }];
        let d = describe_from_conditions("Migration", Some(&Phase::from("Failed")), &conditions, None);
        assert_eq!(d.message, "Migration Failed");
    }
}
