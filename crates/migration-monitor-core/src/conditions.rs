//! # Status Conditions
//!
//! Cluster-style status condition entries and the "latest condition" fold
//! used to build failure descriptions.
//!
//! ## Selection Rule
//!
//! The latest condition is the first entry carrying the maximal
//! `lastTransitionTime`. An entry replaces the current best only when both
//! timestamps parse and the new one is strictly later, so ties and
//! unparsable timestamps keep the earlier entry.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single status condition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub condition_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

impl Condition {
    /// Parsed `lastTransitionTime`, if present and RFC 3339.
    #[must_use]
    pub fn transitioned_at(&self) -> Option<DateTime<FixedOffset>> {
        self.last_transition_time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
    }

    /// Non-empty message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    /// Non-empty reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref().filter(|r| !r.is_empty())
    }
}

/// Select the most recent condition.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn latest_condition(conditions: &[Condition]) -> Option<&Condition> {
    let mut iter = conditions.iter();
    let first = iter.next()?;
    Some(iter.fold(first, |latest, current| {
        match (current.transitioned_at(), latest.transitioned_at()) {
            (Some(current_at), Some(latest_at)) if current_at > latest_at => current,
            _ => latest,
        }
    }))
}
