//! Decides which incidents need a new summary

use crate::incident::Incident;
use chrono::{DateTime, Duration, Utc};

/// True when the incident has no summary yet or changed after it was written
pub fn needs_refresh(incident: &Incident) -> bool {
    needs_refresh_at(incident.updated_at, incident.ai_summary_updated_at)
}

/// Staleness rule on raw instants
pub fn needs_refresh_at(changed_at: DateTime<Utc>, summarized_at: Option<DateTime<Utc>>) -> bool {
    match summarized_at {
        None => true,
        Some(summarized_at) => summarized_at < changed_at,
    }
}

/// Raise `updated_at` to newer activity seen elsewhere on the incident
pub fn apply_activity(incident: &mut Incident, activity: Option<DateTime<Utc>>) {
    if let Some(activity) = activity {
        if activity > incident.updated_at {
            incident.updated_at = activity;
        }
    }
}

/// True when the incident last changed before `now - max_age`.
///
/// A window reaching past the earliest representable instant excludes nothing.
pub fn older_than(incident: &Incident, max_age: Duration, now: DateTime<Utc>) -> bool {
    now.checked_sub_signed(max_age)
        .is_some_and(|cutoff| incident.updated_at < cutoff)
}
