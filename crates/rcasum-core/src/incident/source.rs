//! The refresh worker's view of the incident store

use super::types::{Incident, IncidentEvent};
use crate::error::RcaResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Read/write access to incident records.
///
/// Implementations must be safe to call from many tasks at once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IncidentSource: Send + Sync {
    /// Every incident matching the configured status filter
    async fn list_incidents(&self) -> RcaResult<Vec<Incident>>;

    /// Look up one incident by its public id
    async fn get_incident(&self, public_id: &str) -> RcaResult<Incident>;

    /// Timeline entries of an incident, oldest first
    async fn list_events(&self, id: &str) -> RcaResult<Vec<IncidentEvent>>;

    /// Newest activity not reflected in the incident's own change time
    async fn latest_activity(&self, _incident: &Incident) -> RcaResult<Option<DateTime<Utc>>> {
        Ok(None)
    }

    /// Store a new summary; the store stamps `ai_summary_updated_at`
    async fn update_summary(
        &self,
        id: &str,
        text: &str,
        written_at: DateTime<Utc>,
    ) -> RcaResult<()>;
}
