//! Outcome of a refresh run

use crate::error::{RcaError, UnifiedError};
use crate::incident::Incident;
use std::fmt;
use tracing::info;

/// Step of the per-incident pipeline that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Probing events and follow-ups for recent activity
    Activity,
    /// Waiting for a worker slot, or the task never reported back
    Dispatch,
    /// Fetching the incident timeline
    Events,
    /// Generating the summary
    Summarize,
    /// Writing the summary back
    Write,
    /// The task panicked
    Panic,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureStage::Activity => "activity",
            FailureStage::Dispatch => "dispatch",
            FailureStage::Events => "events",
            FailureStage::Summarize => "summarize",
            FailureStage::Write => "write",
            FailureStage::Panic => "panic",
        };
        f.write_str(name)
    }
}

/// One incident that could not be refreshed
#[derive(Debug, Clone)]
pub struct TaskFailure {
    /// Store-internal id
    pub id: String,
    /// Public id
    pub incident_id: String,
    pub stage: FailureStage,
    pub error: RcaError,
}

impl TaskFailure {
    pub fn new(incident: &Incident, stage: FailureStage, error: RcaError) -> Self {
        Self {
            id: incident.id.clone(),
            incident_id: incident.incident_id.clone(),
            stage,
            error,
        }
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.incident_id,
            self.stage,
            self.error.error_code(),
            self.error
        )
    }
}

/// Counts and failures for one run.
///
/// `total` is the number of incidents listed; every one of them ends up in
/// exactly one of `skipped`, `summarized` or `failed`.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub total: usize,
    pub skipped: usize,
    pub summarized: usize,
    pub failed: usize,
    pub failures: Vec<TaskFailure>,
}

impl RunReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_success(&mut self) {
        self.summarized += 1;
    }

    pub fn record_failure(&mut self, failure: TaskFailure) {
        self.failed += 1;
        self.failures.push(failure);
    }

    /// Incidents that went through the refresh pipeline
    pub fn attempted(&self) -> usize {
        self.summarized + self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.incident_id.as_str()).collect()
    }

    pub(crate) fn log_summary(&self) {
        if self.skipped > 0 {
            info!("{} incidents skipped, summaries up-to-date", self.skipped);
        }
        info!(
            "incident summarization worker completed ({} total, {} errors, {} successes)",
            self.total, self.failed, self.summarized
        );
    }
}
