//! The refresh run: scan, filter, dispatch, drain

use super::options::WorkerOptions;
use super::report::{FailureStage, RunReport, TaskFailure};
use crate::error::{RcaError, RcaResult};
use crate::incident::{Incident, IncidentSource};
use crate::staleness::{apply_activity, needs_refresh, older_than};
use crate::summarizer::Summarizer;
use chrono::{DateTime, Utc};
use futures::{FutureExt, StreamExt, stream};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span, warn};

type SharedReport = Arc<Mutex<RunReport>>;
type StageError = (FailureStage, RcaError);

/// Refreshes the summary of every stale incident, at most `max_workers` at a time
pub struct RefreshWorker {
    source: Arc<dyn IncidentSource>,
    summarizer: Summarizer,
    options: WorkerOptions,
}

impl RefreshWorker {
    pub fn new(
        source: Arc<dyn IncidentSource>,
        summarizer: Summarizer,
        options: WorkerOptions,
    ) -> Self {
        Self {
            source,
            summarizer,
            options,
        }
    }

    /// Run one refresh pass.
    ///
    /// Only a zero-size pool or a failed incident listing make the run fail;
    /// everything that goes wrong for a single incident lands in the report.
    pub async fn run(&self) -> RcaResult<RunReport> {
        if self.options.max_workers == 0 {
            return Err(RcaError::config_with_context(
                "max_workers must be at least 1",
                "Initializing worker pool",
            ));
        }

        let incidents = self.source.list_incidents().await?;
        info!("Fetched {} incidents", incidents.len());

        let report: SharedReport = Arc::new(Mutex::new(RunReport::new(incidents.len())));
        let to_refresh = self.scan(incidents, &report, Utc::now()).await;
        info!("{} incidents need AI summary updated", to_refresh.len());

        self.dispatch(to_refresh, &report).await;

        let report = Arc::try_unwrap(report)
            .map(Mutex::into_inner)
            .unwrap_or_else(|shared| shared.lock().clone());
        report.log_summary();
        Ok(report)
    }

    /// Refine change times with recent activity and keep the stale incidents
    async fn scan(
        &self,
        incidents: Vec<Incident>,
        report: &SharedReport,
        now: DateTime<Utc>,
    ) -> Vec<Incident> {
        let probed: Vec<Result<Incident, (Incident, RcaError)>> = stream::iter(incidents)
            .map(|mut incident| async move {
                if !self.wants_activity_probe(&incident, now) {
                    return Ok(incident);
                }
                match self.source.latest_activity(&incident).await {
                    Ok(activity) => {
                        debug!(
                            incident = %incident.incident_id,
                            ?activity,
                            "latest activity"
                        );
                        apply_activity(&mut incident, activity);
                        Ok(incident)
                    }
                    Err(e) => Err((incident, e)),
                }
            })
            .buffered(self.options.max_workers)
            .collect()
            .await;

        let mut to_refresh = Vec::new();
        for probe in probed {
            match probe {
                Ok(incident) if self.selects(&incident, now) => to_refresh.push(incident),
                Ok(_) => report.lock().record_skipped(),
                Err((incident, e)) => {
                    error!(
                        "failed to check activity for incident {}: {}",
                        incident.incident_id, e
                    );
                    report
                        .lock()
                        .record_failure(TaskFailure::new(&incident, FailureStage::Activity, e));
                }
            }
        }
        to_refresh
    }

    /// An already-stale incident inside the age window needs no probe
    fn wants_activity_probe(&self, incident: &Incident, now: DateTime<Utc>) -> bool {
        let outside_window = self
            .options
            .since
            .is_some_and(|age| older_than(incident, age, now));
        outside_window || !needs_refresh(incident)
    }

    fn selects(&self, incident: &Incident, now: DateTime<Utc>) -> bool {
        if let Some(age) = self.options.since {
            if older_than(incident, age, now) {
                info!(
                    "incident {} last updated more than {} days ago, skipping",
                    incident.incident_id,
                    age.num_days()
                );
                return false;
            }
        }
        if needs_refresh(incident) {
            info!("incident {} needs AI summary updated", incident.incident_id);
            true
        } else {
            info!("incident {} summary up-to-date", incident.incident_id);
            false
        }
    }

    /// Spawn one task per incident and wait for all of them
    async fn dispatch(&self, to_refresh: Vec<Incident>, report: &SharedReport) {
        let semaphore = Arc::new(Semaphore::new(self.options.max_workers));
        let mut tasks = JoinSet::new();
        let mut pending = HashMap::new();

        for incident in to_refresh {
            pending.insert(incident.id.clone(), incident.clone());
            let span = info_span!("incident", id = %incident.incident_id);
            let task = RefreshTask {
                source: Arc::clone(&self.source),
                summarizer: self.summarizer.clone(),
                semaphore: Arc::clone(&semaphore),
                report: Arc::clone(report),
                incident,
            };
            tasks.spawn(task.run().instrument(span));
        }

        drain(tasks, pending, report).await;
    }
}

/// Wait for every task. An incident whose task never reported back is
/// recorded as a dispatch failure so the report still adds up.
async fn drain(
    mut tasks: JoinSet<String>,
    mut pending: HashMap<String, Incident>,
    report: &SharedReport,
) {
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(id) => {
                pending.remove(&id);
            }
            Err(e) => error!("refresh task did not complete: {}", e),
        }
    }

    let mut report = report.lock();
    for incident in pending.values() {
        report.record_failure(TaskFailure::new(
            incident,
            FailureStage::Dispatch,
            RcaError::other("refresh task did not complete"),
        ));
    }
}

/// Work item for one stale incident
struct RefreshTask {
    source: Arc<dyn IncidentSource>,
    summarizer: Summarizer,
    semaphore: Arc<Semaphore>,
    report: SharedReport,
    incident: Incident,
}

impl RefreshTask {
    /// Process the incident and record the outcome; returns the store id
    async fn run(self) -> String {
        let outcome = AssertUnwindSafe(self.process()).catch_unwind().await;

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err((stage, e))) => Some(TaskFailure::new(&self.incident, stage, e)),
            Err(payload) => Some(TaskFailure::new(
                &self.incident,
                FailureStage::Panic,
                RcaError::other(format!("task panicked: {}", panic_message(payload.as_ref()))),
            )),
        };

        match failure {
            None => self.report.lock().record_success(),
            Some(failure) => {
                error!(
                    "summarization failed for incident {} at {}: {}",
                    failure.incident_id, failure.stage, failure.error
                );
                self.report.lock().record_failure(failure);
            }
        }
        self.incident.id
    }

    /// Events, then summary, then write. Nothing is written unless the summary succeeded.
    async fn process(&self) -> Result<(), StageError> {
        let _permit = self.semaphore.acquire().await.map_err(|_| {
            (
                FailureStage::Dispatch,
                RcaError::other("Failed to acquire worker permit"),
            )
        })?;
        let incident = &self.incident;

        info!("Fetching events for incident '{}' ...", incident.incident_id);
        let events = self
            .source
            .list_events(&incident.id)
            .await
            .map_err(|e| (FailureStage::Events, e))?;

        let summary = self
            .summarizer
            .summarize(incident, &events)
            .await
            .map_err(|e| (FailureStage::Summarize, e))?;

        self.source
            .update_summary(&incident.id, &summary, Utc::now())
            .await
            .map_err(|e| (FailureStage::Write, e))?;

        info!("Updated AI summary for incident '{}'", incident.incident_id);
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        warn!("task panicked with a non-string payload");
        "unknown panic".to_string()
    }
}
