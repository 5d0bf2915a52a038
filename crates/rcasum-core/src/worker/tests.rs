//! Refresh worker tests against an in-memory store and an instrumented LLM stub

use super::*;
use crate::error::{RcaError, RcaResult};
use crate::incident::{Incident, IncidentEvent, IncidentSource, MockIncidentSource, parse_timestamp};
use crate::llm::{CompletionClient, MockCompletionClient};
use crate::summarizer::{Prompt, Summarizer};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn ts(raw: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap()
}

fn incident(n: usize) -> Incident {
    Incident::new(
        format!("uuid-{n}"),
        format!("ITN-2025-{n:05}"),
        ts("2025-04-22T14:30:00Z"),
    )
    .with_field("last_changed_at", json!("2025-04-22T14:30:00Z"))
}

fn stale_incidents(count: usize) -> Vec<Incident> {
    (1..=count).map(incident).collect()
}

type Log = Arc<Mutex<Vec<String>>>;

/// Incident store kept in memory. Records go through their wire form on every
/// listing, and writes stamp `ai_summary_updated_at` and bump the raw
/// `updated_at` like the real store.
#[derive(Default)]
struct MemorySource {
    incidents: Mutex<Vec<Incident>>,
    activity: HashMap<String, DateTime<Utc>>,
    failing_activity: HashSet<String>,
    failing_events: HashSet<String>,
    failing_writes: HashSet<String>,
    log: Log,
    writes: Mutex<Vec<String>>,
}

impl MemorySource {
    fn new(incidents: Vec<Incident>) -> Self {
        Self {
            incidents: Mutex::new(incidents),
            ..Self::default()
        }
    }

    fn written_ids(&self) -> Vec<String> {
        let mut ids = self.writes.lock().clone();
        ids.sort();
        ids
    }
}

#[async_trait]
impl IncidentSource for MemorySource {
    async fn list_incidents(&self) -> RcaResult<Vec<Incident>> {
        self.incidents
            .lock()
            .iter()
            .cloned()
            .map(|incident| Incident::try_from(Map::from(incident)))
            .collect()
    }

    async fn get_incident(&self, public_id: &str) -> RcaResult<Incident> {
        self.incidents
            .lock()
            .iter()
            .find(|i| i.incident_id == public_id)
            .cloned()
            .ok_or_else(|| RcaError::not_found(public_id))
    }

    async fn list_events(&self, id: &str) -> RcaResult<Vec<IncidentEvent>> {
        if self.failing_events.contains(id) {
            return Err(RcaError::source_http("connection reset", "memory://events", None));
        }
        Ok(vec![IncidentEvent::note(format!("on-call paged for {id}"))])
    }

    async fn latest_activity(&self, incident: &Incident) -> RcaResult<Option<DateTime<Utc>>> {
        if self.failing_activity.contains(&incident.id) {
            return Err(RcaError::source_http("bad gateway", "memory://follow_ups", Some(502)));
        }
        Ok(self.activity.get(&incident.id).copied())
    }

    async fn update_summary(
        &self,
        id: &str,
        text: &str,
        written_at: DateTime<Utc>,
    ) -> RcaResult<()> {
        if self.failing_writes.contains(id) {
            return Err(RcaError::not_found_resource(format!("incident {id}"), "incident"));
        }
        self.log.lock().push(format!("write:{id}"));
        self.writes.lock().push(id.to_string());

        let mut incidents = self.incidents.lock();
        let incident = incidents
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| RcaError::not_found(id.to_string()))?;
        incident.ai_summary = Some(text.to_string());
        incident.ai_summary_updated_at = Some(written_at);
        incident.extra.insert(
            "updated_at".to_string(),
            json!((written_at + chrono::Duration::seconds(1)).to_rfc3339()),
        );
        Ok(())
    }
}

/// Completion stub that records ordering and peak concurrency
#[derive(Default)]
struct StubLlm {
    delay: Duration,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
    log: Log,
}

impl StubLlm {
    fn with_log(log: Log) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }
}

#[async_trait]
impl CompletionClient for StubLlm {
    async fn complete(&self, prompt: &Prompt) -> RcaResult<String> {
        let document: Value = serde_json::from_str(&prompt.document)?;
        let id = document["id"].as_str().unwrap_or_default().to_string();

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.panicking.contains(&id) {
            panic!("stub exploded on {id}");
        }
        if self.failing.contains(&id) {
            return Err(RcaError::llm_with_status("model overloaded", "stub", 503));
        }
        self.log.lock().push(format!("summarized:{id}"));
        Ok(format!("## Overview\nSummary of {id}"))
    }
}

fn worker(source: Arc<MemorySource>, llm: Arc<StubLlm>, options: WorkerOptions) -> RefreshWorker {
    let summarizer = Summarizer::new(llm, "Summarize.", Duration::from_secs(5));
    RefreshWorker::new(source, summarizer, options)
}

#[tokio::test]
async fn test_refreshes_stale_and_skips_fresh() {
    let incidents = vec![
        incident(1),
        incident(2).with_summary("old", ts("2025-04-22T14:00:00Z")),
        incident(3).with_summary("current", ts("2025-04-22T15:00:00Z")),
    ];
    let source = Arc::new(MemorySource::new(incidents));
    let llm = Arc::new(StubLlm::default());

    let report = worker(source.clone(), llm.clone(), WorkerOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.summarized, 2);
    assert_eq!(report.skipped, 1);
    assert!(report.is_clean());
    assert_eq!(source.written_ids(), vec!["uuid-1", "uuid-2"]);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_second_run_refreshes_nothing() {
    let source = Arc::new(MemorySource::new(stale_incidents(4)));
    let llm = Arc::new(StubLlm::default());
    let worker = worker(source.clone(), llm.clone(), WorkerOptions::default());

    let first = worker.run().await.unwrap();
    assert_eq!(first.summarized, 4);

    let second = worker.run().await.unwrap();
    assert_eq!(second.summarized, 0);
    assert_eq!(second.skipped, 4);
    assert_eq!(source.written_ids().len(), 4);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_llm_failure_is_isolated() {
    let source = Arc::new(MemorySource::new(stale_incidents(5)));
    let llm = Arc::new(StubLlm {
        failing: HashSet::from(["uuid-3".to_string()]),
        ..StubLlm::default()
    });

    let report = worker(source.clone(), llm, WorkerOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.summarized, 4);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failed_ids(), vec!["ITN-2025-00003"]);

    let failure = &report.failures[0];
    assert_eq!(failure.id, "uuid-3");
    assert_eq!(failure.stage, FailureStage::Summarize);
    assert_eq!(failure.error.incident_id(), Some("ITN-2025-00003"));
    assert!(matches!(failure.error.root_cause(), RcaError::Llm { .. }));

    assert_eq!(
        source.written_ids(),
        vec!["uuid-1", "uuid-2", "uuid-4", "uuid-5"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pool_bounds_concurrent_summaries() {
    let source = Arc::new(MemorySource::new(stale_incidents(10)));
    let llm = Arc::new(StubLlm {
        delay: Duration::from_millis(25),
        ..StubLlm::default()
    });

    let report = worker(source, llm.clone(), WorkerOptions::default().with_max_workers(3))
        .run()
        .await
        .unwrap();

    assert_eq!(report.summarized, 10);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 10);
    let peak = llm.max_in_flight.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak concurrency was {peak}");
    assert!(peak >= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_write_follows_its_summary() {
    let log: Log = Arc::default();
    let source = Arc::new(MemorySource {
        log: log.clone(),
        ..MemorySource::new(stale_incidents(6))
    });
    let llm = Arc::new(StubLlm {
        delay: Duration::from_millis(5),
        ..StubLlm::with_log(log.clone())
    });

    worker(source, llm, WorkerOptions::default())
        .run()
        .await
        .unwrap();

    let log = log.lock();
    for n in 1..=6 {
        let summarized = log.iter().position(|e| *e == format!("summarized:uuid-{n}"));
        let written = log.iter().position(|e| *e == format!("write:uuid-{n}"));
        match (summarized, written) {
            (Some(s), Some(w)) => assert!(s < w, "uuid-{n} written before summary"),
            other => panic!("uuid-{n} missing from log: {other:?}"),
        }
    }
    assert_eq!(log.iter().filter(|e| e.starts_with("write:")).count(), 6);
}

#[tokio::test]
async fn test_list_failure_is_fatal_and_writes_nothing() {
    let mut source = MockIncidentSource::new();
    source
        .expect_list_incidents()
        .times(1)
        .returning(|| Err(RcaError::source_unavailable("connection refused")));
    source.expect_list_events().times(0);
    source.expect_update_summary().times(0);

    let mut llm = MockCompletionClient::new();
    llm.expect_complete().times(0);

    let summarizer = Summarizer::new(Arc::new(llm), "Summarize.", Duration::from_secs(5));
    let result = RefreshWorker::new(Arc::new(source), summarizer, WorkerOptions::default())
        .run()
        .await;

    assert!(matches!(result, Err(RcaError::SourceUnavailable { .. })));
}

#[tokio::test]
async fn test_zero_workers_fails_before_listing() {
    let mut source = MockIncidentSource::new();
    source.expect_list_incidents().times(0);

    let summarizer = Summarizer::new(
        Arc::new(MockCompletionClient::new()),
        "Summarize.",
        Duration::from_secs(5),
    );
    let result = RefreshWorker::new(
        Arc::new(source),
        summarizer,
        WorkerOptions::default().with_max_workers(0),
    )
    .run()
    .await;

    assert!(matches!(result, Err(RcaError::Config { .. })));
}

#[tokio::test]
async fn test_event_and_write_failures_recorded_per_stage() {
    let source = Arc::new(MemorySource {
        failing_events: HashSet::from(["uuid-1".to_string()]),
        failing_writes: HashSet::from(["uuid-2".to_string()]),
        ..MemorySource::new(stale_incidents(3))
    });
    let llm = Arc::new(StubLlm::default());

    let report = worker(source.clone(), llm.clone(), WorkerOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.summarized, 1);
    assert_eq!(report.failed, 2);
    let stages: HashMap<&str, FailureStage> = report
        .failures
        .iter()
        .map(|f| (f.id.as_str(), f.stage))
        .collect();
    assert_eq!(stages["uuid-1"], FailureStage::Events);
    assert_eq!(stages["uuid-2"], FailureStage::Write);
    assert!(matches!(
        report.failures.iter().find(|f| f.id == "uuid-2").unwrap().error,
        RcaError::NotFound { .. }
    ));
    assert_eq!(source.written_ids(), vec!["uuid-3"]);
    // no summary is generated without the timeline
    assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_panicking_task_is_recorded() {
    let source = Arc::new(MemorySource::new(stale_incidents(3)));
    let llm = Arc::new(StubLlm {
        panicking: HashSet::from(["uuid-2".to_string()]),
        ..StubLlm::default()
    });

    let report = worker(source.clone(), llm, WorkerOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.summarized, 2);
    assert_eq!(report.failed, 1);
    let failure = &report.failures[0];
    assert_eq!(failure.incident_id, "ITN-2025-00002");
    assert_eq!(failure.stage, FailureStage::Panic);
    assert!(failure.error.to_string().contains("stub exploded on uuid-2"));
    assert_eq!(source.written_ids(), vec!["uuid-1", "uuid-3"]);
}

#[tokio::test]
async fn test_recent_activity_makes_summary_stale() {
    let summarized_at = ts("2025-04-22T15:00:00Z");
    let source = Arc::new(MemorySource {
        activity: HashMap::from([("uuid-1".to_string(), ts("2025-04-22T16:00:00Z"))]),
        failing_activity: HashSet::from(["uuid-3".to_string()]),
        ..MemorySource::new(vec![
            incident(1).with_summary("before comment", summarized_at),
            incident(2).with_summary("current", summarized_at),
            incident(3).with_summary("current", summarized_at),
        ])
    });
    let llm = Arc::new(StubLlm::default());

    let report = worker(source.clone(), llm, WorkerOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.summarized, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].stage, FailureStage::Activity);
    assert_eq!(report.failures[0].id, "uuid-3");
    assert_eq!(source.written_ids(), vec!["uuid-1"]);
}

#[tokio::test]
async fn test_since_skips_old_incidents() {
    let recent = Incident::new("uuid-new", "ITN-2026-00001", Utc::now() - chrono::Duration::days(1));
    let source = Arc::new(MemorySource::new(vec![incident(1), recent]));
    let llm = Arc::new(StubLlm::default());

    let report = worker(source.clone(), llm, WorkerOptions::default().with_since_days(7))
        .run()
        .await
        .unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.summarized, 1);
    assert_eq!(source.written_ids(), vec!["uuid-new"]);
}

#[tokio::test]
async fn test_zero_day_window_keeps_every_incident() {
    let source = Arc::new(MemorySource::new(stale_incidents(2)));
    let llm = Arc::new(StubLlm::default());

    let report = worker(source.clone(), llm, WorkerOptions::default().with_since_days(0))
        .run()
        .await
        .unwrap();

    assert_eq!(report.summarized, 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(source.written_ids(), vec!["uuid-1", "uuid-2"]);
}

#[tokio::test]
async fn test_largest_day_window_does_not_abort_run() {
    let source = Arc::new(MemorySource::new(stale_incidents(2)));
    let llm = Arc::new(StubLlm::default());

    let report = worker(
        source.clone(),
        llm,
        WorkerOptions::default().with_since_days(u32::MAX),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.summarized, 2);
    assert!(report.is_clean());
}
