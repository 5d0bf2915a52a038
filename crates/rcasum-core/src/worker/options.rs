use crate::config::{Config, DEFAULT_MAX_WORKERS};
use chrono::Duration;

/// Settings for one refresh run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerOptions {
    /// Upper bound on incidents processed at once
    pub max_workers: usize,
    /// Skip incidents whose last change is older than this
    pub since: Option<Duration>,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            since: None,
        }
    }
}

impl WorkerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_workers: config.max_workers,
            since: None,
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Only consider incidents changed within the last `days` days; 0 disables the cutoff
    pub fn with_since_days(mut self, days: u32) -> Self {
        self.since = (days > 0).then(|| Duration::days(i64::from(days)));
        self
    }
}
