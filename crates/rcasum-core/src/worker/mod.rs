//! Incremental refresh of incident summaries

mod options;
mod refresh;
mod report;

#[cfg(test)]
mod tests;

pub use options::WorkerOptions;
pub use refresh::RefreshWorker;
pub use report::{FailureStage, RunReport, TaskFailure};
