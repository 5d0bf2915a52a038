//! Error types for rcasum
//!
//! Every failure in the library is an [`RcaError`]. The variants follow the
//! taxonomy the refresh worker reasons about:
//! - `SourceUnavailable`: transport or auth failure talking to the incident store
//! - `NotFound`: the incident vanished between listing and writing
//! - `Llm`: the completion call failed, timed out, or returned nothing
//! - `Summarization`: an `Llm`/`Timeout` failure attributed to one incident
//!
//! All variants implement [`UnifiedError`] for programmatic handling.

mod constructors;
mod conversions;
mod sanitize;
mod types;
mod unified_error;

pub use sanitize::sanitize_error_text;
pub use types::{RcaError, RcaResult, UnifiedError};
