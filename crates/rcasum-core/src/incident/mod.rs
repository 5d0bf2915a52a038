//! Incident records and the client for the remote incident store

mod client;
mod pagination;
mod source;
mod status;
mod types;

pub use client::WebRcaClient;
pub use pagination::collect_pages;
pub use source::IncidentSource;
#[cfg(test)]
pub use source::MockIncidentSource;
pub use status::StatusType;
pub use types::{ActivityStamp, Incident, IncidentEvent, Page, parse_timestamp};
