//! Incident data model
//!
//! Only the fields the refresh logic branches on are typed. Everything else
//! the store returns is kept verbatim in an open `extra` map and used solely
//! for prompt construction.

use crate::error::{RcaError, RcaResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parse an RFC 3339 timestamp into an absolute instant
pub fn parse_timestamp(raw: &str) -> RcaResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RcaError::invalid_input(format!("invalid timestamp '{}': {}", raw, e)))
}

/// An incident record from the remote store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Incident {
    /// Store-internal UUID, used in API paths
    pub id: String,
    /// Public identifier (e.g. `ITN-2025-00096`)
    pub incident_id: String,
    /// Last substantive change to the incident
    pub updated_at: DateTime<Utc>,
    /// Current AI-generated summary, if any
    pub ai_summary: Option<String>,
    /// When `ai_summary` was last written
    pub ai_summary_updated_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    /// Every other field of the record
    pub extra: Map<String, Value>,
}

impl Incident {
    /// Minimal incident, mainly for callers that build records by hand
    pub fn new(
        id: impl Into<String>,
        incident_id: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            incident_id: incident_id.into(),
            updated_at,
            ai_summary: None,
            ai_summary_updated_at: None,
            status: None,
            extra: Map::new(),
        }
    }

    pub fn with_summary(mut self, text: impl Into<String>, written_at: DateTime<Utc>) -> Self {
        self.ai_summary = Some(text.into());
        self.ai_summary_updated_at = Some(written_at);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}

fn read_timestamp(map: &Map<String, Value>, key: &str) -> RcaResult<Option<DateTime<Utc>>> {
    match map.get(key) {
        Some(Value::String(raw)) => parse_timestamp(raw).map(Some),
        _ => Ok(None),
    }
}

impl TryFrom<Map<String, Value>> for Incident {
    type Error = RcaError;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = take_string(&mut map, "id")
            .ok_or_else(|| RcaError::invalid_input_field("incident without id", "id"))?;
        let incident_id = take_string(&mut map, "incident_id").ok_or_else(|| {
            RcaError::invalid_input_field(
                format!("incident {} without incident_id", id),
                "incident_id",
            )
        })?;

        // The raw `updated_at` also moves when a summary is written back, so
        // it is only used when `last_changed_at` is absent. Both stay in `extra`.
        let updated_at = match read_timestamp(&map, "last_changed_at")? {
            Some(changed_at) => changed_at,
            None => read_timestamp(&map, "updated_at")?.unwrap_or(DateTime::<Utc>::MIN_UTC),
        };

        let ai_summary_updated_at = match map.remove("ai_summary_updated_at") {
            Some(Value::String(raw)) => Some(parse_timestamp(&raw)?),
            _ => None,
        };

        Ok(Self {
            id,
            incident_id,
            updated_at,
            ai_summary: take_string(&mut map, "ai_summary"),
            ai_summary_updated_at,
            status: take_string(&mut map, "status"),
            extra: map,
        })
    }
}

impl From<Incident> for Map<String, Value> {
    fn from(incident: Incident) -> Self {
        let mut map = incident.extra;
        map.insert("id".into(), Value::String(incident.id));
        map.insert("incident_id".into(), Value::String(incident.incident_id));
        if !map.contains_key("updated_at") && !map.contains_key("last_changed_at") {
            map.insert(
                "updated_at".into(),
                Value::String(incident.updated_at.to_rfc3339()),
            );
        }
        if let Some(summary) = incident.ai_summary {
            map.insert("ai_summary".into(), Value::String(summary));
        }
        if let Some(written_at) = incident.ai_summary_updated_at {
            map.insert(
                "ai_summary_updated_at".into(),
                Value::String(written_at.to_rfc3339()),
            );
        }
        if let Some(status) = incident.status {
            map.insert("status".into(), Value::String(status));
        }
        map
    }
}

/// One timeline entry of an incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IncidentEvent {
    pub fn note(text: impl Into<String>) -> Self {
        Self {
            note: Some(text.into()),
            creator: None,
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }
}

/// Minimal view of an event or follow-up used to detect recent activity
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityStamp {
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ActivityStamp {
    pub fn updated_at(&self) -> RcaResult<Option<DateTime<Utc>>> {
        self.updated_at.as_deref().map(parse_timestamp).transpose()
    }
}

/// Pagination envelope returned by list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: usize,
}
