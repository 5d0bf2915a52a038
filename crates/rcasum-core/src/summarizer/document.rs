//! Incident document construction
//!
//! The document is the incident reduced to the fields worth summarizing,
//! with its cleaned timeline attached under `events`.

use super::cleanup::clean_note;
use crate::error::RcaResult;
use crate::incident::{Incident, IncidentEvent};
use serde_json::{Map, Value};

const INCIDENT_KEYS: &[&str] = &[
    "id",
    "summary",
    "description",
    "incident_id",
    "products",
    "status",
    "external_coordination",
    "created_at",
    "resolved_at",
    "private",
    "creator",
    "incident_owner",
    "participants",
];

const PERSON_KEYS: &[&str] = &["name"];
const EVENT_CREATOR_KEYS: &[&str] = &["name", "email"];

/// Filtered, serializable view of an incident and its events
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentDocument {
    fields: Map<String, Value>,
}

impl IncidentDocument {
    pub fn build(incident: &Incident, events: &[IncidentEvent]) -> Self {
        let mut fields: Map<String, Value> = incident.clone().into();
        fields.retain(|key, _| INCIDENT_KEYS.contains(&key.as_str()));

        for key in ["creator", "incident_owner", "participants"] {
            if let Some(value) = fields.get_mut(key) {
                retain_person_keys(value, PERSON_KEYS);
            }
        }

        let events = events.iter().map(event_entry).collect();
        fields.insert("events".into(), Value::Array(events));

        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn event_count(&self) -> usize {
        self.fields["events"].as_array().map_or(0, Vec::len)
    }

    /// Compact JSON with keys in sorted order
    pub fn to_json(&self) -> RcaResult<String> {
        Ok(serde_json::to_string(&self.fields)?)
    }
}

fn retain_keys(map: &mut Map<String, Value>, keys: &[&str]) {
    map.retain(|key, _| keys.contains(&key.as_str()));
}

fn retain_person_keys(value: &mut Value, keys: &[&str]) {
    match value {
        Value::Object(map) => retain_keys(map, keys),
        Value::Array(people) => {
            for person in people {
                if let Value::Object(map) = person {
                    retain_keys(map, keys);
                }
            }
        }
        _ => {}
    }
}

fn event_entry(event: &IncidentEvent) -> Value {
    let mut entry = Map::new();
    if let Some(note) = &event.note {
        entry.insert("note".into(), Value::String(clean_note(note)));
    }
    if let Some(creator) = &event.creator {
        let mut creator = creator.clone();
        retain_keys(&mut creator, EVENT_CREATOR_KEYS);
        if !creator.is_empty() {
            entry.insert("creator".into(), Value::Object(creator));
        }
    }
    if let Some(created_at) = &event.created_at {
        entry.insert("created_at".into(), Value::String(created_at.clone()));
    }
    if let Some(updated_at) = &event.updated_at {
        entry.insert("updated_at".into(), Value::String(updated_at.clone()));
    }
    Value::Object(entry)
}
