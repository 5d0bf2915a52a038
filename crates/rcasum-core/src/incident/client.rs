//! HTTP client for the WebRCA v1 incident API

use super::pagination::collect_pages;
use super::source::IncidentSource;
use super::types::{ActivityStamp, Incident, IncidentEvent, Page};
use crate::auth::TokenManager;
use crate::config::{Config, SourceConfig};
use crate::error::{RcaError, RcaResult, sanitize_error_text};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

/// Page size used when walking list endpoints
const LIST_PAGE_SIZE: u32 = 100;
/// Page size used when walking an incident timeline
const EVENT_PAGE_SIZE: u32 = 999;
/// Timeline entries included in an incident document
const DOCUMENT_EVENT_TYPES: &str = "comment,follow_up,escalation,external_reference,audit_log";
/// Timeline entries that count as activity on the incident
const ACTIVITY_EVENT_TYPES: &str = "comment,follow_up,escalation,external_reference";

/// WebRCA incident store client
pub struct WebRcaClient {
    http: Client,
    base_url: String,
    tokens: TokenManager,
    status_filter: Option<String>,
}

impl WebRcaClient {
    /// Build a client from the full runtime configuration
    pub fn from_config(config: &Config) -> RcaResult<Self> {
        let tokens = TokenManager::new(config.source.static_token.clone(), &config.sso)?;
        Ok(Self::new(&config.source, tokens)?.with_status_filter(config.status_param()))
    }

    pub fn new(source: &SourceConfig, tokens: TokenManager) -> RcaResult<Self> {
        let http = Client::builder()
            .timeout(source.request_timeout)
            .build()
            .map_err(|e| RcaError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: source.base_url.trim_end_matches('/').to_string(),
            tokens,
            status_filter: None,
        })
    }

    /// Restrict `list_incidents` to a comma-separated status list
    pub fn with_status_filter(mut self, statuses: impl Into<String>) -> Self {
        self.status_filter = Some(statuses.into());
        self
    }

    /// Bearer token for a request; SSO failures count as the store being unavailable
    async fn bearer_token(&self, url: &str) -> RcaResult<String> {
        self.tokens.access_token().await.map_err(|e| match e {
            RcaError::Auth { message, .. } => {
                RcaError::source_http(format!("SSO token exchange failed: {}", message), url, None)
            }
            other => other,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> RcaResult<T> {
        let url = self.url(path);
        let token = self.bearer_token(&url).await?;
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        debug!("HTTP Request: GET {} \"{}\"", response.url(), status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &url, &body));
        }

        response.json::<T>().await.map_err(|e| {
            RcaError::source_http(format!("Malformed response: {}", e), url, Some(status.as_u16()))
        })
    }

    async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        page_size: u32,
    ) -> RcaResult<Vec<T>> {
        collect_pages(|page| {
            let params = page_query(query, page, page_size);
            async move { self.get_json::<Page<T>>(path, &params).await }
        })
        .await
    }

    /// Newest `updated_at` from a single-item, newest-first listing
    async fn newest_stamp(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> RcaResult<Option<DateTime<Utc>>> {
        let page: Page<ActivityStamp> = self.get_json(path, query).await?;
        let mut newest = None;
        for stamp in &page.items {
            newest = newest.max(stamp.updated_at()?);
        }
        Ok(newest)
    }
}

/// Map a non-success HTTP response to the error the worker reports
fn status_error(status: StatusCode, url: &str, body: &str) -> RcaError {
    let detail = sanitize_error_text(body);
    if status == StatusCode::NOT_FOUND {
        RcaError::not_found_resource(format!("{} ({})", url, detail), "incident")
    } else {
        RcaError::source_http(
            format!("HTTP {}: {}", status.as_u16(), detail),
            url,
            Some(status.as_u16()),
        )
    }
}

fn events_query(event_types: &str, order_by: &str) -> Vec<(&'static str, String)> {
    vec![
        ("event_type", event_types.to_string()),
        ("order_by", order_by.to_string()),
    ]
}

fn page_query<'a>(query: &[(&'a str, String)], page: u32, size: u32) -> Vec<(&'a str, String)> {
    let mut params = query.to_vec();
    params.push(("page", page.to_string()));
    params.push(("size", size.to_string()));
    params
}

#[async_trait]
impl IncidentSource for WebRcaClient {
    #[instrument(skip(self))]
    async fn list_incidents(&self) -> RcaResult<Vec<Incident>> {
        let mut query = Vec::new();
        if let Some(statuses) = &self.status_filter {
            query.push(("status", statuses.clone()));
        }
        self.get_all("incidents", &query, LIST_PAGE_SIZE).await
    }

    #[instrument(skip(self))]
    async fn get_incident(&self, public_id: &str) -> RcaResult<Incident> {
        let page: Page<Incident> = self
            .get_json("incidents", &[("public_id", public_id.to_string())])
            .await?;
        page.items.into_iter().next().ok_or_else(|| {
            RcaError::not_found_resource(format!("incident {} not found", public_id), "incident")
        })
    }

    #[instrument(skip(self))]
    async fn list_events(&self, id: &str) -> RcaResult<Vec<IncidentEvent>> {
        self.get_all(
            &format!("incidents/{}/events", id),
            &events_query(DOCUMENT_EVENT_TYPES, "occurred_at asc"),
            EVENT_PAGE_SIZE,
        )
        .await
    }

    #[instrument(skip_all, fields(incident = %incident.incident_id))]
    async fn latest_activity(&self, incident: &Incident) -> RcaResult<Option<DateTime<Utc>>> {
        let mut query = events_query(ACTIVITY_EVENT_TYPES, "updated_at desc");
        query.push(("size", "1".to_string()));
        let event = self
            .newest_stamp(&format!("incidents/{}/events", incident.id), &query)
            .await?;
        let follow_up = self
            .newest_stamp(
                &format!("incidents/{}/follow_ups", incident.id),
                &[
                    ("order_by", "updated_at desc".to_string()),
                    ("size", "1".to_string()),
                ],
            )
            .await?;
        Ok(event.max(follow_up))
    }

    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn update_summary(
        &self,
        id: &str,
        text: &str,
        written_at: DateTime<Utc>,
    ) -> RcaResult<()> {
        let url = self.url(&format!("incidents/{}", id));
        let token = self.bearer_token(&url).await?;
        let response = self
            .http
            .patch(&url)
            .bearer_auth(token)
            .json(&json!({ "ai_summary": text }))
            .send()
            .await?;

        let status = response.status();
        debug!("HTTP Request: PATCH {} \"{}\"", url, status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &url, &body));
        }
        Ok(())
    }
}
