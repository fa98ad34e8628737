//! Outlook calendar through Microsoft Graph
//!
//! Authenticates with the OAuth2 client-credentials flow and manages the
//! calendar of a single configured mailbox. A token is acquired per
//! operation; nothing is cached between calls.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::calendar::service::{enumerate_listing, CalendarEvent, CalendarService, ScheduleEntry};
use crate::core::config::CalendarConfig;
use crate::core::error::{CopilotError, Result};

const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";
const EVENT_BODY: &str = "Scheduled by mini-copilot";
const LIST_FIELDS: &str = "id,subject,body,start,end";
const GRAPH_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Calendar backed by Microsoft Graph
pub struct GraphCalendar {
    client: Client,
    tenant: String,
    client_id: String,
    client_secret: String,
    user: String,
    graph_url: String,
    authority_url: String,
    time_zone: String,
}

impl GraphCalendar {
    pub fn new(config: &CalendarConfig) -> Result<Self> {
        let client_secret = config
            .client_secret
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CopilotError::ConfigError("calendar.client_secret not set".into()))?;

        Ok(Self {
            client: Client::new(),
            tenant: config.tenant.clone(),
            client_id: config.client_id.clone(),
            client_secret,
            user: config.user.clone(),
            graph_url: config.graph_url.trim_end_matches('/').to_string(),
            authority_url: config.authority_url.trim_end_matches('/').to_string(),
            time_zone: config.time_zone.clone(),
        })
    }

    fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority_url, self.tenant)
    }

    fn events_url(&self) -> String {
        format!("{}/users/{}/calendar/events", self.graph_url, self.user)
    }

    fn event_url(&self, id: &str) -> String {
        format!("{}/{}", self.events_url(), id)
    }

    fn graph_time(&self, value: NaiveDateTime) -> DateTimeTimeZone {
        DateTimeTimeZone {
            date_time: value.format(GRAPH_TIME_FORMAT).to_string(),
            time_zone: self.time_zone.clone(),
        }
    }

    async fn acquire_token(&self) -> Result<String> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .client
            .post(self.token_url())
            .form(&form)
            .send()
            .await
            .map_err(backend_error)?;

        let token: TokenResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(backend_error)?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl CalendarService for GraphCalendar {
    async fn list(&self) -> Result<Vec<ScheduleEntry>> {
        let token = self.acquire_token().await?;
        let mut events = Vec::new();

        let first = self
            .client
            .get(self.events_url())
            .query(&[("$select", LIST_FIELDS)])
            .bearer_auth(&token)
            .send()
            .await
            .map_err(backend_error)?;
        let mut page: EventPage = ensure_success(first)
            .await?
            .json()
            .await
            .map_err(backend_error)?;

        loop {
            events.extend(page.value.into_iter().map(CalendarEvent::from));
            let Some(next) = page.next_link else {
                break;
            };
            let response = self
                .client
                .get(&next)
                .bearer_auth(&token)
                .send()
                .await
                .map_err(backend_error)?;
            page = ensure_success(response)
                .await?
                .json()
                .await
                .map_err(backend_error)?;
        }

        tracing::debug!(count = events.len(), "Listed Outlook events");
        Ok(enumerate_listing(events))
    }

    async fn add(
        &self,
        description: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<String> {
        let token = self.acquire_token().await?;
        let request = NewEvent {
            subject: description.to_string(),
            body: ItemBody {
                content_type: "text".into(),
                content: EVENT_BODY.into(),
            },
            start: self.graph_time(start),
            end: self.graph_time(end),
            attendees: vec![Attendee {
                email_address: EmailAddress {
                    address: self.user.clone(),
                },
                kind: "required".into(),
            }],
        };

        let response = self
            .client
            .post(self.events_url())
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await
            .map_err(backend_error)?;

        let created: CreatedEvent = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(backend_error)?;
        Ok(created.id)
    }

    async fn update(
        &self,
        id: &str,
        description: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<()> {
        let token = self.acquire_token().await?;
        let patch = EventPatch {
            subject: description.to_string(),
            start: self.graph_time(start),
            end: self.graph_time(end),
        };

        let response = self
            .client
            .patch(self.event_url(id))
            .bearer_auth(&token)
            .json(&patch)
            .send()
            .await
            .map_err(backend_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let token = self.acquire_token().await?;
        let response = self
            .client
            .delete(self.event_url(id))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(backend_error)?;
        ensure_success(response).await?;
        Ok(())
    }
}

fn backend_error(err: reqwest::Error) -> CopilotError {
    CopilotError::BackendError(err.to_string())
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    Err(CopilotError::BackendError(format!(
        "Graph API error ({}): {}",
        status, error_text
    )))
}

// Graph wire format

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct EventPage {
    value: Vec<GraphEvent>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

#[derive(Deserialize)]
struct GraphEvent {
    id: String,
    subject: Option<String>,
    start: DateTimeTimeZone,
    end: DateTimeTimeZone,
}

impl From<GraphEvent> for CalendarEvent {
    fn from(event: GraphEvent) -> Self {
        CalendarEvent {
            id: event.id,
            subject: event.subject.unwrap_or_default(),
            start: event.start.date_time,
            end: event.end.date_time,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DateTimeTimeZone {
    date_time: String,
    time_zone: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewEvent {
    subject: String,
    body: ItemBody,
    start: DateTimeTimeZone,
    end: DateTimeTimeZone,
    attendees: Vec<Attendee>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemBody {
    content_type: String,
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Attendee {
    email_address: EmailAddress,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Serialize)]
struct EmailAddress {
    address: String,
}

#[derive(Serialize)]
struct EventPatch {
    subject: String,
    start: DateTimeTimeZone,
    end: DateTimeTimeZone,
}

#[derive(Deserialize)]
struct CreatedEvent {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config() -> CalendarConfig {
        CalendarConfig {
            tenant: "contoso".into(),
            client_id: "app".into(),
            client_secret: Some("secret".into()),
            user: "ada@contoso.com".into(),
            graph_url: "https://graph.microsoft.com/v1.0/".into(),
            time_zone: "Tokyo Standard Time".into(),
            ..CalendarConfig::default()
        }
    }

    #[test]
    fn test_requires_secret() {
        let mut cfg = config();
        cfg.client_secret = None;
        assert!(matches!(
            GraphCalendar::new(&cfg),
            Err(CopilotError::ConfigError(_))
        ));
    }

    #[test]
    fn test_urls() {
        let calendar = GraphCalendar::new(&config()).unwrap();
        assert_eq!(
            calendar.token_url(),
            "https://login.microsoftonline.com/contoso/oauth2/v2.0/token"
        );
        assert_eq!(
            calendar.event_url("AAMk="),
            "https://graph.microsoft.com/v1.0/users/ada@contoso.com/calendar/events/AAMk="
        );
    }

    #[test]
    fn test_new_event_serialization() {
        let calendar = GraphCalendar::new(&config()).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let request = NewEvent {
            subject: "Standup".into(),
            body: ItemBody {
                content_type: "text".into(),
                content: EVENT_BODY.into(),
            },
            start: calendar.graph_time(start),
            end: calendar.graph_time(start),
            attendees: vec![Attendee {
                email_address: EmailAddress {
                    address: "ada@contoso.com".into(),
                },
                kind: "required".into(),
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["start"]["dateTime"], "2024-03-01T09:00:00");
        assert_eq!(json["start"]["timeZone"], "Tokyo Standard Time");
        assert_eq!(json["body"]["contentType"], "text");
        assert_eq!(json["attendees"][0]["emailAddress"]["address"], "ada@contoso.com");
        assert_eq!(json["attendees"][0]["type"], "required");
    }

    #[test]
    fn test_event_page_deserialization() {
        let json = r#"{
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users('ada')/calendar/events",
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/users/ada/calendar/events?$skip=10",
            "value": [
                {
                    "id": "AAMkAGI1",
                    "subject": "H2 Goals",
                    "body": {"contentType": "html", "content": ""},
                    "start": {"dateTime": "2023-10-16T11:00:00.0000000", "timeZone": "UTC"},
                    "end": {"dateTime": "2023-10-16T12:00:00.0000000", "timeZone": "UTC"}
                },
                {
                    "id": "AAMkAGI2",
                    "subject": null,
                    "start": {"dateTime": "2023-10-17T11:00:00.0000000", "timeZone": "UTC"},
                    "end": {"dateTime": "2023-10-17T12:00:00.0000000", "timeZone": "UTC"}
                }
            ]
        }"#;

        let page: EventPage = serde_json::from_str(json).unwrap();
        assert!(page.next_link.is_some());

        let listing = enumerate_listing(page.value.into_iter().map(CalendarEvent::from).collect());
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].subject, "H2 Goals");
        assert_eq!(listing[0].start, "2023-10-16T11:00:00.0000000");
        assert_eq!(listing[1].no, "1");
        assert_eq!(listing[1].subject, "");
    }
}
