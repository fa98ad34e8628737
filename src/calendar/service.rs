//! Calendar service interface and the listing snapshot type

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// One row of a calendar listing.
///
/// `no` is a display ordinal assigned by enumerating the listing. It is only
/// meaningful for the listing it came from: the backend may reorder events
/// between calls, so the same `no` can point at a different event later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub no: String,
    pub id: String,
    pub subject: String,
    pub start: String,
    pub end: String,
}

/// Formats as the assistant presents it: `No.3 Standup 2024-03-01T09:00:00-2024-03-01T09:15:00`
impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No.{} {} {}-{}",
            self.no, self.subject, self.start, self.end
        )
    }
}

/// An event as a backend stores it, before display ordinals are assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: String,
    pub subject: String,
    pub start: String,
    pub end: String,
}

/// Assign 0-based display ordinals in listing order
pub fn enumerate_listing(events: Vec<CalendarEvent>) -> Vec<ScheduleEntry> {
    events
        .into_iter()
        .enumerate()
        .map(|(idx, event)| ScheduleEntry {
            no: idx.to_string(),
            id: event.id,
            subject: event.subject,
            start: event.start,
            end: event.end,
        })
        .collect()
}

/// The four calendar operations the assistant can perform.
///
/// Failures surface as `CopilotError::BackendError`. Callers never retry.
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Current listing, freshly enumerated
    async fn list(&self) -> Result<Vec<ScheduleEntry>>;

    /// Create an event, returning its backend id
    async fn add(&self, description: &str, start: NaiveDateTime, end: NaiveDateTime)
        -> Result<String>;

    async fn update(
        &self,
        id: &str,
        description: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, subject: &str) -> CalendarEvent {
        CalendarEvent {
            id: id.into(),
            subject: subject.into(),
            start: "2024-03-01T09:00:00".into(),
            end: "2024-03-01T10:00:00".into(),
        }
    }

    #[test]
    fn test_enumerate_assigns_zero_based_ordinals() {
        let listing = enumerate_listing(vec![event("a", "One"), event("b", "Two")]);
        assert_eq!(listing[0].no, "0");
        assert_eq!(listing[1].no, "1");
        assert_eq!(listing[1].id, "b");
    }

    #[test]
    fn test_entry_display() {
        let listing = enumerate_listing(vec![event("a", "Standup")]);
        assert_eq!(
            listing[0].to_string(),
            "No.0 Standup 2024-03-01T09:00:00-2024-03-01T10:00:00"
        );
    }
}
