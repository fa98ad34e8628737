//! In-process calendar used for offline runs and tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::calendar::service::{enumerate_listing, CalendarEvent, CalendarService, ScheduleEntry};
use crate::core::error::{CopilotError, Result};

const STORED_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Calendar kept in memory, listed in insertion order
#[derive(Debug, Default)]
pub struct InMemoryCalendar {
    events: Mutex<Vec<CalendarEvent>>,
    unavailable: AtomicBool,
}

impl InMemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given events already stored
    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every operation fail with a backend error until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of stored events, for inspection
    pub fn events(&self) -> Result<Vec<CalendarEvent>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<CalendarEvent>>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CopilotError::BackendError(
                "calendar service unavailable".into(),
            ));
        }
        self.events
            .lock()
            .map_err(|_| CopilotError::BackendError("calendar store poisoned".into()))
    }
}

#[async_trait]
impl CalendarService for InMemoryCalendar {
    async fn list(&self) -> Result<Vec<ScheduleEntry>> {
        let events = self.lock()?.clone();
        Ok(enumerate_listing(events))
    }

    async fn add(
        &self,
        description: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.lock()?.push(CalendarEvent {
            id: id.clone(),
            subject: description.to_string(),
            start: start.format(STORED_TIME_FORMAT).to_string(),
            end: end.format(STORED_TIME_FORMAT).to_string(),
        });
        Ok(id)
    }

    async fn update(
        &self,
        id: &str,
        description: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<()> {
        let mut events = self.lock()?;
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CopilotError::BackendError(format!("event {} not found", id)))?;
        event.subject = description.to_string();
        event.start = start.format(STORED_TIME_FORMAT).to_string();
        event.end = end.format(STORED_TIME_FORMAT).to_string();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut events = self.lock()?;
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Err(CopilotError::BackendError(format!("event {} not found", id)));
        }
        Ok(())
    }
}
