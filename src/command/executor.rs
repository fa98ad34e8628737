//! Command execution - runs a parsed command against the calendar

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::calendar::{CalendarService, ScheduleEntry};
use crate::core::error::{CopilotError, Result};
use crate::odsl::datetime::normalize_datetime;
use crate::odsl::{Command, CommandName, ParseError};

/// Executes commands by calling the matching calendar operation
pub struct CommandExecutor<'a> {
    calendar: &'a dyn CalendarService,
    today: Option<NaiveDate>,
}

/// Result of executing a command
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Added { id: String },
    Updated { id: String },
    Removed { id: String },
    Listed(Vec<ScheduleEntry>),
}

impl<'a> CommandExecutor<'a> {
    pub fn new(calendar: &'a dyn CalendarService) -> Self {
        Self {
            calendar,
            today: None,
        }
    }

    /// Pin the date used for `YYYY-MM-DD` placeholders instead of the local date
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Execute a command. Backend failures are returned as is, never retried.
    pub async fn execute(&self, command: &Command) -> Result<ExecutionOutcome> {
        match command.name() {
            CommandName::AddOutlookSchedule => {
                let description = required(command, "description")?;
                let (start, end) = self.time_range(command)?;
                let id = self.calendar.add(description, start, end).await?;
                tracing::info!(%id, description, %start, %end, "Added Outlook schedule");
                Ok(ExecutionOutcome::Added { id })
            }
            CommandName::ModifyOutlookSchedule => {
                let id = required(command, "schedule_id")?;
                let description = required(command, "description")?;
                let (start, end) = self.time_range(command)?;
                self.calendar.update(id, description, start, end).await?;
                tracing::info!(id, description, %start, %end, "Modified Outlook schedule");
                Ok(ExecutionOutcome::Updated { id: id.to_string() })
            }
            CommandName::RemoveOutlookSchedule => {
                let id = required(command, "schedule_id")?;
                self.calendar.delete(id).await?;
                tracing::info!(id, "Removed Outlook schedule");
                Ok(ExecutionOutcome::Removed { id: id.to_string() })
            }
            CommandName::ListOutlookSchedule => {
                let listing = self.calendar.list().await?;
                tracing::info!(count = listing.len(), "Listed Outlook schedules");
                Ok(ExecutionOutcome::Listed(listing))
            }
        }
    }

    /// Both times are validated before the backend is touched
    fn time_range(&self, command: &Command) -> Result<(NaiveDateTime, NaiveDateTime)> {
        let today = self.today();
        let start = normalize_datetime(required(command, "start_time")?, today)?;
        let end = normalize_datetime(required(command, "end_time")?, today)?;
        Ok((start, end))
    }
}

fn required<'c>(command: &'c Command, parameter: &str) -> Result<&'c str> {
    command.parameter(parameter).ok_or_else(|| {
        CopilotError::ParseError(ParseError::new(
            format!("{} has no {} parameter", command.name(), parameter),
            0,
        ))
    })
}
