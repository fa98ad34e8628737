//! Schedule reference resolution - converts "No.N" display ordinals to backend ids
//!
//! The model never sees backend ids; it refers to schedules by the ordinal
//! shown in the last listing. Resolution is advisory: when nothing matches,
//! the argument is used verbatim.

use crate::calendar::{CalendarService, ScheduleEntry};
use crate::core::error::Result;
use crate::odsl::{split_arguments, Command};

/// Result of resolving a command's schedule reference
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The command to execute, with the backend id substituted if one was found
    pub command: Command,
    /// The substituted backend id
    pub resolved_id: Option<String>,
}

/// Resolves schedule references against a fresh calendar listing
pub struct ScheduleResolver<'a> {
    calendar: &'a dyn CalendarService,
}

impl<'a> ScheduleResolver<'a> {
    pub fn new(calendar: &'a dyn CalendarService) -> Self {
        Self { calendar }
    }

    /// Map the ordinal in the first argument of `command_text` to a backend id.
    ///
    /// Lists the calendar on every call; listings are never cached.
    pub async fn resolve_schedule_id(&self, command_text: &str) -> Result<Option<String>> {
        let Some(argument) = split_arguments(command_text).and_then(|args| args.into_iter().next())
        else {
            return Ok(None);
        };
        let Some(target_no) = target_ordinal(&argument) else {
            tracing::debug!(argument = %argument, "No ordinal in schedule reference");
            return Ok(None);
        };

        let listing = self.calendar.list().await?;
        let resolved = lookup_ordinal(&listing, target_no).map(String::from);
        tracing::info!(
            argument = %argument,
            target_no,
            resolved = ?resolved,
            "Resolved schedule reference"
        );
        Ok(resolved)
    }

    /// Resolve the schedule id of a parsed command.
    ///
    /// Commands without a schedule id parameter pass through untouched.
    pub async fn resolve(&self, command: &Command) -> Result<Resolution> {
        if !command.name().takes_schedule_id() {
            return Ok(Resolution {
                command: command.clone(),
                resolved_id: None,
            });
        }

        let resolved = self.resolve_schedule_id(&command.to_string()).await?;
        match resolved.and_then(|id| command.with_schedule_id(&id).map(|cmd| (id, cmd))) {
            Some((id, resolved_command)) => Ok(Resolution {
                command: resolved_command,
                resolved_id: Some(id),
            }),
            None => Ok(Resolution {
                command: command.clone(),
                resolved_id: None,
            }),
        }
    }
}

/// First run of decimal digits: `"No.4 H2 Goals"` -> `"4"`
pub fn target_ordinal(argument: &str) -> Option<&str> {
    let start = argument.find(|c: char| c.is_ascii_digit())?;
    let rest = &argument[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Backend id of the first entry whose ordinal equals `target_no` (string comparison)
pub fn lookup_ordinal<'l>(listing: &'l [ScheduleEntry], target_no: &str) -> Option<&'l str> {
    let mut matches = listing.iter().filter(|entry| entry.no == target_no);
    let first = matches.next()?;
    if matches.next().is_some() {
        tracing::warn!(target_no, "Ambiguous schedule ordinal, using the first match");
    }
    Some(first.id.as_str())
}
