//! Command AST for the scheduling command language.
//!
//! A `Command` is a command name plus its positional string arguments. The
//! argument count is fixed per name and checked on construction, so every
//! `Command` value matches one of the four grammar forms.

use std::fmt;
use std::str::FromStr;

use crate::core::error::CopilotError;
use crate::odsl::ParseError;

/// The closed set of command names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    AddOutlookSchedule,
    ModifyOutlookSchedule,
    RemoveOutlookSchedule,
    ListOutlookSchedule,
}

impl CommandName {
    pub const ALL: [CommandName; 4] = [
        CommandName::AddOutlookSchedule,
        CommandName::ModifyOutlookSchedule,
        CommandName::RemoveOutlookSchedule,
        CommandName::ListOutlookSchedule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::AddOutlookSchedule => "add_outlook_schedule",
            CommandName::ModifyOutlookSchedule => "modify_outlook_schedule",
            CommandName::RemoveOutlookSchedule => "remove_outlook_schedule",
            CommandName::ListOutlookSchedule => "list_outlook_schedule",
        }
    }

    /// Positional parameter names, in order
    pub fn parameter_names(&self) -> &'static [&'static str] {
        match self {
            CommandName::AddOutlookSchedule => &["description", "start_time", "end_time"],
            CommandName::ModifyOutlookSchedule => {
                &["schedule_id", "description", "start_time", "end_time"]
            }
            CommandName::RemoveOutlookSchedule => &["schedule_id"],
            CommandName::ListOutlookSchedule => &[],
        }
    }

    pub fn arity(&self) -> usize {
        self.parameter_names().len()
    }

    /// Whether the first parameter is a schedule reference that may need
    /// resolving from a display ordinal
    pub fn takes_schedule_id(&self) -> bool {
        self.parameter_names().first() == Some(&"schedule_id")
    }

    pub fn is_mutating(&self) -> bool {
        !matches!(self, CommandName::ListOutlookSchedule)
    }
}

impl FromStr for CommandName {
    type Err = CopilotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CopilotError::UnknownCommandError(s.to_string()))
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: CommandName,
    parameters: Vec<String>,
}

impl Command {
    /// Build a command, checking the argument count against the grammar
    pub fn new(name: CommandName, parameters: Vec<String>) -> Result<Self, ParseError> {
        if parameters.len() != name.arity() {
            return Err(ParseError::new(
                format!(
                    "{} expects {} argument(s), got {}",
                    name,
                    name.arity(),
                    parameters.len()
                ),
                0,
            ));
        }
        Ok(Self { name, parameters })
    }

    pub fn add(description: &str, start_time: &str, end_time: &str) -> Self {
        Self {
            name: CommandName::AddOutlookSchedule,
            parameters: vec![description.into(), start_time.into(), end_time.into()],
        }
    }

    pub fn modify(schedule_id: &str, description: &str, start_time: &str, end_time: &str) -> Self {
        Self {
            name: CommandName::ModifyOutlookSchedule,
            parameters: vec![
                schedule_id.into(),
                description.into(),
                start_time.into(),
                end_time.into(),
            ],
        }
    }

    pub fn remove(schedule_id: &str) -> Self {
        Self {
            name: CommandName::RemoveOutlookSchedule,
            parameters: vec![schedule_id.into()],
        }
    }

    pub fn list() -> Self {
        Self {
            name: CommandName::ListOutlookSchedule,
            parameters: Vec::new(),
        }
    }

    pub fn name(&self) -> CommandName {
        self.name
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Look up an argument by its parameter name
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.name
            .parameter_names()
            .iter()
            .position(|p| *p == name)
            .map(|idx| self.parameters[idx].as_str())
    }

    pub fn schedule_id(&self) -> Option<&str> {
        self.parameter("schedule_id")
    }

    pub fn description(&self) -> Option<&str> {
        self.parameter("description")
    }

    pub fn start_time(&self) -> Option<&str> {
        self.parameter("start_time")
    }

    pub fn end_time(&self) -> Option<&str> {
        self.parameter("end_time")
    }

    /// Copy of this command with the schedule id replaced.
    ///
    /// Returns `None` for commands without a schedule id parameter.
    pub fn with_schedule_id(&self, schedule_id: &str) -> Option<Command> {
        if !self.name.takes_schedule_id() {
            return None;
        }
        let mut parameters = self.parameters.clone();
        parameters[0] = schedule_id.to_string();
        Some(Command {
            name: self.name,
            parameters,
        })
    }
}

/// Renders the canonical text form: `name("a", "b")`
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, param) in self.parameters.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write_quoted(f, param)?;
        }
        f.write_str(")")
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    f.write_str("\"")
}
