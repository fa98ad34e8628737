//! Conversation orchestration
//!
//! Each turn: classify -> pick a strategy -> either list the calendar
//! directly or generate a command, parse it, resolve its schedule reference
//! and execute it. The outcome is folded back into the history.

use chrono::NaiveDate;

use crate::calendar::{CalendarService, GraphCalendar, InMemoryCalendar, ScheduleEntry};
use crate::chat::history::ConversationHistory;
use crate::chat::strategy::Strategy;
use crate::command::{CommandExecutor, ExecutionOutcome, ScheduleResolver};
use crate::core::config::{AppConfig, CalendarBackend};
use crate::core::error::{CopilotError, Result};
use crate::core::types::{IntentCode, Speaker, UNCLASSIFIED_INTENT};
use crate::llm::{classify, generate_reply, ChatMessage, LanguageModel, LlmClient};
use crate::odsl::{contains_command_name, parse, strip_code_markup};

/// Reply to a list request when the calendar is empty
pub const NO_SCHEDULE_FOUND: &str = "No schedule found";

/// External services shared by every session
pub struct CopilotContext {
    pub llm: Box<dyn LanguageModel>,
    pub calendar: Box<dyn CalendarService>,
}

impl CopilotContext {
    pub fn new(llm: Box<dyn LanguageModel>, calendar: Box<dyn CalendarService>) -> Self {
        Self { llm, calendar }
    }

    /// Build the clients selected by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let llm = LlmClient::from_config(&config.llm)?;
        let calendar: Box<dyn CalendarService> = match config.calendar.backend {
            CalendarBackend::Memory => {
                tracing::info!("Using in-memory calendar");
                Box::new(InMemoryCalendar::new())
            }
            CalendarBackend::Graph => Box::new(GraphCalendar::new(&config.calendar)?),
        };
        Ok(Self::new(Box::new(llm), calendar))
    }
}

/// One user's conversation
pub struct ChatSession<'a> {
    context: &'a CopilotContext,
    history: ConversationHistory,
    last_listing: Vec<ScheduleEntry>,
    executed_commands: Vec<String>,
    today: Option<NaiveDate>,
}

impl<'a> ChatSession<'a> {
    pub fn new(context: &'a CopilotContext) -> Self {
        Self {
            context,
            history: ConversationHistory::new(),
            last_listing: Vec::new(),
            executed_commands: Vec::new(),
            today: None,
        }
    }

    /// Pin the date substituted for `YYYY-MM-DD` in generated commands
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Handle one user message and return the assistant's reply.
    ///
    /// A failed turn keeps everything recorded before the failure, and the
    /// session stays usable.
    pub async fn send_message(&mut self, question: &str) -> Result<String> {
        self.handle_turn(question)
            .await
            .map_err(CopilotError::send_message)
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Listing shown by the most recent list turn
    pub fn last_listing(&self) -> &[ScheduleEntry] {
        &self.last_listing
    }

    /// Command texts executed so far, oldest first
    pub fn executed_commands(&self) -> &[String] {
        &self.executed_commands
    }

    /// Forget the conversation, the listing snapshot and the command log
    pub fn clear(&mut self) {
        self.history.clear();
        self.last_listing.clear();
        self.executed_commands.clear();
        tracing::info!("Session cleared");
    }

    async fn handle_turn(&mut self, question: &str) -> Result<String> {
        let prior = self.history.to_chat_messages();

        let intent = match classify(self.context.llm.as_ref(), &prior, question).await {
            Ok(intent) => intent,
            Err(e) => {
                self.history.append(UNCLASSIFIED_INTENT, Speaker::User, question);
                return Err(e);
            }
        };
        self.history.append(intent, Speaker::User, question);

        let strategy = Strategy::from_intent(intent);
        tracing::info!(intent, strategy = ?strategy, "Dispatching turn");

        if strategy.uses_generator() {
            self.run_command(strategy, intent, &prior, question).await
        } else {
            self.list_schedules(intent).await
        }
    }

    async fn list_schedules(&mut self, intent: IntentCode) -> Result<String> {
        let listing = self.context.calendar.list().await?;
        let reply = format_listing(&listing);
        tracing::info!(count = listing.len(), "Listed schedules");

        self.last_listing = listing;
        self.history.append(intent, Speaker::Assistant, reply.clone());
        Ok(reply)
    }

    async fn run_command(
        &mut self,
        strategy: Strategy,
        intent: IntentCode,
        prior: &[ChatMessage],
        question: &str,
    ) -> Result<String> {
        let context = self.context;
        let reply = generate_reply(context.llm.as_ref(), prior, question).await?;
        let reply_id = self.history.append(intent, Speaker::Assistant, reply.clone());

        if !contains_command_name(&reply) {
            tracing::debug!("Reply carries no command");
            return Ok(reply);
        }

        let command = match parse(strip_code_markup(&reply)) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(error = %e, "Reply names a command but does not parse, returning it as text");
                return Ok(reply);
            }
        };

        let calendar = context.calendar.as_ref();
        let resolution = ScheduleResolver::new(calendar).resolve(&command).await?;
        if let Some(id) = &resolution.resolved_id {
            tracing::debug!(reference = ?command.schedule_id(), %id, "Substituted schedule id");
        }

        let mut executor = CommandExecutor::new(calendar);
        if let Some(today) = self.today {
            executor = executor.with_today(today);
        }
        let outcome = executor.execute(&resolution.command).await?;

        let executed = resolution.command.to_string();
        tracing::info!(strategy = ?strategy, command = %executed, "Executed command");
        self.executed_commands.push(executed.clone());
        if executed != reply {
            self.history.rewrite_last(reply_id, executed.clone());
        }
        if let ExecutionOutcome::Listed(listing) = outcome {
            self.last_listing = listing;
        }
        Ok(executed)
    }
}

/// One `No.{no} {subject} {start}-{end}` line per entry
pub fn format_listing(listing: &[ScheduleEntry]) -> String {
    if listing.is_empty() {
        return NO_SCHEDULE_FOUND.to_string();
    }
    listing.iter().map(|entry| format!("{}\n", entry)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_listing() {
        assert_eq!(format_listing(&[]), NO_SCHEDULE_FOUND);

        let listing = vec![
            ScheduleEntry {
                no: "0".into(),
                id: "a".into(),
                subject: "Standup".into(),
                start: "2024-03-01T09:00:00".into(),
                end: "2024-03-01T09:15:00".into(),
            },
            ScheduleEntry {
                no: "1".into(),
                id: "b".into(),
                subject: "Retro".into(),
                start: "2024-03-01T15:00:00".into(),
                end: "2024-03-01T16:00:00".into(),
            },
        ];
        assert_eq!(
            format_listing(&listing),
            "No.0 Standup 2024-03-01T09:00:00-2024-03-01T09:15:00\n\
             No.1 Retro 2024-03-01T15:00:00-2024-03-01T16:00:00\n"
        );
    }
}
