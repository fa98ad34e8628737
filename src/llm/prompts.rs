//! Fixed system prompts, one per model call purpose

/// Purpose of a completion request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Classify the latest user message into an intent number
    Intent,
    /// Turn the request into exactly one command
    Odsl,
    /// Pull the schedule id out of a command call
    ScheduleId,
}

impl PromptKind {
    pub fn system_prompt(&self) -> &'static str {
        match self {
            PromptKind::Intent => INTENT_SYSTEM_PROMPT,
            PromptKind::Odsl => ODSL_SYSTEM_PROMPT,
            PromptKind::ScheduleId => SCHEDULE_ID_SYSTEM_PROMPT,
        }
    }
}

const INTENT_SYSTEM_PROMPT: &str = r#"You detect what a user wants to do with their Outlook calendar.
Decide from the LAST user message only and reply with a single intent number.

INTENTS:
1 - add a schedule
2 - modify a schedule
3 - remove a schedule
4 - list, show or display schedules
5 - anything else, or you cannot tell

OUTPUT FORMAT:
The number only, no words, no punctuation. Valid replies: 1, 2, 3, 4, 5.

Examples:
"book a design review tomorrow at 3pm" -> 1
"move No.2 to 4pm" -> 2
"cancel the H2 goals meeting" -> 3
"what's on my calendar?" -> 4
"what can you do?" -> 5
"#;

const ODSL_SYSTEM_PROMPT: &str = r#"You are an Outlook calendar agent. Turn the user's request into exactly one command.

COMMANDS:
add_outlook_schedule("description", "start_time", "end_time")
modify_outlook_schedule("schedule_id", "description", "start_time", "end_time")
remove_outlook_schedule("schedule_id")
list_outlook_schedule()

RULES:
- Every argument is a double-quoted string.
- Times use the format "YYYY-MM-DD HH:MM:SS", for example "2023-11-16 09:00:00".
- If you do not know the date, write the literal YYYY-MM-DD in place of it, for example "YYYY-MM-DD 09:00:00".
- Schedules are shown to the user as "No.N subject start-end". To refer to one, pass "No.N" followed by its subject as the schedule_id, for example "No.4 H2 Goals".
- Reply with the command only. No explanation, no code block.
- If you cannot build a command, ask the user for the missing details in plain text.

Examples:
add_outlook_schedule("Project Meeting", "2023-11-16 09:00:00", "2023-11-16 10:00:00")
add_outlook_schedule("Project Meeting", "YYYY-MM-DD 09:00:00", "YYYY-MM-DD 10:00:00")
modify_outlook_schedule("No.4 H2 Goals", "H2 Goals review", "YYYY-MM-DD 14:00:00", "YYYY-MM-DD 15:00:00")
remove_outlook_schedule("No.2 Lunch")
list_outlook_schedule()
"#;

const SCHEDULE_ID_SYSTEM_PROMPT: &str = r#"You extract the schedule id from a calendar command call.

The commands that carry a schedule id are:
modify_outlook_schedule("schedule_id", "description", "start_time", "end_time")
remove_outlook_schedule("schedule_id")

Reply with the schedule id only, without quotes.

Examples:
modify_outlook_schedule("5678", "Updated Project Meeting", "2023-11-16 09:00:00", "2023-11-16 10:00:00") -> 5678
remove_outlook_schedule("5678") -> 5678
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odsl::CommandName;

    #[test]
    fn test_odsl_prompt_lists_every_command() {
        let prompt = PromptKind::Odsl.system_prompt();
        for name in CommandName::ALL {
            assert!(prompt.contains(name.as_str()), "missing {}", name);
        }
    }

    #[test]
    fn test_odsl_prompt_examples_parse() {
        let examples = PromptKind::Odsl
            .system_prompt()
            .split("Examples:")
            .nth(1)
            .unwrap();
        for line in examples.lines().filter(|l| !l.trim().is_empty()) {
            assert!(crate::odsl::parse(line).is_ok(), "example does not parse: {}", line);
        }
    }

    #[test]
    fn test_prompts_are_distinct() {
        assert_ne!(
            PromptKind::Intent.system_prompt(),
            PromptKind::ScheduleId.system_prompt()
        );
        assert!(PromptKind::Intent.system_prompt().contains("1, 2, 3, 4, 5"));
    }
}
