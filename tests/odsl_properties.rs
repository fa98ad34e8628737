//! Property tests for the command language
//!
//! Rendering a command and parsing it back must give the same command,
//! whatever the argument text contains (quotes, backslashes, commas,
//! parentheses, non-ASCII).

use mini_copilot::odsl::{parse, split_arguments, Command};
use proptest::prelude::*;

fn argument() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\PC{0,24}",
        "[a-zA-Z0-9 ,()'\"\\\\.:-]{0,24}",
        Just("YYYY-MM-DD 09:00:00".to_string()),
    ]
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        (argument(), argument(), argument())
            .prop_map(|(description, start, end)| Command::add(&description, &start, &end)),
        (argument(), argument(), argument(), argument()).prop_map(|(id, description, start, end)| {
            Command::modify(&id, &description, &start, &end)
        }),
        argument().prop_map(|id| Command::remove(&id)),
        Just(Command::list()),
    ]
}

proptest! {
    #[test]
    fn render_then_parse_is_identity(cmd in command()) {
        let rendered = cmd.to_string();
        let parsed = parse(&rendered);
        prop_assert_eq!(parsed, Ok(cmd));
    }

    #[test]
    fn rendered_commands_split_into_their_arity(cmd in command()) {
        let pieces = split_arguments(&cmd.to_string()).unwrap_or_default();
        prop_assert_eq!(pieces.len(), cmd.name().arity());
    }

    #[test]
    fn surrounding_whitespace_is_insignificant(cmd in command(), pad in "[ \t\n]{0,4}") {
        let padded = format!("{}{}{}", pad, cmd, pad);
        prop_assert_eq!(parse(&padded), Ok(cmd));
    }
}
