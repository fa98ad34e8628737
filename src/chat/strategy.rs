//! Per-intent handling strategies

use crate::core::types::{IntentCode, UserIntent};

/// How a classified turn is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Modify,
    Remove,
    List,
    /// Also covers adds: the generated command decides what happens
    Default,
}

impl Strategy {
    pub fn from_intent(intent: IntentCode) -> Self {
        match UserIntent::from_code(intent) {
            Some(UserIntent::ModifySchedule) => Strategy::Modify,
            Some(UserIntent::RemoveSchedule) => Strategy::Remove,
            Some(UserIntent::ListSchedule) => Strategy::List,
            Some(UserIntent::AddSchedule) | Some(UserIntent::Default) | None => Strategy::Default,
        }
    }

    /// Whether the turn goes through the command generator
    pub fn uses_generator(&self) -> bool {
        !matches!(self, Strategy::List)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_routing() {
        assert_eq!(Strategy::from_intent(2), Strategy::Modify);
        assert_eq!(Strategy::from_intent(3), Strategy::Remove);
        assert_eq!(Strategy::from_intent(4), Strategy::List);
        assert_eq!(Strategy::from_intent(1), Strategy::Default);
        assert_eq!(Strategy::from_intent(5), Strategy::Default);
        assert_eq!(Strategy::from_intent(0), Strategy::Default);
        assert_eq!(Strategy::from_intent(-3), Strategy::Default);
        assert_eq!(Strategy::from_intent(99), Strategy::Default);
    }

    #[test]
    fn test_only_list_skips_generator() {
        assert!(!Strategy::List.uses_generator());
        assert!(Strategy::Modify.uses_generator());
        assert!(Strategy::Remove.uses_generator());
        assert!(Strategy::Default.uses_generator());
    }
}
