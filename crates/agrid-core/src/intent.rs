//! Intent vocabulary shared by the rule-based classifier and responder.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Coarse category of a user message, derived per message and never stored.
///
/// The declaration order is the evaluation order used by the classifier:
/// when a message matches several categories, the earliest one wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IntentCategory {
    Greeting,
    /// "How are you"-style small talk.
    Status,
    Farewell,
    HelpRequest,
    /// Nothing matched.
    Unmatched,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_iteration_follows_declaration_order() {
        let all: Vec<IntentCategory> = IntentCategory::iter().collect();
        assert_eq!(
            all,
            vec![
                IntentCategory::Greeting,
                IntentCategory::Status,
                IntentCategory::Farewell,
                IntentCategory::HelpRequest,
                IntentCategory::Unmatched,
            ]
        );
        assert_eq!(IntentCategory::HelpRequest.to_string(), "help_request");
    }
}
