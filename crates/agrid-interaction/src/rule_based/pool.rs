use agrid_core::{AgridError, IntentCategory};
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Reply templates per intent category.
///
/// Every category, `Unmatched` included, maps to a non-empty list. The pool
/// is immutable after construction.
#[derive(Debug, Clone)]
pub struct ResponsePool {
    replies: HashMap<IntentCategory, Vec<String>>,
}

impl ResponsePool {
    /// Builds a pool, rejecting any category that is missing or empty.
    pub fn new(replies: HashMap<IntentCategory, Vec<String>>) -> agrid_core::Result<Self> {
        for category in IntentCategory::iter() {
            match replies.get(&category) {
                Some(list) if !list.is_empty() => {}
                _ => {
                    return Err(AgridError::config(format!(
                        "Response pool has no replies for '{category}'"
                    )));
                }
            }
        }
        Ok(Self { replies })
    }

    /// The built-in agricultural replies.
    pub fn agricultural() -> Self {
        let table: [(IntentCategory, &[&str]); 5] = [
            (
                IntentCategory::Greeting,
                &[
                    "Hello! I'm your agricultural assistant. How can I help with your crops today?",
                    "Hi there! What farming challenge can I help you solve?",
                    "Welcome to AgriDiagnose! How can I assist with your agricultural needs?",
                    "Greetings! I'm here to help with crop diagnosis and farming advice.",
                ],
            ),
            (
                IntentCategory::Status,
                &[
                    "I'm doing great and ready to help with your agricultural needs!",
                    "All systems green here! How are your crops doing?",
                    "I'm functioning well! How can I assist with your farming today?",
                    "Ready to help with any agricultural challenges you're facing!",
                ],
            ),
            (
                IntentCategory::Farewell,
                &[
                    "Happy farming! Come back anytime for more agricultural advice!",
                    "Take care of your crops! I'm here whenever you need agricultural support!",
                    "Good luck with your farming! Feel free to return for more diagnosis help!",
                    "Until next time - may your harvests be bountiful!",
                ],
            ),
            (
                IntentCategory::HelpRequest,
                &[
                    "I'm your agricultural AI assistant! I can help diagnose plant diseases, identify nutrient deficiencies, provide farming advice, and analyze crop images.",
                    "I specialize in crop health diagnosis, pest identification, soil advice, and general farming guidance. What agricultural challenge are you facing?",
                    "Upload crop photos for disease analysis, ask about farming techniques, or get advice on plant nutrition. How can I help your farm today?",
                ],
            ),
            (
                IntentCategory::Unmatched,
                &[
                    "That's an interesting agricultural observation! Can you tell me more about your crops or farming situation?",
                    "I see. What specific crops or farming challenges would you like help with?",
                    "Thanks for sharing! Are you dealing with any plant diseases, pests, or nutrient issues?",
                    "Interesting farming question! What crops are you growing and what symptoms are you observing?",
                    "I'd love to help with your agricultural needs. Can you describe your crops and any issues you're seeing?",
                ],
            ),
        ];

        let replies = table
            .into_iter()
            .map(|(category, lines)| {
                (
                    category,
                    lines.iter().map(|line| line.to_string()).collect(),
                )
            })
            .collect();
        Self { replies }
    }

    /// Candidate replies for `category`, in pool order.
    pub fn replies(&self, category: IntentCategory) -> &[String] {
        self.replies
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, category: IntentCategory, reply: &str) -> bool {
        self.replies(category).iter().any(|r| r == reply)
    }
}

impl Default for ResponsePool {
    fn default() -> Self {
        Self::agricultural()
    }
}
