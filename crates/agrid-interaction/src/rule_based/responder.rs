use agrid_core::IntentCategory;
use std::sync::Mutex;

use super::pool::ResponsePool;
use super::random::{RandomSource, ThreadRandom};

/// Picks one reply template for a category.
///
/// The random source is the only non-deterministic input of the local
/// path; it sits behind a mutex so `respond` can take `&self`.
pub struct TemplateResponder {
    pool: ResponsePool,
    random: Mutex<Box<dyn RandomSource>>,
}

impl TemplateResponder {
    pub fn new(pool: ResponsePool) -> Self {
        Self::with_random(pool, ThreadRandom)
    }

    pub fn with_random(pool: ResponsePool, random: impl RandomSource + 'static) -> Self {
        Self {
            pool,
            random: Mutex::new(Box::new(random)),
        }
    }

    pub fn pool(&self) -> &ResponsePool {
        &self.pool
    }

    pub fn respond(&self, category: IntentCategory) -> String {
        let replies = self.pool.replies(category);
        if replies.is_empty() {
            return String::new();
        }
        let index = {
            let mut random = self
                .random
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            random.next_index(replies.len())
        };
        replies[index % replies.len()].clone()
    }
}

impl Default for TemplateResponder {
    fn default() -> Self {
        Self::new(ResponsePool::agricultural())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule_based::random::FixedSequence;

    #[test]
    fn test_fixed_sequence_selects_exact_templates() {
        let pool = ResponsePool::agricultural();
        let expected_first = pool.replies(IntentCategory::Greeting)[2].clone();
        let expected_second = pool.replies(IntentCategory::Farewell)[0].clone();

        let responder = TemplateResponder::with_random(pool, FixedSequence::new(vec![2, 0]));
        assert_eq!(responder.respond(IntentCategory::Greeting), expected_first);
        assert_eq!(responder.respond(IntentCategory::Farewell), expected_second);
    }

    #[test]
    fn test_default_responder_draws_from_pool() {
        let responder = TemplateResponder::default();
        for _ in 0..20 {
            let reply = responder.respond(IntentCategory::HelpRequest);
            assert!(responder.pool().contains(IntentCategory::HelpRequest, &reply));
        }
    }
}
