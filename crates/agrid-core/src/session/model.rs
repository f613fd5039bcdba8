//! Session domain model.

use super::message::Turn;
use super::mode::ChatMode;
use serde::{Deserialize, Serialize};

/// Default number of retained turns.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// The conversation state for one assistant session.
///
/// A session contains:
/// - The active [`ChatMode`]
/// - The conversation history, capped at `window` turns (oldest evicted first)
///
/// All mutation goes through the methods below so that the history bound
/// holds after every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    mode: ChatMode,
    history: Vec<Turn>,
    window: usize,
}

impl Session {
    /// Creates an empty session in the given mode.
    pub fn new(mode: ChatMode, window: usize) -> Self {
        Self {
            mode,
            history: Vec::new(),
            window,
        }
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Retained turns, oldest first.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Records a successful request/response pair and evicts the oldest
    /// turns beyond the window.
    pub fn record_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.history.push(Turn::user(user));
        self.history.push(Turn::assistant(assistant));
        self.trim();
    }

    /// Switches the session to `Local`.
    ///
    /// Returns `true` when the mode actually changed.
    pub fn demote_to_local(&mut self) -> bool {
        let changed = self.mode != ChatMode::Local;
        self.mode = ChatMode::Local;
        changed
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn trim(&mut self) {
        if self.history.len() > self.window {
            let excess = self.history.len() - self.window;
            self.history.drain(..excess);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ChatMode::Local, DEFAULT_HISTORY_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TurnRole;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new(ChatMode::Remote, 10);
        assert_eq!(session.mode(), ChatMode::Remote);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_history_keeps_most_recent_turns() {
        let mut session = Session::new(ChatMode::Remote, 10);
        for i in 0..8 {
            session.record_exchange(format!("question {i}"), format!("answer {i}"));
        }

        let history = session.history();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0], Turn::user("question 3"));
        assert_eq!(history[9], Turn::assistant("answer 7"));
    }

    #[test]
    fn test_odd_window_evicts_single_turns() {
        let mut session = Session::new(ChatMode::Remote, 3);
        session.record_exchange("a", "b");
        session.record_exchange("c", "d");

        let history = session.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].role, TurnRole::Assistant);
        assert_eq!(history[0].content, "b");
    }

    #[test]
    fn test_demote_reports_change_once() {
        let mut session = Session::new(ChatMode::Remote, 10);
        assert!(session.demote_to_local());
        assert!(!session.demote_to_local());
        assert_eq!(session.mode(), ChatMode::Local);
    }

    #[test]
    fn test_clear_history_keeps_mode() {
        let mut session = Session::new(ChatMode::Remote, 10);
        session.record_exchange("hello", "hi");
        session.clear_history();
        assert!(session.history().is_empty());
        assert_eq!(session.mode(), ChatMode::Remote);
    }
}
