//! In-process conversation memory
//!
//! Keeps a sliding window of prior turns per conversation id so follow-up
//! questions carry context. Process-lifetime only; nothing is persisted.

use crate::models::Message;
use std::collections::HashMap;
use std::sync::Mutex;

/// Windowed per-conversation history, safe to share across exchanges
pub struct ConversationMemory {
    window: usize,
    turns: Mutex<HashMap<String, Vec<Message>>>,
}

impl ConversationMemory {
    /// Create a memory keeping at most `window` turns per conversation
    pub fn new(window: usize) -> Self {
        Self {
            window,
            turns: Mutex::new(HashMap::new()),
        }
    }

    /// Prior turns for a conversation, oldest first
    pub fn history(&self, conversation_id: &str) -> Vec<Message> {
        self.turns
            .lock()
            .expect("memory lock poisoned")
            .get(conversation_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Record one completed exchange (the user turn and the answer turn),
    /// trimming the oldest turns past the window
    pub fn record(&self, conversation_id: &str, question: Message, answer: Message) {
        let mut turns = self.turns.lock().expect("memory lock poisoned");
        let history = turns.entry(conversation_id.to_string()).or_default();
        history.push(question);
        history.push(answer);

        if history.len() > self.window {
            let excess = history.len() - self.window;
            history.drain(..excess);
        }
    }

    /// Forget a conversation entirely
    pub fn clear(&self, conversation_id: &str) {
        self.turns
            .lock()
            .expect("memory lock poisoned")
            .remove(conversation_id);
    }
}
