//! Conversation Memory
//!
//! Per-process log of prior (query, answer) turns. Append-only; rendered in
//! full into every reasoning prompt of the memory-backed agent.

use serde::{Deserialize, Serialize};

use crate::message::{Message, Role};

/// Ordered buffer of conversation turns
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConversationMemory {
    turns: Vec<Message>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed exchange
    pub fn record(&mut self, query: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(Message::user(query));
        self.turns.push(Message::assistant(answer));
    }

    /// Number of completed exchanges
    pub fn exchanges(&self) -> usize {
        self.turns.iter().filter(|m| m.role == Role::User).count()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Transcript text, one `Human:`/`AI:` line per turn
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|m| format!("{}: {}", m.role.transcript_label(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_order() {
        let mut memory = ConversationMemory::new();
        assert!(memory.is_empty());

        memory.record("What is Rust?", "A systems language.");
        memory.record("Who maintains it?", "The Rust project.");

        assert_eq!(memory.exchanges(), 2);
        assert_eq!(memory.turns.len(), 4);
        assert_eq!(memory.turns[0].role, Role::User);
        assert_eq!(memory.turns[3].content, "The Rust project.");
    }

    #[test]
    fn test_render_transcript() {
        let mut memory = ConversationMemory::new();
        memory.record("Q1", "A1");
        assert_eq!(memory.render(), "Human: Q1\nAI: A1");
        assert_eq!(ConversationMemory::new().render(), "");
    }
}
