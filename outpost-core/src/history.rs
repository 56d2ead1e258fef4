//! Per-NPC ring of recent exchanges.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One player line and the NPC's answer to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// When the exchange finished.
    pub timestamp: DateTime<Utc>,
    /// What the player said.
    pub player_message: String,
    /// What the NPC replied.
    pub npc_response: String,
    /// Emotion tags of the exchange.
    pub emotional_context: Option<String>,
}

impl ConversationEntry {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn new(
        player_message: impl Into<String>,
        npc_response: impl Into<String>,
        emotional_context: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            player_message: player_message.into(),
            npc_response: npc_response.into(),
            emotional_context,
        }
    }
}

/// FIFO of exchanges; the oldest falls off once the bound is hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    entries: VecDeque<ConversationEntry>,
}

impl ConversationHistory {
    /// Append an exchange, dropping the oldest ones beyond `capacity`.
    pub fn push(&mut self, entry: ConversationEntry, capacity: usize) {
        self.entries.push_back(entry);
        while self.entries.len() > capacity {
            self.entries.pop_front();
        }
    }

    /// Drop the oldest exchanges beyond `capacity`.
    pub fn truncate(&mut self, capacity: usize) {
        let excess = self.entries.len().saturating_sub(capacity);
        self.entries.drain(..excess);
    }

    /// The last `n` exchanges, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<&ConversationEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).collect()
    }

    /// Number of stored exchanges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been said yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ConversationEntry> {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_last_five() {
        let mut history = ConversationHistory::default();
        for i in 0..8 {
            history.push(ConversationEntry::new(format!("p{i}"), format!("n{i}"), None), 5);
        }
        assert_eq!(history.len(), 5);
        let first = history.iter().next().expect("non-empty");
        assert_eq!(first.player_message, "p3");
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut history = ConversationHistory::default();
        for i in 0..3 {
            history.push(ConversationEntry::new(format!("p{i}"), "ok", None), 5);
        }
        let tail: Vec<_> = history.recent(2).iter().map(|e| e.player_message.clone()).collect();
        assert_eq!(tail, vec!["p1", "p2"]);
        assert_eq!(history.recent(10).len(), 3);
    }
}
