//! Memory entry definitions and the per-NPC [`MemoryStore`].
//!
//! A memory is a short snippet of something the player said, tagged with the
//! [`MemoryCategory`] whose keyword table fired and an importance score used
//! to decide what survives pruning.

pub mod store;

pub use store::{MemoryStore, NpcMemory, TurnRecord};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::MemoryId;

/// Which keyword table produced a memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryCategory {
    /// Facts the player shared about themselves.
    PersonalInfo,
    /// Talk about closeness, trust or romance.
    Relationship,
    /// Work, missions, errands.
    Quests,
    /// Promises and deals.
    Promises,
    /// Strong feelings.
    Emotional,
    /// Talk about other outpost residents.
    Gossip,
    /// Money and bargaining.
    Trade,
    /// World events. No keyword table targets it yet.
    Events,
}

impl MemoryCategory {
    /// All categories in declaration order.
    pub const ALL: [Self; 8] = [
        Self::PersonalInfo,
        Self::Relationship,
        Self::Quests,
        Self::Promises,
        Self::Emotional,
        Self::Gossip,
        Self::Trade,
        Self::Events,
    ];

    /// Snake-case key, as serialized.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::PersonalInfo => "personal_info",
            Self::Relationship => "relationship",
            Self::Quests => "quests",
            Self::Promises => "promises",
            Self::Emotional => "emotional",
            Self::Gossip => "gossip",
            Self::Trade => "trade",
            Self::Events => "events",
        }
    }

    /// Upper-case heading used in memory contexts (`PERSONAL_INFO`).
    #[must_use]
    pub fn heading(self) -> String {
        self.key().to_uppercase()
    }
}

impl fmt::Display for MemoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single remembered snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Unique ID.
    pub id: MemoryId,
    /// Category whose keyword fired.
    pub category: MemoryCategory,
    /// Labelled snippet, e.g. `"Promise/Deal: I promise to bring you"`.
    pub content: String,
    /// Comma-joined emotion tags of the turn, if any fired.
    pub emotional_context: Option<String>,
    /// When the memory was formed.
    pub timestamp: DateTime<Utc>,
    /// 1..=10, higher survives pruning.
    pub importance: u8,
    /// How many times the entry was rendered into a memory context.
    pub referenced: u32,
}

impl MemoryEntry {
    /// Create a memory stamped with the current time.
    #[must_use]
    pub fn new(
        category: MemoryCategory,
        content: impl Into<String>,
        emotional_context: Option<String>,
        importance: u8,
    ) -> Self {
        Self {
            id: MemoryId::new(),
            category,
            content: content.into(),
            emotional_context,
            timestamp: Utc::now(),
            importance: importance.clamp(crate::importance::BASE_IMPORTANCE, crate::importance::MAX_IMPORTANCE),
            referenced: 0,
        }
    }

    /// Override the formation time.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&MemoryCategory::PersonalInfo).expect("serialize");
        assert_eq!(json, "\"personal_info\"");
        assert_eq!(MemoryCategory::PersonalInfo.heading(), "PERSONAL_INFO");
        for category in MemoryCategory::ALL {
            let json = serde_json::to_string(&category).expect("serialize");
            assert_eq!(json, format!("\"{}\"", category.key()));
        }
    }

    #[test]
    fn importance_is_clamped_on_creation() {
        let low = MemoryEntry::new(MemoryCategory::Trade, "x", None, 0);
        let high = MemoryEntry::new(MemoryCategory::Trade, "x", None, 42);
        assert_eq!(low.importance, 1);
        assert_eq!(high.importance, 10);
        assert_eq!(low.referenced, 0);
    }
}
