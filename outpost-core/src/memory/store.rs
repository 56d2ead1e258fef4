//! Per-NPC memory, relationship and history storage.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{MemoryCategory, MemoryEntry};
use crate::config::{MemoryConfig, RelationshipConfig};
use crate::context;
use crate::extraction;
use crate::history::{ConversationEntry, ConversationHistory};
use crate::importance;
use crate::pruning;
use crate::relationship::RelationshipScores;
use crate::types::NpcId;

/// Everything one NPC remembers about the player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NpcMemory {
    /// Bounded snippet list.
    #[serde(default)]
    pub memories: Vec<MemoryEntry>,
    /// Created on the first relationship update.
    #[serde(default)]
    pub relationship: Option<RelationshipScores>,
    /// Last few exchanges.
    #[serde(default)]
    pub history: ConversationHistory,
}

/// What one recorded turn changed.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord {
    /// Emotion tags of the exchange.
    pub emotional_context: Option<String>,
    /// Memories kept this turn.
    pub stored: Vec<MemoryEntry>,
    /// Candidates dropped as near-duplicates.
    pub suppressed: usize,
    /// Memories pruned to make room.
    pub evicted: Vec<MemoryEntry>,
    /// Relationship after the update.
    pub relationship: RelationshipScores,
}

/// Memory store for every NPC in the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    npcs: HashMap<NpcId, NpcMemory>,
    #[serde(skip)]
    config: MemoryConfig,
    #[serde(skip)]
    relationship_config: RelationshipConfig,
}

impl MemoryStore {
    /// An empty store with the given tuning.
    #[must_use]
    pub fn new(config: MemoryConfig, relationship_config: RelationshipConfig) -> Self {
        Self {
            npcs: HashMap::new(),
            config,
            relationship_config,
        }
    }

    /// Replace the tuning, e.g. after loading a save, and bring every record
    /// back within the new bounds.
    pub fn reconfigure(&mut self, config: MemoryConfig, relationship_config: RelationshipConfig) {
        for (npc, record) in &mut self.npcs {
            let evicted = pruning::prune(&mut record.memories, config.capacity);
            if !evicted.is_empty() {
                debug!(npc = %npc, evicted = evicted.len(), "Pruned loaded memories");
            }
            record.history.truncate(config.history_len);
            if let Some(scores) = record.relationship.as_mut() {
                *scores = scores.clamped();
            }
        }
        self.config = config;
        self.relationship_config = relationship_config;
    }

    /// Active memory tuning.
    #[must_use]
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Turn recording
    // ------------------------------------------------------------------

    /// Feed one exchange into the store: extract memories, nudge the
    /// relationship and append to the history ring.
    pub fn record_turn(&mut self, npc: &NpcId, player_message: &str, npc_reply: &str) -> TurnRecord {
        let emotions = extraction::emotional_context(player_message, npc_reply);
        let candidates = extraction::classify(player_message, npc_reply, emotions.as_deref(), &self.config);

        let mut stored = Vec::new();
        let mut evicted = Vec::new();
        let mut suppressed = 0;

        for candidate in candidates {
            let duplicate = self
                .memories(npc)
                .iter()
                .any(|m| extraction::is_near_duplicate(&m.content, &candidate.content));
            if duplicate {
                debug!(npc = %npc, category = %candidate.category, "Suppressed near-duplicate memory");
                suppressed += 1;
            } else {
                let entry = MemoryEntry::new(
                    candidate.category,
                    candidate.content,
                    emotions.clone(),
                    candidate.importance,
                );
                evicted.extend(self.insert(npc, entry.clone()));
                stored.push(entry);
            }
            if self.config.one_memory_per_turn {
                break;
            }
        }

        let relationship = self.update_relationship(npc, player_message);

        let capacity = self.config.history_len;
        self.npcs.entry(npc.clone()).or_default().history.push(
            ConversationEntry::new(player_message, npc_reply, emotions.clone()),
            capacity,
        );

        TurnRecord {
            emotional_context: emotions,
            stored,
            suppressed,
            evicted,
            relationship,
        }
    }

    /// Store a memory directly, scoring it and pruning the list.
    pub fn remember(
        &mut self,
        npc: &NpcId,
        category: MemoryCategory,
        content: &str,
        emotional_context: Option<String>,
    ) -> (MemoryEntry, Vec<MemoryEntry>) {
        let score = importance::score(content, emotional_context.as_deref());
        let entry = MemoryEntry::new(category, content, emotional_context, score);
        let evicted = self.insert(npc, entry.clone());
        (entry, evicted)
    }

    fn insert(&mut self, npc: &NpcId, entry: MemoryEntry) -> Vec<MemoryEntry> {
        info!(
            npc = %npc,
            category = %entry.category,
            importance = entry.importance,
            content = %entry.content,
            "Stored memory"
        );
        let capacity = self.config.capacity;
        let list = &mut self.npcs.entry(npc.clone()).or_default().memories;
        list.push(entry);
        let evicted = pruning::prune(list, capacity);
        if !evicted.is_empty() {
            debug!(npc = %npc, evicted = evicted.len(), "Pruned memories");
        }
        evicted
    }

    /// Apply the relationship table to `player_message`, creating the
    /// record on first use.
    pub fn update_relationship(&mut self, npc: &NpcId, player_message: &str) -> RelationshipScores {
        let initial = self.relationship_config.initial_score;
        let scores = self
            .npcs
            .entry(npc.clone())
            .or_default()
            .relationship
            .get_or_insert_with(|| RelationshipScores::uniform(initial));
        let net = scores.apply_message(player_message);
        if !net.is_empty() {
            debug!(npc = %npc, changes = ?net, "Relationship updated");
        }
        *scores
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// An NPC's memories (empty if unseen).
    #[must_use]
    pub fn memories(&self, npc: &NpcId) -> &[MemoryEntry] {
        self.npcs
            .get(npc)
            .map(|m| m.memories.as_slice())
            .unwrap_or_default()
    }

    /// An NPC's memories of one category.
    #[must_use]
    pub fn memories_by_category(&self, npc: &NpcId, category: MemoryCategory) -> Vec<&MemoryEntry> {
        self.memories(npc).iter().filter(|m| m.category == category).collect()
    }

    /// Relationship scores, defaults for an unseen NPC. Never creates a record.
    #[must_use]
    pub fn relationship(&self, npc: &NpcId) -> RelationshipScores {
        self.npcs
            .get(npc)
            .and_then(|m| m.relationship)
            .unwrap_or_else(|| RelationshipScores::uniform(self.relationship_config.initial_score))
    }

    /// Recent exchanges with an NPC.
    #[must_use]
    pub fn history(&self, npc: &NpcId) -> Option<&ConversationHistory> {
        self.npcs.get(npc).map(|m| &m.history)
    }

    /// The full record for an NPC.
    #[must_use]
    pub fn npc(&self, npc: &NpcId) -> Option<&NpcMemory> {
        self.npcs.get(npc)
    }

    /// Every NPC with a record, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&NpcId, &NpcMemory)> {
        self.npcs.iter()
    }

    /// Number of NPCs with a record.
    #[must_use]
    pub fn npc_count(&self) -> usize {
        self.npcs.len()
    }

    /// Render the memory context block for the dialogue service and count
    /// the reference on every rendered memory.
    ///
    /// Empty when the NPC has neither memories nor relationship scores.
    pub fn memory_context(&mut self, npc: &NpcId) -> String {
        let recent = self.config.context_recent_turns;
        let Some(record) = self.npcs.get_mut(npc) else {
            return String::new();
        };
        let rendered = context::render(record, recent);
        if !rendered.is_empty() {
            for memory in &mut record.memories {
                memory.referenced += 1;
            }
            debug!(npc = %npc, memories = record.memories.len(), "Built memory context");
        }
        rendered
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    /// Forget one NPC entirely.
    pub fn forget(&mut self, npc: &NpcId) -> bool {
        self.npcs.remove(npc).is_some()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.npcs.clear();
        info!("All NPC memories cleared");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::default()
    }

    #[test]
    fn promise_turn_stores_promise_memory() {
        let mut s = store();
        let npc = NpcId::from("trader_eliza");
        let rec = s.record_turn(&npc, "I promise to bring you the crystal, that's a deal", "Deal.");
        assert_eq!(rec.stored.len(), 1);
        let m = &s.memories(&npc)[0];
        assert_eq!(m.category, MemoryCategory::Promises);
        assert!(m.importance >= 4);
    }

    #[test]
    fn overlapping_second_statement_is_suppressed() {
        let mut s = store();
        let npc = NpcId::from("scout_jake");
        s.record_turn(&npc, "I love exploring the outpost", "Careful out there.");
        let rec = s.record_turn(&npc, "I really love exploring the outpost a lot", "Noted.");
        assert!(rec.stored.is_empty());
        assert_eq!(rec.suppressed, 1);
        assert_eq!(s.memories(&npc).len(), 1);
    }

    #[test]
    fn one_memory_per_turn_by_default() {
        let mut s = store();
        let npc = NpcId::from("trader_eliza");
        // Fires personal (like), promises (deal) and trade (crypto).
        let msg = "I would like to make a deal for some crypto today";
        assert_eq!(s.record_turn(&npc, msg, "Sure.").stored.len(), 1);

        let mut wide = MemoryStore::new(
            MemoryConfig {
                one_memory_per_turn: false,
                ..MemoryConfig::default()
            },
            RelationshipConfig::default(),
        );
        assert!(wide.record_turn(&npc, msg, "Sure.").stored.len() > 1);
    }

    #[test]
    fn relationship_is_lazy() {
        let mut s = store();
        let npc = NpcId::from("medic_dr_kim");
        assert_eq!(s.relationship(&npc), RelationshipScores::default());
        assert!(s.npc(&npc).is_none());
        s.update_relationship(&npc, "I respect your work");
        assert_eq!(s.relationship(&npc).respect, 55);
    }

    #[test]
    fn history_is_bounded() {
        let mut s = store();
        let npc = NpcId::from("unfiltered_rick");
        for i in 0..9 {
            s.record_turn(&npc, &format!("message number {i}"), "whatever");
        }
        assert_eq!(s.history(&npc).map(ConversationHistory::len), Some(5));
    }

    #[test]
    fn memory_list_is_bounded() {
        let mut s = store();
        let npc = NpcId::from("commander_sarah");
        for i in 0..25 {
            s.remember(&npc, MemoryCategory::Events, &format!("event {i} {}", "x".repeat(i)), None);
        }
        assert_eq!(s.memories(&npc).len(), 10);
    }

    #[test]
    fn context_counts_references() {
        let mut s = store();
        let npc = NpcId::from("engineer_marcus");
        assert_eq!(s.memory_context(&npc), "");
        s.record_turn(&npc, "My family lives on a faraway planet", "Fascinating!");
        let ctx = s.memory_context(&npc);
        assert!(ctx.contains("PERSONAL_INFO:"));
        assert_eq!(s.memories(&npc)[0].referenced, 1);
    }

    #[test]
    fn serde_skips_config() {
        let mut s = MemoryStore::new(
            MemoryConfig {
                capacity: 3,
                ..MemoryConfig::default()
            },
            RelationshipConfig::default(),
        );
        let npc = NpcId::from("scout_jake");
        s.record_turn(&npc, "I trust you with my secret plans", "Of course.");
        let json = serde_json::to_string(&s).expect("serialize");
        let back: MemoryStore = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.config().capacity, 10);
        assert_eq!(back.memories(&npc), s.memories(&npc));
    }
}
