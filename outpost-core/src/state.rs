//! The save payload: everything the game persists between sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::OutpostConfig;
use crate::error::{OutpostError, Result};
use crate::inventory::Inventory;
use crate::memory::MemoryStore;
use crate::quest::QuestLog;

/// Quest log, inventory and NPC memories bundled for saving.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameState {
    /// The player's quests.
    #[serde(default)]
    pub quests: QuestLog,
    /// The player's items and crypto.
    #[serde(default)]
    pub inventory: Inventory,
    /// What every NPC remembers.
    #[serde(default)]
    pub memory: MemoryStore,
    /// Set when the state is serialized for a save.
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl GameState {
    /// Fresh state tuned by `config`.
    #[must_use]
    pub fn new(config: &OutpostConfig) -> Self {
        Self {
            memory: MemoryStore::new(config.memory.clone(), config.relationship.clone()),
            ..Self::default()
        }
    }

    /// Stamp the save time and serialize to a JSON value.
    ///
    /// # Errors
    /// Returns [`OutpostError::Serialization`] if encoding fails.
    pub fn to_save(&mut self) -> Result<serde_json::Value> {
        self.saved_at = Some(Utc::now());
        serde_json::to_value(&*self).map_err(|e| OutpostError::Serialization(e.to_string()))
    }

    /// Rebuild state from a save, re-applying the memory tuning.
    ///
    /// # Errors
    /// Returns [`OutpostError::Serialization`] if the payload does not decode.
    pub fn from_save(value: serde_json::Value, config: &OutpostConfig) -> Result<Self> {
        let mut state: Self =
            serde_json::from_value(value).map_err(|e| OutpostError::Serialization(e.to_string()))?;
        state
            .memory
            .reconfigure(config.memory.clone(), config.relationship.clone());
        Ok(state)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ConversationHistory;
    use crate::memory::MemoryCategory;
    use crate::types::{ItemId, NpcId};

    #[test]
    fn save_round_trip_keeps_everything() {
        let config = OutpostConfig::default();
        let mut state = GameState::new(&config);
        let npc = NpcId::from("trader_eliza");
        state.memory.record_turn(&npc, "I promise to pay you back tomorrow", "You'd better.");
        state.inventory.add_items(&ItemId::from("glow_stalk"), 4).expect("fits");
        state.inventory.add_crypto(12);

        let value = state.to_save().expect("serialize");
        assert!(value["saved_at"].is_string());
        let back = GameState::from_save(value, &config).expect("deserialize");
        assert_eq!(back.memory.memories(&npc), state.memory.memories(&npc));
        assert_eq!(back.inventory, state.inventory);
        assert_eq!(back.memory.config().capacity, config.memory.capacity);
    }

    #[test]
    fn loaded_save_is_brought_within_bounds() {
        let config = OutpostConfig::default();
        let mut state = GameState::new(&config);
        let npc = NpcId::from("trader_eliza");
        for i in 0..4 {
            state
                .memory
                .remember(&npc, MemoryCategory::PersonalInfo, &format!("Player shared: fact {i}"), None);
        }
        state.memory.record_turn(&npc, "hello", "Hi.");
        state.memory.record_turn(&npc, "hello again", "Hi again.");
        let mut value = state.to_save().expect("serialize");
        value["memory"]["npcs"]["trader_eliza"]["relationship"]["trust"] = serde_json::json!(250);

        let mut tight = OutpostConfig::default();
        tight.memory.capacity = 2;
        tight.memory.history_len = 1;
        let mut back = GameState::from_save(value, &tight).expect("deserialize");

        assert_eq!(back.memory.memories(&npc).len(), 2);
        assert_eq!(back.memory.history(&npc).map(ConversationHistory::len), Some(1));
        assert_eq!(back.memory.relationship(&npc).trust, 100);
        let context = back.memory.memory_context(&npc);
        assert!(context.contains("- Trust: 100/100"));
        assert!(!context.contains("250"));
    }

    #[test]
    fn missing_sections_default() {
        let back = GameState::from_save(serde_json::json!({}), &OutpostConfig::default()).expect("empty save");
        assert!(back.quests.active().is_empty());
        assert_eq!(back.inventory.crypto(), 0);
    }

    #[test]
    fn garbage_is_a_serialization_error() {
        let err = GameState::from_save(serde_json::json!({"inventory": 7}), &OutpostConfig::default());
        assert!(matches!(err, Err(OutpostError::Serialization(_))));
    }
}
