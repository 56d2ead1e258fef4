//! Configuration for the outpost conversation system.
//!
//! Maps directly to `outpost.toml`. Every field has a default so an empty
//! file (or no file at all) yields the stock game tuning.

use serde::{Deserialize, Serialize};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutpostConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Per-NPC memory limits and extraction tuning.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Relationship score tuning.
    #[serde(default)]
    pub relationship: RelationshipConfig,
    /// Remote dialogue/quest/save service.
    #[serde(default)]
    pub api: ApiConfig,
    /// Dialogue pacing.
    #[serde(default)]
    pub dialogue: DialogueConfig,
    /// Quest template generator ranges.
    #[serde(default)]
    pub quest: QuestConfig,
    /// Local save store settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl OutpostConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `OutpostError::Config` if the TOML is invalid or a range is
    /// inverted.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| crate::OutpostError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Reject settings the rest of the system cannot honour.
    ///
    /// # Errors
    /// Returns `OutpostError::Config` describing the first bad field.
    pub fn validate(&self) -> crate::error::Result<()> {
        let bad = |msg: &str| Err(crate::OutpostError::Config(msg.to_string()));
        if self.memory.capacity == 0 {
            return bad("memory.capacity must be at least 1");
        }
        if self.memory.min_snippet_len >= self.memory.max_snippet_len {
            return bad("memory.min_snippet_len must be below memory.max_snippet_len");
        }
        if self.relationship.initial_score > 100 {
            return bad("relationship.initial_score must be within 0..=100");
        }
        let q = &self.quest;
        if q.collect_reward_min > q.collect_reward_max
            || q.talk_reward_min > q.talk_reward_max
            || q.collect_quantity_min == 0
            || q.collect_quantity_min > q.collect_quantity_max
        {
            return bad("quest ranges must be non-empty with min <= max");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Per-NPC memory capacity and extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Hard cap on memory snippets per NPC.
    #[serde(default = "default_10")]
    pub capacity: usize,
    /// Raw exchanges kept per NPC.
    #[serde(default = "default_5")]
    pub history_len: usize,
    /// Exchanges rendered into the memory context.
    #[serde(default = "default_2")]
    pub context_recent_turns: usize,
    /// Snippets must be strictly longer than this (characters).
    #[serde(default = "default_15")]
    pub min_snippet_len: usize,
    /// Snippets must be strictly shorter than this (characters).
    #[serde(default = "default_100")]
    pub max_snippet_len: usize,
    /// Words kept before the keyword.
    #[serde(default = "default_3")]
    pub window_before: usize,
    /// Words kept after the keyword.
    #[serde(default = "default_3")]
    pub window_after: usize,
    /// Stop after the first category that yields a snippet.
    #[serde(default = "default_true")]
    pub one_memory_per_turn: bool,
    /// Let reply-aware categories (relationship, promises, emotional) also
    /// search the NPC's reply.
    #[serde(default)]
    pub scan_npc_reply: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            history_len: 5,
            context_recent_turns: 2,
            min_snippet_len: 15,
            max_snippet_len: 100,
            window_before: 3,
            window_after: 3,
            one_memory_per_turn: true,
            scan_npc_reply: false,
        }
    }
}

/// Relationship score tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipConfig {
    /// Value every score starts at for an unseen NPC.
    #[serde(default = "default_50_u8")]
    pub initial_score: u8,
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self { initial_score: 50 }
    }
}

/// Remote service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the dialogue/quest/save service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Hard timeout for any request in milliseconds.
    #[serde(default = "default_10000")]
    pub request_timeout_ms: u64,
    /// Save slot key used by the local fallback store.
    #[serde(default = "default_save_key")]
    pub local_save_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: 10_000,
            local_save_key: default_save_key(),
        }
    }
}

/// Dialogue pacing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueConfig {
    /// Delay before re-prompting after a chat reply.
    #[serde(default = "default_1000")]
    pub reply_prompt_delay_ms: u64,
    /// Delay before scripted follow-ups (turn-in reward, quest offer, re-prompt
    /// after progress narration or a quest decision).
    #[serde(default = "default_2000")]
    pub scripted_delay_ms: u64,
    /// Append the "ask me for work" tip to static greetings.
    #[serde(default = "default_true")]
    pub show_quest_tip: bool,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            reply_prompt_delay_ms: 1000,
            scripted_delay_ms: 2000,
            show_quest_tip: true,
        }
    }
}

/// Quest template generator ranges (inclusive).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestConfig {
    /// Minimum items requested by a collect quest.
    #[serde(default = "default_1_u32")]
    pub collect_quantity_min: u32,
    /// Maximum items requested by a collect quest.
    #[serde(default = "default_2_u32")]
    pub collect_quantity_max: u32,
    /// Minimum crypto paid by a collect quest.
    #[serde(default = "default_10_u32")]
    pub collect_reward_min: u32,
    /// Maximum crypto paid by a collect quest.
    #[serde(default = "default_60_u32")]
    pub collect_reward_max: u32,
    /// Minimum crypto paid by a talk quest.
    #[serde(default = "default_5_u32")]
    pub talk_reward_min: u32,
    /// Maximum crypto paid by a talk quest.
    #[serde(default = "default_35_u32")]
    pub talk_reward_max: u32,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            collect_quantity_min: 1,
            collect_quantity_max: 2,
            collect_reward_min: 10,
            collect_reward_max: 60,
            talk_reward_min: 5,
            talk_reward_max: 35,
        }
    }
}

/// Local save store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// SQLite file holding local saves.
    #[serde(default = "default_save_path")]
    pub path: String,
    /// Enable WAL mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
    /// Store and verify a CRC-32 of every payload.
    #[serde(default = "default_true")]
    pub checksum_enabled: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            path: default_save_path(),
            wal_mode: true,
            checksum_enabled: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value helpers (serde requires functions)
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_save_key() -> String {
    "llm-scifi-game-save".to_string()
}
fn default_save_path() -> String {
    "outpost_saves.db".to_string()
}
fn default_2() -> usize {
    2
}
fn default_3() -> usize {
    3
}
fn default_5() -> usize {
    5
}
fn default_10() -> usize {
    10
}
fn default_15() -> usize {
    15
}
fn default_100() -> usize {
    100
}
fn default_50_u8() -> u8 {
    50
}
fn default_1_u32() -> u32 {
    1
}
fn default_2_u32() -> u32 {
    2
}
fn default_5_u32() -> u32 {
    5
}
fn default_10_u32() -> u32 {
    10
}
fn default_35_u32() -> u32 {
    35
}
fn default_60_u32() -> u32 {
    60
}
fn default_1000() -> u64 {
    1000
}
fn default_2000() -> u64 {
    2000
}
fn default_10000() -> u64 {
    10_000
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = OutpostConfig::from_toml("").expect("empty config parses");
        assert_eq!(config.memory.capacity, 10);
        assert_eq!(config.memory.history_len, 5);
        assert_eq!(config.relationship.initial_score, 50);
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert!(config.memory.one_memory_per_turn);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = OutpostConfig::from_toml(
            r#"
            [memory]
            capacity = 4

            [api]
            base_url = "http://10.0.0.2:5000"
            "#,
        )
        .expect("partial config parses");
        assert_eq!(config.memory.capacity, 4);
        assert_eq!(config.memory.min_snippet_len, 15);
        assert_eq!(config.api.base_url, "http://10.0.0.2:5000");
        assert_eq!(config.api.request_timeout_ms, 10_000);
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let err = OutpostConfig::from_toml(
            r"
            [quest]
            talk_reward_min = 40
            talk_reward_max = 5
            ",
        );
        assert!(matches!(err, Err(crate::OutpostError::Config(_))));

        let err = OutpostConfig::from_toml("[memory]\ncapacity = 0\n");
        assert!(matches!(err, Err(crate::OutpostError::Config(_))));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("outpost.toml");
        std::fs::write(&path, "[dialogue]\nscripted_delay_ms = 0\n").expect("write");
        let config = OutpostConfig::from_file(&path).expect("load");
        assert_eq!(config.dialogue.scripted_delay_ms, 0);
        assert_eq!(config.dialogue.reply_prompt_delay_ms, 1000);
    }
}
