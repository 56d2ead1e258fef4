//! Quest definitions, the quest log, and the template generator.
//!
//! A quest lives in exactly one of the log's three lists at a time:
//!
//! ```text
//!   generator ──────────────────────────┐
//!                                       ▼
//!   service suggestion ──▶ pending ──▶ active ──▶ completed
//!                             │
//!                             └──▶ (declined, dropped)
//! ```

pub mod generator;
pub mod log;

pub use generator::{QuestKind, QuestTemplate};
pub use log::QuestLog;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::inventory::Inventory;
use crate::types::{ItemId, NpcId, QuestId};

/// Lifecycle position of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// Offered, waiting for accept/decline.
    Pending,
    /// Accepted and in progress.
    Active,
    /// Turned in and paid.
    Completed,
}

/// What the player has to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestObjective {
    /// Bring `quantity` units of `item_id` to the giver.
    CollectItem {
        /// Item to collect.
        item_id: ItemId,
        /// Units required.
        quantity: u32,
    },
    /// Start a conversation with `npc_id`.
    TalkToNpc {
        /// Resident to visit.
        npc_id: NpcId,
        /// Set once the player has spoken to them.
        #[serde(default)]
        talked: bool,
    },
}

impl QuestObjective {
    /// Wire name of the objective type (`collect_item`, `talk_to_npc`).
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CollectItem { .. } => "collect_item",
            Self::TalkToNpc { .. } => "talk_to_npc",
        }
    }

    /// Whether the objective is satisfied given the player's inventory.
    #[must_use]
    pub fn is_met(&self, inventory: &Inventory) -> bool {
        match self {
            Self::CollectItem { item_id, quantity } => inventory.quantity_of(item_id) >= *quantity,
            Self::TalkToNpc { talked, .. } => *talked,
        }
    }
}

/// What the giver pays on turn-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestReward {
    /// Crypto credited to the player.
    pub crypto: u32,
}

/// A structured task with a completion predicate and a reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    /// Unique id.
    pub id: QuestId,
    /// Short title for the quest log.
    pub title: String,
    /// One-line description.
    pub description: String,
    /// Completion predicate.
    pub objective: QuestObjective,
    /// Payment on turn-in.
    pub reward: QuestReward,
    /// Resident who handed out the quest.
    pub giver_id: NpcId,
    /// Giver's display name.
    pub giver_name: String,
    /// Lifecycle position.
    pub status: QuestStatus,
    /// When the quest entered the log.
    pub started_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
