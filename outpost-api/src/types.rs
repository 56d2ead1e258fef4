//! Request and response payloads of the dialogue/quest/save service.

use serde::{Deserialize, Serialize};

use outpost_core::inventory::ItemStack;
use outpost_core::quest::{QuestObjective, QuestReward, QuestStatus};
use outpost_core::roster::{NpcProfile, Roster};
use outpost_core::{ItemId, NpcId, OutpostError, Position, Quest, QuestId};

/// Service-side NPC id: the lowercased display name with whitespace runs
/// replaced by `_`.
#[must_use]
pub fn npc_id_for_name(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
}

// ---------------------------------------------------------------------------
// Dialogue
// ---------------------------------------------------------------------------

/// Snapshot of the player sent with every dialogue request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerContext {
    /// Player position in world units.
    pub position: Position,
    /// Quests in progress.
    pub active_quests: Vec<Quest>,
    /// Inventory grid, empty slots as `null`.
    pub inventory: Vec<Option<ItemStack>>,
    /// Crypto balance.
    pub crypto: u32,
}

/// Persona fields attached when the full NPC profile is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcDetails {
    /// Service-side id, see [`npc_id_for_name`].
    pub npc_id: String,
    /// Personality summary.
    pub npc_personality: String,
    /// Role in the outpost.
    pub npc_role: String,
    /// Backstory.
    pub npc_background: String,
    /// How the NPC speaks.
    pub npc_dialogue_style: String,
}

impl From<&NpcProfile> for NpcDetails {
    fn from(profile: &NpcProfile) -> Self {
        Self {
            npc_id: npc_id_for_name(&profile.name),
            npc_personality: profile.personality.clone(),
            npc_role: profile.role.clone(),
            npc_background: profile.background.clone(),
            npc_dialogue_style: profile.dialogue_style.clone(),
        }
    }
}

/// `POST /api/dialogue` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueRequest {
    /// Display name of the NPC.
    pub npc_name: String,
    /// What the player said.
    pub player_message: String,
    /// Player snapshot.
    pub player_context: PlayerContext,
    /// Rendered memory context, empty when the NPC remembers nothing.
    pub memory_context: String,
    /// Persona fields, flattened into the body.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub npc: Option<NpcDetails>,
}

impl DialogueRequest {
    /// Request for a known NPC, persona included.
    #[must_use]
    pub fn for_npc(
        profile: &NpcProfile,
        player_message: impl Into<String>,
        player_context: PlayerContext,
        memory_context: impl Into<String>,
    ) -> Self {
        Self {
            npc_name: profile.name.clone(),
            player_message: player_message.into(),
            player_context,
            memory_context: memory_context.into(),
            npc: Some(NpcDetails::from(profile)),
        }
    }
}

/// `POST /api/dialogue` reply. The service answers with either field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueResponse {
    /// Preferred reply field.
    #[serde(default)]
    pub message: Option<String>,
    /// Alternate reply field.
    #[serde(default)]
    pub response: Option<String>,
}

impl DialogueResponse {
    /// The spoken reply, `None` when both fields are missing or empty.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        self.message
            .filter(|m| !m.is_empty())
            .or(self.response.filter(|r| !r.is_empty()))
    }
}

// ---------------------------------------------------------------------------
// Quest generation
// ---------------------------------------------------------------------------

/// `POST /api/generate-quest` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateQuestRequest {
    /// Display name of the giver.
    pub npc_name: String,
    /// Conversation so far, one `Speaker: line` per line.
    pub conversation_context: String,
    /// The player's suggestion.
    pub player_suggestion: String,
    /// Item ids present in the world.
    pub available_items: Vec<String>,
    /// Display names of every NPC.
    pub available_npcs: Vec<String>,
}

/// `POST /api/generate-quest` reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateQuestResponse {
    /// Whether the service produced a quest object.
    #[serde(default)]
    pub success: bool,
    /// Status message on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The quest or the refusal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest: Option<QuestPayload>,
}

/// Quest object as the service describes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestPayload {
    /// Short title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// One-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `collect_item` or `talk_to_npc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest_type: Option<String>,
    /// Item id for collect quests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_item: Option<String>,
    /// NPC name for talk quests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_npc: Option<String>,
    /// Units for collect quests, 1 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Payment on turn-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_crypto: Option<u32>,
    /// Set when the suggestion was refused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Line the NPC speaks about the quest or the refusal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl QuestPayload {
    /// Whether the service refused the suggestion.
    #[must_use]
    pub fn is_refusal(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Build the objective, resolving talk targets against `roster`.
    ///
    /// # Errors
    /// Returns [`OutpostError::InvalidQuest`] for unknown types or missing targets.
    pub fn objective(&self, roster: &Roster) -> outpost_core::error::Result<QuestObjective> {
        let invalid = |reason: &str| OutpostError::InvalidQuest {
            reason: reason.to_string(),
        };
        match self.quest_type.as_deref() {
            Some("collect_item") => {
                let item = self
                    .target_item
                    .as_deref()
                    .filter(|i| !i.is_empty())
                    .ok_or_else(|| invalid("collect quest without target_item"))?;
                Ok(QuestObjective::CollectItem {
                    item_id: ItemId::from(item),
                    quantity: self.quantity.unwrap_or(1).max(1),
                })
            }
            Some("talk_to_npc") => {
                let target = self
                    .target_npc
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| invalid("talk quest without target_npc"))?;
                let npc_id = roster
                    .resolve_npc(target)
                    .map_or_else(|| NpcId::new(npc_id_for_name(target)), |p| p.id.clone());
                Ok(QuestObjective::TalkToNpc {
                    npc_id,
                    talked: false,
                })
            }
            Some(other) => Err(invalid(&format!("unknown quest_type {other}"))),
            None => Err(invalid("missing quest_type")),
        }
    }

    /// Turn the payload into a pending quest offered by `giver`.
    ///
    /// # Errors
    /// Returns [`OutpostError::InvalidQuest`] if the payload is refused,
    /// untitled or has no usable objective.
    pub fn into_quest(self, id: QuestId, giver: &NpcProfile, roster: &Roster) -> outpost_core::error::Result<Quest> {
        if self.is_refusal() {
            return Err(OutpostError::InvalidQuest {
                reason: "suggestion was refused".to_string(),
            });
        }
        let objective = self.objective(roster)?;
        let title = self.title.filter(|t| !t.is_empty()).ok_or_else(|| OutpostError::InvalidQuest {
            reason: "missing title".to_string(),
        })?;
        Ok(Quest {
            id,
            title,
            description: self.description.unwrap_or_default(),
            objective,
            reward: QuestReward {
                crypto: self.reward_crypto.unwrap_or(0),
            },
            giver_id: giver.id.clone(),
            giver_name: giver.name.clone(),
            status: QuestStatus::Pending,
            started_at: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Save / load
// ---------------------------------------------------------------------------

/// Outcome of `save_game`, remote or local.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveOutcome {
    /// Whether the state was stored somewhere.
    #[serde(default)]
    pub success: bool,
    /// Human-readable status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Remote save slot id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_id: Option<String>,
}

impl SaveOutcome {
    /// Outcome reported after falling back to the local store.
    #[must_use]
    pub fn local() -> Self {
        Self {
            success: true,
            message: Some("Saved to local storage".to_string()),
            save_id: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::default()
    }

    #[test]
    fn npc_id_collapses_whitespace() {
        assert_eq!(npc_id_for_name("Trader  Eliza\tThompson"), "trader_eliza_thompson");
        assert_eq!(npc_id_for_name("Dr. Kim"), "dr._kim");
    }

    #[test]
    fn dialogue_request_flattens_persona() {
        let r = roster();
        let eliza = r.npc(&NpcId::from("trader_eliza")).expect("eliza");
        let req = DialogueRequest::for_npc(eliza, "hello", PlayerContext::default(), "");
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json["npc_name"], "Trader Eliza Thompson");
        assert_eq!(json["npc_id"], "trader_eliza_thompson");
        assert_eq!(json["npc_role"], "Merchant");
        assert_eq!(json["player_context"]["crypto"], 0);
    }

    #[test]
    fn reply_prefers_message_then_response() {
        let both = DialogueResponse {
            message: Some("a".into()),
            response: Some("b".into()),
        };
        assert_eq!(both.into_text().as_deref(), Some("a"));
        let alt = DialogueResponse {
            message: Some(String::new()),
            response: Some("b".into()),
        };
        assert_eq!(alt.into_text().as_deref(), Some("b"));
        assert_eq!(DialogueResponse::default().into_text(), None);
    }

    #[test]
    fn collect_payload_defaults_quantity() {
        let payload: QuestPayload = serde_json::from_value(serde_json::json!({
            "title": "Ore run",
            "description": "Bring ore",
            "quest_type": "collect_item",
            "target_item": "iron_ore",
            "reward_crypto": 25,
            "response": "Bring me some ore."
        }))
        .expect("decode");
        let r = roster();
        let giver = r.npc(&NpcId::from("engineer_marcus")).expect("marcus");
        let quest = payload
            .into_quest(QuestId::from("suggested_quest_1"), giver, &r)
            .expect("valid");
        assert_eq!(
            quest.objective,
            QuestObjective::CollectItem {
                item_id: ItemId::from("iron_ore"),
                quantity: 1
            }
        );
        assert_eq!(quest.reward.crypto, 25);
        assert_eq!(quest.status, QuestStatus::Pending);
    }

    #[test]
    fn talk_target_resolves_by_name() {
        let payload = QuestPayload {
            title: Some("Check on Jake".into()),
            quest_type: Some("talk_to_npc".into()),
            target_npc: Some("Scout Jake Williams".into()),
            ..QuestPayload::default()
        };
        let QuestObjective::TalkToNpc { npc_id, .. } = payload.objective(&roster()).expect("valid") else {
            panic!("expected talk objective");
        };
        assert_eq!(npc_id, NpcId::from("scout_jake"));
    }

    #[test]
    fn malformed_payloads_are_invalid() {
        let r = roster();
        let giver = &r.npcs[0];
        let untyped = QuestPayload {
            title: Some("x".into()),
            ..QuestPayload::default()
        };
        assert!(matches!(
            untyped.into_quest(QuestId::from("q"), giver, &r),
            Err(OutpostError::InvalidQuest { .. })
        ));
        let refused = QuestPayload {
            error: Some("Not possible".into()),
            response: Some("Can't do that.".into()),
            ..QuestPayload::default()
        };
        assert!(refused.is_refusal());
    }
}
