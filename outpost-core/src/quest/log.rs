//! The player's quest log: pending, active and completed lists.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::generator::{self, QuestKind, QuestTemplate};
use super::{Quest, QuestObjective, QuestStatus};
use crate::config::QuestConfig;
use crate::error::{OutpostError, Result};
use crate::inventory::Inventory;
use crate::roster::{ItemDef, NpcProfile};
use crate::types::{NpcId, QuestId};

/// Three parallel lists searched linearly by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestLog {
    #[serde(default)]
    pending: Vec<Quest>,
    #[serde(default)]
    active: Vec<Quest>,
    #[serde(default)]
    completed: Vec<Quest>,
    #[serde(default)]
    next_id: u64,
}

impl QuestLog {
    /// An empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next `quest_<n>` id not already in the log.
    pub fn next_quest_id(&mut self) -> QuestId {
        loop {
            self.next_id += 1;
            let id = QuestId::new(format!("quest_{}", self.next_id));
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Whether any list holds a quest with this id.
    #[must_use]
    pub fn contains(&self, id: &QuestId) -> bool {
        self.get(id).is_some()
    }

    /// Generate a quest from the templates and make it active immediately.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        giver: &NpcProfile,
        kind: QuestKind,
        items: &[ItemDef],
        npcs: &[NpcProfile],
        config: &QuestConfig,
        rng: &mut R,
    ) -> Option<&Quest> {
        let template = generator::generate(kind, &giver.id, items, npcs, config, rng)?;
        let quest = self.instantiate(template, giver, QuestStatus::Active);
        self.add_active(quest).ok()
    }

    /// Give a template an id and a giver.
    pub fn instantiate(&mut self, template: QuestTemplate, giver: &NpcProfile, status: QuestStatus) -> Quest {
        Quest {
            id: self.next_quest_id(),
            title: template.title,
            description: template.description,
            objective: template.objective,
            reward: template.reward,
            giver_id: giver.id.clone(),
            giver_name: giver.name.clone(),
            status,
            started_at: Some(Utc::now()),
        }
    }

    /// Push a quest straight onto the active list.
    ///
    /// # Errors
    /// [`OutpostError::DuplicateQuest`] if the id is already in any list.
    pub fn add_active(&mut self, mut quest: Quest) -> Result<&Quest> {
        self.ensure_new(&quest.id)?;
        quest.status = QuestStatus::Active;
        quest.started_at.get_or_insert_with(Utc::now);
        info!(quest = %quest.id, title = %quest.title, giver = %quest.giver_id, "Quest added");
        self.active.push(quest);
        let idx = self.active.len() - 1;
        Ok(&self.active[idx])
    }

    /// Park an offered quest until the player decides.
    ///
    /// # Errors
    /// [`OutpostError::DuplicateQuest`] if the id is already in any list.
    pub fn add_pending(&mut self, mut quest: Quest) -> Result<&Quest> {
        self.ensure_new(&quest.id)?;
        quest.status = QuestStatus::Pending;
        quest.started_at = Some(Utc::now());
        debug!(quest = %quest.id, "Quest offered");
        self.pending.push(quest);
        let idx = self.pending.len() - 1;
        Ok(&self.pending[idx])
    }

    fn ensure_new(&self, id: &QuestId) -> Result<()> {
        if self.contains(id) {
            return Err(OutpostError::DuplicateQuest(id.clone()));
        }
        Ok(())
    }

    /// Move a pending quest to active. Returns `false` for unknown ids.
    pub fn accept(&mut self, id: &QuestId) -> bool {
        let Some(idx) = self.pending.iter().position(|q| &q.id == id) else {
            return false;
        };
        let mut quest = self.pending.remove(idx);
        quest.status = QuestStatus::Active;
        info!(quest = %quest.id, title = %quest.title, "Quest accepted");
        self.active.push(quest);
        true
    }

    /// Drop a pending quest. Returns `false` for unknown ids.
    pub fn decline(&mut self, id: &QuestId) -> bool {
        let Some(idx) = self.pending.iter().position(|q| &q.id == id) else {
            return false;
        };
        let quest = self.pending.remove(idx);
        info!(quest = %quest.id, "Quest declined");
        true
    }

    /// Drop every pending offer.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Whether an active quest's objective is met. Unknown ids are `false`.
    #[must_use]
    pub fn check_completion(&self, id: &QuestId, inventory: &Inventory) -> bool {
        self.active
            .iter()
            .find(|q| &q.id == id)
            .is_some_and(|q| q.objective.is_met(inventory))
    }

    /// Turn in an active quest: take collected items, pay the reward and
    /// move it to the completed list.
    ///
    /// # Errors
    /// [`OutpostError::QuestNotFound`] if no active quest has this id,
    /// [`OutpostError::ObjectiveIncomplete`] if the objective is not met.
    pub fn complete(&mut self, id: &QuestId, inventory: &mut Inventory) -> Result<&Quest> {
        let idx = self
            .active
            .iter()
            .position(|q| &q.id == id)
            .ok_or_else(|| OutpostError::QuestNotFound(id.clone()))?;

        if !self.active[idx].objective.is_met(inventory) {
            return Err(OutpostError::ObjectiveIncomplete(id.clone()));
        }
        if let QuestObjective::CollectItem { item_id, quantity } = &self.active[idx].objective {
            if !inventory.remove_items(item_id, *quantity) {
                return Err(OutpostError::ObjectiveIncomplete(id.clone()));
            }
        }

        let mut quest = self.active.remove(idx);
        inventory.add_crypto(quest.reward.crypto);
        quest.status = QuestStatus::Completed;
        info!(quest = %quest.id, crypto = quest.reward.crypto, "Quest completed");
        self.completed.push(quest);
        let last = self.completed.len() - 1;
        Ok(&self.completed[last])
    }

    /// Flag the first active talk quest targeting `target` as done.
    ///
    /// The quest stays active until the player returns to the giver.
    pub fn mark_talk_completed(&mut self, target: &NpcId) -> Option<&Quest> {
        let quest = self.active.iter_mut().find(|q| {
            matches!(&q.objective, QuestObjective::TalkToNpc { npc_id, .. } if npc_id == target)
        })?;
        if let QuestObjective::TalkToNpc { talked, .. } = &mut quest.objective {
            *talked = true;
        }
        info!(quest = %quest.id, giver = %quest.giver_name, "Talk objective met");
        Some(&*quest)
    }

    /// The first active quest handed out by `giver`.
    #[must_use]
    pub fn active_for_giver(&self, giver: &NpcId) -> Option<&Quest> {
        self.active.iter().find(|q| &q.giver_id == giver)
    }

    /// Find a quest in any list.
    #[must_use]
    pub fn get(&self, id: &QuestId) -> Option<&Quest> {
        self.active
            .iter()
            .chain(&self.completed)
            .chain(&self.pending)
            .find(|q| &q.id == id)
    }

    /// Offers awaiting a decision.
    #[must_use]
    pub fn pending(&self) -> &[Quest] {
        &self.pending
    }

    /// Quests in progress.
    #[must_use]
    pub fn active(&self) -> &[Quest] {
        &self.active
    }

    /// Quests turned in.
    #[must_use]
    pub fn completed(&self) -> &[Quest] {
        &self.completed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
