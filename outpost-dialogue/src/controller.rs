//! Dialogue turn controller.
//!
//! ```text
//!            start(npc)
//!   Idle ─────────────▶ Greeting ──┬─ quest ready ──▶ turn-in ──┐
//!                                  ├─ quest active ─▶ progress ─┤
//!                                  └─ no quest ───▶ greeting ───┤
//!                                                               ▼
//!                ┌──────────────────────────────────────── AwaitingInput ◀──────┐
//!                │ handle_player_message                                        │
//!                ├─ quest intent ─▶ QuestSuggestion ─┬─ offer ─▶ AwaitingQuestDecision
//!                │                                   └─ refusal ───────────────┤
//!                └─ chat ─────────▶ RegularChat ───────────────────────────────┘
//!
//!   close() from any state ─▶ Closed
//! ```
//!
//! Scripted follow-ups wait on the session's cancellation token. Closing or
//! replacing the session, or cancelling its token from outside, drops every
//! continuation that has not run yet. A token cancelled from outside closes
//! the dialogue the next time the controller waits on it. An offer left
//! unanswered is declined when the player talks on, switches NPC or closes.

use std::sync::Arc;

use tracing::{debug, info, warn};

use outpost_api::{DialogueRequest, GameService, GenerateQuestRequest, GenerateQuestResponse, PlayerContext};
use outpost_core::config::OutpostConfig;
use outpost_core::quest::QuestObjective;
use outpost_core::roster::{NpcProfile, Roster};
use outpost_core::{GameState, NpcId, Quest, QuestId};
use tokio_util::sync::CancellationToken;

use crate::intent::{self, Intent};
use crate::session::Session;
use crate::ui::DialogueUi;
use crate::world::WorldView;

// ---------------------------------------------------------------------------
// Scripted lines
// ---------------------------------------------------------------------------

/// Fixed NPC lines spoken by the controller itself.
pub mod lines {
    /// Shown while waiting on the service.
    pub const LOADING: &str = "...";
    /// Input placeholder.
    pub const INPUT_PLACEHOLDER: &str = "What would you like to say? (Ask for work, suggest quests, or just chat!)";
    /// Appended to static greetings.
    pub const QUEST_TIP: &str = "Tip: You can ask me for work or suggest quest ideas!";
    /// Quest accepted.
    pub const ACCEPTED: &str = "Excellent! I've added it to your quest log. Good luck!";
    /// Quest declined.
    pub const DECLINED: &str = "No problem! Let me know if you change your mind or need anything else.";
    /// The service could not produce a quest.
    pub const NOT_POSSIBLE: &str = "I'm not sure I can help with that right now. Maybe try a different suggestion?";
    /// The service produced something that is not a playable quest.
    pub const QUEST_ERROR: &str = "I'm having trouble processing that suggestion. Could you try something else?";
    /// Turn-in failed.
    pub const TURN_IN_FAILED: &str =
        "I'm sorry, but it seems there was an issue with the quest completion. Please try again.";
}

/// Where the conversation is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueState {
    /// No dialogue has been opened yet.
    Idle,
    /// Opening lines are being shown.
    Greeting,
    /// Waiting for the player to type.
    AwaitingInput,
    /// A suggestion is with the quest generator.
    QuestSuggestion,
    /// A line is with the dialogue model.
    RegularChat,
    /// A quest offer is waiting for accept/decline.
    AwaitingQuestDecision {
        /// The pending quest.
        quest_id: QuestId,
    },
    /// The dialogue was closed.
    Closed,
}

/// The player's answer to a quest offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestDecision {
    /// Take the quest.
    Accept,
    /// Turn it down.
    Decline,
}

/// Drives one NPC conversation at a time against the remote service.
pub struct DialogueController {
    config: OutpostConfig,
    roster: Roster,
    game: GameState,
    ui: Arc<dyn DialogueUi>,
    world: Arc<dyn WorldView>,
    service: Arc<dyn GameService>,
    session: Option<Session>,
    state: DialogueState,
    is_loading: bool,
}

impl std::fmt::Debug for DialogueController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueController")
            .field("state", &self.state)
            .field("session", &self.session.as_ref().map(Session::id))
            .field("is_loading", &self.is_loading)
            .finish_non_exhaustive()
    }
}

impl DialogueController {
    /// A controller over `game`, talking through `ui` and `service`.
    #[must_use]
    pub fn new(
        config: OutpostConfig,
        roster: Roster,
        game: GameState,
        ui: Arc<dyn DialogueUi>,
        world: Arc<dyn WorldView>,
        service: Arc<dyn GameService>,
    ) -> Self {
        Self {
            config,
            roster,
            game,
            ui,
            world,
            service,
            session: None,
            state: DialogueState::Idle,
            is_loading: false,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    /// Whether a service request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether a dialogue is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// The open session.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Token of the open session, for cancelling it from another task.
    #[must_use]
    pub fn session_token(&self) -> Option<CancellationToken> {
        self.session.as_ref().map(Session::token)
    }

    /// The NPC being talked to.
    #[must_use]
    pub fn current_npc(&self) -> Option<&NpcProfile> {
        self.session.as_ref().map(Session::npc)
    }

    /// The game state.
    #[must_use]
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Mutable game state, e.g. to pick up items between dialogues.
    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    /// The residents and item catalogue.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Give back the game state.
    #[must_use]
    pub fn into_game(self) -> GameState {
        self.game
    }

    // ------------------------------------------------------------------
    // Opening
    // ------------------------------------------------------------------

    /// Open a dialogue with `npc`: turn in a finished quest, narrate quest
    /// progress, or greet. Unknown NPCs are ignored.
    pub async fn start(&mut self, npc: &NpcId) {
        let Some(profile) = self.roster.npc(npc).cloned() else {
            debug!(npc = %npc, "Dialogue requested for unknown NPC");
            return;
        };
        self.withdraw_offer();
        if let Some(previous) = self.session.take() {
            previous.cancel();
            debug!(session = %previous.id(), "Previous dialogue replaced");
        }

        let session = Session::new(profile);
        info!(npc = %npc, session = %session.id(), "Dialogue started");
        self.session = Some(session);
        self.state = DialogueState::Greeting;
        self.is_loading = false;

        self.game.quests.mark_talk_completed(npc);

        let giver_quest = self.game.quests.active_for_giver(npc).cloned();
        match giver_quest {
            Some(quest) if self.game.quests.check_completion(&quest.id, &self.game.inventory) => {
                self.turn_in(quest).await;
            }
            Some(quest) => self.narrate_progress(&quest).await,
            None => self.greet(),
        }
    }

    async fn turn_in(&mut self, quest: Quest) {
        self.say(&format!(
            "Ah, you're back! I can see you've completed the quest \"{}\". Let me check what you've brought...",
            quest.title
        ));
        if !self.pause(self.config.dialogue.scripted_delay_ms).await {
            return;
        }

        let line = match self.game.quests.complete(&quest.id, &mut self.game.inventory) {
            Ok(done) => format!(
                "Perfect! Here's your reward of {} crypto. Thank you for your help!",
                done.reward.crypto
            ),
            Err(err) => {
                warn!(quest = %quest.id, error = %err, "Quest turn-in failed");
                lines::TURN_IN_FAILED.to_string()
            }
        };
        self.say(&line);
        if self.pause(self.config.dialogue.scripted_delay_ms).await {
            self.prompt();
        }
    }

    async fn narrate_progress(&mut self, quest: &Quest) {
        let line = match &quest.objective {
            QuestObjective::CollectItem { item_id, quantity } => {
                let have = self.game.inventory.quantity_of(item_id);
                let item = item_id.spoken();
                if have == 0 {
                    format!("I'm still waiting for you to collect {quantity} {item}. You haven't found any yet.")
                } else if have < *quantity {
                    format!(
                        "Good progress! You have {have} {item}. I still need {} more.",
                        quantity - have
                    )
                } else {
                    format!("Excellent! You have all {quantity} {item}. You can turn in the quest now!")
                }
            }
            QuestObjective::TalkToNpc { npc_id, talked } => {
                let target = self
                    .roster
                    .npc(npc_id)
                    .map_or_else(|| npc_id.to_string(), |p| p.name.clone());
                if *talked {
                    format!("Great! I heard you talked to {target}. The quest is ready to turn in!")
                } else {
                    format!("I'm still waiting for you to talk to {target}. Please visit them and have a conversation.")
                }
            }
        };
        self.say(&line);
        if self.pause(self.config.dialogue.scripted_delay_ms).await {
            self.prompt();
        }
    }

    fn greet(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let greeting = session.npc().default_greeting.clone();
        let shown = if self.config.dialogue.show_quest_tip {
            format!("{greeting}\n\n{}", lines::QUEST_TIP)
        } else {
            greeting.clone()
        };
        self.ui.show_dialogue(&shown, &session.npc().name);
        session.push_npc(greeting);
        self.prompt();
    }

    // ------------------------------------------------------------------
    // Player turns
    // ------------------------------------------------------------------

    /// Route one player line to chat or quest generation.
    ///
    /// Ignored while a request is in flight or when no dialogue is open.
    pub async fn handle_player_message(&mut self, text: &str) {
        if self.is_loading {
            debug!("Player message ignored while a request is in flight");
            return;
        }
        if self.session.is_none() {
            debug!("Player message ignored without an open dialogue");
            return;
        }
        self.withdraw_offer();
        if let Some(session) = self.session.as_mut() {
            session.push_player(text);
        }

        match intent::classify(text) {
            Intent::QuestSuggestion => self.suggest_quest(text).await,
            Intent::RegularChat => self.chat(text).await,
        }
    }

    async fn chat(&mut self, text: &str) {
        let Some(profile) = self.current_npc().cloned() else {
            return;
        };
        self.state = DialogueState::RegularChat;
        self.show_loading(&profile);

        let memory_context = self.game.memory.memory_context(&profile.id);
        let request = DialogueRequest::for_npc(&profile, text, self.player_context(), memory_context);
        let Some(reply) = self.call(|service| async move { service.dialogue(&request).await }).await else {
            return;
        };

        self.say(&reply);
        let record = self.game.memory.record_turn(&profile.id, text, &reply);
        debug!(
            npc = %profile.id,
            stored = record.stored.len(),
            suppressed = record.suppressed,
            "Turn recorded"
        );
        if self.pause(self.config.dialogue.reply_prompt_delay_ms).await {
            self.prompt();
        }
    }

    async fn suggest_quest(&mut self, suggestion: &str) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let profile = session.npc().clone();
        let request = GenerateQuestRequest {
            npc_name: profile.name.clone(),
            conversation_context: session.context(),
            player_suggestion: suggestion.to_string(),
            available_items: self
                .world
                .available_item_ids()
                .into_iter()
                .map(|id| id.as_str().to_string())
                .collect(),
            available_npcs: self.world.npc_names(),
        };
        self.state = DialogueState::QuestSuggestion;
        self.show_loading(&profile);

        let Some(response) = self
            .call(|service| async move { service.generate_quest(&request).await })
            .await
        else {
            return;
        };
        self.resolve_suggestion(&profile, response).await;
    }

    async fn resolve_suggestion(&mut self, giver: &NpcProfile, response: GenerateQuestResponse) {
        let payload = match response.quest {
            Some(payload) if response.success => payload,
            _ => {
                debug!(npc = %giver.id, message = ?response.message, "Quest generation failed");
                return self.reply_and_prompt(lines::NOT_POSSIBLE).await;
            }
        };

        if payload.is_refusal() {
            let line = payload.response.clone().unwrap_or_else(|| lines::NOT_POSSIBLE.to_string());
            debug!(npc = %giver.id, reason = ?payload.error, "Quest suggestion refused");
            return self.reply_and_prompt(&line).await;
        }

        let spoken = payload.response.clone();
        let id = self.game.quests.next_quest_id();
        let offered = match payload
            .into_quest(id, giver, &self.roster)
            .and_then(|quest| self.game.quests.add_pending(quest).cloned())
        {
            Ok(quest) => quest,
            Err(err) => {
                warn!(npc = %giver.id, error = %err, "Service returned an unusable quest");
                return self.reply_and_prompt(lines::QUEST_ERROR).await;
            }
        };

        if let Some(line) = spoken.filter(|l| !l.is_empty()) {
            self.say(&line);
        }
        info!(npc = %giver.id, quest = %offered.id, title = %offered.title, "Quest offered");
        self.state = DialogueState::AwaitingQuestDecision {
            quest_id: offered.id.clone(),
        };
        if self.pause(self.config.dialogue.scripted_delay_ms).await {
            self.ui.show_quest_offer(&offered);
        }
    }

    /// Answer the pending quest offer. No-op unless an offer is waiting.
    pub async fn decide_quest(&mut self, decision: QuestDecision) {
        let DialogueState::AwaitingQuestDecision { quest_id } = self.state.clone() else {
            debug!(?decision, "No quest offer awaiting a decision");
            return;
        };
        if self.session.is_none() {
            return;
        }

        let (moved, line) = match decision {
            QuestDecision::Accept => (self.game.quests.accept(&quest_id), lines::ACCEPTED),
            QuestDecision::Decline => (self.game.quests.decline(&quest_id), lines::DECLINED),
        };
        self.state = DialogueState::AwaitingInput;
        if !moved {
            debug!(quest = %quest_id, "Offered quest no longer pending");
            self.prompt();
            return;
        }
        self.say(line);
        if self.pause(self.config.dialogue.scripted_delay_ms).await {
            self.prompt();
        }
    }

    // ------------------------------------------------------------------
    // Closing
    // ------------------------------------------------------------------

    /// Close the dialogue, cancelling every pending continuation.
    ///
    /// An offer still awaiting a decision is withdrawn.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel();
            info!(npc = %session.npc().id, session = %session.id(), "Dialogue closed");
        }
        self.withdraw_offer();
        self.is_loading = false;
        self.ui.hide_dialogue();
        self.ui.hide_input();
        self.state = DialogueState::Closed;
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Decline an offer still waiting for an answer.
    fn withdraw_offer(&mut self) {
        if let DialogueState::AwaitingQuestDecision { quest_id } = &self.state {
            if self.game.quests.decline(quest_id) {
                debug!(quest = %quest_id, "Unanswered quest offer withdrawn");
            }
            self.state = DialogueState::AwaitingInput;
        }
    }

    fn player_context(&self) -> PlayerContext {
        PlayerContext {
            position: self.world.player_position(),
            active_quests: self.game.quests.active().to_vec(),
            inventory: self.game.inventory.slots().to_vec(),
            crypto: self.game.inventory.crypto(),
        }
    }

    /// Run a service call, racing it against the session token. `None` when
    /// the session went away first.
    async fn call<T, F, Fut>(&mut self, f: F) -> Option<T>
    where
        F: FnOnce(Arc<dyn GameService>) -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        let token = self.session_token()?;
        self.is_loading = true;
        let result = tokio::select! {
            () = token.cancelled() => None,
            value = f(Arc::clone(&self.service)) => Some(value),
        };
        self.is_loading = false;
        if result.is_none() {
            debug!("Service reply dropped for a cancelled dialogue");
            self.close();
        }
        result
    }

    /// Wait out a scripted delay. A session cancelled meanwhile is closed.
    async fn pause(&mut self, ms: u64) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        if session.pause(ms).await {
            return true;
        }
        debug!(session = %session.id(), "Dialogue cancelled during a pause");
        self.close();
        false
    }

    fn say(&mut self, line: &str) {
        if let Some(session) = self.session.as_mut() {
            self.ui.show_dialogue(line, &session.npc().name);
            session.push_npc(line);
        }
    }

    fn show_loading(&self, profile: &NpcProfile) {
        self.ui.show_dialogue(lines::LOADING, &profile.name);
    }

    async fn reply_and_prompt(&mut self, line: &str) {
        self.say(line);
        if self.pause(self.config.dialogue.reply_prompt_delay_ms).await {
            self.prompt();
        }
    }

    fn prompt(&mut self) {
        if self.session.is_some() {
            self.ui.prompt_input(lines::INPUT_PLACEHOLDER);
            self.state = DialogueState::AwaitingInput;
        }
    }
}
